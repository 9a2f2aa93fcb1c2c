//! PDF export: page layout in points, then rendering through printpdf.
//!
//! Coordinates in the layout are measured from the top-left corner of the page
//! and refer to text baselines; they are flipped when handed to printpdf.

use crate::export::ExportError;
use crate::types::Message;
use printpdf::{BuiltinFont, Mm, PdfDocument};

/// A4 portrait, in points.
pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;
pub const MARGIN: f32 = 40.0;

pub const TITLE: &str = "AI Chat Export";
const TITLE_SIZE: f32 = 16.0;
const TITLE_ADVANCE: f32 = 24.0;
const BODY_SIZE: f32 = 11.0;
const LINE_HEIGHT: f32 = 14.0;
const HEADER_GAP: f32 = 4.0;
const BLOCK_GAP: f32 = 12.0;

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub bold: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageLayout {
    pub lines: Vec<PlacedLine>,
}

/// Usable line width between the margins.
pub fn content_width() -> f32 {
    PAGE_WIDTH - MARGIN * 2.0
}

/// Lay out the title and one block per message. A block that would cross the
/// bottom margin starts on a new page; a block taller than a whole page
/// continues its body onto as many pages as it needs.
pub fn layout(history: &[Message]) -> Vec<PageLayout> {
    let max_width = content_width();
    let mut cursor = Cursor::default();
    cursor.place(TITLE.to_string(), TITLE_SIZE, false);
    cursor.y += TITLE_ADVANCE - LINE_HEIGHT;

    for message in history {
        let header = format!("[{}] {}", message.time, message.role.label());
        let header_lines = wrap_text(&header, max_width, BODY_SIZE);
        let body_lines = wrap_text(&message.content, max_width, BODY_SIZE);
        let block_height =
            (header_lines.len() + body_lines.len()) as f32 * LINE_HEIGHT + BLOCK_GAP;

        if cursor.y + block_height > BOTTOM && !cursor.page.lines.is_empty() {
            cursor.new_page();
        }

        for line in header_lines {
            cursor.place(line, BODY_SIZE, true);
        }
        cursor.y += HEADER_GAP;
        for line in body_lines {
            cursor.place(line, BODY_SIZE, false);
        }
        cursor.y += BLOCK_GAP;
    }

    cursor.finish()
}

const BOTTOM: f32 = PAGE_HEIGHT - MARGIN;

struct Cursor {
    pages: Vec<PageLayout>,
    page: PageLayout,
    y: f32,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            pages: Vec::new(),
            page: PageLayout::default(),
            y: MARGIN,
        }
    }
}

impl Cursor {
    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.page));
        self.y = MARGIN;
    }

    fn place(&mut self, text: String, size: f32, bold: bool) {
        if self.y > BOTTOM {
            self.new_page();
        }
        self.page.lines.push(PlacedLine {
            text,
            x: MARGIN,
            y: self.y,
            size,
            bold,
        });
        self.y += LINE_HEIGHT;
    }

    fn finish(mut self) -> Vec<PageLayout> {
        self.pages.push(self.page);
        self.pages
    }
}

/// Split `text` into lines no wider than `max_width` points at `font_size`.
/// Explicit line breaks are kept and words wider than a line are broken.
pub fn wrap_text(text: &str, max_width: f32, font_size: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let paragraph = paragraph.strip_suffix('\r').unwrap_or(paragraph);
        let mut current = String::new();
        for word in paragraph.split(' ') {
            if text_width(word, font_size) > max_width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let mut pieces = break_word(word, max_width, font_size);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
                continue;
            }
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{current} {word}");
            if text_width(&candidate, font_size) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        lines.push(current);
    }
    lines
}

fn break_word(word: &str, max_width: f32, font_size: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut width = 0.0;
    for c in word.chars() {
        let w = glyph_width(c) * font_size / 1000.0;
        if width + w > max_width && !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
            width = 0.0;
        }
        current.push(c);
        width += w;
    }
    pieces.push(current);
    pieces
}

pub fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(glyph_width).sum::<f32>() * font_size / 1000.0
}

/// Helvetica advance widths (1/1000 em) for printable ASCII.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

fn glyph_width(c: char) -> f32 {
    let code = c as u32;
    if (32..127).contains(&code) {
        HELVETICA_WIDTHS[(code - 32) as usize] as f32
    } else {
        556.0
    }
}

/// The built-in fonts only cover Latin-1.
fn encodable(text: &str) -> String {
    text.chars()
        .map(|c| if (c as u32) < 0x100 { c } else { '?' })
        .collect()
}

fn mm(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

fn pdf_error(err: impl std::fmt::Display) -> ExportError {
    ExportError::Pdf(err.to_string())
}

pub fn render_pdf(history: &[Message]) -> Result<Vec<u8>, ExportError> {
    let pages = layout(history);
    let (doc, first_page, first_layer) =
        PdfDocument::new(TITLE, mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    let mut first = Some((first_page, first_layer));
    for (index, page) in pages.iter().enumerate() {
        let (page_index, layer_index) = match first.take() {
            Some(ids) => ids,
            None => doc.add_page(
                mm(PAGE_WIDTH),
                mm(PAGE_HEIGHT),
                format!("Layer {}", index + 1),
            ),
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);
        for line in &page.lines {
            let font = if line.bold { &bold } else { &regular };
            layer.use_text(
                encodable(&line.text),
                line.size,
                mm(line.x),
                mm(PAGE_HEIGHT - line.y),
                font,
            );
        }
    }

    doc.save_to_bytes().map_err(pdf_error)
}
