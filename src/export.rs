//! Plain-text export and the shared file naming/saving helpers.

use crate::types::Message;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::{OffsetDateTime, format_description::FormatItem, macros::format_description};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Gagal membuat PDF: {0}")]
    Pdf(String),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("export is not available on this platform")]
    Unsupported,
    #[error("browser download failed: {0}")]
    Download(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Text => "text/plain;charset=utf-8",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

const FILE_STAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]-[hour]-[minute]-[second]");

/// `ai-chat-YYYY-MM-DD-HH-MM-SS.<ext>` in UTC.
pub fn export_filename(now: OffsetDateTime, format: ExportFormat) -> String {
    let stamp = now
        .to_offset(time::UtcOffset::UTC)
        .format(FILE_STAMP_FORMAT)
        .unwrap_or_else(|_| String::from("export"));
    format!("ai-chat-{stamp}.{}", format.extension())
}

/// `[time] ROLE: content` per entry, newline separated.
pub fn render_text(history: &[Message]) -> String {
    history
        .iter()
        .map(|m| format!("[{}] {}: {}", m.time, m.role.label(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Directory exports are written into. Unused in the browser, where the file
/// goes through the download prompt.
pub fn default_export_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_export(
    dir: &Path,
    filename: &str,
    _mime_type: &str,
    bytes: &[u8],
) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Write {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(filename);
    std::fs::write(&path, bytes).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::info!("exported chat history to {}", path.display());
    Ok(path)
}

/// Hand the bytes to the browser as a download through a temporary object URL.
#[cfg(target_arch = "wasm32")]
pub fn save_export(
    _dir: &Path,
    filename: &str,
    mime_type: &str,
    bytes: &[u8],
) -> Result<PathBuf, ExportError> {
    use wasm_bindgen::JsCast;

    let download_error = |err: wasm_bindgen::JsValue| ExportError::Download(format!("{err:?}"));
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or(ExportError::Unsupported)?;

    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(mime_type);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(download_error)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(download_error)?;

    let anchor = document
        .create_element("a")
        .map_err(download_error)?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|_| ExportError::Download("anchor element unavailable".to_string()))?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();
    web_sys::Url::revoke_object_url(&url).map_err(download_error)?;

    tracing::info!("exported chat history as {filename}");
    Ok(PathBuf::from(filename))
}

/// Render `history` in `format` and save it under a timestamped name in `dir`.
pub fn export_history(
    history: &[Message],
    format: ExportFormat,
    dir: &Path,
    now: OffsetDateTime,
) -> Result<PathBuf, ExportError> {
    let bytes = match format {
        ExportFormat::Text => render_text(history).into_bytes(),
        ExportFormat::Pdf => crate::pdf::render_pdf(history)?,
    };
    save_export(
        dir,
        &export_filename(now, format),
        format.mime_type(),
        &bytes,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;
    use time::macros::datetime;

    #[test]
    fn filename_replaces_colons_and_t() {
        let now = datetime!(2024-03-05 14:07:09.456 UTC);
        assert_eq!(
            export_filename(now, ExportFormat::Text),
            "ai-chat-2024-03-05-14-07-09.txt"
        );
        assert_eq!(
            export_filename(now, ExportFormat::Pdf),
            "ai-chat-2024-03-05-14-07-09.pdf"
        );
    }

    #[test]
    fn mime_types_match_format() {
        assert_eq!(ExportFormat::Text.mime_type(), "text/plain;charset=utf-8");
        assert_eq!(ExportFormat::Pdf.mime_type(), "application/pdf");
    }

    #[test]
    fn filename_is_in_utc() {
        let now = datetime!(2024-03-05 21:07:09 +07:00);
        assert_eq!(
            export_filename(now, ExportFormat::Text),
            "ai-chat-2024-03-05-14-07-09.txt"
        );
    }

    #[test]
    fn text_export_keeps_multiline_content_inline() {
        let history = vec![Message::at(Role::Assistant, "baris 1\nbaris 2", "08:00")];
        assert_eq!(render_text(&history), "[08:00] ASSISTANT: baris 1\nbaris 2");
    }

    #[test]
    fn empty_history_exports_empty_text() {
        assert_eq!(render_text(&[]), "");
    }
}
