/// DOM id of the composer textarea.
pub const COMPOSER_ID: &str = "chat-input";
/// The textarea grows with its content up to this height, then scrolls.
pub const MAX_HEIGHT_PX: u32 = 140;

/// Script that fits the textarea to its content, capped at [`MAX_HEIGHT_PX`].
/// Run after every input change; an emptied textarea shrinks back to one row.
pub fn autosize_script() -> String {
    format!(
        "const el = document.getElementById('{COMPOSER_ID}');\n\
         if (el) {{ el.style.height = 'auto'; el.style.height = Math.min(el.scrollHeight, {MAX_HEIGHT_PX}) + 'px'; }}"
    )
}

/// What a key press in the composer should do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Submit,
    /// Let the textarea handle the key (line break or ordinary input).
    PassThrough,
}

/// Tracks IME composition so Enter confirming a candidate does not submit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Composer {
    composing: bool,
}

impl Composer {
    pub fn composition_started(&mut self) {
        self.composing = true;
    }

    pub fn composition_ended(&mut self) {
        self.composing = false;
    }

    pub fn is_composing(&self) -> bool {
        self.composing
    }

    pub fn key_action(&self, is_enter: bool, shift: bool) -> KeyAction {
        if is_enter && !shift && !self.composing {
            KeyAction::Submit
        } else {
            KeyAction::PassThrough
        }
    }
}
