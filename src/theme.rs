use crate::storage::{LocalStore, StorageError};
use crate::types::ThemeMode;

pub const THEME_KEY: &str = "ai-chat-theme";

pub struct ThemeDefinition {
    pub css: &'static str,
    pub root_class: &'static str,
}

pub fn theme_definition(mode: ThemeMode) -> ThemeDefinition {
    match mode {
        ThemeMode::Dark => ThemeDefinition {
            css: DARK_THEME,
            root_class: "dark",
        },
        ThemeMode::Light => ThemeDefinition {
            css: LIGHT_THEME,
            root_class: "",
        },
    }
}

/// Which of the two toggle icons is shown. The sun invites switching to light,
/// so it shows while dark is active; the moon shows while light is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemeIcons {
    pub sun_visible: bool,
    pub moon_visible: bool,
}

impl ThemeIcons {
    pub fn for_mode(mode: ThemeMode) -> Self {
        let dark = mode == ThemeMode::Dark;
        Self {
            sun_visible: dark,
            moon_visible: !dark,
        }
    }
}

/// Persisted light/dark preference, stored separately from chat history.
#[derive(Debug)]
pub struct ThemePreference {
    mode: ThemeMode,
    store: LocalStore,
}

impl ThemePreference {
    pub fn load(store: LocalStore) -> Self {
        let mode = store
            .get(THEME_KEY)
            .and_then(|raw| ThemeMode::parse(&raw))
            .unwrap_or_default();
        Self { mode, store }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn icons(&self) -> ThemeIcons {
        ThemeIcons::for_mode(self.mode)
    }

    /// Flip the mode and persist it. The in-memory mode flips even if the write fails.
    pub fn toggle(&mut self) -> Result<ThemeMode, StorageError> {
        self.mode = self.mode.toggled();
        self.store.set(THEME_KEY, self.mode.as_str())?;
        Ok(self.mode)
    }
}

const DARK_THEME: &str = r#"
:root {
    --color-bg-primary: #0b0f19;
    --color-bg-secondary: #111827;
    --color-bg-overlay: rgba(11, 15, 25, 0.92);
    --color-text-primary: #f3f4f6;
    --color-text-muted: #9ca3af;
    --color-border: #1f2937;
    --color-surface-muted: #1f2937;
    --color-input-border: #374151;
    --color-input-bg: #111827;
    --color-chat-user-bg: #4f46e5;
    --color-chat-user-text: #ffffff;
    --color-chat-assistant-bg: #1f2937;
    --color-chat-assistant-text: #f3f4f6;
    --color-timestamp: #9ca3af;
    --color-notice-bg: #3b1d1d;
    --color-notice-text: #fecaca;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
.header { background: var(--color-bg-secondary); border-bottom-color: var(--color-border); }
.btn:hover { background: var(--color-surface-muted); }
.composer textarea { background: var(--color-input-bg); color: var(--color-text-primary); border-color: var(--color-input-border); }
"#;

const LIGHT_THEME: &str = r#"
:root {
    --color-bg-primary: #f9fafb;
    --color-bg-secondary: #ffffff;
    --color-bg-overlay: rgba(255, 255, 255, 0.92);
    --color-text-primary: #111827;
    --color-text-muted: #6b7280;
    --color-border: #e5e7eb;
    --color-surface-muted: #f3f4f6;
    --color-input-border: #d1d5db;
    --color-input-bg: #ffffff;
    --color-chat-user-bg: #4f46e5;
    --color-chat-user-text: #ffffff;
    --color-chat-assistant-bg: #ffffff;
    --color-chat-assistant-text: #111827;
    --color-timestamp: #6b7280;
    --color-notice-bg: #fef2f2;
    --color-notice-text: #991b1b;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
.header { background: var(--color-bg-secondary); border-bottom-color: var(--color-border); }
.btn:hover { background: var(--color-surface-muted); }
.composer textarea { background: var(--color-input-bg); color: var(--color-text-primary); border-color: var(--color-input-border); }
"#;
