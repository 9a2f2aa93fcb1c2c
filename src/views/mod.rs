pub mod chat;
pub mod toolbar;

pub use chat::ChatView;
pub use toolbar::{ExportButtons, ThemeToggle};
