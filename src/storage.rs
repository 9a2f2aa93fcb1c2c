//! Local key/value storage backing chat history and the theme preference.
//!
//! Native targets keep one file per key under the platform data directory;
//! wasm keeps values in the browser's `localStorage`.

use thiserror::Error;

use std::path::PathBuf;
#[cfg(not(target_arch = "wasm32"))]
use std::{fs, path::Path};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to create storage directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("browser storage is not available")]
    Unavailable,
    #[error("browser storage rejected {key}: {reason}")]
    Browser { key: String, reason: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Store rooted at `<data_local_dir>/ai-chat/storage`; in the browser,
    /// the page's `localStorage` with unprefixed keys.
    pub fn open_default() -> Self {
        Self::at(default_storage_dir())
    }

    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_key(key)))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.entry_path(key)).ok()
    }

    #[cfg(target_arch = "wasm32")]
    pub fn get(&self, key: &str) -> Option<String> {
        browser_storage().ok()?.get_item(&self.browser_key(key)).ok()?
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        ensure_dir(&self.root)?;
        let path = self.entry_path(key);
        fs::write(&path, value).map_err(|source| StorageError::Write { path, source })
    }

    #[cfg(target_arch = "wasm32")]
    pub fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let key = self.browser_key(key);
        browser_storage()?
            .set_item(&key, value)
            .map_err(|err| StorageError::Browser {
                key,
                reason: format!("{err:?}"),
            })
    }

    /// `localStorage` key: the bare key for the default store, otherwise
    /// prefixed with the root so separate stores do not collide.
    #[cfg(any(target_arch = "wasm32", test))]
    fn browser_key(&self, key: &str) -> String {
        let root = self.root.to_string_lossy();
        if root.is_empty() {
            key.to_string()
        } else {
            format!("{root}/{key}")
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn browser_storage() -> Result<web_sys::Storage, StorageError> {
    web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .ok_or(StorageError::Unavailable)
}

#[cfg(not(target_arch = "wasm32"))]
fn ensure_dir(dir: &Path) -> Result<(), StorageError> {
    fs::create_dir_all(dir).map_err(|source| StorageError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(target_arch = "wasm32")]
fn default_storage_dir() -> PathBuf {
    PathBuf::new()
}

#[cfg(not(target_arch = "wasm32"))]
fn default_storage_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        return data_dir.join("ai-chat").join("storage");
    }

    PathBuf::from("cache").join("storage")
}

/// Sanitize storage key for filesystem use
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("ai-chat-history-v1"), "ai-chat-history-v1");
        assert_eq!(sanitize_key("user:preferences"), "user_preferences");
        assert_eq!(sanitize_key(&"k".repeat(100)).len(), 64);
    }

    #[test]
    fn test_browser_keys_match_page_storage_keys() {
        let page = LocalStore::at("");
        assert_eq!(page.browser_key("ai-chat-history-v1"), "ai-chat-history-v1");
        assert_eq!(page.browser_key("ai-chat-theme"), "ai-chat-theme");

        let scoped = LocalStore::at("drafts");
        assert_eq!(scoped.browser_key("ai-chat-theme"), "drafts/ai-chat-theme");
    }

    #[test]
    fn test_set_creates_root_and_get_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::at(dir.path().join("nested").join("storage"));

        assert_eq!(store.get("ai-chat-theme"), None);
        store.set("ai-chat-theme", "dark").unwrap();
        assert_eq!(store.get("ai-chat-theme").as_deref(), Some("dark"));

        store.set("ai-chat-theme", "light").unwrap();
        assert_eq!(store.get("ai-chat-theme").as_deref(), Some("light"));
    }

    #[test]
    fn test_stores_are_isolated_by_root() {
        let dir = tempfile::tempdir().unwrap();
        let first = LocalStore::at(dir.path().join("a"));
        let second = LocalStore::at(dir.path().join("b"));

        first.set("shared_key", "first").unwrap();
        second.set("shared_key", "second").unwrap();

        assert_eq!(first.get("shared_key").as_deref(), Some("first"));
        assert_eq!(second.get("shared_key").as_deref(), Some("second"));
    }
}
