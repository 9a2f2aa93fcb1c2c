//! Client-side configuration.

use crate::relay_client::DEFAULT_RELAY_URL;
use std::env;

/// Bundled config for builds that ship without a `.env` (mobile, web)
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

pub const RELAY_URL_VAR: &str = "AI_CHAT_RELAY_URL";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub relay_url: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let relay_url = lookup(RELAY_URL_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .or_else(|| bundled_value(RELAY_URL_VAR))
            .unwrap_or_else(|| DEFAULT_RELAY_URL.to_string());
        Self { relay_url }
    }
}

/// Load `.env` on native targets; values from the process environment win.
#[cfg(not(target_arch = "wasm32"))]
pub fn load_dotenv() {
    if let Err(err) = dotenvy::dotenv()
        && !err.not_found()
    {
        tracing::warn!("ignoring malformed .env: {err}");
    }
}

#[cfg(target_arch = "wasm32")]
pub fn load_dotenv() {}

fn bundled_value(key: &str) -> Option<String> {
    parse_env_lines(BUNDLED_CONFIG)
        .into_iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v)
}

/// `KEY=VALUE` pairs, skipping comments and blank lines.
pub fn parse_env_lines(source: &str) -> Vec<(String, String)> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}
