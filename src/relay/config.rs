use anyhow::Context;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_STATIC_DIR: &str = "public";
pub const DEFAULT_RATE_LIMIT_MAX: u32 = 30;

/// Relay settings, read once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayConfig {
    /// Gemini credential; chat requests fail with a configuration error without it.
    pub api_key: Option<String>,
    pub model: String,
    pub bind_addr: String,
    pub port: u16,
    /// `None` mirrors the request origin.
    pub allowed_origin: Option<String>,
    pub static_dir: String,
    pub rate_limit_max: u32,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            allowed_origin: None,
            static_dir: DEFAULT_STATIC_DIR.to_string(),
            rate_limit_max: DEFAULT_RATE_LIMIT_MAX,
        }
    }
}

impl RelayConfig {
    /// Load `.env` from the working directory if there is one. A malformed file is an error.
    pub fn load_dotenv() -> anyhow::Result<()> {
        match dotenvy::dotenv() {
            Ok(path) => {
                tracing::info!("loaded .env from {}", path.display());
                Ok(())
            }
            Err(err) if err.not_found() => Ok(()),
            Err(err) => Err(anyhow::anyhow!("malformed .env file: {err}")),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        Self {
            api_key: get("GEMINI_API_KEY"),
            model: get("GEMINI_MODEL").unwrap_or(defaults.model),
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: parse_or_warn("PORT", get("PORT"), defaults.port),
            allowed_origin: get("FRONTEND_ORIGIN"),
            static_dir: get("STATIC_DIR").unwrap_or(defaults.static_dir),
            rate_limit_max: parse_or_warn(
                "RATE_LIMIT_MAX",
                get("RATE_LIMIT_MAX"),
                defaults.rate_limit_max,
            ),
        }
    }

    /// Listening address; `BIND_ADDR` may be an IPv4 or IPv6 literal.
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip: IpAddr = self
            .bind_addr
            .parse()
            .with_context(|| format!("BIND_ADDR='{}' is not an IP address", self.bind_addr))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn log_summary(&self) {
        match &self.api_key {
            Some(key) => tracing::info!("GEMINI_API_KEY set (len={})", key.len()),
            None => tracing::warn!("GEMINI_API_KEY is not set; chat requests will fail"),
        }
        tracing::info!(
            "model='{}' static_dir='{}' rate_limit={}/min origin={}",
            self.model,
            self.static_dir,
            self.rate_limit_max,
            self.allowed_origin.as_deref().unwrap_or("<mirror>")
        );
    }
}

fn parse_or_warn<T: FromStr + Copy + std::fmt::Display>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!("{key}='{value}' is not valid, using {default}");
            default
        }),
        None => default,
    }
}
