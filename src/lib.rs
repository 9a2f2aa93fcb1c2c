//! Minimal chat client and the thin relay it talks to.
//!
//! The library holds everything that does not need a window: the message
//! model, local persistence, the submission state machine, the relay client,
//! exports and (on native targets) the relay server itself. The Dioxus UI sits
//! behind the `web`, `desktop` and `mobile` features.

pub mod composer;
pub mod config;
pub mod export;
pub mod history;
pub mod pdf;
pub mod relay_client;
pub mod session;
pub mod storage;
pub mod theme;
pub mod types;

#[cfg(not(target_arch = "wasm32"))]
pub mod relay;

#[cfg(feature = "dioxus")]
pub mod ui;
#[cfg(feature = "dioxus")]
pub mod views;
