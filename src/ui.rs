use crate::config::ClientConfig;
use crate::history::ChatHistory;
use crate::relay_client::RelayClient;
use crate::session::ChatSession;
use crate::storage::LocalStore;
use crate::theme::{ThemePreference, theme_definition};
use crate::types::ThemeMode;
use crate::views::{ChatView, ExportButtons, ThemeToggle};
use dioxus::prelude::*;

const CHAT_CSS: Asset = asset!("/assets/chat.css");

#[component]
pub fn App() -> Element {
    let store = use_hook(LocalStore::open_default);
    let session = use_signal({
        let store = store.clone();
        move || ChatSession::new(ChatHistory::load(store))
    });
    let theme = use_signal(move || ThemePreference::load(store));
    let relay = use_signal(|| RelayClient::new(&ClientConfig::from_env().relay_url));
    let notice = use_signal(|| Option::<String>::None);

    let mode = theme.read().mode();
    let root_class = theme_definition(mode).root_class;

    rsx! {
        ThemeStyles { mode }
        div { class: "app {root_class}",
            AppHeader { theme, session, notice }
            NoticeBanner { notice }
            ChatView { session, relay, notice }
        }
    }
}

#[component]
fn ThemeStyles(mode: ThemeMode) -> Element {
    let definition = theme_definition(mode);
    rsx! {
        document::Link { rel: "stylesheet", href: CHAT_CSS }
        style { dangerous_inner_html: "{definition.css}" }
    }
}

#[component]
fn AppHeader(
    theme: Signal<ThemePreference>,
    session: Signal<ChatSession>,
    notice: Signal<Option<String>>,
) -> Element {
    rsx! {
        div { class: "header",
            div { class: "header-content",
                h1 { class: "header-title", "AI Chat" }
                div { class: "hstack",
                    ExportButtons { session, notice }
                    ThemeToggle { theme }
                }
            }
        }
    }
}

#[component]
fn NoticeBanner(notice: Signal<Option<String>>) -> Element {
    let mut notice = notice;
    let Some(text) = notice() else {
        return rsx! {};
    };
    rsx! {
        div { class: "notice", role: "alert",
            span { "{text}" }
            button {
                class: "btn btn-ghost",
                r#type: "button",
                title: "Tutup",
                onclick: move |_| notice.set(None),
                "×"
            }
        }
    }
}
