use crate::composer::{COMPOSER_ID, Composer, KeyAction, autosize_script};
use crate::relay_client::{ChatTransport, RelayClient};
use crate::session::ChatSession;
use crate::types::{Message, Role};
use dioxus::events::Key;
use dioxus::prelude::*;

const SCROLL_TO_BOTTOM: &str = r#"
const list = document.getElementById('chat-list');
if (list) { list.scrollTop = list.scrollHeight; }
"#;

fn role_class(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

#[component]
pub fn ChatView(
    session: Signal<ChatSession>,
    relay: Signal<RelayClient>,
    notice: Signal<Option<String>>,
) -> Element {
    let mut input = use_signal(String::new);
    let mut composer = use_signal(Composer::default);

    use_effect(move || {
        let session = session.read();
        let _ = (session.history().len(), session.is_awaiting());
        let _ = document::eval(SCROLL_TO_BOTTOM);
    });

    use_effect(move || {
        let _ = input.read().len();
        let _ = document::eval(&autosize_script());
    });

    let mut send_message = {
        let mut session = session;
        let mut notice = notice;
        let mut input_signal = input;
        move |text: String| match session.with_mut(|s| s.begin(&text)) {
            Ok(message) => {
                input_signal.set(String::new());
                let client = relay.read().clone();
                spawn(async move {
                    let outcome = client.send(&message).await;
                    session.with_mut(|s| {
                        s.complete(outcome);
                    });
                });
            }
            Err(err) => {
                if let Some(alert) = err.alert() {
                    notice.set(Some(alert));
                }
            }
        }
    };

    let entries = session.read().history().entries().to_vec();
    let awaiting = session.read().is_awaiting();

    rsx! {
        div { class: "main-container",
            div { class: "chat-wrap",
                div { id: "chat-list", class: "chat-list",
                    for (i, msg) in entries.into_iter().enumerate() {
                        MessageBubble { key: "{i}", message: msg }
                    }
                    if awaiting {
                        TypingIndicator {}
                    }
                }
            }

            form { class: "composer",
                div { class: "composer-inner",
                    div { class: "hstack", style: "gap: 0.5rem; width: 100%; align-items: flex-end;",
                        textarea {
                            id: COMPOSER_ID, rows: "1", placeholder: "Tulis pesan…",
                            value: "{input}", oninput: move |ev| input.set(ev.value()),
                            oncompositionstart: move |_| composer.with_mut(|c| c.composition_started()),
                            oncompositionend: move |_| composer.with_mut(|c| c.composition_ended()),
                            onkeydown: move |ev| {
                                let action = composer
                                    .read()
                                    .key_action(ev.key() == Key::Enter, ev.modifiers().shift());
                                if action == KeyAction::Submit {
                                    ev.prevent_default();
                                    send_message(input());
                                }
                            },
                            autofocus: true,
                        }
                        button {
                            class: "btn btn-primary", r#type: "button",
                            disabled: awaiting || input().trim().is_empty(),
                            onclick: move |_| send_message(input()),
                            "Kirim"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn MessageBubble(message: Message) -> Element {
    let side = role_class(message.role);
    rsx! {
        div { class: "message-row {side}",
            if message.role == Role::Assistant {
                div { class: "avatar assistant", "AI" }
            }
            div { class: "message-stack",
                div { class: "bubble {side}", p { "{message.content}" } }
                div { class: "message-meta",
                    span { class: "message-timestamp", "{message.time}" }
                }
            }
        }
    }
}

#[component]
fn TypingIndicator() -> Element {
    rsx! {
        div { id: "typing-indicator", class: "message-row assistant",
            div { class: "avatar assistant", "AI" }
            div { class: "bubble assistant typing",
                span { class: "dot" }
                span { class: "dot" }
                span { class: "dot" }
            }
        }
    }
}
