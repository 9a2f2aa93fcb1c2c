use crate::export::{ExportFormat, default_export_dir, export_history};
use crate::session::ChatSession;
use crate::theme::ThemePreference;
use dioxus::prelude::*;
use time::OffsetDateTime;

#[component]
pub fn ExportButtons(session: Signal<ChatSession>, notice: Signal<Option<String>>) -> Element {
    let mut export = {
        let mut notice = notice;
        move |format: ExportFormat| {
            let entries = session.read().history().entries().to_vec();
            let result = export_history(
                &entries,
                format,
                &default_export_dir(),
                OffsetDateTime::now_utc(),
            );
            let message = match result {
                Ok(path) => format!("Tersimpan: {}", path.display()),
                Err(err) => {
                    tracing::error!("export failed: {err}");
                    err.to_string()
                }
            };
            notice.set(Some(message));
        }
    };

    rsx! {
        button {
            class: "btn",
            r#type: "button",
            title: "Export TXT",
            onclick: move |_| export(ExportFormat::Text),
            "TXT"
        }
        button {
            class: "btn",
            r#type: "button",
            title: "Export PDF",
            onclick: move |_| export(ExportFormat::Pdf),
            "PDF"
        }
    }
}

#[component]
pub fn ThemeToggle(theme: Signal<ThemePreference>) -> Element {
    let mut theme = theme;
    let icons = theme.read().icons();
    let sun_class = if icons.sun_visible { "icon" } else { "icon hidden" };
    let moon_class = if icons.moon_visible { "icon" } else { "icon hidden" };

    rsx! {
        button {
            class: "btn btn-ghost theme-toggle",
            r#type: "button",
            title: "Ganti tema",
            onclick: move |_| {
                if let Err(err) = theme.with_mut(|pref| pref.toggle()) {
                    tracing::warn!("failed to persist theme: {err}");
                }
            },
            span { class: sun_class, "☀" }
            span { class: moon_class, "☾" }
        }
    }
}
