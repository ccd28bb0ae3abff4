use crate::api::HttpApi;
use crate::config::AppConfig;
use crate::flows;
use crate::session::{ChatSession, LineKind, TranscriptLine};
use crate::views::shared::{format_message_timestamp, markdown_to_html};
use dioxus::events::Key;
use dioxus::prelude::*;
use std::sync::Arc;

fn kind_class(kind: &LineKind) -> &'static str {
    match kind {
        LineKind::User => "user",
        LineKind::Bot => "bot",
        LineKind::System => "system",
    }
}

#[component]
pub fn ChatView(session: Signal<ChatSession>) -> Element {
    let config = use_context::<Arc<AppConfig>>();
    let api = use_context::<Arc<HttpApi>>();
    let mut session = session;
    let mut persona = use_signal(|| Option::<i64>::None);

    let transcript = session.read().transcript.clone();
    let draft = session.read().draft.clone();
    let sending = session.read().sending;

    // Keep the transcript pinned to its newest line.
    use_effect(move || {
        let _ = session.read().transcript.len();
        let _ = document::eval(
            "const el = document.getElementById('transcript'); if (el) el.scrollTop = el.scrollHeight;",
        );
    });

    // Held in a signal so the send closure stays Copy for both handlers.
    let api_handle = use_signal(move || api);
    let send = move || {
        let api = api_handle();
        let persona_id = persona();
        let mut session = session;
        spawn(async move {
            flows::send_message(api.as_ref(), &mut session, persona_id).await;
        });
    };

    rsx! {
        div { class: "chat-pane",
            div { id: "transcript", class: "transcript",
                for (i, line) in transcript.iter().enumerate() {
                    MessageLine { key: "{i}", line: line.clone() }
                }
            }
            form { class: "composer", onsubmit: move |ev| ev.prevent_default(),
                select {
                    class: "persona-select",
                    onchange: move |ev| persona.set(ev.value().parse::<i64>().ok()),
                    option { value: "", selected: persona().is_none(), "Select persona" }
                    for p in config.personas.iter() {
                        option { value: "{p.id}", selected: persona() == Some(p.id), "{p.name}" }
                    }
                }
                textarea {
                    class: "composer-input",
                    rows: "1",
                    placeholder: "Type a message",
                    value: "{draft}",
                    oninput: move |ev| session.write().draft = ev.value(),
                    onkeydown: move |ev| {
                        if ev.key() == Key::Enter && !ev.modifiers().shift() {
                            ev.prevent_default();
                            send();
                        }
                    },
                    autofocus: true,
                }
                button {
                    id: "send",
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: sending,
                    onclick: move |_| send(),
                    "Send"
                }
            }
        }
    }
}

#[component]
fn MessageLine(line: TranscriptLine) -> Element {
    let class = kind_class(&line.kind);
    let timestamp = format_message_timestamp(line.created_at.as_deref());

    rsx! {
        div { class: "message-row {class}",
            div { class: "bubble {class}",
                if line.pending {
                    span { class: "shimmer-text", "…" }
                } else if line.kind == LineKind::Bot {
                    BotBubble { content: line.content.clone() }
                } else {
                    "{line.content}"
                }
            }
            if let Some(ts) = timestamp {
                div { class: "message-meta", span { class: "message-timestamp", "{ts}" } }
            }
        }
    }
}

#[component]
fn BotBubble(content: String) -> Element {
    let content_html = markdown_to_html(&content);
    let copy_payload = content.clone();
    let on_copy = move |_| {
        let raw = copy_payload.clone();
        spawn(async move {
            #[cfg(any(feature = "desktop", feature = "mobile"))]
            {
                if let Ok(mut cb) = arboard::Clipboard::new() {
                    let _ = cb.set_text(raw);
                }
            }
        });
    };

    rsx! {
        div { class: "bubble-controls",
            button { class: "action-btn", title: "Copy reply", onclick: on_copy, "Copy" }
        }
        div { class: "md", dangerous_inner_html: "{content_html}" }
    }
}
