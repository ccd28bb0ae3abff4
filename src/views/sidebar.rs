use crate::api::HttpApi;
use crate::flows;
use crate::session::{ChatSession, SidebarState};
use dioxus::prelude::*;
use std::sync::Arc;

#[component]
pub fn SidebarView(session: Signal<ChatSession>) -> Element {
    let api = use_context::<Arc<HttpApi>>();
    let sidebar = session.read().sidebar.clone();
    let current = session.read().current_conversation_id;

    let body = match sidebar {
        SidebarState::Loading => rsx! {
            div { class: "text-muted", "Loading conversations..." }
        },
        SidebarState::Ready(conversations) => rsx! {
            ul { class: "conversation-list",
                for conv in conversations.iter() {
                    ConversationRow {
                        key: "{conv.id}",
                        session,
                        id: conv.id,
                        snippet: conv.display_snippet().to_string(),
                        active: current == Some(conv.id),
                    }
                }
            }
        },
    };

    let new_api = api.clone();
    rsx! {
        div { class: "sidebar",
            h4 { class: "sidebar-title", "Conversations" }
            {body}
            button {
                class: "btn btn-primary new-conversation",
                r#type: "button",
                onclick: move |_| {
                    let api = new_api.clone();
                    let mut session = session;
                    spawn(async move {
                        flows::start_new_conversation(api.as_ref(), &mut session).await;
                    });
                },
                "New Conversation"
            }
        }
    }
}

#[component]
fn ConversationRow(session: Signal<ChatSession>, id: i64, snippet: String, active: bool) -> Element {
    let api = use_context::<Arc<HttpApi>>();
    let mut session = session;
    let row_class = if active {
        "conversation-row active"
    } else {
        "conversation-row"
    };

    let open_api = api.clone();
    rsx! {
        li { class: "{row_class}", "data-conversation-id": "{id}",
            span {
                class: "conversation-snippet",
                onclick: move |_| {
                    let api = open_api.clone();
                    let mut session = session;
                    spawn(async move {
                        flows::open_conversation(api.as_ref(), &mut session, id).await;
                    });
                },
                "{snippet}"
            }
            button {
                class: "btn btn-danger conversation-delete",
                r#type: "button",
                title: "Delete conversation",
                onclick: move |ev| {
                    // Keep the row's open handler from firing too.
                    ev.stop_propagation();
                    session.write().request_delete(id);
                },
                "×"
            }
        }
    }
}
