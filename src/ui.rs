use crate::api::HttpApi;
use crate::config::AppConfig;
use crate::flows::{self, SessionStore};
use crate::session::ChatSession;
use crate::theme::theme_definition;
use crate::types::ThemeMode;
use crate::views::{ChatView, SidebarView};
use dioxus::prelude::*;
use std::sync::Arc;

const FINCH_CSS: Asset = asset!("/assets/finch.css");

impl SessionStore for Signal<ChatSession> {
    fn apply<R>(&mut self, f: impl FnOnce(&mut ChatSession) -> R) -> R {
        self.with_mut(f)
    }
}

#[component]
pub fn App() -> Element {
    let config = use_context::<Arc<AppConfig>>();
    let api = use_context::<Arc<HttpApi>>();
    let session = use_signal(ChatSession::default);
    let theme = use_signal(|| ThemeMode::Dark);

    // Page-load behavior: fetch the list, then open a fresh conversation
    // if none is active.
    let load_api = api.clone();
    use_effect(move || {
        let api = load_api.clone();
        let mut session = session;
        spawn(async move {
            flows::initial_load(api.as_ref(), &mut session).await;
        });
    });

    let logged_out = session.read().logged_out;
    let alert = session.read().alert.clone();
    let delete_pending = session.read().pending_delete_id.is_some();
    let theme_css = theme_definition(theme()).css;

    rsx! {
        document::Link { rel: "stylesheet", href: FINCH_CSS }
        style { dangerous_inner_html: "{theme_css}" }
        AppHeader { user_name: config.user_name.clone(), theme }
        if logged_out {
            SignedOutView { session }
        } else {
            div { class: "app-shell",
                SidebarView { session }
                ChatView { session }
            }
        }
        if delete_pending {
            DeleteConfirmModal { session }
        }
        if let Some(message) = alert {
            AlertOverlay { session, message }
        }
    }
}

#[component]
fn AppHeader(user_name: String, theme: Signal<ThemeMode>) -> Element {
    let mut theme = theme;
    rsx! {
        div { class: "header",
            div { class: "header-content",
                h1 { class: "wordmark", "Finch" }
                div { class: "header-right",
                    span { class: "user-label", "Signed in as {user_name}" }
                    div { class: "theme-toggle",
                        button {
                            class: format_args!(
                                "theme-option {}",
                                if matches!(theme(), ThemeMode::Dark) { "active" } else { "" }
                            ),
                            r#type: "button",
                            onclick: move |_| theme.set(ThemeMode::Dark),
                            "Dark"
                        }
                        button {
                            class: format_args!(
                                "theme-option {}",
                                if matches!(theme(), ThemeMode::Light) { "active" } else { "" }
                            ),
                            r#type: "button",
                            onclick: move |_| theme.set(ThemeMode::Light),
                            "Light"
                        }
                    }
                }
            }
        }
    }
}

/// The desktop stand-in for the login redirect: the session is gone until
/// the user signs back in on the service side.
#[component]
fn SignedOutView(session: Signal<ChatSession>) -> Element {
    let api = use_context::<Arc<HttpApi>>();
    let retry_api = api.clone();
    rsx! {
        div { class: "signed-out",
            h3 { "Signed out" }
            p { class: "text-muted",
                "Your session has ended. Sign back in to the chat service, then try again."
            }
            button {
                class: "btn btn-primary",
                r#type: "button",
                onclick: move |_| {
                    let api = retry_api.clone();
                    let mut session = session;
                    spawn(async move {
                        session.set(ChatSession::default());
                        flows::initial_load(api.as_ref(), &mut session).await;
                    });
                },
                "Try again"
            }
        }
    }
}

#[component]
fn DeleteConfirmModal(session: Signal<ChatSession>) -> Element {
    let api = use_context::<Arc<HttpApi>>();
    let mut session = session;
    let confirm_api = api.clone();
    rsx! {
        div { class: "modal-backdrop",
            div { class: "modal-card",
                h4 { "Delete conversation" }
                p { "This conversation and its messages will be permanently deleted." }
                div { class: "modal-actions",
                    button {
                        class: "btn",
                        r#type: "button",
                        onclick: move |_| session.write().dismiss_delete(),
                        "Cancel"
                    }
                    button {
                        id: "confirm-delete",
                        class: "btn btn-danger",
                        r#type: "button",
                        onclick: move |_| {
                            let api = confirm_api.clone();
                            let mut session = session;
                            spawn(async move {
                                flows::confirm_pending_delete(api.as_ref(), &mut session).await;
                            });
                        },
                        "Delete"
                    }
                }
            }
        }
    }
}

#[component]
fn AlertOverlay(session: Signal<ChatSession>, message: String) -> Element {
    let mut session = session;
    rsx! {
        div { class: "modal-backdrop",
            div { class: "modal-card",
                p { class: "alert-message", "{message}" }
                div { class: "modal-actions",
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| session.write().dismiss_alert(),
                        "OK"
                    }
                }
            }
        }
    }
}
