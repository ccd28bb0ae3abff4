//! The page's controllers: conversation list, conversation detail, new
//! conversation, the optimistic send round trip, and confirmation-gated
//! delete. Everything here is UI-free — flows talk to the service through
//! [`ChatApi`] and to the rendered state through [`SessionStore`], so the
//! tests run them against a fake transport and a bare [`ChatSession`].

use crate::api::{ApiError, ApiResult, ChatApi, ChatRequest};
use crate::session::{ChatSession, PendingSend};
use tracing::{info, warn};

pub const SESSION_EXPIRED_ALERT: &str = "Session expired or server error. Please log in again.";
pub const PERSONA_REQUIRED_ALERT: &str = "Please select a persona.";
pub const DELETE_FAILED_ALERT: &str = "Failed to delete conversation.";

/// Seam between the flows and wherever the session state lives — a Dioxus
/// signal in the app, a plain [`ChatSession`] in tests.
pub trait SessionStore {
    fn apply<R>(&mut self, f: impl FnOnce(&mut ChatSession) -> R) -> R;
}

impl SessionStore for ChatSession {
    fn apply<R>(&mut self, f: impl FnOnce(&mut ChatSession) -> R) -> R {
        f(self)
    }
}

/// Uniform handling for failures outside the send and delete flows: alert,
/// flip to the signed-out screen, and end the server session best-effort.
async fn expire_session<A: ChatApi, S: SessionStore>(api: &A, store: &mut S, err: ApiError) {
    warn!("treating request failure as an expired session: {err}");
    store.apply(|s| {
        s.raise_alert(SESSION_EXPIRED_ALERT);
        s.mark_logged_out();
    });
    if let Err(logout_err) = api.logout().await {
        warn!("logout after session failure also failed: {logout_err}");
    }
}

/// Fetches and installs the sidebar list. The loading placeholder appears
/// synchronously, before any network I/O.
pub async fn load_conversations<A: ChatApi, S: SessionStore>(api: &A, store: &mut S) {
    store.apply(|s| s.set_sidebar_loading());
    match api.list_conversations().await {
        Ok(conversations) => store.apply(|s| s.install_conversations(conversations)),
        Err(err) => expire_session(api, store, err).await,
    }
}

/// Opens one conversation: marks it active, clears the transcript, installs
/// the fetched messages.
pub async fn open_conversation<A: ChatApi, S: SessionStore>(api: &A, store: &mut S, id: i64) {
    store.apply(|s| s.open_conversation(id));
    match api.fetch_messages(id).await {
        Ok(messages) => store.apply(|s| s.install_transcript(messages)),
        Err(err) => expire_session(api, store, err).await,
    }
}

/// Creates a conversation, makes it active with an empty transcript, and
/// refreshes the sidebar.
pub async fn start_new_conversation<A: ChatApi, S: SessionStore>(api: &A, store: &mut S) {
    match api.create_conversation().await {
        Ok(id) => {
            store.apply(|s| {
                s.adopt_conversation_id(id);
                s.transcript.clear();
            });
            load_conversations(api, store).await;
        }
        Err(err) => expire_session(api, store, err).await,
    }
}

/// Startup sequence: sidebar first, then a fresh conversation if none is
/// active yet.
pub async fn initial_load<A: ChatApi, S: SessionStore>(api: &A, store: &mut S) {
    load_conversations(api, store).await;
    if store.apply(|s| s.logged_out) {
        return;
    }
    if store.apply(|s| s.current_conversation_id.is_none()) {
        start_new_conversation(api, store).await;
    }
}

/// The optimistic send round trip.
///
/// The user line and the pending bot line are on screen before any network
/// I/O; any failure afterwards restores the exact pre-send state. Failures
/// in here never log the user out — the page stays usable.
pub async fn send_message<A: ChatApi, S: SessionStore>(
    api: &A,
    store: &mut S,
    persona_id: Option<i64>,
) {
    if store.apply(|s| s.draft.trim().is_empty()) {
        return;
    }
    let Some(persona_id) = persona_id else {
        store.apply(|s| s.raise_alert(PERSONA_REQUIRED_ALERT));
        return;
    };
    let Some(pending) = store.apply(|s| s.begin_send()) else {
        return;
    };

    let mut created_id = None;
    match drive_send(api, store, &pending, persona_id, &mut created_id).await {
        Ok(()) => {
            store.apply(|s| s.finish_send());
            refresh_active_snippet(api, store).await;
        }
        Err(err) => {
            store.apply(|s| s.rollback_send(pending.snapshot));
            if let Some(id) = created_id {
                // The attempt created a conversation the rollback just hid;
                // drop it server-side rather than leave it orphaned.
                if let Err(cleanup_err) = api.delete_conversation(id).await {
                    warn!("could not remove conversation {id} created by a failed send: {cleanup_err}");
                }
            }
            store.apply(|s| s.raise_alert(err.to_string()));
        }
    }
}

async fn drive_send<A: ChatApi, S: SessionStore>(
    api: &A,
    store: &mut S,
    pending: &PendingSend,
    persona_id: i64,
    created_id: &mut Option<i64>,
) -> ApiResult<()> {
    let mut conversation_id = store.apply(|s| s.current_conversation_id);
    if conversation_id.is_none() {
        let id = api.create_conversation().await?;
        *created_id = Some(id);
        store.apply(|s| s.adopt_conversation_id(id));
        let conversations = api.list_conversations().await?;
        store.apply(|s| s.install_conversations(conversations));
        conversation_id = Some(id);
    }

    let reply = api
        .send_chat(&ChatRequest {
            message: pending.message.clone(),
            persona_id,
            conversation_id,
        })
        .await?;

    if let Some(id) = reply.conversation_id {
        store.apply(|s| s.adopt_conversation_id(id));
    }
    info!(persona_id, conversation_id = reply.conversation_id.or(conversation_id), "chat reply received");

    match (reply.response, reply.error) {
        (Some(content), _) => store.apply(|s| s.resolve_reply(&content)),
        (None, Some(error)) => store.apply(|s| s.resolve_service_error(&error)),
        // A 2xx body carrying neither field is malformed.
        (None, None) => return Err(ApiError::SessionExpired),
    }
    Ok(())
}

/// Refreshes the active row's snippet from a full list re-fetch. Purely
/// cosmetic: failures leave the sidebar stale and are otherwise ignored.
async fn refresh_active_snippet<A: ChatApi, S: SessionStore>(api: &A, store: &mut S) {
    let Some(current) = store.apply(|s| s.current_conversation_id) else {
        return;
    };
    match api.list_conversations().await {
        Ok(conversations) => {
            if let Some(conv) = conversations.into_iter().find(|c| c.id == current) {
                store.apply(|s| s.update_snippet(current, conv.snippet));
            }
        }
        Err(err) => info!("sidebar snippet refresh skipped: {err}"),
    }
}

/// Confirms the pending delete. Success on the active conversation clears
/// the transcript and active id before the sidebar refresh; failure alerts
/// and leaves the sidebar as it was. Either way the confirmation UI closes.
pub async fn confirm_pending_delete<A: ChatApi, S: SessionStore>(api: &A, store: &mut S) {
    let Some(id) = store.apply(|s| s.pending_delete_id) else {
        return;
    };
    match api.delete_conversation(id).await {
        Ok(()) => {
            info!("deleted conversation {id}");
            store.apply(|s| {
                s.remove_active_if(id);
                s.dismiss_delete();
            });
            load_conversations(api, store).await;
        }
        Err(err) => {
            warn!("delete of conversation {id} failed: {err}");
            store.apply(|s| {
                s.raise_alert(DELETE_FAILED_ALERT);
                s.dismiss_delete();
            });
        }
    }
}
