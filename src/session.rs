//! Client-side UI state for the chat page.
//!
//! `ChatSession` owns everything the views render: the transcript of the
//! open conversation, the sidebar list, which conversation is active, which
//! one has a delete pending, and the composer draft. All mutation goes
//! through named transitions so the flows (and their tests) never poke at
//! the fields ad hoc. The send flow takes a snapshot before its optimistic
//! update and restores it wholesale on failure.

use crate::types::{ConversationSummary, Message, Sender, parse_timestamp};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineKind {
    User,
    Bot,
    /// Service-reported errors get their own kind so they are never
    /// mistaken for conversation content.
    System,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptLine {
    pub kind: LineKind,
    pub content: String,
    pub pending: bool,
    pub created_at: Option<String>,
}

impl TranscriptLine {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            kind: LineKind::User,
            content: content.into(),
            pending: false,
            created_at: None,
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Bot,
            content: content.into(),
            pending: false,
            created_at: None,
        }
    }

    /// The provisional "…" line shown while the service is answering.
    pub fn pending_bot() -> Self {
        Self {
            kind: LineKind::Bot,
            content: String::new(),
            pending: true,
            created_at: None,
        }
    }

    fn from_message(message: Message) -> Self {
        let kind = match message.sender {
            Sender::User => LineKind::User,
            Sender::Assistant => LineKind::Bot,
        };
        Self {
            kind,
            content: message.content,
            pending: false,
            created_at: message.created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SidebarState {
    Loading,
    Ready(Vec<ConversationSummary>),
}

/// Everything `begin_send` touches optimistically, captured for rollback.
#[derive(Clone, Debug)]
pub struct SendSnapshot {
    transcript: Vec<TranscriptLine>,
    sidebar: SidebarState,
    conversation_id: Option<i64>,
}

/// A send the session has accepted: the trimmed message plus the state to
/// restore if the round trip fails.
#[derive(Debug)]
pub struct PendingSend {
    pub message: String,
    pub snapshot: SendSnapshot,
}

#[derive(Clone, Debug)]
pub struct ChatSession {
    pub transcript: Vec<TranscriptLine>,
    pub sidebar: SidebarState,
    pub current_conversation_id: Option<i64>,
    pub pending_delete_id: Option<i64>,
    pub draft: String,
    pub sending: bool,
    pub alert: Option<String>,
    pub logged_out: bool,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self {
            transcript: Vec::new(),
            sidebar: SidebarState::Loading,
            current_conversation_id: None,
            pending_delete_id: None,
            draft: String::new(),
            sending: false,
            alert: None,
            logged_out: false,
        }
    }
}

impl ChatSession {
    pub fn conversations(&self) -> &[ConversationSummary] {
        match &self.sidebar {
            SidebarState::Loading => &[],
            SidebarState::Ready(list) => list,
        }
    }

    // --------------------------------------------
    // Sidebar transitions
    // --------------------------------------------

    pub fn set_sidebar_loading(&mut self) {
        self.sidebar = SidebarState::Loading;
    }

    /// Installs a freshly fetched list, most recent first. Server order is
    /// not trusted; unparseable timestamps fall back to lexicographic order.
    pub fn install_conversations(&mut self, mut conversations: Vec<ConversationSummary>) {
        conversations.sort_by(|a, b| {
            match (parse_timestamp(&a.started_at), parse_timestamp(&b.started_at)) {
                (Some(ta), Some(tb)) => tb.cmp(&ta),
                _ => b.started_at.cmp(&a.started_at),
            }
        });
        self.sidebar = SidebarState::Ready(conversations);
    }

    pub fn update_snippet(&mut self, conversation_id: i64, snippet: Option<String>) {
        if let SidebarState::Ready(list) = &mut self.sidebar {
            if let Some(conv) = list.iter_mut().find(|c| c.id == conversation_id) {
                conv.snippet = snippet;
            }
        }
    }

    // --------------------------------------------
    // Transcript transitions
    // --------------------------------------------

    pub fn open_conversation(&mut self, conversation_id: i64) {
        self.current_conversation_id = Some(conversation_id);
        self.transcript.clear();
    }

    pub fn install_transcript(&mut self, messages: Vec<Message>) {
        self.transcript = messages.into_iter().map(TranscriptLine::from_message).collect();
    }

    pub fn adopt_conversation_id(&mut self, conversation_id: i64) {
        self.current_conversation_id = Some(conversation_id);
    }

    // --------------------------------------------
    // Send flow transitions
    // --------------------------------------------

    /// Accepts the composer draft for sending: snapshots the current state,
    /// appends the user line and the pending bot line, clears the draft.
    /// Refuses while another send is in flight or the draft is blank.
    pub fn begin_send(&mut self) -> Option<PendingSend> {
        let message = self.draft.trim().to_string();
        if message.is_empty() || self.sending {
            return None;
        }
        let snapshot = SendSnapshot {
            transcript: self.transcript.clone(),
            sidebar: self.sidebar.clone(),
            conversation_id: self.current_conversation_id,
        };
        self.transcript.push(TranscriptLine::user(message.clone()));
        self.transcript.push(TranscriptLine::pending_bot());
        self.draft.clear();
        self.sending = true;
        Some(PendingSend { message, snapshot })
    }

    /// Replaces the pending line with the service's reply.
    pub fn resolve_reply(&mut self, content: &str) {
        if let Some(line) = self.transcript.iter_mut().rev().find(|l| l.pending) {
            line.content = content.to_string();
            line.pending = false;
        }
    }

    /// Replaces the pending line with a service-reported error, kept
    /// distinct from bot content.
    pub fn resolve_service_error(&mut self, message: &str) {
        if let Some(line) = self.transcript.iter_mut().rev().find(|l| l.pending) {
            line.kind = LineKind::System;
            line.content = message.to_string();
            line.pending = false;
        }
    }

    pub fn finish_send(&mut self) {
        self.sending = false;
    }

    /// Discards every optimistic change of a failed send. The cleared draft
    /// stays cleared, matching what the composer showed at send time.
    pub fn rollback_send(&mut self, snapshot: SendSnapshot) {
        self.transcript = snapshot.transcript;
        self.sidebar = snapshot.sidebar;
        self.current_conversation_id = snapshot.conversation_id;
        self.sending = false;
    }

    // --------------------------------------------
    // Delete flow transitions
    // --------------------------------------------

    pub fn request_delete(&mut self, conversation_id: i64) {
        self.pending_delete_id = Some(conversation_id);
    }

    pub fn dismiss_delete(&mut self) {
        self.pending_delete_id = None;
    }

    /// After a confirmed delete: dropping the active conversation empties
    /// the transcript; dropping any other leaves it alone.
    pub fn remove_active_if(&mut self, conversation_id: i64) {
        if self.current_conversation_id == Some(conversation_id) {
            self.current_conversation_id = None;
            self.transcript.clear();
        }
    }

    // --------------------------------------------
    // Alerts and session state
    // --------------------------------------------

    pub fn raise_alert(&mut self, message: impl Into<String>) {
        self.alert = Some(message.into());
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn mark_logged_out(&mut self) {
        self.logged_out = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: i64, started_at: &str) -> ConversationSummary {
        ConversationSummary {
            id,
            snippet: Some(format!("conv {id}")),
            started_at: started_at.to_string(),
        }
    }

    #[test]
    fn begin_send_appends_user_and_pending_lines() {
        let mut session = ChatSession::default();
        session.draft = "  hello  ".to_string();
        let pending = session.begin_send().expect("send accepted");

        assert_eq!(pending.message, "hello");
        assert_eq!(session.transcript.len(), 2);
        assert_eq!(session.transcript[0], TranscriptLine::user("hello"));
        assert!(session.transcript[1].pending);
        assert!(session.draft.is_empty());
        assert!(session.sending);
    }

    #[test]
    fn begin_send_refuses_blank_draft() {
        let mut session = ChatSession::default();
        session.draft = "   ".to_string();
        assert!(session.begin_send().is_none());
        assert!(session.transcript.is_empty());
        assert!(!session.sending);
    }

    #[test]
    fn begin_send_is_single_flight() {
        let mut session = ChatSession::default();
        session.draft = "first".to_string();
        assert!(session.begin_send().is_some());
        session.draft = "second".to_string();
        assert!(session.begin_send().is_none());
        assert_eq!(session.draft, "second");
        assert_eq!(session.transcript.len(), 2);
    }

    #[test]
    fn rollback_restores_snapshot_exactly() {
        let mut session = ChatSession::default();
        session.install_conversations(vec![summary(1, "2024-03-01 09:00:00")]);
        session.open_conversation(1);
        session.transcript.push(TranscriptLine::bot("earlier"));
        session.draft = "hello".to_string();

        let transcript_before = session.transcript.clone();
        let sidebar_before = session.sidebar.clone();
        let pending = session.begin_send().expect("send accepted");
        session.adopt_conversation_id(9);

        session.rollback_send(pending.snapshot);
        assert_eq!(session.transcript, transcript_before);
        assert_eq!(session.sidebar, sidebar_before);
        assert_eq!(session.current_conversation_id, Some(1));
        assert!(!session.sending);
    }

    #[test]
    fn resolve_reply_fills_pending_line() {
        let mut session = ChatSession::default();
        session.draft = "hi".to_string();
        session.begin_send().expect("send accepted");
        session.resolve_reply("hello there");
        session.finish_send();

        let last = session.transcript.last().expect("bot line");
        assert_eq!(last.kind, LineKind::Bot);
        assert_eq!(last.content, "hello there");
        assert!(!last.pending);
        assert!(!session.sending);
    }

    #[test]
    fn resolve_service_error_marks_line_system() {
        let mut session = ChatSession::default();
        session.draft = "hi".to_string();
        session.begin_send().expect("send accepted");
        session.resolve_service_error("persona unavailable");

        let last = session.transcript.last().expect("line");
        assert_eq!(last.kind, LineKind::System);
        assert_eq!(last.content, "persona unavailable");
    }

    #[test]
    fn conversations_install_most_recent_first() {
        let mut session = ChatSession::default();
        session.install_conversations(vec![
            summary(1, "2024-03-01 09:00:00"),
            summary(3, "2024-03-02 10:00:00"),
            summary(2, "2024-02-28 23:59:59"),
        ]);
        let ids: Vec<i64> = session.conversations().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn unparseable_timestamps_fall_back_to_lexicographic_order() {
        let mut session = ChatSession::default();
        session.install_conversations(vec![summary(1, "alpha"), summary(2, "omega")]);
        let ids: Vec<i64> = session.conversations().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn update_snippet_touches_only_the_matching_row() {
        let mut session = ChatSession::default();
        session.install_conversations(vec![
            summary(1, "2024-03-01 09:00:00"),
            summary(2, "2024-03-02 09:00:00"),
        ]);
        session.update_snippet(1, Some("fresh".to_string()));
        let list = session.conversations();
        assert_eq!(list.iter().find(|c| c.id == 1).unwrap().snippet.as_deref(), Some("fresh"));
        assert_eq!(list.iter().find(|c| c.id == 2).unwrap().snippet.as_deref(), Some("conv 2"));
    }

    #[test]
    fn remove_active_clears_transcript_only_for_active_id() {
        let mut session = ChatSession::default();
        session.open_conversation(5);
        session.transcript.push(TranscriptLine::user("hey"));

        session.remove_active_if(6);
        assert_eq!(session.current_conversation_id, Some(5));
        assert_eq!(session.transcript.len(), 1);

        session.remove_active_if(5);
        assert_eq!(session.current_conversation_id, None);
        assert!(session.transcript.is_empty());
    }

    #[test]
    fn delete_request_and_dismiss_round_trip() {
        let mut session = ChatSession::default();
        session.request_delete(4);
        assert_eq!(session.pending_delete_id, Some(4));
        session.dismiss_delete();
        assert_eq!(session.pending_delete_id, None);
    }
}
