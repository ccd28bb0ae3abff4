use serde::{Deserialize, Serialize};
use time::format_description::FormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One message of the currently open conversation, as the service returns it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Sidebar entry. `snippet` may be absent for a conversation that has no
/// messages yet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: i64,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub started_at: String,
}

impl ConversationSummary {
    pub fn display_snippet(&self) -> &str {
        match self.snippet.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => "(No message)",
        }
    }
}

/// Persona record injected through configuration; only feeds the selector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeMode {
    Dark,
    Light,
}

// The service stores timestamps as `YYYY-MM-DD HH:MM:SS`; proxies in front
// of it have been seen rewriting them to RFC 3339.
const SERVICE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Some(parsed);
    }
    PrimitiveDateTime::parse(trimmed, SERVICE_TIME_FORMAT)
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}
