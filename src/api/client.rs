use crate::types::{ConversationSummary, Message};
use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

// ============================================
// Error Types
// ============================================

#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx status, non-JSON content type, or an unparseable body.
    #[error("Session expired or server error.")]
    SessionExpired,

    #[error("Failed to reach the chat service: {0}")]
    Transport(#[from] reqwest::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

// ============================================
// Wire Types
// ============================================

#[derive(Clone, Debug, serde::Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub persona_id: i64,
    pub conversation_id: Option<i64>,
}

/// `/chat` answers with a reply, a user-facing error, or both omitted
/// (which callers must treat as a malformed body).
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<i64>,
}

#[derive(Deserialize)]
struct ConversationsEnvelope {
    #[serde(default)]
    conversations: Vec<ConversationSummary>,
}

#[derive(Deserialize)]
struct MessagesEnvelope {
    #[serde(default)]
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct CreatedConversation {
    id: i64,
}

// ============================================
// Service Operations
// ============================================

/// The six operations the client performs against the service. `HttpApi`
/// is the production implementation; tests drive the flows with a fake.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn list_conversations(&self) -> ApiResult<Vec<ConversationSummary>>;
    async fn create_conversation(&self) -> ApiResult<i64>;
    async fn fetch_messages(&self, conversation_id: i64) -> ApiResult<Vec<Message>>;
    async fn delete_conversation(&self, conversation_id: i64) -> ApiResult<()>;
    async fn send_chat(&self, request: &ChatRequest) -> ApiResult<ChatReply>;
    async fn logout(&self) -> ApiResult<()>;
}

pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        // Marks requests as programmatic so the service answers JSON
        // instead of redirecting to its HTML pages.
        headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));
        let client = Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let status = response.status();
        let json_body = is_json_content_type(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
        );
        if !status.is_success() || !json_body {
            return Err(ApiError::SessionExpired);
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|_| ApiError::SessionExpired)
    }
}

fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|value| value.contains("application/json"))
}

#[async_trait]
impl ChatApi for HttpApi {
    async fn list_conversations(&self) -> ApiResult<Vec<ConversationSummary>> {
        let response = self.client.get(self.url("/conversations")).send().await?;
        let envelope: ConversationsEnvelope = Self::read_json(response).await?;
        Ok(envelope.conversations)
    }

    async fn create_conversation(&self) -> ApiResult<i64> {
        let response = self.client.post(self.url("/conversations")).send().await?;
        let created: CreatedConversation = Self::read_json(response).await?;
        Ok(created.id)
    }

    async fn fetch_messages(&self, conversation_id: i64) -> ApiResult<Vec<Message>> {
        let response = self
            .client
            .get(self.url(&format!("/conversations/{conversation_id}")))
            .send()
            .await?;
        let envelope: MessagesEnvelope = Self::read_json(response).await?;
        Ok(envelope.messages)
    }

    async fn delete_conversation(&self, conversation_id: i64) -> ApiResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("/conversations/{conversation_id}")))
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ApiError::SessionExpired)
        }
    }

    async fn send_chat(&self, request: &ChatRequest) -> ApiResult<ChatReply> {
        let response = self
            .client
            .post(self.url("/chat"))
            .json(request)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn logout(&self) -> ApiResult<()> {
        self.client.post(self.url("/auth/logout")).send().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_json_content_types() {
        assert!(is_json_content_type(Some("application/json")));
        assert!(is_json_content_type(Some("application/json; charset=utf-8")));
        assert!(!is_json_content_type(Some("text/html; charset=utf-8")));
        assert!(!is_json_content_type(None));
    }

    #[test]
    fn chat_request_wire_shape() {
        let request = ChatRequest {
            message: "hello".to_string(),
            persona_id: 2,
            conversation_id: None,
        };
        let wire = serde_json::to_value(&request).unwrap();
        assert_eq!(
            wire,
            serde_json::json!({"message": "hello", "persona_id": 2, "conversation_id": null})
        );
    }

    #[test]
    fn chat_reply_tolerates_partial_bodies() {
        let reply: ChatReply = serde_json::from_str(r#"{"response": "hi"}"#).unwrap();
        assert_eq!(reply.response.as_deref(), Some("hi"));
        assert!(reply.error.is_none());

        let reply: ChatReply = serde_json::from_str("{}").unwrap();
        assert!(reply.response.is_none() && reply.error.is_none());
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let api = HttpApi::new("http://localhost:5000/").unwrap();
        assert_eq!(api.url("/conversations"), "http://localhost:5000/conversations");
    }
}
