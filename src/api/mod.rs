/// API module for Finch
///
/// Talks to the chat service's JSON endpoints with the session cookie jar
/// attached. Every response goes through one failure policy: a non-2xx
/// status, a non-JSON content type, or an unparseable body all mean the
/// session is gone (or the server is broken), and callers treat that
/// uniformly.
///
/// # Architecture
///
/// - `client` - `ChatApi` trait over the six service operations plus the
///   production `HttpApi` implementation on reqwest
mod client;

// Re-export main types
pub use client::{ApiError, ApiResult, ChatApi, ChatReply, ChatRequest, HttpApi};
