//! The chat backend client.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{Error, Result};

/// Reply text used when the backend answered 2xx with parseable JSON but
/// neither of the expected reply fields.
pub const REPLY_PLACEHOLDER: &str = "No reply available right now.";

/// Request body of the chat endpoint.
#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// Response body of the chat endpoint.
///
/// Backends answer with either `reply` or `response`; the first present
/// wins. `credits_remaining` is optional.
#[derive(Debug, Deserialize)]
struct ChatReplyBody {
    reply: Option<String>,
    response: Option<String>,
    credits_remaining: Option<u64>,
}

/// Response body of the billing status endpoint.
#[derive(Debug, Deserialize)]
struct BillingStatusBody {
    credits: u64,
}

/// A successfully parsed chat reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    /// The reply text (markdown).
    pub text: String,
    /// The credit balance, when the backend reports one.
    pub credits_remaining: Option<u64>,
}

impl ChatReply {
    fn from_body(body: ChatReplyBody) -> Self {
        Self {
            text: body
                .reply
                .or(body.response)
                .unwrap_or_else(|| REPLY_PLACEHOLDER.to_string()),
            credits_remaining: body.credits_remaining,
        }
    }
}

/// HTTP client for the chat backend.
///
/// Wraps a [`reqwest::Client`] configured with a per-request timeout and
/// exposes the three backend calls the TUI needs.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use nebula_client::ChatClient;
///
/// # async fn example() -> nebula_client::Result<()> {
/// let client = ChatClient::new("http://localhost:8000", "/chat", Duration::from_secs(30))?;
/// let reply = client.send_message("Generate a login scenario").await?;
/// println!("{}", reply.text);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
    chat_path: String,
}

impl ChatClient {
    /// Creates a new client for the given backend origin.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn new(
        base_url: impl Into<String>,
        chat_path: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Transport)?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            chat_path: chat_path.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends one chat message and returns the parsed reply.
    ///
    /// # Errors
    ///
    /// - [`Error::Transport`] on connection or timeout failures
    /// - [`Error::Status`] on non-2xx responses
    /// - [`Error::MalformedBody`] when the body is not parseable JSON
    ///
    /// A parseable body missing both reply fields is *not* an error: the
    /// reply text falls back to [`REPLY_PLACEHOLDER`].
    #[instrument(skip(self, message))]
    pub async fn send_message(&self, message: &str) -> Result<ChatReply> {
        debug!(url = %self.url(&self.chat_path), "sending chat message");

        let response = self
            .http
            .post(self.url(&self.chat_path))
            .json(&ChatRequest { message })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "chat call failed");
            return Err(Error::Status {
                status: status.as_u16(),
            });
        }

        let body: ChatReplyBody = response.json().await.map_err(Error::MalformedBody)?;
        Ok(ChatReply::from_body(body))
    }

    /// Asks the backend to clear its conversation history.
    ///
    /// Any 2xx response counts as success; the body is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx status.
    #[instrument(skip(self))]
    pub async fn clear_history(&self) -> Result<()> {
        let response = self.http.post(self.url("/clear-history")).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
            });
        }

        debug!("backend history cleared");
        Ok(())
    }

    /// Fetches the current credit balance.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx status, or a body
    /// without a `credits` field. Callers display a placeholder value in
    /// that case.
    #[instrument(skip(self))]
    pub async fn billing_status(&self) -> Result<u64> {
        let response = self.http.get(self.url("/billing/status")).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
            });
        }

        let body: BillingStatusBody = response.json().await.map_err(Error::MalformedBody)?;
        Ok(body.credits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ChatClient {
        ChatClient::new("http://localhost:8000/", "/chat", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn url_strips_trailing_slash_from_base() {
        let client = client();
        assert_eq!(client.url("/chat"), "http://localhost:8000/chat");
        assert_eq!(
            client.url("/clear-history"),
            "http://localhost:8000/clear-history"
        );
    }

    #[test]
    fn alternate_chat_path_is_respected() {
        let client =
            ChatClient::new("http://localhost:3000", "/api/chat", Duration::from_secs(5)).unwrap();
        assert_eq!(client.url(&client.chat_path), "http://localhost:3000/api/chat");
    }

    #[test]
    fn reply_field_wins_over_response() {
        let body: ChatReplyBody =
            serde_json::from_str(r#"{"reply": "from reply", "response": "from response"}"#)
                .unwrap();
        let reply = ChatReply::from_body(body);
        assert_eq!(reply.text, "from reply");
    }

    #[test]
    fn response_field_used_when_reply_absent() {
        let body: ChatReplyBody =
            serde_json::from_str(r#"{"response": "from response"}"#).unwrap();
        let reply = ChatReply::from_body(body);
        assert_eq!(reply.text, "from response");
    }

    #[test]
    fn missing_reply_fields_use_placeholder() {
        let body: ChatReplyBody = serde_json::from_str(r#"{"credits_remaining": 95}"#).unwrap();
        let reply = ChatReply::from_body(body);
        assert_eq!(reply.text, REPLY_PLACEHOLDER);
        assert_eq!(reply.credits_remaining, Some(95));
    }

    #[tokio::test]
    async fn unreachable_backend_is_transport_error() {
        // Port 1 is never listening; the call must fail as a transport
        // error rather than panicking.
        let client =
            ChatClient::new("http://127.0.0.1:1", "/chat", Duration::from_millis(200)).unwrap();
        let err = client.send_message("hello").await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }
}
