//! Reply generation.
//!
//! With `GEMINI_API_KEY` set, chat messages are forwarded to the Google
//! generative language API. Without a key the server falls back to a
//! local, deterministic scenario generator so the rest of the stack stays
//! usable (and free of charge) in development.

use nebula_protocol::truncate_title;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Environment variable holding the upstream API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Upstream model used for reply generation.
const MODEL: &str = "gemini-1.5-flash";

/// Base URL of the generative language API.
const UPSTREAM_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Errors that can occur while generating a reply.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The upstream request could not be sent.
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream API answered with a non-success status.
    #[error("upstream returned HTTP {status}: {body}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The response body, for the error reply shown to the user.
        body: String,
    },

    /// The upstream response carried no candidate text.
    #[error("upstream response contained no reply text")]
    EmptyReply,
}

mod wire {
    //! Request/response shapes of the `generateContent` endpoint.

    use serde::{Deserialize, Serialize};

    #[derive(Serialize)]
    pub struct GenerateRequest<'a> {
        pub contents: Vec<Content<'a>>,
    }

    #[derive(Serialize)]
    pub struct Content<'a> {
        pub parts: Vec<Part<'a>>,
    }

    #[derive(Serialize)]
    pub struct Part<'a> {
        pub text: &'a str,
    }

    #[derive(Deserialize)]
    pub struct GenerateResponse {
        #[serde(default)]
        pub candidates: Vec<Candidate>,
    }

    #[derive(Deserialize)]
    pub struct Candidate {
        pub content: CandidateContent,
    }

    #[derive(Deserialize)]
    pub struct CandidateContent {
        #[serde(default)]
        pub parts: Vec<CandidatePart>,
    }

    #[derive(Deserialize)]
    pub struct CandidatePart {
        #[serde(default)]
        pub text: String,
    }
}

/// Client for the Google generative language API.
#[derive(Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: SecretString,
}

impl GeminiClient {
    fn new(api_key: SecretString) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
        }
    }

    /// Generates a reply for one prompt.
    async fn generate(&self, prompt: &str) -> Result<String, EngineError> {
        let url = format!("{UPSTREAM_BASE}/models/{MODEL}:generateContent");
        let request = wire::GenerateRequest {
            contents: vec![wire::Content {
                parts: vec![wire::Part { text: prompt }],
            }],
        };

        debug!(model = MODEL, "forwarding message upstream");
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "upstream call failed");
            return Err(EngineError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: wire::GenerateResponse = response.json().await?;
        body.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|t| !t.is_empty())
            .ok_or(EngineError::EmptyReply)
    }
}

/// The reply engine: live upstream proxy or local fallback.
#[derive(Debug)]
pub enum ReplyEngine {
    /// Forward messages to the generative language API.
    Gemini(GeminiClient),
    /// Synthesize scenario replies locally, free of charge.
    Offline,
}

impl ReplyEngine {
    /// Builds the engine from the process environment.
    ///
    /// A missing or empty `GEMINI_API_KEY` selects the offline fallback.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()) {
            Some(key) => {
                info!("reply engine: gemini ({MODEL})");
                Self::Gemini(GeminiClient::new(SecretString::from(key)))
            }
            None => {
                warn!("{API_KEY_ENV} not set, using the offline scenario engine");
                Self::Offline
            }
        }
    }

    /// Returns `true` when replies come from the live upstream API.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Gemini(_))
    }

    /// Produces a reply for one chat message.
    ///
    /// # Errors
    ///
    /// Returns an error only for the live engine; the offline fallback is
    /// infallible.
    pub async fn reply(&self, message: &str) -> Result<String, EngineError> {
        match self {
            Self::Gemini(client) => client.generate(message).await,
            Self::Offline => Ok(offline_reply(message)),
        }
    }
}

/// Deterministic offline reply: a Gherkin scenario skeleton built from
/// the message.
fn offline_reply(message: &str) -> String {
    let title = truncate_title(message.trim());
    let action = message.trim().to_lowercase();

    format!(
        "**Scenario generated offline** (no API key configured)\n\n\
         ```\n\
         Feature: {title}\n\n\
         \u{20}\u{20}Scenario: {title}\n\
         \u{20}\u{20}\u{20}\u{20}Given the application is open\n\
         \u{20}\u{20}\u{20}\u{20}When the user asks to {action}\n\
         \u{20}\u{20}\u{20}\u{20}Then the expected outcome is visible\n\
         ```\n\n\
         Set `{API_KEY_ENV}` to enable full model replies."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_engine_is_not_live() {
        assert!(!ReplyEngine::Offline.is_live());
    }

    #[tokio::test]
    async fn offline_reply_is_deterministic_and_scenario_shaped() {
        let engine = ReplyEngine::Offline;
        let first = engine.reply("Generate a login scenario").await.unwrap();
        let second = engine.reply("Generate a login scenario").await.unwrap();

        assert_eq!(first, second);
        assert!(first.contains("Scenario: Generate a login scenario"));
        assert!(first.contains("Given the application is open"));
    }

    #[tokio::test]
    async fn offline_reply_truncates_long_titles() {
        let engine = ReplyEngine::Offline;
        let long = "x".repeat(80);
        let reply = engine.reply(&long).await.unwrap();

        assert!(reply.contains(&format!("Feature: {}...", "x".repeat(50))));
    }

    #[test]
    fn upstream_response_parsing() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Scenario: ..."}]}}
            ]
        }"#;
        let parsed: wire::GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.candidates[0].content.parts[0].text, "Scenario: ...");
    }

    #[test]
    fn upstream_response_tolerates_missing_candidates() {
        let parsed: wire::GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());
    }
}
