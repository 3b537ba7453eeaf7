use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{GenerateOptions, GenerateRequest, GenerateResponse};

/// Longest accepted user text, in characters after trimming.
pub const MAX_TEXT_CHARS: usize = 500;

/// Total budget for one inference call, connect and body read included.
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(60);

/// Terminal classification of a single completion attempt.
///
/// Every outcome of the external call maps to exactly one variant;
/// nothing propagates unclassified. No variant is retried.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("text must be 1 to {MAX_TEXT_CHARS} characters and not only whitespace")]
    InvalidInput,

    #[error("inference backend unreachable: {0}")]
    Unreachable(String),

    #[error("inference backend returned status {0}")]
    Upstream(StatusCode),

    #[error("inference backend returned an empty or malformed completion")]
    EmptyOrMalformed,

    #[error("internal failure: {0}")]
    Internal(String),
}

/// Client for the Ollama generate endpoint.
///
/// Holds the backend URL and generation parameters, all read-only after
/// construction. Each `complete` call issues exactly one non-streaming
/// request and classifies the outcome as a [`CompletionError`] variant
/// or the trimmed completion text.
pub struct CompletionGateway {
    client: Client,
    generate_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

impl CompletionGateway {
    pub fn new(
        ollama_host: &str,
        model: impl Into<String>,
        max_tokens: u32,
        temperature: f32,
        top_p: f32,
    ) -> Result<Self, reqwest::Error> {
        Self::with_timeout(
            ollama_host,
            model,
            max_tokens,
            temperature,
            top_p,
            COMPLETION_TIMEOUT,
        )
    }

    /// Like [`new`](Self::new) with an explicit call budget.
    pub fn with_timeout(
        ollama_host: &str,
        model: impl Into<String>,
        max_tokens: u32,
        temperature: f32,
        top_p: f32,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            generate_url: format!("{}/api/generate", ollama_host.trim_end_matches('/')),
            model: model.into(),
            max_tokens,
            temperature,
            top_p,
        })
    }

    /// Complete `text` with the configured model.
    ///
    /// Validates the input before anything touches the network, then
    /// issues a single bounded request. Callers may drop the future,
    /// but the underlying request is not guaranteed to stop.
    pub async fn complete(&self, text: &str) -> Result<String, CompletionError> {
        let text = valid_text(text).ok_or(CompletionError::InvalidInput)?;

        let payload = GenerateRequest {
            model: self.model.clone(),
            prompt: build_prompt(text),
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
                top_p: self.top_p,
                num_predict: self.max_tokens,
            },
        };

        info!(model = %self.model, "sending completion request");
        let response = self
            .client
            .post(&self.generate_url)
            .json(&payload)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "inference backend returned an error status");
            return Err(CompletionError::Upstream(status));
        }

        // the total timeout also covers the body read, so a stalled
        // body is a connectivity failure, not a malformed payload
        let body: GenerateResponse = response.json().await.map_err(classify_body)?;

        let completion = body.response.trim();
        if completion.is_empty() {
            warn!("inference backend returned an empty completion");
            return Err(CompletionError::EmptyOrMalformed);
        }

        debug!(chars = completion.chars().count(), "completion received");
        Ok(completion.to_string())
    }
}

/// Validity predicate for user text: trimmed length in 1..=500 chars.
///
/// Returns the trimmed text so callers and the gateway agree on what
/// gets completed.
pub fn valid_text(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    let chars = trimmed.chars().count();
    if (1..=MAX_TEXT_CHARS).contains(&chars) {
        Some(trimmed)
    } else {
        None
    }
}

// Deterministic instruction template; the user text appears verbatim once.
fn build_prompt(text: &str) -> String {
    format!(
        "You are a helpful assistant. \
         Continue the following sentence with just a few words, in the same language. \
         Do not add comments, explanations or translations. \
         Sentence: {text}"
    )
}

fn classify_transport(err: reqwest::Error) -> CompletionError {
    if err.is_connect() || err.is_timeout() {
        CompletionError::Unreachable(err.to_string())
    } else {
        // anything unexpected still terminates classified
        CompletionError::Internal(err.to_string())
    }
}

fn classify_body(err: reqwest::Error) -> CompletionError {
    if err.is_connect() || err.is_timeout() {
        classify_transport(err)
    } else {
        CompletionError::EmptyOrMalformed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_text_trims_and_bounds() {
        assert_eq!(valid_text("  hello  "), Some("hello"));
        assert_eq!(valid_text("a"), Some("a"));
        assert_eq!(valid_text(""), None);
        assert_eq!(valid_text("   "), None);
        assert_eq!(valid_text("\n\t"), None);

        let exact = "x".repeat(MAX_TEXT_CHARS);
        assert_eq!(valid_text(&exact), Some(exact.as_str()));
        assert_eq!(valid_text(&"x".repeat(MAX_TEXT_CHARS + 1)), None);
    }

    #[test]
    fn valid_text_counts_chars_not_bytes() {
        // 500 multibyte characters are still within bounds
        let cyrillic = "ё".repeat(MAX_TEXT_CHARS);
        assert!(valid_text(&cyrillic).is_some());
    }

    #[test]
    fn prompt_is_deterministic_and_embeds_text_once() {
        let a = build_prompt("the quick brown fox");
        let b = build_prompt("the quick brown fox");
        assert_eq!(a, b);
        assert_eq!(a.matches("the quick brown fox").count(), 1);
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_network() {
        // host is unroutable, so any attempt to call out would not
        // produce InvalidInput
        let gateway =
            CompletionGateway::new("http://192.0.2.1:1", "test-model", 100, 0.7, 0.9).unwrap();

        assert!(matches!(
            gateway.complete("").await,
            Err(CompletionError::InvalidInput)
        ));
        assert!(matches!(
            gateway.complete("   ").await,
            Err(CompletionError::InvalidInput)
        ));
    }
}
