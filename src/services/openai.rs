//! OpenAI service for chat completions
//!
//! The relay talks to the provider through [`CompletionTransport`] so that
//! tests can swap in a recording mock. [`OpenAiService`] is the production
//! implementation over `reqwest`.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use crate::config::UpstreamConfig;
use crate::schemas::openai::{ChatCompletionRequest, ChatCompletionResponse};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur when calling the completion API
///
/// These carry raw upstream detail and must stay server-side; the relay
/// turns them into sanitized [`crate::error::AnalysisError`]s.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Upstream answered with a non-success status
    #[error("Upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Connection failure, timeout, or body read failure
    #[error("HTTP request failed: {0}")]
    Network(String),

    /// Success status but the body was not a completion response
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::Network(err.to_string())
    }
}

// ============================================================================
// Transport Trait
// ============================================================================

/// A single chat completion round trip
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn complete(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, TransportError>;
}

// ============================================================================
// OpenAI Service
// ============================================================================

/// reqwest-backed completion transport
#[derive(Clone)]
pub struct OpenAiService {
    client: Client,
    base_url: String,
}

impl OpenAiService {
    /// Create a new service; the client timeout bounds every call
    pub fn new(config: &UpstreamConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        tracing::info!(
            base_url = %config.base_url,
            model = %config.model,
            timeout_seconds = config.timeout_seconds,
            "Initialized OpenAI completion service"
        );

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL of the chat completions endpoint
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionTransport for OpenAiService {
    async fn complete(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, TransportError> {
        let url = self.completions_url();

        tracing::debug!(
            model = %request.model,
            url = %url,
            max_tokens = request.max_tokens,
            "Calling chat completions API"
        );

        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        tracing::debug!(status = status.as_u16(), "Chat completions API responded");

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response_text = resp.text().await?;

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(error = %e, body_len = response_text.len(), "Failed to parse completion response");
            TransportError::Decode(e.to_string())
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_url_trims_trailing_slash() {
        let config = UpstreamConfig {
            base_url: "https://proxy.internal/v1/".to_string(),
            ..UpstreamConfig::default()
        };

        let service = OpenAiService::new(&config).expect("Should create service");
        assert_eq!(service.completions_url(), "https://proxy.internal/v1/chat/completions");
    }

    #[test]
    fn test_default_url() {
        let service = OpenAiService::new(&UpstreamConfig::default()).expect("Should create service");
        assert_eq!(service.completions_url(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_status_error_display_keeps_detail_for_logs() {
        let err = TransportError::Status {
            status: 429,
            body: "quota".to_string(),
        };
        assert_eq!(err.to_string(), "Upstream returned HTTP 429: quota");
    }
}
