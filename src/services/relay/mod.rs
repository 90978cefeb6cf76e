//! Analysis relay
//!
//! Forwards one X-ray image to the upstream vision model and normalizes the
//! outcome. Each call is independent: validate, check configuration, send
//! exactly one completion request, then either score the report or map the
//! failure onto an [`AnalysisError`] category.
//!
//! ```text
//! Idle -> InFlight -> Succeeded
//!                  -> Failed
//! ```
//!
//! There is no retry and no cancellation token; dropping the future is the
//! only way to abandon a call.

pub mod confidence;
pub mod progress;
pub mod prompt;

pub use confidence::{heuristic_confidence, CONFIDENCE_CEILING, CONFIDENCE_FLOOR};
pub use progress::{Milestone, NoProgress, ProgressObserver};

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::settings::DEFAULT_UPSTREAM_MODEL;
use crate::error::{AnalysisError, UpstreamErrorKind};
use crate::schemas::openai::OpenAIErrorResponse;
use crate::services::openai::{CompletionTransport, TransportError};
use crate::utils::{mask_secret, truncate_for_log};

/// Upstream bodies are logged at most this long
const LOGGED_BODY_CHARS: usize = 500;

// ============================================================================
// Types
// ============================================================================

/// MIME tag attached to the embedded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageMime {
    #[default]
    Jpeg,
    Png,
}

impl ImageMime {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Png => "image/png",
        }
    }
}

impl fmt::Display for ImageMime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageMime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Ok(ImageMime::Jpeg),
            "image/png" => Ok(ImageMime::Png),
            other => Err(format!("Unsupported image type: {}", other)),
        }
    }
}

/// One image to analyze
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    /// Base64 image bytes; `None` when the caller sent nothing
    pub image_base64: Option<String>,
    pub mime_type: ImageMime,
}

impl AnalysisRequest {
    pub fn new(image_base64: impl Into<String>, mime_type: ImageMime) -> Self {
        Self {
            image_base64: Some(image_base64.into()),
            mime_type,
        }
    }

    /// The payload, if present and not blank
    fn payload(&self) -> Option<&str> {
        self.image_base64
            .as_deref()
            .map(str::trim)
            .filter(|payload| !payload.is_empty())
    }
}

/// Normalized report. Both fields are always set together.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub diagnosis_text: String,
    /// Length heuristic, see [`confidence`]
    pub confidence_score: f64,
}

/// Everything the relay needs, injected at construction
#[derive(Clone)]
pub struct RelayConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("api_key", &self.api_key.as_deref().map(mask_secret))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_UPSTREAM_MODEL.to_string(),
            max_tokens: 1000,
            temperature: 0.2,
        }
    }
}

// ============================================================================
// Relay
// ============================================================================

/// Stateless analysis relay; cheap to clone and share across requests
#[derive(Clone)]
pub struct AnalysisRelay {
    config: Arc<RelayConfig>,
    transport: Arc<dyn CompletionTransport>,
}

impl AnalysisRelay {
    pub fn new(config: RelayConfig, transport: Arc<dyn CompletionTransport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    /// Whether the upstream credential is present
    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }

    /// Analyze one image
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        self.analyze_with_progress(request, &NoProgress).await
    }

    /// Analyze one image, reporting milestones to `observer`
    pub async fn analyze_with_progress(
        &self,
        request: AnalysisRequest,
        observer: &dyn ProgressObserver,
    ) -> Result<AnalysisResult, AnalysisError> {
        let Some(payload) = request.payload() else {
            tracing::warn!("Analysis requested without an image payload");
            return Err(AnalysisError::MissingInput);
        };

        let Some(api_key) = self.api_key() else {
            tracing::error!("Upstream credential is not configured");
            return Err(AnalysisError::ConfigurationError);
        };

        observer.on_progress(Milestone::Validated);

        let body = prompt::build_request(&self.config, payload, request.mime_type);

        tracing::info!(
            model = %self.config.model,
            mime_type = %request.mime_type,
            payload_len = payload.len(),
            "Sending image to upstream model"
        );
        observer.on_progress(Milestone::Sent);

        let response = self
            .transport
            .complete(api_key, &body)
            .await
            .map_err(classify_transport_error)?;

        observer.on_progress(Milestone::Received);

        let diagnosis = match response.first_content() {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => {
                tracing::error!(
                    choices = response.choices.len(),
                    "Upstream response carried no diagnosis text"
                );
                return Err(AnalysisError::EmptyResponse);
            }
        };

        let confidence_score = heuristic_confidence(&diagnosis);
        observer.on_progress(Milestone::Parsed);

        tracing::info!(
            diagnosis_chars = diagnosis.chars().count(),
            confidence = confidence_score,
            "Analysis completed"
        );

        Ok(AnalysisResult {
            diagnosis_text: diagnosis,
            confidence_score,
        })
    }
}

/// Map a transport failure onto a sanitized category, logging the detail
fn classify_transport_error(err: TransportError) -> AnalysisError {
    match err {
        TransportError::Status { status, body } => {
            let provider_error = serde_json::from_str::<OpenAIErrorResponse>(&body).ok();
            let quota = provider_error
                .as_ref()
                .is_some_and(|parsed| parsed.error.is_quota());

            tracing::error!(
                status,
                body = %truncate_for_log(&body, LOGGED_BODY_CHARS),
                "Upstream model returned an error"
            );

            if status == 429 || quota {
                AnalysisError::UpstreamError(UpstreamErrorKind::RateLimited)
            } else {
                AnalysisError::UpstreamError(UpstreamErrorKind::Status)
            }
        }
        TransportError::Network(msg) => {
            tracing::error!(error = %msg, "Upstream call failed");
            AnalysisError::InternalError
        }
        TransportError::Decode(msg) => {
            tracing::error!(error = %msg, "Upstream response could not be decoded");
            AnalysisError::InternalError
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
