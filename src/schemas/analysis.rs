//! Inbound analysis API schema
//!
//! The browser client posts a base64 image and receives either
//! `{ diagnosis, confidence }` or `{ error }`.

use serde::{Deserialize, Serialize};

use crate::services::relay::AnalysisResult;

/// POST /analyze-xray request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Base64 image bytes, without a `data:` prefix
    #[serde(default)]
    pub image_base64: Option<String>,

    /// `image/jpeg` or `image/png`; JPEG is assumed when absent
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// Successful analysis response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub diagnosis: String,
    pub confidence: f64,
}

impl From<AnalysisResult> for AnalyzeResponse {
    fn from(result: AnalysisResult) -> Self {
        Self {
            diagnosis: result.diagnosis_text,
            confidence: result.confidence_score,
        }
    }
}

/// Error body shared by every failure on this surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
