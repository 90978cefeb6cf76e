//! X-ray analysis endpoint
//!
//! POST /analyze-xray: decode the JSON body, hand it to the relay, and
//! render `{ diagnosis, confidence }` or `{ error }`.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    Extension, Json,
};

use crate::error::{AnalysisError, ApiError};
use crate::middleware::CallerIdentity;
use crate::schemas::analysis::{AnalyzeRequest, AnalyzeResponse};
use crate::server::state::AppState;
use crate::services::relay::{AnalysisRequest, ImageMime};

/// Analyze one uploaded X-ray
///
/// The body is parsed as JSON whatever `Content-Type` says. Unparseable
/// JSON is an internal error; an oversized body gets 413.
pub async fn analyze_xray(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    payload: Result<Bytes, BytesRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let bytes = match payload {
        Ok(bytes) => bytes,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::warn!(error = %rejection, "Analysis request body too large");
            return Err(ApiError::PayloadTooLarge {
                limit: state.settings.max_body_bytes(),
            });
        }
        Err(rejection) => {
            tracing::error!(error = %rejection, "Failed to read analysis request body");
            return Err(AnalysisError::InternalError.into());
        }
    };

    let body = parse_body(&bytes)?;

    let mime_type = resolve_mime(body.mime_type.as_deref());

    tracing::info!(
        user_id = %caller.user_id,
        mime_type = %mime_type,
        "Analysis requested"
    );

    let request = AnalysisRequest {
        image_base64: body.image_base64,
        mime_type,
    };

    let result = state.relay.analyze(request).await.inspect_err(|e| {
        tracing::warn!(
            user_id = %caller.user_id,
            category = e.category(),
            "Analysis failed"
        );
    })?;

    Ok(Json(result.into()))
}

/// Decode the request body; an absent image is left for the relay to report
fn parse_body(bytes: &[u8]) -> Result<AnalyzeRequest, AnalysisError> {
    serde_json::from_slice(bytes).map_err(|e| {
        tracing::error!(error = %e, "Unparseable analysis request body");
        AnalysisError::InternalError
    })
}

/// Unknown or absent types fall back to JPEG
fn resolve_mime(declared: Option<&str>) -> ImageMime {
    match declared {
        None => ImageMime::default(),
        Some(value) => value.parse().unwrap_or_else(|e: String| {
            tracing::warn!(declared = %value, error = %e, "Falling back to image/jpeg");
            ImageMime::default()
        }),
    }
}
