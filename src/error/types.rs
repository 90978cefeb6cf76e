//! API error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::schemas::analysis::ErrorBody;

/// Which flavour of upstream failure occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorKind {
    /// Any non-success status that is not a usage limit
    Status,
    /// HTTP 429 or a provider quota error
    RateLimited,
}

/// Relay boundary error
///
/// `Display` yields the user-safe message. Raw upstream detail never lives
/// in these variants; it is logged where the failure is classified.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Imagem é obrigatória")]
    MissingInput,

    #[error("Configuração do servidor incorreta")]
    ConfigurationError,

    #[error("{}", upstream_message(.0))]
    UpstreamError(UpstreamErrorKind),

    #[error("Não foi possível gerar o diagnóstico")]
    EmptyResponse,

    #[error("Erro interno do servidor. Tente novamente.")]
    InternalError,
}

fn upstream_message(kind: &UpstreamErrorKind) -> &'static str {
    match kind {
        UpstreamErrorKind::Status => "Erro no serviço de análise de imagem",
        UpstreamErrorKind::RateLimited => {
            "Limite de uso do serviço de análise excedido. Tente novamente mais tarde."
        }
    }
}

impl AnalysisError {
    /// Stable category label for logs
    pub fn category(&self) -> &'static str {
        match self {
            AnalysisError::MissingInput => "missing_input",
            AnalysisError::ConfigurationError => "configuration_error",
            AnalysisError::UpstreamError(UpstreamErrorKind::Status) => "upstream_error",
            AnalysisError::UpstreamError(UpstreamErrorKind::RateLimited) => "upstream_rate_limited",
            AnalysisError::EmptyResponse => "empty_response",
            AnalysisError::InternalError => "internal_error",
        }
    }

    /// HTTP status reported to the caller
    pub fn status_code(&self) -> StatusCode {
        match self {
            AnalysisError::MissingInput => StatusCode::BAD_REQUEST,
            AnalysisError::UpstreamError(UpstreamErrorKind::Status) => StatusCode::BAD_GATEWAY,
            AnalysisError::UpstreamError(UpstreamErrorKind::RateLimited) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AnalysisError::ConfigurationError
            | AnalysisError::EmptyResponse
            | AnalysisError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

/// HTTP-layer errors outside the relay itself
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::PayloadTooLarge { .. } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(ErrorBody::new("Imagem excede o tamanho máximo permitido")),
            )
                .into_response(),
            ApiError::Analysis(err) => err.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AnalysisError::MissingInput.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AnalysisError::ConfigurationError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AnalysisError::UpstreamError(UpstreamErrorKind::Status).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AnalysisError::UpstreamError(UpstreamErrorKind::RateLimited).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(AnalysisError::EmptyResponse.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AnalysisError::InternalError.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_rate_limit_message_is_distinct() {
        let generic = AnalysisError::UpstreamError(UpstreamErrorKind::Status).to_string();
        let limited = AnalysisError::UpstreamError(UpstreamErrorKind::RateLimited).to_string();

        assert_ne!(generic, limited);
        assert!(limited.contains("Tente novamente mais tarde"));
    }

    #[test]
    fn test_every_failure_is_client_or_server_error() {
        let all = [
            AnalysisError::MissingInput,
            AnalysisError::ConfigurationError,
            AnalysisError::UpstreamError(UpstreamErrorKind::Status),
            AnalysisError::UpstreamError(UpstreamErrorKind::RateLimited),
            AnalysisError::EmptyResponse,
            AnalysisError::InternalError,
        ];
        for err in all {
            let status = err.status_code();
            if err == AnalysisError::MissingInput {
                assert!(status.is_client_error());
            } else {
                assert!(status.is_server_error(), "{} should be a server error", err.category());
            }
            assert!(!err.to_string().is_empty());
        }
    }

    #[test]
    fn test_api_error_wraps_analysis_status() {
        let err = ApiError::from(AnalysisError::MissingInput);
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let err = ApiError::PayloadTooLarge { limit: 10 };
        assert_eq!(err.into_response().status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
