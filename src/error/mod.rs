//! Error types
//!
//! `AnalysisError` is the relay's categorized failure; `ApiError` covers the
//! HTTP layer around it. Both render as `{ "error": message }`.

pub mod types;

pub use types::{AnalysisError, ApiError, UpstreamErrorKind};
