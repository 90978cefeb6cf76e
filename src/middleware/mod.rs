//! HTTP middleware
//!
//! - `auth`: session token verification
//! - `logging`: request logging with trace ids

pub mod auth;
pub mod logging;

pub use auth::{require_session, AuthState, CallerIdentity};
pub use logging::log_request;
