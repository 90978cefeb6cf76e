//! Chest X-ray analysis relay library

// Public modules
pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod schemas;
pub mod server;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use error::{AnalysisError, ApiError};
pub use server::App;
pub use services::{AnalysisRelay, AnalysisRequest, AnalysisResult};
