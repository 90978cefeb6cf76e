//! Application state container
//!
//! This module defines the shared application state that is passed
//! to all request handlers via Axum's state extraction.

use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::services::{AnalysisRelay, CompletionTransport, OpenAiService};
use crate::utils::mask_secret;

/// Shared application state
///
/// Cheaply cloneable; nothing in here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    /// Application settings
    pub settings: Arc<Settings>,

    /// The analysis relay
    pub relay: AnalysisRelay,

    /// Application start time (for uptime calculation)
    pub start_time: Instant,
}

impl AppState {
    /// Create a new application state backed by the real upstream client
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let service = OpenAiService::new(&settings.upstream)?;
        Ok(Self::with_transport(settings, Arc::new(service)))
    }

    /// Create state around an arbitrary transport
    pub fn with_transport(settings: Settings, transport: Arc<dyn CompletionTransport>) -> Self {
        match settings.upstream.api_key.as_deref() {
            Some(key) => tracing::info!(api_key = %mask_secret(key), "Upstream credential configured"),
            None => tracing::warn!("Upstream credential missing"),
        }

        let relay = AnalysisRelay::new(settings.relay_config(), transport);

        tracing::info!("Application state initialized successfully");

        Self {
            settings: Arc::new(settings),
            relay,
            start_time: Instant::now(),
        }
    }

    /// Get the application uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
