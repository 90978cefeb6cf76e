//! Services module
//!
//! - `openai`: upstream completion transport
//! - `relay`: the analysis relay built on top of it

pub mod openai;
pub mod relay;

#[cfg(test)]
pub(crate) mod mock;

pub use openai::{CompletionTransport, OpenAiService, TransportError};
pub use relay::{AnalysisRelay, AnalysisRequest, AnalysisResult, ImageMime, RelayConfig};
