//! Wire schemas
//!
//! - `analysis`: the inbound analysis endpoint
//! - `openai`: the upstream chat completions API

pub mod analysis;
pub mod openai;

pub use analysis::{AnalyzeRequest, AnalyzeResponse, ErrorBody};
pub use openai::{ChatCompletionRequest, ChatCompletionResponse, OpenAIErrorResponse};
