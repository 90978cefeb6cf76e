//! OpenAI Chat Completions schema definitions
//!
//! Only the subset the relay sends and reads: a system + multimodal user
//! turn going out, the first choice's text coming back, and the error
//! envelope for non-success responses.

use serde::{Deserialize, Serialize};

// ============================================================================
// Request Types
// ============================================================================

/// Chat completion request sent upstream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Model ID (e.g., "gpt-4.1-2025-04-14")
    pub model: String,

    /// System and user turns
    pub messages: Vec<ChatMessage>,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Sampling temperature (0.0 to 2.0)
    pub temperature: f32,
}

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: ChatRole::User,
            content: MessageContent::Parts(parts),
        }
    }
}

/// Message content - can be string or array of content parts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// Content part for multimodal messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Text content
    Text { text: String },

    /// Image URL content
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

/// Image URL specification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUrl {
    /// URL of the image (a `data:` URL carrying base64 bytes)
    pub url: String,

    /// Detail level for image processing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

// ============================================================================
// Response Types
// ============================================================================

/// Chat completion response (non-streaming)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub choices: Vec<Choice>,

    #[serde(default)]
    pub usage: Option<CompletionUsage>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if any was generated
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.as_deref())
    }
}

/// A single completion choice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,

    #[serde(default)]
    pub message: Option<AssistantMessage>,

    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Assistant message in a response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub role: Option<ChatRole>,

    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage reported upstream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

// ============================================================================
// Error Types
// ============================================================================

/// OpenAI error response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIErrorResponse {
    pub error: OpenAIError,
}

/// OpenAI error details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIError {
    /// Error message
    #[serde(default)]
    pub message: String,

    /// Error type
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,

    /// Error code (e.g. "insufficient_quota")
    #[serde(default)]
    pub code: Option<String>,
}

impl OpenAIError {
    /// Whether the provider is reporting an exhausted quota or rate limit
    pub fn is_quota(&self) -> bool {
        let mentions_quota = |s: &str| s.to_lowercase().contains("quota");
        mentions_quota(&self.message)
            || self.code.as_deref().is_some_and(mentions_quota)
            || self.error_type.as_deref().is_some_and(mentions_quota)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_image_part_serialization() {
        let part = ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: "data:image/png;base64,AAAA".to_string(),
                detail: Some("high".to_string()),
            },
        };

        let value = serde_json::to_value(&part).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "image_url",
                "image_url": { "url": "data:image/png;base64,AAAA", "detail": "high" }
            })
        );
    }

    #[test]
    fn test_system_message_is_plain_string() {
        let value = serde_json::to_value(ChatMessage::system("hello")).unwrap();
        assert_eq!(value, json!({ "role": "system", "content": "hello" }));
    }

    #[test]
    fn test_first_content() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "laudo" }, "finish_reason": "stop" }
            ]
        }))
        .unwrap();
        assert_eq!(response.first_content(), Some("laudo"));

        let empty: ChatCompletionResponse = serde_json::from_value(json!({ "choices": [] })).unwrap();
        assert_eq!(empty.first_content(), None);

        let null_content: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [ { "message": { "role": "assistant", "content": null } } ]
        }))
        .unwrap();
        assert_eq!(null_content.first_content(), None);
    }

    #[test]
    fn test_quota_detection() {
        let err: OpenAIErrorResponse = serde_json::from_value(json!({
            "error": {
                "message": "You exceeded your current quota, please check your plan.",
                "type": "insufficient_quota",
                "code": "insufficient_quota"
            }
        }))
        .unwrap();
        assert!(err.error.is_quota());

        let other: OpenAIErrorResponse = serde_json::from_value(json!({
            "error": { "message": "Invalid image", "type": "invalid_request_error" }
        }))
        .unwrap();
        assert!(!other.error.is_quota());
    }
}
