//! Recording completion transport for tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::schemas::openai::{
    AssistantMessage, ChatCompletionRequest, ChatCompletionResponse, ChatRole, Choice,
};
use crate::services::openai::{CompletionTransport, TransportError};

/// What the mock answers with on every call
#[derive(Debug, Clone)]
pub enum MockReply {
    Response(ChatCompletionResponse),
    Status(u16, String),
    Network,
    Decode,
}

impl MockReply {
    pub fn text(content: &str) -> Self {
        Self::with_content(Some(content.to_string()))
    }

    pub fn null_content() -> Self {
        Self::with_content(None)
    }

    pub fn no_choices() -> Self {
        MockReply::Response(ChatCompletionResponse::default())
    }

    pub fn status(status: u16, body: &str) -> Self {
        MockReply::Status(status, body.to_string())
    }

    fn with_content(content: Option<String>) -> Self {
        MockReply::Response(ChatCompletionResponse {
            id: Some("chatcmpl-test".to_string()),
            model: Some("gpt-4.1-2025-04-14".to_string()),
            choices: vec![Choice {
                index: 0,
                message: Some(AssistantMessage {
                    role: Some(ChatRole::Assistant),
                    content,
                }),
                finish_reason: Some("stop".to_string()),
            }],
            usage: None,
        })
    }
}

pub struct MockTransport {
    reply: MockReply,
    calls: AtomicUsize,
    last: Mutex<Option<(String, ChatCompletionRequest)>>,
}

impl MockTransport {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_api_key(&self) -> Option<String> {
        self.last.lock().unwrap().as_ref().map(|(key, _)| key.clone())
    }

    pub fn last_request(&self) -> Option<ChatCompletionRequest> {
        self.last.lock().unwrap().as_ref().map(|(_, request)| request.clone())
    }
}

#[async_trait]
impl CompletionTransport for MockTransport {
    async fn complete(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some((api_key.to_string(), request.clone()));

        match &self.reply {
            MockReply::Response(response) => Ok(response.clone()),
            MockReply::Status(status, body) => Err(TransportError::Status {
                status: *status,
                body: body.clone(),
            }),
            MockReply::Network => Err(TransportError::Network("connection reset".to_string())),
            MockReply::Decode => Err(TransportError::Decode("expected value at line 1".to_string())),
        }
    }
}
