//! Core LLM client trait definition

use async_trait::async_trait;

use crate::error::Result;
use crate::llm::types::{CompletionRequest, CompletionResponse};

/// Stateless LLM client - each call is independent (fresh context)
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Single completion request (blocking until complete)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Model identifier used for completions
    fn model(&self) -> &str;

    /// Whether the client is configured and ready to make calls
    fn is_ready(&self) -> bool;
}

/// Scripted client for testing - returns canned responses in order.
#[derive(Debug, Default)]
pub struct MockLlmClient {
    responses: std::sync::Mutex<std::collections::VecDeque<String>>,
    calls: std::sync::atomic::AtomicUsize,
}

impl MockLlmClient {
    /// Create a mock with no scripted responses (completes with empty text)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that replays the given responses in order,
    /// repeating the last one once the script is exhausted.
    pub fn with_responses(responses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses.into_iter().map(Into::into).collect()),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Number of completion calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        let mut responses = self.responses.lock().unwrap();
        let content = if responses.len() > 1 {
            responses.pop_front().unwrap_or_default()
        } else {
            responses.front().cloned().unwrap_or_default()
        };

        Ok(CompletionResponse {
            content,
            ..Default::default()
        })
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    fn is_ready(&self) -> bool {
        true
    }
}
