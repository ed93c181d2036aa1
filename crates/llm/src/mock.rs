//! Mock LLM Service Implementation
//!
//! Programmable mock used by `LlmServiceFactory` when provider is `"mock"`:
//! - `MockLlmService`: deterministic replies with request recording
//! - `MockLlmBehavior`: controls outcome and canned reply
//! - `MockOutcome`: Complete or Fail

use std::sync::{Arc, Mutex, RwLock};

use crate::{CompletionRequest, CompletionResponse, LlmError, LlmService};

const MOCK_MODEL: &str = "mock-model";

/// What outcome the mock should produce
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MockOutcome {
    /// Return generated text
    #[default]
    Complete,
    /// Return the given error
    Fail(LlmError),
}

/// Programmable behavior for the mock LLM service
#[derive(Debug, Clone, Default)]
pub struct MockLlmBehavior {
    outcome: Arc<RwLock<MockOutcome>>,
    reply: Arc<RwLock<Option<String>>>,
}

impl MockLlmBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock outcome
    pub fn set_outcome(&self, outcome: MockOutcome) {
        if let Ok(mut current) = self.outcome.write() {
            *current = outcome;
        }
    }

    /// Configure a fixed reply instead of the echo reply
    pub fn set_reply(&self, reply: impl Into<String>) {
        if let Ok(mut current) = self.reply.write() {
            *current = Some(reply.into());
        }
    }

    /// Reset to default behavior
    pub fn reset(&self) {
        self.set_outcome(MockOutcome::Complete);
        if let Ok(mut current) = self.reply.write() {
            *current = None;
        }
    }

    /// Read current outcome
    pub fn get_outcome(&self) -> MockOutcome {
        self.outcome
            .read()
            .map(|outcome| outcome.clone())
            .unwrap_or_default()
    }

    fn get_reply(&self) -> Option<String> {
        self.reply.read().ok().and_then(|reply| reply.clone())
    }
}

/// Mock LLM service for testing
#[derive(Debug, Clone, Default)]
pub struct MockLlmService {
    behavior: Arc<MockLlmBehavior>,
    history: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockLlmService {
    /// Create a new mock LLM service
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behavior(behavior: Arc<MockLlmBehavior>) -> Self {
        Self {
            behavior,
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Mock that always fails with the given error
    pub fn failing(error: LlmError) -> Self {
        let service = Self::new();
        service.behavior.set_outcome(MockOutcome::Fail(error));
        service
    }

    /// Get the shared behavior for external configuration
    pub fn behavior(&self) -> &Arc<MockLlmBehavior> {
        &self.behavior
    }

    /// Get recorded completion requests
    pub fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.history
            .lock()
            .map(|history| history.clone())
            .unwrap_or_default()
    }

    /// Clear history
    pub fn reset_history(&self) {
        if let Ok(mut history) = self.history.lock() {
            history.clear();
        }
    }
}

#[async_trait::async_trait]
impl LlmService for MockLlmService {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        tracing::info!("Mock LLM service processing completion request");

        if let Ok(mut history) = self.history.lock() {
            history.push(request.clone());
        }

        if let MockOutcome::Fail(error) = self.behavior.get_outcome() {
            return Err(error);
        }

        let model = request.model.unwrap_or_else(|| MOCK_MODEL.to_string());
        let content = self
            .behavior
            .get_reply()
            .unwrap_or_else(|| format!("Mock response to: {}", request.prompt));

        Ok(CompletionResponse { content, model })
    }

    fn default_model(&self) -> &str {
        MOCK_MODEL
    }
}
