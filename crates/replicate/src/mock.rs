//! Mock Image Service Implementation
//!
//! Programmable mock for testing storyboard workflows:
//! - `MockImageService`: configurable mock with request recording
//! - `MockImageBehavior`: controls outcome per request or globally
//! - `MockOutcome`: Complete or Fail

use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock};

use crate::{ImageError, ImageRequest, ImageService};

/// What outcome the mock should produce
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MockOutcome {
    /// Return one mock URL
    #[default]
    Complete,
    /// Return a generation failure
    Fail,
}

/// Programmable behavior for the mock image service
#[derive(Debug, Clone, Default)]
pub struct MockImageBehavior {
    outcome: Arc<RwLock<MockOutcome>>,
    /// Zero-based request indexes that fail regardless of `outcome`
    failing_requests: Arc<RwLock<HashSet<usize>>>,
}

impl MockImageBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock outcome
    pub fn set_outcome(&self, outcome: MockOutcome) {
        if let Ok(mut current) = self.outcome.write() {
            *current = outcome;
        }
    }

    /// Make the nth request (zero-based) fail
    pub fn fail_request(&self, index: usize) {
        if let Ok(mut failing) = self.failing_requests.write() {
            failing.insert(index);
        }
    }

    /// Reset to default behavior
    pub fn reset(&self) {
        self.set_outcome(MockOutcome::Complete);
        if let Ok(mut failing) = self.failing_requests.write() {
            failing.clear();
        }
    }

    /// Read current outcome
    pub fn get_outcome(&self) -> MockOutcome {
        self.outcome
            .read()
            .map(|outcome| outcome.clone())
            .unwrap_or_default()
    }

    fn fails(&self, index: usize) -> bool {
        self.get_outcome() == MockOutcome::Fail
            || self
                .failing_requests
                .read()
                .map(|failing| failing.contains(&index))
                .unwrap_or(false)
    }
}

/// Mock image service with programmable behavior
#[derive(Debug, Clone, Default)]
pub struct MockImageService {
    behavior: Arc<MockImageBehavior>,
    history: Arc<Mutex<Vec<ImageRequest>>>,
}

impl MockImageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behavior(behavior: Arc<MockImageBehavior>) -> Self {
        Self {
            behavior,
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get the shared behavior for external configuration
    pub fn behavior(&self) -> &Arc<MockImageBehavior> {
        &self.behavior
    }

    /// Get recorded image requests
    pub fn recorded_requests(&self) -> Vec<ImageRequest> {
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
impl ImageService for MockImageService {
    async fn generate_image(&self, request: ImageRequest) -> Result<Vec<String>, ImageError> {
        let index = match self.history.lock() {
            Ok(mut history) => {
                history.push(request);
                history.len() - 1
            }
            Err(_) => 0,
        };

        tracing::info!(request_index = index, "Mock image: received image request");

        if self.behavior.fails(index) {
            return Err(ImageError::Failed("Mock image failure".to_string()));
        }

        Ok(vec![format!(
            "https://mock-images.example.com/storyboard/{}.png",
            index + 1
        )])
    }
}
