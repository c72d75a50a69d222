//! Test prompt — answers threshold requests from a script.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use nutshell_core::prompt::{ThresholdPrompt, ThresholdRequest};

/// A prompt that replays scripted answers (`None` = cancel) and records
/// every request it was shown. Cancels once the script runs out.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<Option<i32>>>,
    requests: Mutex<Vec<ThresholdRequest>>,
}

impl ScriptedPrompt {
    /// Create a prompt that gives `answers` in order.
    #[must_use]
    pub fn new(answers: Vec<Option<i32>>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A prompt that always cancels.
    #[must_use]
    pub fn cancelling() -> Self {
        Self::default()
    }

    /// Returns every request shown so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn requests(&self) -> Vec<ThresholdRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ThresholdPrompt for ScriptedPrompt {
    async fn request_threshold(&self, request: &ThresholdRequest) -> Option<i32> {
        self.requests.lock().unwrap().push(request.clone());
        self.answers.lock().unwrap().pop_front().flatten()
    }
}
