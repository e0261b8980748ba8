//! Error classification and reporting for pipeline stages.

use std::fmt;
use std::sync::{Arc, Mutex};

/// Errors that can occur while a stage is processing.
#[derive(Debug, Clone)]
pub enum StageError {
    /// Recoverable error: the stage skips the current frame and continues.
    Recoverable(String),
    /// Fatal error: the stage shuts down.
    Fatal(String),
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageError::Recoverable(msg) => write!(f, "Recoverable error: {}", msg),
            StageError::Fatal(msg) => write!(f, "Fatal error: {}", msg),
        }
    }
}

impl std::error::Error for StageError {}

/// Trait for reporting stage errors.
pub trait ErrorReporter: Send + Sync {
    /// Reports an error from a stage.
    fn report(&self, stage: &str, error: &StageError);
}

/// Default reporter: routes to the log facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, stage: &str, error: &StageError) {
        match error {
            StageError::Recoverable(_) => log::warn!("[{}] {}", stage, error),
            StageError::Fatal(_) => log::error!("[{}] {}", stage, error),
        }
    }
}

/// Reporter that collects errors for inspection; used by tests.
#[derive(Clone, Default)]
pub struct CollectingReporter {
    errors: Arc<Mutex<Vec<(String, String)>>>,
}

impl CollectingReporter {
    /// Creates an empty collecting reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the `(stage, message)` pairs reported so far.
    pub fn collected(&self) -> Vec<(String, String)> {
        match self.errors.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ErrorReporter for CollectingReporter {
    fn report(&self, stage: &str, error: &StageError) {
        let entry = (stage.to_string(), error.to_string());
        match self.errors.lock() {
            Ok(mut guard) => guard.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
    }
}
