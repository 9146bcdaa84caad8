//! Error types

use crate::fault::Fault;
use crate::format::format_fault;
use thiserror::Error;

/// Errors while building a test suite
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SuiteError {
    #[error("Test suite name must not be empty")]
    EmptyName,

    #[error("Duplicate test name in suite '{suite}': {test}")]
    DuplicateTest { suite: String, test: String },
}

/// Listener contract violations and listener I/O failures
#[derive(Error, Debug)]
pub enum ListenerError {
    #[error("Another test suite is already active: {0}")]
    SuiteAlreadyActive(String),

    #[error("No test suite is currently active")]
    NoActiveSuite,

    #[error("Another test case is already active: {0}")]
    CaseAlreadyActive(String),

    #[error("No test case is currently active")]
    NoActiveCase,

    #[error("Failed to write test report: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that end a run early.
///
/// `RunError` is `Send + Sync`, so it can cross into `Box<dyn Error + Send +
/// Sync>` or `anyhow::Error` at a binary's boundary.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Listener(#[from] ListenerError),

    /// An unexpected error in a test body, re-raised because the runner is
    /// configured to throw
    #[error("Exception while running test: {test}")]
    Unexpected { test: String, fault: FaultSummary },
}

impl RunError {
    /// The fault that aborted the run, for re-raised test errors
    pub fn fault(&self) -> Option<&FaultSummary> {
        match self {
            RunError::Unexpected { fault, .. } => Some(fault),
            RunError::Listener(_) => None,
        }
    }
}

/// Thread-safe snapshot of a [`Fault`].
///
/// Faults may hold shared values (`Rc`), so the error that leaves a run keeps
/// only their text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultSummary {
    kind: String,
    message: String,
    details: String,
}

impl FaultSummary {
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Detailed rendering: stack trace and causes
    pub fn details(&self) -> &str {
        &self.details
    }
}

impl From<&Fault> for FaultSummary {
    fn from(fault: &Fault) -> Self {
        FaultSummary {
            kind: fault.kind().to_string(),
            message: fault.message().to_string(),
            details: format_fault(fault, true),
        }
    }
}
