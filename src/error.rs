//! Core error types.
//!
//! Every core operation either applies fully or fails with one of these and
//! leaves all structures untouched.

use thiserror::Error;

use crate::notification::{Category, NotificationId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorError {
    /// Malformed or missing submit fields
    #[error("Validation error: {0}")]
    Validation(String),

    /// Dismiss/summary target is not held by the queue or the buffer
    #[error("Notification {0} not found")]
    NotFound(NotificationId),

    /// Undo with nothing to restore
    #[error("Undo stack is empty")]
    EmptyStack,

    /// Edge insertion would close a cycle
    #[error("Dependency {parent} -> {child} would create a cycle")]
    CycleDetected { parent: Category, child: Category },
}

impl OrchestratorError {
    /// Stable machine-readable kind, used on the wire
    pub fn kind(&self) -> &'static str {
        match self {
            OrchestratorError::Validation(_) => "validation",
            OrchestratorError::NotFound(_) => "not_found",
            OrchestratorError::EmptyStack => "empty_stack",
            OrchestratorError::CycleDetected { .. } => "cycle_detected",
        }
    }
}

/// Result type alias for OrchestratorError
pub type Result<T, E = OrchestratorError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            OrchestratorError::NotFound(NotificationId::from_raw(7)).to_string(),
            "Notification 7 not found"
        );
        assert_eq!(
            OrchestratorError::CycleDetected {
                parent: Category::Social,
                child: Category::Work
            }
            .to_string(),
            "Dependency social -> work would create a cycle"
        );
    }

    #[test]
    fn test_kind() {
        assert_eq!(OrchestratorError::EmptyStack.kind(), "empty_stack");
        assert_eq!(OrchestratorError::Validation("x".into()).kind(), "validation");
    }
}
