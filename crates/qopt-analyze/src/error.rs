//! Failure taxonomy for statistics resolution.

use thiserror::Error;

/// Terminal failure of a single resolution attempt.
///
/// There is no internal retry: `Unavailable` is the retryable class (the
/// directory is eventually consistent and the caller may try again later),
/// while `ProtocolViolation` indicates a logic or versioning defect and is
/// logged at error severity before being surfaced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A directory lookup failed or the resolved domain has no statistics
    /// aggregator configured.
    #[error("temporarily unavailable: {message}")]
    Unavailable { message: String },

    /// A message arrived outside the expected state or round.
    #[error("protocol violation: {message}")]
    ProtocolViolation { message: String },
}

impl ResolveError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn protocol_violation(message: impl Into<String>) -> Self {
        Self::ProtocolViolation {
            message: message.into(),
        }
    }

    /// Whether the caller may reasonably retry the resolution.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}
