use std::io;
use thiserror::Error;

/// Transport failure kinds.
///
/// The dispatcher switches on the kind to decide retry vs give-up:
/// connection-class failures are retried with backoff, everything else is
/// surfaced to the caller immediately.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection refused: {0}")]
    Refused(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("connection closed: {0}")]
    Closed(String),

    #[error("socket error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to connect to Unreal Engine: {0}")]
    ConnectFailed(String),

    /// The receiver judged the message complete but it would not parse.
    /// Retrying would resend a command the engine already answered.
    #[error("invalid JSON response: {0}")]
    MalformedResponse(String),

    #[error("failed to encode command: {0}")]
    Encode(String),
}

impl TransportError {
    /// Connection-class errors are worth a fresh connect cycle.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransportError::Refused(_)
                | TransportError::Timeout(_)
                | TransportError::Closed(_)
                | TransportError::Io(_)
                | TransportError::ConnectFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_classification() {
        assert!(TransportError::Refused("x".into()).is_retryable());
        assert!(TransportError::Timeout("x".into()).is_retryable());
        assert!(TransportError::Closed("x".into()).is_retryable());
        assert!(TransportError::ConnectFailed("x".into()).is_retryable());
        assert!(TransportError::Io(io::Error::other("x")).is_retryable());
        assert!(!TransportError::MalformedResponse("x".into()).is_retryable());
        assert!(!TransportError::Encode("x".into()).is_retryable());
    }
}
