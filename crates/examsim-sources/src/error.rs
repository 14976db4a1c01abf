//! Bank source error types.

use std::time::Duration;

use examsim_core::ExamError;
use thiserror::Error;

/// Errors that can occur while retrieving a question bank.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The bank does not exist at the given location.
    #[error("question bank not found: {0}")]
    NotFound(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// A local file could not be read.
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The bank was retrieved but could not be parsed.
    #[error("bad question bank data: {0}")]
    Malformed(String),
}

impl SourceError {
    /// Classify a bank parse failure.
    pub fn from_parse(error: ExamError) -> Self {
        match error {
            ExamError::BankUnavailable(reason) => SourceError::Malformed(reason),
            other => SourceError::Malformed(other.to_string()),
        }
    }

    /// Returns `true` if retrying later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, SourceError::Timeout(_) | SourceError::Network(_))
            || matches!(self, SourceError::Http { status, .. } if *status >= 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(SourceError::Timeout(Duration::from_secs(30)).is_transient());
        assert!(SourceError::Http {
            status: 503,
            message: String::new()
        }
        .is_transient());
        assert!(!SourceError::Http {
            status: 403,
            message: String::new()
        }
        .is_transient());
        assert!(!SourceError::NotFound("bank.json".into()).is_transient());
    }
}
