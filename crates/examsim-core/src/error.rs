//! Exam error types.
//!
//! Only two things can go wrong in an exam session: the question bank cannot
//! be obtained, or a recorded selection is not acceptable for its question.
//! Navigation at the boundaries, timer expiry and repeated finishes are
//! defined as no-ops and never surface here.

use thiserror::Error;

/// Errors surfaced by the exam core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExamError {
    /// The question bank could not be retrieved or contained malformed data.
    /// Fatal to the session: no partial session is ever started.
    #[error("question bank unavailable: {0}")]
    BankUnavailable(String),

    /// A selection was rejected. The previously stored selection for the
    /// question is left unchanged.
    #[error("invalid selection for question {}: {reason}", .position + 1)]
    InvalidSelection {
        /// Zero-based question position the selection was recorded against.
        position: usize,
        /// Why the selection was rejected.
        reason: SelectionError,
    },
}

/// Why a selection was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("there is no question at this position (exam has {total} questions)")]
    NoSuchQuestion { total: usize },

    #[error("option {} does not exist (question has {option_count} options)", .index + 1)]
    OptionOutOfRange { index: usize, option_count: usize },

    #[error("option {} was selected more than once", .index + 1)]
    DuplicateOption { index: usize },

    #[error("only one option may be selected, got {selected}")]
    SingleAnswerOnly { selected: usize },

    #[error("the exam is already finished")]
    SessionFinished,
}

impl ExamError {
    /// Returns `true` if the caller can retry with corrected input.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ExamError::InvalidSelection { .. })
    }

    pub(crate) fn selection(position: usize, reason: SelectionError) -> Self {
        ExamError::InvalidSelection { position, reason }
    }
}
