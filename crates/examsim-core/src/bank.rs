//! Question bank parsing and validation.
//!
//! The bank is a JSON array of [`QuestionRecord`]s. Records that cannot be
//! presented at all (no options, correct index outside the options) make the
//! whole bank unavailable; softer problems are reported as warnings.

use std::collections::HashSet;
use std::path::Path;

use crate::error::ExamError;
use crate::model::QuestionRecord;

/// Parse a JSON bank.
pub fn parse_bank_str(content: &str) -> Result<Vec<QuestionRecord>, ExamError> {
    let records: Vec<QuestionRecord> = serde_json::from_str(content)
        .map_err(|e| ExamError::BankUnavailable(format!("malformed question bank: {e}")))?;
    check_records(&records)?;
    Ok(records)
}

/// Read and parse a JSON bank file.
pub fn load_bank(path: &Path) -> Result<Vec<QuestionRecord>, ExamError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ExamError::BankUnavailable(format!("failed to read {}: {e}", path.display()))
    })?;
    let records = parse_bank_str(&content)?;
    tracing::info!("loaded {} questions from {}", records.len(), path.display());
    Ok(records)
}

/// Reject records that cannot be turned into a working question.
pub fn check_records(records: &[QuestionRecord]) -> Result<(), ExamError> {
    for (i, record) in records.iter().enumerate() {
        if record.options.is_empty() {
            return Err(ExamError::BankUnavailable(format!(
                "question {} has no options",
                i + 1
            )));
        }
        if let Some(&bad) = record
            .correct_answer
            .iter()
            .find(|&&c| c >= record.options.len())
        {
            return Err(ExamError::BankUnavailable(format!(
                "question {} marks option index {bad} as correct but has only {} options",
                i + 1,
                record.options.len()
            )));
        }
    }
    Ok(())
}

/// A warning from bank validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// One-based question number (if applicable).
    pub question: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Validate a bank for issues that do not prevent an exam from running.
pub fn validate_bank(records: &[QuestionRecord]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut warn = |i: usize, message: String| {
        warnings.push(ValidationWarning {
            question: Some(i + 1),
            message,
        })
    };

    for (i, record) in records.iter().enumerate() {
        if record.question.trim().is_empty() {
            warn(i, "question text is empty".into());
        }

        let mut seen_texts = HashSet::new();
        for text in &record.options {
            if !seen_texts.insert(text.as_str()) {
                warn(i, format!("duplicate option text: {text}"));
            }
        }

        let distinct: HashSet<usize> = record.correct_answer.iter().copied().collect();
        if distinct.len() != record.correct_answer.len() {
            warn(i, "correctAnswer lists the same index more than once".into());
        }
        if distinct.is_empty() {
            warn(i, "no correct answer; only an empty selection will score".into());
        }
        if !record.multiple && distinct.len() > 1 {
            warn(
                i,
                format!(
                    "single-answer question has {} correct options and can never be answered correctly",
                    distinct.len()
                ),
            );
        }
    }

    if records.is_empty() {
        warnings.push(ValidationWarning {
            question: None,
            message: "bank contains no questions".into(),
        });
    }

    warnings
}
