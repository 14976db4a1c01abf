//! Exam scoring.
//!
//! A question counts as correct when the selected option set equals the
//! correct option set; order never matters and there is no partial credit.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::session::ExamSession;

/// Default minimum percentage to pass.
pub const PASS_THRESHOLD: f64 = crate::config::DEFAULT_PASS_THRESHOLD;

/// Whether a selection answers a question correctly. A missing selection
/// is treated as an empty one.
pub fn is_correct(selected: Option<&BTreeSet<usize>>, correct: &BTreeSet<usize>) -> bool {
    match selected {
        Some(selected) => selected == correct,
        None => correct.is_empty(),
    }
}

/// Percentage (0 to 100) of correctly answered questions. An exam without
/// questions scores 0.
pub fn score(session: &ExamSession) -> f64 {
    ScoreCard::compute(session).percentage
}

/// Whether `percentage` meets `threshold`.
pub fn passes(percentage: f64, threshold: f64) -> bool {
    percentage >= threshold
}

/// Final tally of an exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    /// Questions answered correctly.
    pub correct: usize,
    /// Questions in the exam.
    pub total: usize,
    /// `correct / total * 100`, or 0 for an empty exam.
    pub percentage: f64,
    /// Threshold the percentage was compared against.
    pub pass_threshold: f64,
    pub passed: bool,
}

impl ScoreCard {
    pub fn compute(session: &ExamSession) -> Self {
        let correct = session
            .questions()
            .iter()
            .enumerate()
            .filter(|(position, q)| is_correct(session.selection(*position), &q.correct))
            .count();
        Self::from_counts(correct, session.len(), session.pass_threshold())
    }

    pub fn from_counts(correct: usize, total: usize, pass_threshold: f64) -> Self {
        let percentage = if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64 * 100.0
        };
        Self {
            correct,
            total,
            percentage,
            pass_threshold,
            passed: passes(percentage, pass_threshold),
        }
    }
}
