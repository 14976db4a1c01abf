//! Core data model types for examsim.
//!
//! A [`QuestionRecord`] is the external bank schema, read as-is. A
//! [`WorkingQuestion`] is the per-session copy whose option order has been
//! randomized; every option keeps the [`OptionId`] it had in the bank so the
//! correct answers can be tracked by identity rather than by text.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single entry of the question bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// The question text.
    pub question: String,
    /// Option texts in bank order.
    pub options: Vec<String>,
    /// Indices into `options` that are correct. Semantically a set.
    #[serde(rename = "correctAnswer")]
    pub correct_answer: Vec<usize>,
    /// Whether more than one option may be selected.
    #[serde(default)]
    pub multiple: bool,
}

/// Stable identity of an option: its index in the originating bank record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(pub usize);

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An answer option as presented in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Identity carried through the shuffle.
    pub id: OptionId,
    /// Display text.
    pub text: String,
}

/// A question as presented in one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingQuestion {
    /// The question text.
    pub question: String,
    /// Options in presentation order.
    pub options: Vec<AnswerOption>,
    /// Presentation positions of the correct options.
    pub correct: BTreeSet<usize>,
    /// Whether more than one option may be selected.
    pub multiple: bool,
}

impl WorkingQuestion {
    /// Build a working question that keeps the bank order.
    ///
    /// Correct indices outside `options` are dropped; the bank loader rejects
    /// such records before a session is built, so this never loses data in
    /// practice.
    pub fn from_record(record: &QuestionRecord) -> Self {
        let options = record
            .options
            .iter()
            .enumerate()
            .map(|(i, text)| AnswerOption {
                id: OptionId(i),
                text: text.clone(),
            })
            .collect();
        let correct = record
            .correct_answer
            .iter()
            .copied()
            .filter(|&i| i < record.options.len())
            .collect();

        Self {
            question: record.question.clone(),
            options,
            correct,
            multiple: record.multiple,
        }
    }

    /// Number of options.
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// Texts of the options at the given positions, in position order.
    /// Positions outside the option list are skipped.
    pub fn texts_at<'a, I>(&'a self, positions: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a usize>,
    {
        positions
            .into_iter()
            .filter_map(|&i| self.options.get(i))
            .map(|o| o.text.as_str())
            .collect()
    }

    /// Texts of the correct options, in presentation order.
    pub fn correct_texts(&self) -> Vec<&str> {
        self.texts_at(&self.correct)
    }

    /// Instruction shown next to multiple-answer questions.
    pub fn instruction(&self) -> Option<String> {
        self.multiple.then(|| format!("Choose {}", self.correct.len()))
    }

    /// Export back to the bank schema, with the session's option order.
    pub fn to_record(&self) -> QuestionRecord {
        QuestionRecord {
            question: self.question.clone(),
            options: self.options.iter().map(|o| o.text.clone()).collect(),
            correct_answer: self.correct.iter().copied().collect(),
            multiple: self.multiple,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> QuestionRecord {
        QuestionRecord {
            question: "Which services are serverless?".into(),
            options: vec!["Lambda".into(), "EC2".into(), "Fargate".into()],
            correct_answer: vec![2, 0],
            multiple: true,
        }
    }

    #[test]
    fn deserializes_bank_schema() {
        let json = r#"{
            "question": "What is S3?",
            "options": ["Storage", "Compute"],
            "correctAnswer": [0]
        }"#;
        let record: QuestionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.correct_answer, vec![0]);
        assert!(!record.multiple, "multiple defaults to false");
    }

    #[test]
    fn from_record_keeps_bank_order_and_ids() {
        let q = WorkingQuestion::from_record(&record());
        assert_eq!(q.options[1].id, OptionId(1));
        assert_eq!(q.options[1].text, "EC2");
        assert_eq!(q.correct_texts(), vec!["Lambda", "Fargate"]);
    }

    #[test]
    fn instruction_only_for_multiple() {
        let mut q = WorkingQuestion::from_record(&record());
        assert_eq!(q.instruction().as_deref(), Some("Choose 2"));
        q.multiple = false;
        assert!(q.instruction().is_none());
    }

    #[test]
    fn to_record_uses_camel_case_field() {
        let q = WorkingQuestion::from_record(&record());
        let json = serde_json::to_value(q.to_record()).unwrap();
        assert_eq!(json["correctAnswer"], serde_json::json!([0, 2]));
    }
}
