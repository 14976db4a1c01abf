//! Per-question report and the exported exam summary.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoring::{is_correct, ScoreCard};
use crate::session::{ExamSession, FinishReason};
use crate::timer::format_clock;

/// Marker shown in place of an empty selection.
pub const NONE_MARKER: &str = "None";

/// Outcome of one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// One-based question number in presentation order.
    pub number: usize,
    pub question: String,
    pub correct: bool,
    /// Texts of the selected options, in presentation order.
    pub selected: Vec<String>,
    /// Texts of the correct options; only present when answered wrongly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Vec<String>>,
}

impl ReportEntry {
    /// Selected options joined for display, or [`NONE_MARKER`].
    pub fn selected_display(&self) -> String {
        if self.selected.is_empty() {
            NONE_MARKER.to_string()
        } else {
            self.selected.join(", ")
        }
    }

    pub fn expected_display(&self) -> Option<String> {
        self.expected.as_ref().map(|e| e.join(", "))
    }
}

/// Build the per-question breakdown of `session`.
pub fn report(session: &ExamSession) -> Vec<ReportEntry> {
    session
        .questions()
        .iter()
        .enumerate()
        .map(|(position, q)| {
            let stored = session.selection(position);
            let correct = is_correct(stored, &q.correct);
            let selected = stored
                .map(|s| q.texts_at(s).into_iter().map(String::from).collect())
                .unwrap_or_default();
            let expected =
                (!correct).then(|| q.correct_texts().into_iter().map(String::from).collect());

            ReportEntry {
                number: position + 1,
                question: q.question.clone(),
                correct,
                selected,
                expected,
            }
        })
        .collect()
}

/// Everything exported when an exam ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamSummary {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub reason: FinishReason,
    pub score: ScoreCard,
    /// Seconds left on the countdown when the exam ended.
    pub remaining_secs: u64,
    pub entries: Vec<ReportEntry>,
}

impl ExamSummary {
    pub fn from_session(
        session: &ExamSession,
        reason: FinishReason,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id: session.id(),
            started_at: session.started_at(),
            finished_at,
            reason,
            score: ScoreCard::compute(session),
            remaining_secs: session.countdown().remaining_secs(),
            entries: report(session),
        }
    }

    /// Headline message for the result screen.
    pub fn verdict(&self) -> &'static str {
        if self.score.passed {
            "Congratulations, you passed!"
        } else {
            "Unfortunately, you did not reach the passing score."
        }
    }

    /// Save the summary as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize summary")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
        Ok(())
    }

    /// Load a summary from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read summary from {}", path.display()))?;
        let summary: ExamSummary =
            serde_json::from_str(&content).context("failed to parse summary JSON")?;
        Ok(summary)
    }

    /// Format the summary as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str("## Exam result\n\n");
        md.push_str(&format!(
            "**Score:** {:.2}% ({}/{}), pass mark {:.0}%\n\n",
            self.score.percentage, self.score.correct, self.score.total, self.score.pass_threshold
        ));
        md.push_str(&format!("{}\n\n", self.verdict()));
        if self.reason == FinishReason::TimeExpired {
            md.push_str("_Time expired._\n\n");
        } else {
            md.push_str(&format!(
                "_Finished with {} remaining._\n\n",
                format_clock(self.remaining_secs)
            ));
        }

        if !self.entries.is_empty() {
            md.push_str("### Answers\n\n");
            for e in &self.entries {
                let mark = if e.correct { "correct" } else { "incorrect" };
                md.push_str(&format!("{}. **{}** ({mark})\n", e.number, e.question));
                md.push_str(&format!("   - Chosen: {}\n", e.selected_display()));
                if let Some(expected) = e.expected_display() {
                    md.push_str(&format!("   - Correct: {expected}\n"));
                }
            }
        }

        md
    }
}
