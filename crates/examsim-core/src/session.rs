//! Exam session state and navigation.
//!
//! An [`ExamSession`] owns the working questions, the current position, the
//! per-question selections and the countdown. All mutation goes through its
//! methods; scoring and reporting only read it. Once finished, the session is
//! frozen: the first [`ExamSession::finish`] (manual or forced by the timer)
//! computes the [`ExamSummary`] and every later call returns that same value.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bank;
use crate::config::ExamConfig;
use crate::error::{ExamError, SelectionError};
use crate::model::{QuestionRecord, WorkingQuestion};
use crate::remap::remap;
use crate::report::ExamSummary;
use crate::shuffle::select;
use crate::timer::{Countdown, TickOutcome};

/// Why an exam ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The taker asked to finish.
    Manual,
    /// The countdown reached zero.
    TimeExpired,
}

/// What a timer tick did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// Time remains.
    Running { remaining_secs: u64 },
    /// Time ran out on this tick and the session was finished.
    TimeUp,
    /// The session was already finished; nothing happened.
    Idle,
}

/// A single exam attempt.
#[derive(Debug, Clone)]
pub struct ExamSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    questions: Vec<WorkingQuestion>,
    position: usize,
    selections: BTreeMap<usize, BTreeSet<usize>>,
    countdown: Countdown,
    pass_threshold: f64,
    summary: Option<ExamSummary>,
}

impl ExamSession {
    /// Create a session over already prepared working questions.
    pub fn new(questions: Vec<WorkingQuestion>, config: &ExamConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            questions,
            position: 0,
            selections: BTreeMap::new(),
            countdown: Countdown::with_step(config.duration_secs, config.tick_interval()),
            pass_threshold: config.pass_threshold,
            summary: None,
        }
    }

    /// Draw `config.question_count` questions from `bank`, shuffle their
    /// options and start a session.
    ///
    /// Fails with [`ExamError::BankUnavailable`] when the bank contains
    /// records that cannot be presented.
    pub fn start<R: Rng + ?Sized>(
        records: &[QuestionRecord],
        config: &ExamConfig,
        rng: &mut R,
    ) -> Result<Self, ExamError> {
        bank::check_records(records)?;

        let picked = select(records, config.question_count, rng);
        let questions: Vec<WorkingQuestion> = picked.iter().map(|r| remap(r, rng)).collect();

        let session = Self::new(questions, config);
        tracing::info!(
            session = %session.id,
            questions = session.len(),
            bank_size = records.len(),
            duration_secs = config.duration_secs,
            "exam session started"
        );
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn questions(&self) -> &[WorkingQuestion] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Zero-based position of the current question.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn current(&self) -> Option<&WorkingQuestion> {
        self.questions.get(self.position)
    }

    /// The stored selection for a question, if it has been answered.
    pub fn selection(&self, position: usize) -> Option<&BTreeSet<usize>> {
        self.selections.get(&position)
    }

    /// Number of questions with a non-empty selection.
    pub fn answered_count(&self) -> usize {
        self.selections.len()
    }

    pub fn pass_threshold(&self) -> f64 {
        self.pass_threshold
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn is_finished(&self) -> bool {
        self.summary.is_some()
    }

    /// The final summary, once the session has finished.
    pub fn summary(&self) -> Option<&ExamSummary> {
        self.summary.as_ref()
    }

    /// Replace the selection for the question at `position`.
    ///
    /// An empty selection clears the answer. On error the previous selection
    /// is kept.
    pub fn record_selection(
        &mut self,
        position: usize,
        indices: &[usize],
    ) -> Result<(), ExamError> {
        let selected = self.check_selection(position, indices)?;
        if selected.is_empty() {
            self.selections.remove(&position);
        } else {
            self.selections.insert(position, selected);
        }
        tracing::debug!(position, ?indices, "selection recorded");
        Ok(())
    }

    /// Forget the answer for the question at `position`.
    pub fn clear_selection(&mut self, position: usize) -> Result<(), ExamError> {
        self.record_selection(position, &[])
    }

    fn check_selection(
        &self,
        position: usize,
        indices: &[usize],
    ) -> Result<BTreeSet<usize>, ExamError> {
        if self.is_finished() {
            return Err(ExamError::selection(position, SelectionError::SessionFinished));
        }
        let question = self.questions.get(position).ok_or_else(|| {
            ExamError::selection(
                position,
                SelectionError::NoSuchQuestion {
                    total: self.questions.len(),
                },
            )
        })?;

        let mut selected = BTreeSet::new();
        for &index in indices {
            if index >= question.option_count() {
                return Err(ExamError::selection(
                    position,
                    SelectionError::OptionOutOfRange {
                        index,
                        option_count: question.option_count(),
                    },
                ));
            }
            if !selected.insert(index) {
                return Err(ExamError::selection(
                    position,
                    SelectionError::DuplicateOption { index },
                ));
            }
        }

        if !question.multiple && selected.len() > 1 {
            return Err(ExamError::selection(
                position,
                SelectionError::SingleAnswerOnly {
                    selected: selected.len(),
                },
            ));
        }

        Ok(selected)
    }

    /// Move to the next question. Returns `false` at the last question or
    /// after the session finished.
    pub fn advance(&mut self) -> bool {
        if self.is_finished() || self.position + 1 >= self.questions.len() {
            return false;
        }
        self.position += 1;
        tracing::debug!(position = self.position, "advanced");
        true
    }

    /// Move to the previous question. Returns `false` at the first question
    /// or after the session finished.
    pub fn retreat(&mut self) -> bool {
        if self.is_finished() || self.position == 0 {
            return false;
        }
        self.position -= 1;
        tracing::debug!(position = self.position, "retreated");
        true
    }

    /// Commit `pending` for the current question, then advance.
    pub fn advance_with(&mut self, pending: &[usize]) -> Result<bool, ExamError> {
        self.record_selection(self.position, pending)?;
        Ok(self.advance())
    }

    /// Commit `pending` for the current question, then retreat.
    pub fn retreat_with(&mut self, pending: &[usize]) -> Result<bool, ExamError> {
        self.record_selection(self.position, pending)?;
        Ok(self.retreat())
    }

    /// Jump straight to `position`. Out-of-range positions are ignored.
    pub fn jump_to(&mut self, position: usize) -> bool {
        if self.is_finished() || position >= self.questions.len() || position == self.position {
            return false;
        }
        self.position = position;
        tracing::debug!(position, "jumped");
        true
    }

    /// Finish the exam and return its summary.
    ///
    /// Only the first call computes the summary; later calls, whatever their
    /// reason, return the cached one unchanged.
    pub fn finish(&mut self, reason: FinishReason) -> &ExamSummary {
        let summary = match self.summary.take() {
            Some(existing) => existing,
            None => {
                let summary = ExamSummary::from_session(self, reason, Utc::now());
                tracing::info!(
                    session = %self.id,
                    ?reason,
                    score = summary.score.percentage,
                    passed = summary.score.passed,
                    remaining = %self.countdown.clock(),
                    "exam finished"
                );
                summary
            }
        };
        self.summary.insert(summary)
    }

    /// Advance the countdown by one tick, forcing a finish when it runs out.
    pub fn timer_tick(&mut self) -> TickEvent {
        if self.is_finished() {
            return TickEvent::Idle;
        }
        match self.countdown.tick() {
            TickOutcome::Running { remaining_secs } => TickEvent::Running { remaining_secs },
            TickOutcome::Expired | TickOutcome::AlreadyExpired => {
                self.finish(FinishReason::TimeExpired);
                TickEvent::TimeUp
            }
        }
    }

    /// Everything a front end needs to render the current question.
    pub fn view(&self) -> Option<QuestionView<'_>> {
        let question = self.current()?;
        let stored = self.selection(self.position);
        let selected = (0..question.option_count())
            .map(|i| stored.is_some_and(|s| s.contains(&i)))
            .collect();

        Some(QuestionView {
            position: self.position,
            total: self.questions.len(),
            question,
            selected,
            is_last: self.position + 1 == self.questions.len(),
            can_go_back: self.position > 0,
            remaining_secs: self.countdown.remaining_secs(),
        })
    }
}

/// Render-ready snapshot of the current question.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionView<'a> {
    /// Zero-based position.
    pub position: usize,
    /// Number of questions in the exam.
    pub total: usize,
    pub question: &'a WorkingQuestion,
    /// One flag per option: is it currently selected.
    pub selected: Vec<bool>,
    /// Show the finish affordance.
    pub is_last: bool,
    /// Show the previous affordance.
    pub can_go_back: bool,
    pub remaining_secs: u64,
}

impl QuestionView<'_> {
    /// One-based question number.
    pub fn number(&self) -> usize {
        self.position + 1
    }
}
