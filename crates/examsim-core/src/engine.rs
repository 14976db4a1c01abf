//! Exam driver.
//!
//! Runs a session as a single event loop: user commands arrive on an mpsc
//! channel and the countdown ticks on a tokio interval, both handled on the
//! same task so the session is never touched concurrently. The loop ends on
//! the first finish, whether the user asked for it or the time ran out.

use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::config::ExamConfig;
use crate::error::ExamError;
use crate::report::ExamSummary;
use crate::session::{ExamSession, FinishReason, QuestionView, TickEvent};
use crate::traits::{fetch_bank, BankSource};

/// A user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExamCommand {
    /// Replace the selection of the current question (zero-based indices).
    Select(Vec<usize>),
    Next,
    Previous,
    /// Go to a zero-based question position.
    Jump(usize),
    Finish,
}

/// Receives what a front end needs to show while the exam runs.
pub trait ExamObserver: Send + Sync {
    fn on_question(&self, view: &QuestionView<'_>);
    fn on_tick(&self, remaining_secs: u64);
    fn on_rejected(&self, error: &ExamError);
    fn on_finished(&self, summary: &ExamSummary);
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl ExamObserver for NoopObserver {
    fn on_question(&self, _: &QuestionView<'_>) {}
    fn on_tick(&self, _: u64) {}
    fn on_rejected(&self, _: &ExamError) {}
    fn on_finished(&self, _: &ExamSummary) {}
}

/// Fetch the bank from `source` and start a session over it.
pub async fn start_session<R: Rng + ?Sized>(
    source: &dyn BankSource,
    config: &ExamConfig,
    rng: &mut R,
) -> Result<ExamSession, ExamError> {
    let records = fetch_bank(source).await?;
    ExamSession::start(&records, config, rng)
}

/// Drives one session to completion.
pub struct ExamDriver {
    tick_interval: Duration,
}

impl ExamDriver {
    pub fn new(config: &ExamConfig) -> Self {
        Self {
            tick_interval: config.tick_interval(),
        }
    }

    /// Run `session` until it finishes and return its summary.
    ///
    /// Closing the command channel finishes the exam as if the user had
    /// asked to.
    pub async fn run(
        &self,
        mut session: ExamSession,
        mut commands: mpsc::Receiver<ExamCommand>,
        observer: &dyn ExamObserver,
    ) -> ExamSummary {
        let mut ticker = interval_at(Instant::now() + self.tick_interval, self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        if let Some(view) = session.view() {
            observer.on_question(&view);
        }

        while !session.is_finished() {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => apply(&mut session, command, observer),
                    None => {
                        tracing::info!("command stream closed, finishing exam");
                        session.finish(FinishReason::Manual);
                    }
                },
                _ = ticker.tick() => match session.timer_tick() {
                    TickEvent::Running { remaining_secs } => observer.on_tick(remaining_secs),
                    TickEvent::TimeUp => tracing::warn!(session = %session.id(), "time expired"),
                    TickEvent::Idle => {}
                },
            }
        }

        // Already finished: this returns the cached summary.
        let summary = session.finish(FinishReason::Manual).clone();
        observer.on_finished(&summary);
        summary
    }
}

fn apply(session: &mut ExamSession, command: ExamCommand, observer: &dyn ExamObserver) {
    let moved_or_changed = match command {
        ExamCommand::Select(indices) => {
            match session.record_selection(session.position(), &indices) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("{e}");
                    observer.on_rejected(&e);
                    false
                }
            }
        }
        ExamCommand::Next => session.advance(),
        ExamCommand::Previous => session.retreat(),
        ExamCommand::Jump(position) => session.jump_to(position),
        ExamCommand::Finish => {
            session.finish(FinishReason::Manual);
            false
        }
    };

    if moved_or_changed {
        if let Some(view) = session.view() {
            observer.on_question(&view);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::model::{QuestionRecord, WorkingQuestion};

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl ExamObserver for Recorder {
        fn on_question(&self, view: &QuestionView<'_>) {
            self.events
                .lock()
                .unwrap()
                .push(format!("question {}/{}", view.number(), view.total));
        }
        fn on_tick(&self, remaining_secs: u64) {
            self.events.lock().unwrap().push(format!("tick {remaining_secs}"));
        }
        fn on_rejected(&self, _: &ExamError) {
            self.events.lock().unwrap().push("rejected".into());
        }
        fn on_finished(&self, summary: &ExamSummary) {
            self.events
                .lock()
                .unwrap()
                .push(format!("finished {:?}", summary.reason));
        }
    }

    fn record(correct: usize) -> QuestionRecord {
        QuestionRecord {
            question: format!("answer is {correct}"),
            options: vec!["A".into(), "B".into(), "C".into()],
            correct_answer: vec![correct],
            multiple: false,
        }
    }

    fn session(config: &ExamConfig) -> ExamSession {
        let questions = [0, 2]
            .iter()
            .map(|&c| WorkingQuestion::from_record(&record(c)))
            .collect();
        ExamSession::new(questions, config)
    }

    fn config(duration_secs: u64) -> ExamConfig {
        ExamConfig {
            duration_secs,
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn timer_expiry_finishes_exam_once() {
        let config = config(3);
        let (_tx, rx) = mpsc::channel(8);
        let recorder = Recorder::default();

        let summary = ExamDriver::new(&config)
            .run(session(&config), rx, &recorder)
            .await;

        assert_eq!(summary.reason, FinishReason::TimeExpired);
        assert_eq!(summary.remaining_secs, 0);
        assert_eq!(
            recorder.events(),
            vec!["question 1/2", "tick 2", "tick 1", "finished TimeExpired"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn sub_second_ticks_honour_the_duration() {
        let config = ExamConfig {
            duration_secs: 2,
            tick_interval_ms: 500,
            ..Default::default()
        };
        let (_tx, rx) = mpsc::channel(8);
        let recorder = Recorder::default();

        let started = Instant::now();
        let summary = ExamDriver::new(&config)
            .run(session(&config), rx, &recorder)
            .await;

        assert_eq!(started.elapsed(), Duration::from_secs(2));
        assert_eq!(summary.reason, FinishReason::TimeExpired);
        assert_eq!(
            recorder.events(),
            vec![
                "question 1/2",
                "tick 2",
                "tick 1",
                "tick 1",
                "finished TimeExpired"
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn commands_drive_the_session() {
        let config = config(60);
        let (tx, rx) = mpsc::channel(8);
        for command in [
            ExamCommand::Select(vec![0]),
            ExamCommand::Next,
            ExamCommand::Select(vec![2]),
            ExamCommand::Previous,
            ExamCommand::Finish,
            ExamCommand::Next,
        ] {
            tx.send(command).await.unwrap();
        }

        let recorder = Recorder::default();
        let summary = ExamDriver::new(&config)
            .run(session(&config), rx, &recorder)
            .await;

        assert_eq!(summary.reason, FinishReason::Manual);
        assert_eq!(summary.score.percentage, 100.0);
        assert!(summary.score.passed);
        assert_eq!(recorder.events().last().unwrap(), "finished Manual");
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_selection_is_reported_and_exam_continues() {
        let config = config(60);
        let (tx, rx) = mpsc::channel(8);
        tx.send(ExamCommand::Select(vec![0, 1])).await.unwrap();
        tx.send(ExamCommand::Select(vec![7])).await.unwrap();
        tx.send(ExamCommand::Jump(1)).await.unwrap();
        tx.send(ExamCommand::Finish).await.unwrap();

        let recorder = Recorder::default();
        let summary = ExamDriver::new(&config)
            .run(session(&config), rx, &recorder)
            .await;

        let events = recorder.events();
        assert_eq!(events.iter().filter(|e| *e == "rejected").count(), 2);
        assert!(events.contains(&"question 2/2".to_string()));
        assert_eq!(summary.score.correct, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_channel_finishes_manually() {
        let config = config(60);
        let (tx, rx) = mpsc::channel(1);
        drop(tx);

        let summary = ExamDriver::new(&config)
            .run(session(&config), rx, &NoopObserver)
            .await;
        assert_eq!(summary.reason, FinishReason::Manual);
        assert_eq!(summary.remaining_secs, 60);
    }

    struct InMemory(Vec<QuestionRecord>);

    #[async_trait]
    impl BankSource for InMemory {
        fn describe(&self) -> String {
            "memory".into()
        }
        async fn fetch(&self) -> anyhow::Result<Vec<QuestionRecord>> {
            Ok(self.0.clone())
        }
    }

    struct Unreachable;

    #[async_trait]
    impl BankSource for Unreachable {
        fn describe(&self) -> String {
            "https://example.invalid/questions.json".into()
        }
        async fn fetch(&self) -> anyhow::Result<Vec<QuestionRecord>> {
            anyhow::bail!("connection refused")
        }
    }

    #[tokio::test]
    async fn start_session_from_source() {
        let source = InMemory((0..3).map(|i| record(i % 3)).collect());
        let config = ExamConfig {
            question_count: 2,
            ..Default::default()
        };
        let session = start_session(&source, &config, &mut StdRng::seed_from_u64(5))
            .await
            .unwrap();
        assert_eq!(session.len(), 2);
    }

    #[tokio::test]
    async fn unavailable_source_aborts_start() {
        let err = start_session(&Unreachable, &ExamConfig::default(), &mut StdRng::seed_from_u64(5))
            .await
            .unwrap_err();
        match err {
            ExamError::BankUnavailable(msg) => assert!(msg.contains("connection refused")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
