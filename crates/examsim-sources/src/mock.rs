//! In-memory sources for testing.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use examsim_core::model::QuestionRecord;
use examsim_core::traits::BankSource;

use crate::error::SourceError;

/// Serves a fixed list of records without any IO.
pub struct StaticSource {
    records: Vec<QuestionRecord>,
    fetch_count: AtomicU32,
}

impl StaticSource {
    pub fn new(records: Vec<QuestionRecord>) -> Self {
        Self {
            records,
            fetch_count: AtomicU32::new(0),
        }
    }

    /// Number of fetches served.
    pub fn fetch_count(&self) -> u32 {
        self.fetch_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl BankSource for StaticSource {
    fn describe(&self) -> String {
        format!("in-memory bank ({} questions)", self.records.len())
    }

    async fn fetch(&self) -> anyhow::Result<Vec<QuestionRecord>> {
        self.fetch_count.fetch_add(1, Ordering::Relaxed);
        Ok(self.records.clone())
    }
}

/// Always fails with a network error.
pub struct FailingSource {
    message: String,
}

impl FailingSource {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl BankSource for FailingSource {
    fn describe(&self) -> String {
        "failing source".to_string()
    }

    async fn fetch(&self) -> anyhow::Result<Vec<QuestionRecord>> {
        Err(SourceError::Network(self.message.clone()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use examsim_core::config::ExamConfig;
    use examsim_core::engine::start_session;
    use examsim_core::ExamError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn records(n: usize) -> Vec<QuestionRecord> {
        (0..n)
            .map(|i| QuestionRecord {
                question: format!("question {i}"),
                options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                correct_answer: vec![i % 4],
                multiple: false,
            })
            .collect()
    }

    #[tokio::test]
    async fn static_source_counts_fetches() {
        let source = StaticSource::new(records(3));
        assert_eq!(source.fetch().await.unwrap().len(), 3);
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn bank_smaller_than_requested_uses_everything() {
        let source = StaticSource::new(records(3));
        let config = ExamConfig {
            question_count: 5,
            ..Default::default()
        };
        let session = start_session(&source, &config, &mut StdRng::seed_from_u64(3))
            .await
            .unwrap();
        assert_eq!(session.len(), 3);
    }

    #[tokio::test]
    async fn failing_source_blocks_session() {
        let source = FailingSource::new("connection reset");
        let err = start_session(&source, &ExamConfig::default(), &mut StdRng::seed_from_u64(3))
            .await
            .unwrap_err();
        assert!(matches!(err, ExamError::BankUnavailable(ref m) if m.contains("connection reset")));
    }
}
