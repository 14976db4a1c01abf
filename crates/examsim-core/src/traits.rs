//! Core trait definitions for question bank retrieval.
//!
//! Implemented by the `examsim-sources` crate.

use async_trait::async_trait;

use crate::error::ExamError;
use crate::model::QuestionRecord;

/// Somewhere a question bank can be fetched from.
#[async_trait]
pub trait BankSource: Send + Sync {
    /// Human-readable location (e.g. a path or URL), used in logs.
    fn describe(&self) -> String;

    /// Retrieve every record of the bank.
    async fn fetch(&self) -> anyhow::Result<Vec<QuestionRecord>>;
}

/// Fetch the bank from `source`, mapping any failure to
/// [`ExamError::BankUnavailable`].
pub async fn fetch_bank(source: &dyn BankSource) -> Result<Vec<QuestionRecord>, ExamError> {
    match source.fetch().await {
        Ok(records) => {
            tracing::info!(
                "fetched {} questions from {}",
                records.len(),
                source.describe()
            );
            Ok(records)
        }
        Err(e) => {
            tracing::error!("failed to fetch bank from {}: {e:#}", source.describe());
            Err(ExamError::BankUnavailable(format!("{}: {e:#}", source.describe())))
        }
    }
}
