//! Local file question bank source.

use std::path::PathBuf;

use async_trait::async_trait;

use examsim_core::bank::parse_bank_str;
use examsim_core::model::QuestionRecord;
use examsim_core::traits::BankSource;

use crate::error::SourceError;

/// Reads a JSON bank from disk.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl BankSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> anyhow::Result<Vec<QuestionRecord>> {
        if !self.path.exists() {
            return Err(SourceError::NotFound(self.describe()).into());
        }
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SourceError::Io {
                path: self.describe(),
                message: e.to_string(),
            })?;
        let records = parse_bank_str(&content).map_err(SourceError::from_parse)?;
        Ok(records)
    }
}
