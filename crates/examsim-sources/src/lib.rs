//! examsim-sources: Question bank retrieval.
//!
//! Implements the `BankSource` trait for local files, HTTP endpoints and
//! in-memory test data.

pub mod error;
pub mod file;
pub mod http;
pub mod mock;

use anyhow::Result;

use examsim_core::traits::BankSource;

pub use error::SourceError;
pub use file::FileSource;
pub use http::HttpSource;
pub use mock::{FailingSource, StaticSource};

/// Create a source for `location`: `http://` and `https://` URLs are fetched
/// over HTTP, anything else is read as a file path.
pub fn create_source(location: &str) -> Result<Box<dyn BankSource>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(HttpSource::new(location)?))
    } else {
        Ok(Box::new(FileSource::new(location)))
    }
}
