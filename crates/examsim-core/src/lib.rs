//! examsim-core: Question selection, answer remapping, sessions and scoring.
//!
//! This crate holds everything about an exam that does not depend on how it
//! is rendered or where the question bank comes from.

pub mod bank;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod remap;
pub mod report;
pub mod scoring;
pub mod session;
pub mod shuffle;
pub mod timer;
pub mod traits;

pub use error::{ExamError, SelectionError};
pub use session::{ExamSession, FinishReason};
