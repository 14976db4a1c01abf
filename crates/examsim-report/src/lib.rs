//! examsim-report: Result page generation for finished exams.

pub mod html;
