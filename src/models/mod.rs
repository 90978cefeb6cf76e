//! Caller-side data shapes
//!
//! Upload validation happens before the relay is invoked, and the exam
//! record is assembled after it succeeds.

pub mod exam;
pub mod upload;

pub use exam::{Exam, ExamStatus};
pub use upload::{ImageUpload, UploadError};
