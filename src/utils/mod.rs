//! Utility modules

pub mod redact;

pub use redact::{mask_secret, truncate_for_log};
