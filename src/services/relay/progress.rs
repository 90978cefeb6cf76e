//! Progress milestones reported while an analysis is in flight

use std::fmt;

/// Points the relay reaches, in order. A failed analysis stops reporting at
/// the last milestone it actually reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Milestone {
    /// Input and configuration checks passed
    Validated,
    /// Request dispatched upstream
    Sent,
    /// Upstream answered successfully
    Received,
    /// Report extracted and scored
    Parsed,
}

impl Milestone {
    /// Rough completion percentage for progress bars
    pub fn percent(&self) -> u8 {
        match self {
            Milestone::Validated => 10,
            Milestone::Sent => 25,
            Milestone::Received => 90,
            Milestone::Parsed => 100,
        }
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Milestone::Validated => write!(f, "validated"),
            Milestone::Sent => write!(f, "sent"),
            Milestone::Received => write!(f, "received"),
            Milestone::Parsed => write!(f, "parsed"),
        }
    }
}

/// Receives milestones from the relay
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, milestone: Milestone);
}

impl<F> ProgressObserver for F
where
    F: Fn(Milestone) + Send + Sync,
{
    fn on_progress(&self, milestone: Milestone) {
        self(milestone)
    }
}

/// Observer that ignores everything
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&self, _milestone: Milestone) {}
}
