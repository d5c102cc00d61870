use super::case::ApplicationStatus;
use std::fmt;

/// Outcome of a submission attempt that did not error.
///
/// Rendering these for an operator is the caller's concern; the variants
/// carry everything a notification needs.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SubmitOutcome {
    /// Remote write and local commit both succeeded.
    Submitted,
    /// The remote already reported this identity as submitted; nothing was
    /// written on either side.
    AlreadySubmitted,
}

impl fmt::Display for SubmitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Submitted => write!(f, "Your application has been submitted successfully!"),
            Self::AlreadySubmitted => write!(f, "Already submitted"),
        }
    }
}

/// Outcome of a status refresh that did not error.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RefreshOutcome {
    /// The remote reported a status and the local field now matches it.
    Updated(ApplicationStatus),
    /// The remote has no submission on record; local state untouched.
    NotFound,
}

impl fmt::Display for RefreshOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Updated(status) => write!(f, "Current status: {}", status.as_str()),
            Self::NotFound => write!(f, "No submission on record"),
        }
    }
}
