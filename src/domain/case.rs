use crate::error::ReconcileError;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an insurance application.
///
/// A case starts `Pending` and moves to `Submitted` only through a
/// successful submission. `Approved` and `Rejected` are set by the remote
/// authority and only ever observed locally via a status refresh.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Submitted,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// One applicant's insurance submission.
///
/// The email is the identity: the unique join key between the local row and
/// the remote status record. It must not change after creation.
///
/// Invariant: `submitted == true` implies `application_status != Pending`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Case {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub application_status: ApplicationStatus,
    pub submitted: bool,
}

impl Case {
    /// Creates a new pending case, validating the required fields.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Result<Self, ReconcileError> {
        let name = name.into();
        let email = email.into();
        let phone = phone.into();
        for (field, value) in [("name", &name), ("email", &email), ("phone", &phone)] {
            if value.trim().is_empty() {
                return Err(ReconcileError::Validation(format!("{field} is required")));
            }
        }
        Ok(Self {
            name,
            email,
            phone,
            application_status: ApplicationStatus::default(),
            submitted: false,
        })
    }

    /// Applies a staged update to this case's status fields.
    pub fn apply(&mut self, update: &CaseUpdate) {
        if let Some(status) = update.application_status {
            self.application_status = status;
        }
        if let Some(submitted) = update.submitted {
            self.submitted = submitted;
        }
    }
}

/// The target fields of a single-row commit.
///
/// A retried commit re-applies the same `CaseUpdate`, never a diff against
/// whatever a concurrent writer committed in between (last committer wins).
#[derive(Debug, Default, PartialEq, Clone)]
pub struct CaseUpdate {
    pub application_status: Option<ApplicationStatus>,
    pub submitted: Option<bool>,
}

impl CaseUpdate {
    /// Update written after the remote accepts a submission.
    pub fn mark_submitted() -> Self {
        Self {
            application_status: Some(ApplicationStatus::Submitted),
            submitted: Some(true),
        }
    }

    /// Update written when a status refresh pulls a remote status.
    pub fn set_status(status: ApplicationStatus) -> Self {
        Self {
            application_status: Some(status),
            submitted: None,
        }
    }
}

/// Body of the remote submission write, built from the local case.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct SubmissionRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: ApplicationStatus,
}

impl From<&Case> for SubmissionRequest {
    fn from(case: &Case) -> Self {
        Self {
            name: case.name.clone(),
            email: case.email.clone(),
            phone: case.phone.clone(),
            status: case.application_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_case_starts_pending() {
        let case = Case::new("Ada Lovelace", "ada@example.com", "555-0100").unwrap();
        assert_eq!(case.application_status, ApplicationStatus::Pending);
        assert!(!case.submitted);
    }

    #[test]
    fn test_new_case_rejects_blank_fields() {
        assert!(Case::new("", "ada@example.com", "555-0100").is_err());
        assert!(Case::new("Ada", "  ", "555-0100").is_err());
        assert!(Case::new("Ada", "ada@example.com", "").is_err());
    }

    #[test]
    fn test_mark_submitted_sets_both_fields() {
        let mut case = Case::new("Ada", "ada@example.com", "555-0100").unwrap();
        case.apply(&CaseUpdate::mark_submitted());
        assert_eq!(case.application_status, ApplicationStatus::Submitted);
        assert!(case.submitted);
    }

    #[test]
    fn test_set_status_leaves_submitted_flag() {
        let mut case = Case::new("Ada", "ada@example.com", "555-0100").unwrap();
        case.apply(&CaseUpdate::mark_submitted());
        case.apply(&CaseUpdate::set_status(ApplicationStatus::Approved));
        assert_eq!(case.application_status, ApplicationStatus::Approved);
        assert!(case.submitted);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&ApplicationStatus::Submitted).unwrap();
        assert_eq!(json, "\"submitted\"");
        let parsed: ApplicationStatus = serde_json::from_str("\"approved\"").unwrap();
        assert_eq!(parsed, ApplicationStatus::Approved);
    }
}
