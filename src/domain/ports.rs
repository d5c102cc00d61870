use super::case::{ApplicationStatus, Case, CaseUpdate, SubmissionRequest};
use crate::error::{RemoteError, StoreError};
use async_trait::async_trait;

pub type CaseStoreBox = Box<dyn CaseStore>;
pub type RemoteClientBox = Box<dyn RemoteStatusClient>;

/// The local system of record for cases, keyed by applicant email.
///
/// The store exclusively owns durable case state; callers mutate it only
/// through transactions obtained from [`CaseStore::begin`].
#[async_trait]
pub trait CaseStore: Send + Sync {
    async fn create(&self, case: Case) -> Result<(), StoreError>;

    async fn get(&self, email: &str) -> Result<Option<Case>, StoreError>;

    /// Opens a transaction on one row, acquiring its lock with no-wait
    /// semantics: if another transaction holds the row this fails
    /// immediately with [`StoreError::Conflict`] instead of queueing.
    async fn begin(&self, email: &str) -> Result<Box<dyn CaseTransaction>, StoreError>;
}

/// A single-row unit of work holding the row lock.
///
/// Dropping a transaction without committing releases the lock and discards
/// staged changes.
#[async_trait]
pub trait CaseTransaction: Send {
    /// Stages field updates; nothing is visible until commit.
    async fn stage(&mut self, update: CaseUpdate) -> Result<(), StoreError>;

    /// Applies staged updates and releases the row lock. A serialization
    /// failure at this point surfaces as [`StoreError::Conflict`].
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    /// Discards staged updates and releases the row lock.
    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}

impl std::fmt::Debug for dyn CaseTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn CaseTransaction")
    }
}

/// Client for the remote status store, the source of truth for submission
/// status.
#[async_trait]
pub trait RemoteStatusClient: Send + Sync {
    /// Fetches the remote status for an identity. `Ok(None)` means the
    /// remote has no submission on record, regardless of whether the
    /// deployment signals that with a 404 or a default "pending" body.
    async fn fetch_status(&self, email: &str) -> Result<Option<ApplicationStatus>, RemoteError>;

    /// Asks the remote to record this case as submitted (upsert by email).
    async fn submit(&self, request: &SubmissionRequest) -> Result<(), RemoteError>;
}
