use crate::domain::case::{ApplicationStatus, Case, CaseUpdate, SubmissionRequest};
use crate::domain::outcome::{RefreshOutcome, SubmitOutcome};
use crate::domain::ports::{CaseStoreBox, RemoteClientBox};
use crate::error::{ReconcileError, Result, StoreError};
use std::time::Duration;
use tracing::{error, info, warn};

/// Tuning for the locked local commit loop.
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Total commit attempts before giving up on a contended row.
    pub max_commit_attempts: u32,
    /// Base backoff between attempts; the wait before retry `n` is
    /// `commit_backoff * n`.
    pub commit_backoff: Duration,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            max_commit_attempts: 5,
            commit_backoff: Duration::from_millis(500),
        }
    }
}

/// Orchestrates submission and status refresh for one case at a time.
///
/// The remote status store is the source of truth for submission status;
/// the local store is only written through its transactional API. Both
/// collaborators are injected at construction.
pub struct Reconciler {
    remote: RemoteClientBox,
    store: CaseStoreBox,
    config: ReconcilerConfig,
}

impl Reconciler {
    pub fn new(remote: RemoteClientBox, store: CaseStoreBox) -> Self {
        Self::with_config(remote, store, ReconcilerConfig::default())
    }

    pub fn with_config(
        remote: RemoteClientBox,
        store: CaseStoreBox,
        config: ReconcilerConfig,
    ) -> Self {
        Self {
            remote,
            store,
            config,
        }
    }

    /// Moves one case from not-yet-submitted to submitted, remotely and
    /// locally, without double-submitting and without losing concurrent
    /// local edits.
    ///
    /// The remote write is the point of no return: before it, any failure
    /// leaves both sides unchanged; after it, a local failure leaves the
    /// remote ahead of local until [`Reconciler::refresh_status`] repairs
    /// it.
    pub async fn submit(&self, case: &Case) -> Result<SubmitOutcome> {
        match self.remote.fetch_status(&case.email).await {
            Ok(Some(ApplicationStatus::Submitted)) => {
                info!(email = %case.email, "remote already reports this case submitted");
                return Ok(SubmitOutcome::AlreadySubmitted);
            }
            Ok(_) => {}
            Err(err) => {
                // A failed pre-check only forgoes the idempotency
                // short-circuit; the submission itself still proceeds.
                warn!(
                    email = %case.email,
                    error = %err,
                    "failed to check remote status, proceeding with submission"
                );
            }
        }

        let request = SubmissionRequest::from(case);
        if let Err(err) = self.remote.submit(&request).await {
            error!(email = %case.email, error = %err, "remote submission failed");
            return Err(ReconcileError::RemoteWrite(err));
        }

        if let Err(err) = self
            .commit_update(&case.email, CaseUpdate::mark_submitted())
            .await
        {
            error!(
                email = %case.email,
                error = %err,
                "local commit failed after the remote accepted the submission; \
                 run a status refresh to reconcile"
            );
            return Err(err);
        }

        info!(email = %case.email, "application submitted");
        Ok(SubmitOutcome::Submitted)
    }

    /// Pulls the authoritative status from the remote store into the local
    /// record.
    ///
    /// An identity with no submission on record is a no-op reported as
    /// [`RefreshOutcome::NotFound`], not an error.
    pub async fn refresh_status(&self, case: &Case) -> Result<RefreshOutcome> {
        let status = match self.remote.fetch_status(&case.email).await {
            Ok(status) => status,
            Err(err) => {
                error!(email = %case.email, error = %err, "remote status check failed");
                return Err(ReconcileError::RemoteRead(err));
            }
        };

        match status {
            None => Ok(RefreshOutcome::NotFound),
            Some(status) => {
                self.commit_update(&case.email, CaseUpdate::set_status(status))
                    .await?;
                info!(
                    email = %case.email,
                    status = status.as_str(),
                    "updated application status from remote"
                );
                Ok(RefreshOutcome::Updated(status))
            }
        }
    }

    /// Commits a single-row update, tolerating write-write conflicts from
    /// concurrent committers of the same row.
    ///
    /// Conflicts are retried with linear backoff up to the configured
    /// attempt bound; every retry re-applies the same target fields (last
    /// successful committer wins). Any other store error propagates
    /// immediately.
    async fn commit_update(&self, email: &str, update: CaseUpdate) -> Result<()> {
        let max = self.config.max_commit_attempts;
        for attempt in 1..=max {
            match self.try_commit(email, update.clone()).await {
                Ok(()) => return Ok(()),
                Err(StoreError::Conflict) => {
                    if attempt == max {
                        break;
                    }
                    warn!(
                        email,
                        attempt,
                        max_attempts = max,
                        "serialization failure, retrying"
                    );
                    tokio::time::sleep(self.config.commit_backoff * attempt).await;
                }
                Err(err) => {
                    error!(email, error = %err, "local write failed");
                    return Err(err.into());
                }
            }
        }
        Err(ReconcileError::ConflictExhausted {
            email: email.to_string(),
            attempts: max,
        })
    }

    async fn try_commit(&self, email: &str, update: CaseUpdate) -> std::result::Result<(), StoreError> {
        let mut txn = self.store.begin(email).await?;
        if let Err(err) = txn.stage(update).await {
            txn.rollback().await.ok();
            return Err(err);
        }
        txn.commit().await
    }
}
