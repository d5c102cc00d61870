use crate::domain::case::{Case, CaseUpdate};
use crate::domain::ports::{CaseStore, CaseTransaction};
use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

struct CaseRow {
    case: Case,
    lock: Arc<Mutex<()>>,
}

/// A thread-safe in-memory case store with per-row no-wait locks.
///
/// Uses `Arc<RwLock<HashMap<String, CaseRow>>>` so clones share the same
/// rows. Each row carries its own `Arc<Mutex<()>>`; a transaction acquires
/// it with `try_lock_owned`, so a contended row fails immediately with
/// [`StoreError::Conflict`] instead of queueing.
#[derive(Default, Clone)]
pub struct InMemoryCaseStore {
    rows: Arc<RwLock<HashMap<String, CaseRow>>>,
}

impl InMemoryCaseStore {
    /// Creates a new, empty in-memory case store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CaseStore for InMemoryCaseStore {
    async fn create(&self, case: Case) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        rows.insert(
            case.email.clone(),
            CaseRow {
                case,
                lock: Arc::new(Mutex::new(())),
            },
        );
        Ok(())
    }

    async fn get(&self, email: &str) -> Result<Option<Case>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.get(email).map(|row| row.case.clone()))
    }

    async fn begin(&self, email: &str) -> Result<Box<dyn CaseTransaction>, StoreError> {
        let guard = {
            let rows = self.rows.read().await;
            let row = rows
                .get(email)
                .ok_or_else(|| StoreError::NotFound(email.to_string()))?;
            row.lock
                .clone()
                .try_lock_owned()
                .map_err(|_| StoreError::Conflict)?
        };
        Ok(Box::new(InMemoryCaseTransaction {
            rows: Arc::clone(&self.rows),
            email: email.to_string(),
            staged: None,
            _guard: guard,
        }))
    }
}

/// One open row transaction. The owned guard keeps the row lock held until
/// the transaction commits, rolls back, or is dropped.
pub struct InMemoryCaseTransaction {
    rows: Arc<RwLock<HashMap<String, CaseRow>>>,
    email: String,
    staged: Option<CaseUpdate>,
    _guard: OwnedMutexGuard<()>,
}

#[async_trait]
impl CaseTransaction for InMemoryCaseTransaction {
    async fn stage(&mut self, update: CaseUpdate) -> Result<(), StoreError> {
        self.staged = Some(update);
        Ok(())
    }

    async fn commit(mut self: Box<Self>) -> Result<(), StoreError> {
        if let Some(update) = self.staged.take() {
            let mut rows = self.rows.write().await;
            let row = rows
                .get_mut(&self.email)
                .ok_or_else(|| StoreError::NotFound(self.email.clone()))?;
            row.case.apply(&update);
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        Ok(())
    }
}
