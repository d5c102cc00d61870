use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Errors produced by the local case store adapter.
///
/// Classification happens at the adapter boundary: only `Conflict` is
/// retryable, everything else propagates immediately.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Row lock unavailable or serialization failure during commit.
    #[error("row lock unavailable or serialization conflict")]
    Conflict,
    #[error("no case found for {0}")]
    NotFound(String),
    #[error("store error: {0}")]
    Other(String),
}

/// Errors produced by the remote status store adapter.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("remote returned HTTP {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed remote response: {0}")]
    Malformed(String),
}

/// Caller-facing error taxonomy for submission and status refresh.
///
/// `RemoteWrite` and `RemoteRead` mean nothing happened locally. After a
/// successful remote write, `ConflictExhausted` and `Store` mean the remote
/// may be ahead of local until a status refresh repairs it.
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("remote submission failed, local state unchanged: {0}")]
    RemoteWrite(#[source] RemoteError),
    #[error("remote status read failed, local state unchanged: {0}")]
    RemoteRead(#[source] RemoteError),
    #[error(
        "local commit for {email} still conflicted after {attempts} attempts; remote may be ahead of local"
    )]
    ConflictExhausted { email: String, attempts: u32 },
    #[error("local store error: {0}")]
    Store(#[from] StoreError),
}
