use crate::domain::case::{ApplicationStatus, SubmissionRequest};
use crate::domain::ports::RemoteStatusClient;
use crate::error::RemoteError;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Default timeout for remote calls. The remote has no compensating action
/// if it never responds, so every call must have a bound.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP adapter for the remote status store.
///
/// Talks to the `POST /submit` / `GET /status?email=` wire contract. The
/// base URL is passed in at construction; there is no ambient endpoint
/// configuration.
pub struct HttpRemoteClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRemoteClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, RemoteError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| RemoteError::Transport(err.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { base_url, client })
    }
}

#[derive(Deserialize)]
struct StatusResponse {
    status: String,
}

#[async_trait]
impl RemoteStatusClient for HttpRemoteClient {
    async fn fetch_status(&self, email: &str) -> Result<Option<ApplicationStatus>, RemoteError> {
        let response = self
            .client
            .get(format!("{}/status", self.base_url))
            .query(&[("email", email)])
            .send()
            .await
            .map_err(|err| RemoteError::Transport(err.to_string()))?;

        match response.status() {
            reqwest::StatusCode::NOT_FOUND => return Ok(None),
            status if !status.is_success() => return Err(RemoteError::Status(status.as_u16())),
            _ => {}
        }

        let body: StatusResponse = response
            .json()
            .await
            .map_err(|err| RemoteError::Malformed(err.to_string()))?;

        // Known deployments signal "no submission on record" either with a
        // 404 or with a default "pending" body. Normalize both to None so
        // callers see a single signal.
        match body.status.as_str() {
            "pending" => Ok(None),
            "submitted" => Ok(Some(ApplicationStatus::Submitted)),
            "approved" => Ok(Some(ApplicationStatus::Approved)),
            "rejected" => Ok(Some(ApplicationStatus::Rejected)),
            other => Err(RemoteError::Malformed(format!("unknown status {other:?}"))),
        }
    }

    async fn submit(&self, request: &SubmissionRequest) -> Result<(), RemoteError> {
        let response = self
            .client
            .post(format!("{}/submit", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|err| RemoteError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            return Err(RemoteError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}
