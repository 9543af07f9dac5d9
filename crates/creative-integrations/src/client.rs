//! Shared plumbing for the upstream HTTP clients.

use anyhow::Context;
use std::time::Duration;

/// Failure of an upstream call
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The service answered with a non-success status
    #[error("{api} request failed: {status} - {body}")]
    Status {
        api: &'static str,
        status: u16,
        body: String,
    },

    /// The request never completed or the body could not be read
    #[error("Failed to send request to {api}: {source}")]
    Transport {
        api: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The response body grew past the caller's limit
    #[error("{api} response exceeds {limit} bytes")]
    TooLarge { api: &'static str, limit: u64 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ClientError {
    /// HTTP status returned by the upstream service, if it answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 401 or 403 from upstream
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

pub fn build_http_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to create HTTP client for integrations")
}

pub(crate) fn transport(api: &'static str) -> impl FnOnce(reqwest::Error) -> ClientError {
    move |source| ClientError::Transport { api, source }
}

/// Pass successful responses through; turn anything else into [`ClientError::Status`]
pub(crate) async fn ensure_success(
    response: reqwest::Response,
    api: &'static str,
) -> ClientResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(ClientError::Status {
        api,
        status: status.as_u16(),
        body,
    })
}
