//! Response status checking for the JSON:API service

use reqwest::Response;
use serde::de::DeserializeOwned;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Error body of a failed response, decoded on a best-effort basis
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    Json(serde_json::Value),
    Text(String),
}

impl ErrorBody {
    pub fn parse(raw: String) -> Self {
        match serde_json::from_str(&raw) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(raw),
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => write!(f, "{}", value),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Failure of a single call to the remote service
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{status} for {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: ErrorBody,
    },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unable to encode request for {url}: {source}")]
    Encode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Any status strictly greater than 399 is a failure
pub fn is_failure_status(status: u16) -> bool {
    status > 399
}

/// Turn an error status into `ApiError::Status`, keeping the decoded body
pub async fn check_status_json(response: Response) -> Result<Response, ApiError> {
    let status = response.status().as_u16();
    if !is_failure_status(status) {
        return Ok(response);
    }

    let url = response.url().to_string();
    let raw = match response.text().await {
        Ok(raw) => raw,
        Err(e) => {
            debug!(status, url = %url, "Unable to read error body: {}", e);
            format!("<unreadable body: {e}>")
        }
    };

    Err(ApiError::Status {
        status,
        url,
        body: ErrorBody::parse(raw),
    })
}

/// Read a successful response body as JSON
pub async fn decode_json<T>(response: Response) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let url = response.url().to_string();
    let raw = response
        .text()
        .await
        .map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;

    serde_json::from_str(&raw).map_err(|source| ApiError::Decode { url, source })
}
