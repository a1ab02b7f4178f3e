//! reqwest-backed Terraform Cloud client

use crate::abstractions::WorkspaceApi;
use crate::error::{ErrorCode, Result, TfcError};
use crate::tfcloud::http::{check_status_json, decode_json, ApiError};
use crate::tfcloud::models::{ListWorkspacesResponse, RunCreateRequest, RunCreateResponse};
use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Public Terraform Cloud endpoint
pub const TF_CLOUD_BASE: &str = "https://app.terraform.io";

/// Media type of every JSON:API request
pub const JSON_API_CONTENT_TYPE: &str = "application/vnd.api+json";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the service; the API lives under `/api/v2`
    pub base_url: String,

    /// Bearer token; `None` or empty means no `Authorization` header
    pub token: Option<String>,

    /// Request timeout; transport default when unset
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(TF_CLOUD_BASE)
    }
}

/// Terraform Cloud API client
#[derive(Debug, Clone)]
pub struct TerraformCloud {
    http: Client,
    app_url: String,
    api_url: Url,
}

impl TerraformCloud {
    /// Build the client; headers are fixed from here on.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url).map_err(|e| {
            TfcError::config_with_code(
                ErrorCode::CONFIG_INVALID_VALUE,
                format!("invalid base URL '{}'", config.base_url),
                Some("base_url".to_string()),
            )
            .with_source(e)
        })?;
        if base.cannot_be_a_base() {
            return Err(TfcError::config_with_code(
                ErrorCode::CONFIG_INVALID_VALUE,
                format!("base URL '{}' cannot hold a path", config.base_url),
                Some("base_url".to_string()),
            ));
        }

        let mut api_url = base.clone();
        if let Ok(mut segments) = api_url.path_segments_mut() {
            segments.pop_if_empty().extend(["api", "v2"]);
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(JSON_API_CONTENT_TYPE),
        );
        if let Some(token) = config.token.as_deref().filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                TfcError::config_with_code(
                    ErrorCode::CONFIG_CREDENTIALS,
                    "token contains characters not allowed in an HTTP header",
                    Some("token".to_string()),
                )
                .with_source(e)
            })?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| {
            TfcError::config_with_code(
                ErrorCode::CONFIG_HTTP_CLIENT,
                "failed to create HTTP client",
                None,
            )
            .with_source(e)
        })?;

        Ok(Self {
            http,
            app_url: base.as_str().trim_end_matches('/').to_string(),
            api_url,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl WorkspaceApi for TerraformCloud {
    fn app_url(&self) -> &str {
        &self.app_url
    }

    // https://developer.hashicorp.com/terraform/cloud-docs/api-docs/workspaces#list-workspaces
    async fn list_workspaces(&self, organization: &str) -> std::result::Result<ListWorkspacesResponse, ApiError> {
        let url = self.endpoint(&["organizations", organization, "workspaces"]);
        debug!(%url, "GET workspaces");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;

        let response = check_status_json(response).await?;
        decode_json(response).await
    }

    // https://developer.hashicorp.com/terraform/cloud-docs/api-docs/run#create-a-run
    async fn create_run(&self, request: &RunCreateRequest) -> std::result::Result<RunCreateResponse, ApiError> {
        let url = self.endpoint(&["runs"]);
        debug!(%url, workspace_id = request.workspace_id(), "POST run");

        let body = serde_json::to_vec(request).map_err(|source| ApiError::Encode {
            url: url.to_string(),
            source,
        })?;

        let response = self
            .http
            .post(url.clone())
            .body(body)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;

        let response = check_status_json(response).await?;
        decode_json(response).await
    }
}
