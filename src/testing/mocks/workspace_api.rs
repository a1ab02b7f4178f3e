//! Mock workspace API implementation for testing

use crate::abstractions::WorkspaceApi;
use crate::tfcloud::client::TF_CLOUD_BASE;
use crate::tfcloud::http::{ApiError, ErrorBody};
use crate::tfcloud::models::{
    ListWorkspacesResponse, RunCreateRequest, RunCreateResponse, Workspace,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Builder for creating configured mock workspace APIs
pub struct MockWorkspaceApiBuilder {
    app_url: String,
    workspaces: Vec<Workspace>,
    listing_failure: Option<(u16, String)>,
    run_failures: HashMap<String, u16>,
    latency: Option<Duration>,
}

impl Default for MockWorkspaceApiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWorkspaceApiBuilder {
    pub fn new() -> Self {
        Self {
            app_url: TF_CLOUD_BASE.to_string(),
            workspaces: Vec::new(),
            listing_failure: None,
            run_failures: HashMap::new(),
            latency: None,
        }
    }

    pub fn with_app_url(mut self, app_url: &str) -> Self {
        self.app_url = app_url.to_string();
        self
    }

    pub fn with_workspaces(mut self, workspaces: Vec<Workspace>) -> Self {
        self.workspaces = workspaces;
        self
    }

    /// Make the listing call fail with this status and body
    pub fn with_listing_failure(mut self, status: u16, body: &str) -> Self {
        self.listing_failure = Some((status, body.to_string()));
        self
    }

    /// Make run creation for this workspace id fail with this status
    pub fn with_run_failure(mut self, workspace_id: &str, status: u16) -> Self {
        self.run_failures.insert(workspace_id.to_string(), status);
        self
    }

    /// Delay every run creation call, so concurrent calls overlap
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn build(self) -> MockWorkspaceApi {
        MockWorkspaceApi {
            app_url: self.app_url,
            workspaces: Arc::new(self.workspaces),
            listing_failure: self.listing_failure,
            run_failures: Arc::new(self.run_failures),
            latency: self.latency,
            run_requests: Arc::new(Mutex::new(Vec::new())),
            listing_calls: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }
}

/// Mock implementation of WorkspaceApi for testing
///
/// Clones share their call log, so a test can keep one handle and give
/// another to the orchestrator.
#[derive(Clone)]
pub struct MockWorkspaceApi {
    app_url: String,
    workspaces: Arc<Vec<Workspace>>,
    listing_failure: Option<(u16, String)>,
    run_failures: Arc<HashMap<String, u16>>,
    latency: Option<Duration>,
    run_requests: Arc<Mutex<Vec<RunCreateRequest>>>,
    listing_calls: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl MockWorkspaceApi {
    pub fn new() -> Self {
        MockWorkspaceApiBuilder::new().build()
    }

    pub fn builder() -> MockWorkspaceApiBuilder {
        MockWorkspaceApiBuilder::new()
    }

    /// Every run creation request received, in arrival order
    pub fn run_requests(&self) -> Vec<RunCreateRequest> {
        self.run_requests.lock().unwrap().clone()
    }

    /// Workspace ids of every run creation request, in arrival order
    pub fn created_runs(&self) -> Vec<String> {
        self.run_requests()
            .iter()
            .map(|r| r.workspace_id().to_string())
            .collect()
    }

    pub fn listing_calls(&self) -> usize {
        self.listing_calls.load(Ordering::SeqCst)
    }

    /// Highest number of run creation calls seen in progress at once
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl Default for MockWorkspaceApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkspaceApi for MockWorkspaceApi {
    fn app_url(&self) -> &str {
        &self.app_url
    }

    async fn list_workspaces(&self, organization: &str) -> Result<ListWorkspacesResponse, ApiError> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);

        if let Some((status, body)) = &self.listing_failure {
            return Err(ApiError::Status {
                status: *status,
                url: format!("{}/api/v2/organizations/{}/workspaces", self.app_url, organization),
                body: ErrorBody::parse(body.clone()),
            });
        }

        Ok(ListWorkspacesResponse::new(self.workspaces.as_ref().clone()))
    }

    async fn create_run(&self, request: &RunCreateRequest) -> Result<RunCreateResponse, ApiError> {
        self.run_requests.lock().unwrap().push(request.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        } else {
            tokio::task::yield_now().await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let workspace_id = request.workspace_id();
        if let Some(status) = self.run_failures.get(workspace_id) {
            return Err(ApiError::Status {
                status: *status,
                url: format!("{}/api/v2/runs", self.app_url),
                body: ErrorBody::Json(serde_json::json!({
                    "errors": [{ "status": status.to_string(), "title": "simulated failure" }]
                })),
            });
        }

        Ok(RunCreateResponse::new(format!("run-{}", workspace_id)))
    }
}
