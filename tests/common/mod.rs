//! Common test utilities and helpers
//!
//! A fake Terraform Cloud API served by axum on an ephemeral local port. It
//! records every request so tests can assert on what the client sent.
#![allow(dead_code)]

use axum::body::{Body, Bytes};
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tfc_trigger::tfcloud::models::Workspace;
use tokio::net::TcpListener;

/// One request received by the fake service
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct FakeConfig {
    workspaces: Vec<Value>,
    failing_runs: HashSet<String>,
    listing_failure: Option<(StatusCode, String)>,
    truncated_listing: Option<StatusCode>,
    paginated: bool,
}

#[derive(Clone)]
struct FakeState {
    config: Arc<FakeConfig>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Builder for the fake service
#[derive(Default)]
pub struct FakeTfcBuilder {
    config: FakeConfig,
}

impl FakeTfcBuilder {
    pub fn with_workspaces(mut self, workspaces: &[Workspace]) -> Self {
        self.config.workspaces = workspaces.iter().map(workspace_json).collect();
        self
    }

    /// Answer run creation for this workspace id with 422
    pub fn with_failing_run(mut self, workspace_id: &str) -> Self {
        self.config.failing_runs.insert(workspace_id.to_string());
        self
    }

    /// Answer the listing with this status and raw body
    pub fn with_listing_failure(mut self, status: u16, body: &str) -> Self {
        let status = StatusCode::from_u16(status).unwrap();
        self.config.listing_failure = Some((status, body.to_string()));
        self
    }

    /// Answer the listing with this status and a body cut off mid-stream
    pub fn with_truncated_listing(mut self, status: u16) -> Self {
        self.config.truncated_listing = Some(StatusCode::from_u16(status).unwrap());
        self
    }

    /// Advertise a second listing page that is never requested
    pub fn paginated(mut self) -> Self {
        self.config.paginated = true;
        self
    }

    /// Bind to `127.0.0.1:0` and serve on the current runtime
    pub async fn start(self) -> FakeTfc {
        let state = FakeState {
            config: Arc::new(self.config),
            requests: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new()
            .route(
                "/api/v2/organizations/{organization}/workspaces",
                get(list_workspaces),
            )
            .route("/api/v2/runs", post(create_run))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        FakeTfc {
            base_url: format!("http://{addr}"),
            requests: state.requests,
        }
    }
}

/// Handle on a running fake service
pub struct FakeTfc {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeTfc {
    pub fn builder() -> FakeTfcBuilder {
        FakeTfcBuilder::default()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn run_posts(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == "/api/v2/runs")
            .collect()
    }

    pub fn listing_calls(&self) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.path.ends_with("/workspaces"))
            .count()
    }

    /// Workspace ids of every posted run, sorted
    pub fn posted_workspace_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .run_posts()
            .iter()
            .filter_map(|r| r.body.as_ref())
            .filter_map(|b| b["data"]["relationships"]["workspace"]["data"]["id"].as_str())
            .map(str::to_string)
            .collect();
        ids.sort();
        ids
    }
}

/// Listing entry in the wire format
pub fn workspace_json(workspace: &Workspace) -> Value {
    json!({
        "id": workspace.id,
        "type": "workspaces",
        "attributes": {
            "name": workspace.name,
            "tag-names": workspace.tags,
            "execution-mode": workspace.execution_mode.as_str(),
        }
    })
}

fn record(state: &FakeState, path: String, headers: &HeaderMap, body: Option<Value>) {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.requests.lock().unwrap().push(RecordedRequest {
        path,
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body,
    });
}

async fn list_workspaces(
    State(state): State<FakeState>,
    Path(organization): Path<String>,
    headers: HeaderMap,
) -> Response {
    record(
        &state,
        format!("/api/v2/organizations/{organization}/workspaces"),
        &headers,
        None,
    );

    if let Some((status, body)) = &state.config.listing_failure {
        return (*status, body.clone()).into_response();
    }

    if let Some(status) = state.config.truncated_listing {
        let chunks = futures::stream::iter(vec![
            Ok(Bytes::from_static(b"{\"errors\":[")),
            Err(std::io::Error::other("connection reset")),
        ]);
        return (status, Body::from_stream(chunks)).into_response();
    }

    let mut body = json!({ "data": state.config.workspaces });
    if state.config.paginated {
        body["links"] = json!({ "next": format!("/api/v2/organizations/{organization}/workspaces?page%5Bnumber%5D=2") });
        body["meta"] = json!({ "pagination": { "current-page": 1, "next-page": 2, "total-count": 100 } });
    }
    (StatusCode::OK, body.to_string()).into_response()
}

async fn create_run(
    State(state): State<FakeState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let workspace_id = body["data"]["relationships"]["workspace"]["data"]["id"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    record(&state, "/api/v2/runs".to_string(), &headers, Some(body));

    if state.config.failing_runs.contains(&workspace_id) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "errors": [{ "status": "422", "title": "invalid attribute", "detail": "Workspace is locked" }]
            })),
        );
    }

    (
        StatusCode::CREATED,
        Json(json!({ "data": { "id": format!("run-{workspace_id}"), "type": "runs" } })),
    )
}
