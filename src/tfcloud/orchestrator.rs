//! Workspace discovery and bounded fan-out of run creation
//!
//! `trigger_all` lists the workspaces of an organization, keeps the ones
//! selected by a [`TagFilter`], then creates one refresh-only run per
//! workspace. Calls are polled concurrently on the current task and a
//! [`ConcurrencyGate`] bounds how many are in flight. A failed run creation
//! never cancels its siblings: every matched workspace is attempted exactly
//! once and its outcome is recorded in a [`TriggerReport`].

use crate::abstractions::WorkspaceApi;
use crate::error::{ErrorCode, Result, TfcError};
use crate::tfcloud::filter::{FilterDecision, TagFilter};
use crate::tfcloud::gate::{ConcurrencyGate, DEFAULT_MAX_IN_FLIGHT};
use crate::tfcloud::http::ApiError;
use crate::tfcloud::models::{run_link, RunCreateRequest, Workspace, AUTO_TRIGGER_MESSAGE};
use futures::future::join_all;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Why one workspace could not be triggered
#[derive(Debug, Error)]
pub enum TriggerFailure {
    #[error("unable to trigger workspace {workspace}: {source}")]
    Api {
        workspace: String,
        workspace_id: String,
        #[source]
        source: ApiError,
    },
}

impl TriggerFailure {
    pub fn workspace(&self) -> &str {
        match self {
            Self::Api { workspace, .. } => workspace,
        }
    }

    pub fn workspace_id(&self) -> &str {
        match self {
            Self::Api { workspace_id, .. } => workspace_id,
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            Self::Api {
                source: ApiError::Status { .. },
                ..
            } => ErrorCode::TRIGGER_HTTP_STATUS,
            Self::Api {
                source: ApiError::Transport { .. },
                ..
            } => ErrorCode::TRIGGER_TRANSPORT,
            Self::Api {
                source: ApiError::Decode { .. },
                ..
            } => ErrorCode::TRIGGER_MALFORMED,
            Self::Api {
                source: ApiError::Encode { .. },
                ..
            } => ErrorCode::TRIGGER_GENERIC,
        }
    }
}

/// Result of one attempted workspace
#[derive(Debug)]
pub struct TriggerOutcome {
    pub workspace_name: String,
    pub workspace_id: String,
    /// Link to the created run, or why it was not created
    pub result: std::result::Result<String, TriggerFailure>,
}

impl TriggerOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-workspace outcomes of one `trigger_all` call, in listing order
#[derive(Debug, Default)]
pub struct TriggerReport {
    pub organization: String,
    pub outcomes: Vec<TriggerOutcome>,
    /// Highest number of run creation calls observed in flight at once
    pub peak_in_flight: usize,
}

impl TriggerReport {
    /// True when every matched workspace was triggered (vacuously true when none matched)
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(TriggerOutcome::is_success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &TriggerFailure> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }

    /// Links of the runs that were created
    pub fn links(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(String::as_str))
    }

    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failed(&self) -> usize {
        self.failures().count()
    }
}

/// Composes listing, filtering and gated run creation for one client
pub struct Orchestrator<A> {
    api: A,
    max_in_flight: usize,
    message: String,
}

impl<A: WorkspaceApi> Orchestrator<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            message: AUTO_TRIGGER_MESSAGE.to_string(),
        }
    }

    /// Capacity of the gate created for each `trigger_all` call
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// List the organization's workspaces and keep the ones `filter` selects.
    ///
    /// Only the first page of the listing is read. A workspace id listed more
    /// than once is kept at its first position only.
    #[tracing::instrument(
        name = "Terraform Cloud: get workspaces",
        skip_all,
        fields(tfcloud.organization_name = %organization)
    )]
    pub async fn fetch_workspaces(
        &self,
        organization: &str,
        filter: &TagFilter,
    ) -> Result<Vec<Workspace>> {
        info!("Fetching the list of workspaces");

        let page = self
            .api
            .list_workspaces(organization)
            .await
            .map_err(|e| TfcError::from_listing(organization, e))?;

        // TODO: follow `links.next` once callers can opt into multi-page listings
        if page.has_more_pages() {
            warn!(
                fetched = page.data.len(),
                total = ?page.total_count(),
                "Listing is paginated; only the first page is used, later workspaces will not be triggered"
            );
        }

        debug!("Fetched {} workspaces, applying filters...", page.data.len());

        let mut seen = HashSet::new();
        let mut workspaces = Vec::new();
        for workspace in page.data {
            if !seen.insert(workspace.id.clone()) {
                warn!(
                    workspace_id = %workspace.id,
                    "workspace {:?} listed more than once, skipping duplicate",
                    workspace.name
                );
                continue;
            }

            match filter.evaluate(&workspace) {
                FilterDecision::NotRemote => {
                    debug!(
                        "workspace {:?} doesn't execute remotely, skipping",
                        workspace.name
                    );
                }
                FilterDecision::Excluded => {
                    debug!(
                        "workspace {:?} filtered out by tag: {}",
                        workspace.name,
                        join_tags(filter.exclude())
                    );
                }
                FilterDecision::MissingTags => {
                    debug!(
                        "workspace {:?} lacks one of the tags: {}",
                        workspace.name,
                        join_tags(filter.include())
                    );
                }
                FilterDecision::Selected => {
                    debug!("workspace {:?} selected", workspace.name);
                    workspaces.push(workspace);
                }
            }
        }

        info!("Found {} matching workspaces", workspaces.len());
        Ok(workspaces)
    }

    /// Create one refresh-only run and return its web link
    #[tracing::instrument(
        name = "Terraform Cloud: create run",
        skip_all,
        fields(
            tfcloud.organization_name = %organization,
            tfcloud.workspace_name = %workspace_name,
            tfcloud.workspace_id = %workspace_id,
        )
    )]
    pub async fn workspace_create_run(
        &self,
        organization: &str,
        workspace_name: &str,
        workspace_id: &str,
    ) -> std::result::Result<String, TriggerFailure> {
        info!(
            "Triggering plan for workspace {:?} (ID={})",
            workspace_name, workspace_id
        );

        let request = RunCreateRequest::refresh_only(workspace_id, self.message.as_str());
        let response = self
            .api
            .create_run(&request)
            .await
            .map_err(|source| TriggerFailure::Api {
                workspace: workspace_name.to_string(),
                workspace_id: workspace_id.to_string(),
                source,
            })?;

        let link = run_link(
            self.api.app_url(),
            organization,
            workspace_name,
            response.run_id(),
        );
        info!(run_id = response.run_id(), "Run triggered at: {}", link);
        Ok(link)
    }

    /// Trigger every matched workspace and report each outcome.
    ///
    /// A listing failure is returned as an error; run creation failures are
    /// recorded in the report.
    #[tracing::instrument(
        name = "Terraform Cloud: trigger all workspaces",
        skip_all,
        fields(tfcloud.organization_name = %organization)
    )]
    pub async fn trigger_all_report(
        &self,
        organization: &str,
        filter: &TagFilter,
    ) -> Result<TriggerReport> {
        let workspaces = self.fetch_workspaces(organization, filter).await?;

        let gate = ConcurrencyGate::new(self.max_in_flight);
        let tasks = workspaces
            .iter()
            .map(|workspace| self.trigger(&gate, organization, workspace));
        let outcomes = join_all(tasks).await;

        Ok(TriggerReport {
            organization: organization.to_string(),
            outcomes,
            peak_in_flight: gate.peak(),
        })
    }

    /// `true` iff the listing succeeded and every matched workspace was triggered
    pub async fn trigger_all(&self, organization: &str, filter: &TagFilter) -> bool {
        match self.trigger_all_report(organization, filter).await {
            Ok(report) if report.all_succeeded() => {
                info!("All triggers completed successfully.");
                true
            }
            Ok(report) => {
                warn!(
                    failed = report.failed(),
                    attempted = report.attempted(),
                    "At least one trigger didn't work successfully."
                );
                false
            }
            Err(e) => {
                error!(organization, "{}", e);
                false
            }
        }
    }

    /// Per-workspace task boundary: holds a gate slot for the duration of the
    /// call and turns a failure into an outcome, logged once here.
    async fn trigger(
        &self,
        gate: &ConcurrencyGate,
        organization: &str,
        workspace: &Workspace,
    ) -> TriggerOutcome {
        let result = {
            let _permit = gate.acquire().await;
            self.workspace_create_run(organization, &workspace.name, &workspace.id)
                .await
        };

        if let Err(failure) = &result {
            error!(
                organization,
                workspace = %workspace.name,
                workspace_id = %workspace.id,
                code = failure.code(),
                "{}",
                failure
            );
        }

        TriggerOutcome {
            workspace_name: workspace.name.clone(),
            workspace_id: workspace.id.clone(),
            result,
        }
    }
}

fn join_tags<'a>(tags: impl IntoIterator<Item = &'a String>) -> String {
    tags.into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
