//! Workspace API abstraction layer
//!
//! Provides a trait-based seam over the two remote calls the orchestrator
//! needs, so it can be exercised without a live Terraform Cloud organization.

use crate::tfcloud::http::ApiError;
use crate::tfcloud::models::{ListWorkspacesResponse, RunCreateRequest, RunCreateResponse};
use async_trait::async_trait;

/// Remote operations used by the orchestrator
///
/// Implementations own their HTTP client and its authorization header; both
/// are configured once at construction and only read afterwards.
///
/// # Examples
///
/// ```ignore
/// use tfc_trigger::abstractions::WorkspaceApi;
///
/// async fn count_workspaces(api: &dyn WorkspaceApi) -> Result<usize, ApiError> {
///     let page = api.list_workspaces("acme").await?;
///     Ok(page.data.len())
/// }
/// ```
#[async_trait]
pub trait WorkspaceApi: Send + Sync {
    /// Base URL of the web UI, used to build run links
    fn app_url(&self) -> &str;

    /// List the workspaces of an organization
    ///
    /// Only the first page is requested; no paging parameters are sent.
    ///
    /// # Errors
    ///
    /// - `ApiError::Status` when the service answers with a status above 399
    /// - `ApiError::Transport` when the request cannot be sent
    /// - `ApiError::Decode` when the body is not a valid listing
    async fn list_workspaces(&self, organization: &str) -> Result<ListWorkspacesResponse, ApiError>;

    /// Create a run
    async fn create_run(&self, request: &RunCreateRequest) -> Result<RunCreateResponse, ApiError>;
}
