//! Wire and domain types for the Terraform Cloud JSON:API endpoints
//!
//! Field names on the wire are mapped explicitly with `#[serde(rename)]`.
//! Required fields have no serde default, so a listing entry missing `name`,
//! `tag-names` or `execution-mode` is rejected instead of silently filled in.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Message attached to every run created by this tool
pub const AUTO_TRIGGER_MESSAGE: &str = "Auto-trigger";

/// Where plan/apply operations of a workspace are executed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExecutionMode {
    /// Executed by Terraform Cloud itself
    Remote,
    Local,
    Agent,
    /// Any mode this client does not know about
    Other(String),
}

impl ExecutionMode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Remote => "remote",
            Self::Local => "local",
            Self::Agent => "agent",
            Self::Other(mode) => mode,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote)
    }
}

impl From<String> for ExecutionMode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "remote" => Self::Remote,
            "local" => Self::Local,
            "agent" => Self::Agent,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for ExecutionMode {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ExecutionMode> for String {
    fn from(mode: ExecutionMode) -> Self {
        match mode {
            ExecutionMode::Other(mode) => mode,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A workspace as reported by one listing call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WorkspaceResource")]
pub struct Workspace {
    pub id: String,
    pub name: String,
    pub tags: BTreeSet<String>,
    pub execution_mode: ExecutionMode,
}

impl Workspace {
    pub fn new<I, T>(
        id: impl Into<String>,
        name: impl Into<String>,
        tags: I,
        execution_mode: impl Into<ExecutionMode>,
    ) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            tags: tags.into_iter().map(Into::into).collect(),
            execution_mode: execution_mode.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WorkspaceResource {
    id: String,
    attributes: WorkspaceAttributes,
}

#[derive(Debug, Deserialize)]
struct WorkspaceAttributes {
    name: String,
    #[serde(rename = "tag-names")]
    tag_names: Vec<String>,
    #[serde(rename = "execution-mode")]
    execution_mode: ExecutionMode,
}

impl From<WorkspaceResource> for Workspace {
    fn from(resource: WorkspaceResource) -> Self {
        Self {
            id: resource.id,
            name: resource.attributes.name,
            tags: resource.attributes.tag_names.into_iter().collect(),
            execution_mode: resource.attributes.execution_mode,
        }
    }
}

/// Body of `GET /organizations/{org}/workspaces`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListWorkspacesResponse {
    pub data: Vec<Workspace>,
    #[serde(default)]
    pub links: Option<PageLinks>,
    #[serde(default)]
    pub meta: Option<ListMeta>,
}

impl ListWorkspacesResponse {
    pub fn new(data: Vec<Workspace>) -> Self {
        Self {
            data,
            links: None,
            meta: None,
        }
    }

    /// Whether the service reported pages beyond the one returned
    pub fn has_more_pages(&self) -> bool {
        let next_link = self
            .links
            .as_ref()
            .and_then(|links| links.next.as_deref())
            .is_some();
        let next_page = self
            .meta
            .as_ref()
            .and_then(|meta| meta.pagination.as_ref())
            .and_then(|pagination| pagination.next_page)
            .is_some();
        next_link || next_page
    }

    pub fn total_count(&self) -> Option<u64> {
        self.meta
            .as_ref()
            .and_then(|meta| meta.pagination.as_ref())
            .and_then(|pagination| pagination.total_count)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageLinks {
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListMeta {
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    #[serde(rename = "next-page", default)]
    pub next_page: Option<u32>,
    #[serde(rename = "total-count", default)]
    pub total_count: Option<u64>,
}

/// Body of `POST /runs`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunCreateRequest {
    pub data: RunCreateData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunCreateData {
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: RunCreateAttributes,
    pub relationships: RunRelationships,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunCreateAttributes {
    pub message: String,
    pub refresh: bool,
    #[serde(rename = "refresh-only")]
    pub refresh_only: bool,
    #[serde(rename = "auto-apply")]
    pub auto_apply: bool,
    #[serde(rename = "is-destroy")]
    pub is_destroy: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRelationships {
    pub workspace: Relationship,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relationship {
    pub data: ResourceIdentifier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    pub id: String,
}

impl RunCreateRequest {
    /// Build a refresh-only run request for one workspace
    pub fn refresh_only(workspace_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            data: RunCreateData {
                kind: "runs".to_string(),
                attributes: RunCreateAttributes {
                    message: message.into(),
                    refresh: true,
                    refresh_only: true,
                    auto_apply: false,
                    is_destroy: false,
                },
                relationships: RunRelationships {
                    workspace: Relationship {
                        data: ResourceIdentifier {
                            id: workspace_id.into(),
                        },
                    },
                },
            },
        }
    }

    pub fn workspace_id(&self) -> &str {
        &self.data.relationships.workspace.data.id
    }
}

/// Body returned by `POST /runs`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunCreateResponse {
    pub data: ResourceIdentifier,
}

impl RunCreateResponse {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            data: ResourceIdentifier { id: run_id.into() },
        }
    }

    pub fn run_id(&self) -> &str {
        &self.data.id
    }
}

/// Web UI link to a run
pub fn run_link(base_url: &str, organization: &str, workspace: &str, run_id: &str) -> String {
    format!(
        "{}/app/{}/workspaces/{}/runs/{}",
        base_url.trim_end_matches('/'),
        organization,
        workspace,
        run_id
    )
}
