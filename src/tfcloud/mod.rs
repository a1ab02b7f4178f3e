//! Terraform Cloud integration
//!
//! - `models` - JSON:API request and response bodies
//! - `http` - status checking and body decoding shared by every call
//! - `client` - reqwest-backed [`WorkspaceApi`](crate::abstractions::WorkspaceApi)
//! - `filter` - tag and execution-mode selection
//! - `gate` - bound on concurrent run creation calls
//! - `orchestrator` - listing, filtering and fan-out composed into `trigger_all`

pub mod client;
pub mod filter;
pub mod gate;
pub mod http;
pub mod models;
pub mod orchestrator;

pub use client::{ClientConfig, TerraformCloud, TF_CLOUD_BASE};
pub use filter::{filter_workspaces, FilterDecision, TagFilter};
pub use gate::{ConcurrencyGate, DEFAULT_MAX_IN_FLIGHT};
pub use http::{ApiError, ErrorBody};
pub use models::{ExecutionMode, Workspace, AUTO_TRIGGER_MESSAGE};
pub use orchestrator::{Orchestrator, TriggerFailure, TriggerOutcome, TriggerReport};
