//! Mock implementations for testing
//!
//! This module provides mock implementations for the remote service.

pub mod workspace_api;

pub use workspace_api::{MockWorkspaceApi, MockWorkspaceApiBuilder};
