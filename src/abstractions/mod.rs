//! Abstraction layers for external dependencies
//!
//! This module provides trait-based abstractions for the remote Terraform
//! Cloud service to enable better testing and dependency injection.

pub mod workspace_api;

pub use workspace_api::WorkspaceApi;
