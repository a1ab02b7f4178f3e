//! # tfc-trigger
//!
//! Trigger refresh-only runs on every remotely executed Terraform Cloud
//! workspace of an organization, selected by tags.
//!
//! ## Usage
//!
//! ```bash
//! tfc-trigger trigger-all --organization acme [--include prod] [--exclude ignore]
//! ```
//!
//! ## Modules
//!
//! - `abstractions` - Trait-based seam over the remote workspace API
//! - `cli` - Argument parsing, routing and subcommands
//! - `config` - Layered settings and API token resolution
//! - `error` - Error type with stable codes and exit codes
//! - `event` - Scheduled event decoding
//! - `logging` - Tracing subscriber setup
//! - `tfcloud` - Terraform Cloud client, tag filter, concurrency gate and orchestrator
//! - `testing` - Mock workspace API and fixtures
pub mod abstractions;
pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod tfcloud;

pub mod testing;

pub use error::{TfcError, Result};
pub use tfcloud::{Orchestrator, TagFilter, TerraformCloud, TriggerReport, Workspace};
