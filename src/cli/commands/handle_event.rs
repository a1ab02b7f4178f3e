//! handle-event command implementation
//!
//! Decodes a scheduled event and runs trigger-all with its parameters.

use super::build_orchestrator;
use super::trigger_all::partial_failure;
use crate::cli::args::AuthArgs;
use crate::config::Settings;
use crate::event::parse_event;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};

/// Run the handle-event command
pub async fn run_handle_event(
    settings: &Settings,
    file: Option<PathBuf>,
    auth: AuthArgs,
) -> Result<()> {
    let body = match &file {
        Some(path) => tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read event from {}", path.display()))?,
        None => {
            let mut body = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut body)
                .await
                .context("Failed to read event from stdin")?;
            body
        }
    };

    info!("Fetching parameters from event");
    let request = parse_event(&body)?;

    // Secret retrieval is left to the deployment; the token comes from local resolution.
    info!(
        organization = %request.organization,
        secret_name = %request.secret_name,
        "Using locally resolved token instead of secret"
    );

    let orchestrator = build_orchestrator(settings, auth.token.as_deref())?;
    let report = orchestrator
        .trigger_all_report(&request.organization, &request.tag_filter())
        .await?;

    if report.all_succeeded() {
        info!("All triggers completed successfully.");
        Ok(())
    } else {
        warn!(
            failed = report.failed(),
            attempted = report.attempted(),
            "At least one trigger didn't work successfully."
        );
        Err(partial_failure(&report).into())
    }
}
