//! list command implementation
//!
//! Prints the workspaces trigger-all would select, without creating runs.

use super::build_orchestrator;
use crate::cli::args::{AuthArgs, OutputFormat, TargetArgs};
use crate::config::Settings;
use crate::tfcloud::models::Workspace;
use anyhow::{Context, Result};

/// Run the list command
pub async fn run_list(
    settings: &Settings,
    target: TargetArgs,
    format: OutputFormat,
    auth: AuthArgs,
) -> Result<()> {
    let orchestrator = build_orchestrator(settings, auth.token.as_deref())?;
    let workspaces = orchestrator
        .fetch_workspaces(&target.organization, &target.tag_filter())
        .await?;

    println!("{}", render(&workspaces, format)?);
    Ok(())
}

fn render(workspaces: &[Workspace], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(workspaces).context("Failed to serialize workspaces")
        }
        OutputFormat::Text => Ok(workspaces
            .iter()
            .map(|ws| {
                let tags = ws.tags.iter().map(String::as_str).collect::<Vec<_>>();
                format!("{}\t{}\t{}", ws.id, ws.name, tags.join(","))
            })
            .collect::<Vec<_>>()
            .join("\n")),
    }
}
