//! Command routing and execution
//!
//! This module handles routing CLI commands to their respective implementations.

use crate::cli::args::Commands;
use crate::cli::commands::*;
use crate::config::Settings;
use anyhow::Result;

/// Execute a CLI command with the effective settings
pub async fn execute_command(command: Commands, settings: &Settings) -> Result<()> {
    match command {
        Commands::TriggerAll {
            target,
            message,
            auth,
        } => run_trigger_all(settings, target, message, auth).await,
        Commands::List {
            target,
            format,
            auth,
        } => run_list(settings, target, format, auth).await,
        Commands::HandleEvent { file, auth } => run_handle_event(settings, file, auth).await,
    }
}
