//! CLI argument structures
//!
//! This module defines the command-line interface of tfc-trigger: global
//! flags shared by every subcommand and one variant per subcommand.

use crate::config::Settings;
use crate::logging::LogFormat;
use crate::tfcloud::filter::TagFilter;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Trigger refresh-only runs across Terraform Cloud workspaces
#[derive(Parser, Debug)]
#[command(name = "tfc-trigger")]
#[command(about = "tfc-trigger - Trigger refresh-only runs across the workspaces of a Terraform Cloud organization", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log output format
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Terraform Cloud or Terraform Enterprise address
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Maximum number of run creation calls in flight at once
    #[arg(long, global = true, value_name = "N")]
    pub max_in_flight: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Apply command line overrides, the highest settings layer
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(format) = self.log_format {
            settings.log_format = format;
        }
        if let Some(base_url) = &self.base_url {
            settings.base_url = base_url.clone();
        }
        if let Some(max_in_flight) = self.max_in_flight {
            settings.max_in_flight = max_in_flight;
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Trigger a refresh-only run on every matching remote workspace
    #[command(name = "trigger-all")]
    TriggerAll {
        #[command(flatten)]
        target: TargetArgs,

        /// Message attached to the created runs
        #[arg(short = 'm', long)]
        message: Option<String>,

        #[command(flatten)]
        auth: AuthArgs,
    },

    /// List the workspaces that trigger-all would select
    List {
        #[command(flatten)]
        target: TargetArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Run trigger-all from a scheduled event message
    #[command(name = "handle-event")]
    HandleEvent {
        /// File holding the event body (reads stdin when omitted)
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,

        #[command(flatten)]
        auth: AuthArgs,
    },
}

/// Organization and tag selection
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Organization owning the workspaces
    #[arg(short, long)]
    pub organization: String,

    /// Only select workspaces carrying this tag (repeatable, all must match)
    #[arg(short, long = "include", value_name = "TAG")]
    pub include: Vec<String>,

    /// Skip workspaces carrying this tag (repeatable, any matches)
    #[arg(short, long = "exclude", value_name = "TAG")]
    pub exclude: Vec<String>,
}

impl TargetArgs {
    pub fn tag_filter(&self) -> TagFilter {
        TagFilter::new(self.include.iter(), self.exclude.iter())
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct AuthArgs {
    /// API token (defaults to TFC_TOKEN, TF_TOKEN_<host>, then the Terraform credentials file)
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_trigger_all() {
        let cli = Cli::try_parse_from([
            "tfc-trigger",
            "-vv",
            "trigger-all",
            "--organization",
            "acme",
            "--include",
            "prod",
            "--include",
            "core",
            "--exclude",
            "ignore",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::TriggerAll { target, auth, .. } => {
                assert_eq!(target.organization, "acme");
                assert_eq!(target.include, vec!["prod", "core"]);
                let filter = target.tag_filter();
                assert!(filter.exclude().contains("ignore"));
                assert!(auth.token.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_organization_is_required() {
        assert!(Cli::try_parse_from(["tfc-trigger", "trigger-all"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tfc-trigger",
            "list",
            "-o",
            "acme",
            "--format",
            "json",
            "--log-format",
            "compact",
            "--max-in-flight",
            "5",
        ])
        .unwrap();

        let mut settings = Settings::default();
        cli.apply_to(&mut settings);
        assert_eq!(settings.log_format, LogFormat::Compact);
        assert_eq!(settings.max_in_flight, 5);
        assert!(matches!(
            cli.command,
            Commands::List {
                format: OutputFormat::Json,
                ..
            }
        ));
    }
}
