//! trigger-all command implementation

use super::build_orchestrator;
use crate::cli::args::{AuthArgs, TargetArgs};
use crate::config::Settings;
use crate::error::{ErrorCode, TfcError};
use crate::tfcloud::orchestrator::TriggerReport;
use anyhow::Result;

/// Run the trigger-all command
pub async fn run_trigger_all(
    settings: &Settings,
    target: TargetArgs,
    message: Option<String>,
    auth: AuthArgs,
) -> Result<()> {
    let mut orchestrator = build_orchestrator(settings, auth.token.as_deref())?;
    if let Some(message) = message {
        orchestrator = orchestrator.with_message(message);
    }

    let report = orchestrator
        .trigger_all_report(&target.organization, &target.tag_filter())
        .await?;

    print_report(&report);

    if report.all_succeeded() {
        Ok(())
    } else {
        Err(partial_failure(&report).into())
    }
}

fn print_report(report: &TriggerReport) {
    if report.attempted() == 0 {
        println!("No workspace of {} matched", report.organization);
        return;
    }

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(link) => println!("✅ {} {}", outcome.workspace_name, link),
            Err(failure) => println!("❌ {} {}", outcome.workspace_name, failure),
        }
    }
    println!(
        "Triggered {} of {} workspaces",
        report.attempted() - report.failed(),
        report.attempted()
    );
}

pub(crate) fn partial_failure(report: &TriggerReport) -> TfcError {
    TfcError::trigger(
        ErrorCode::TRIGGER_PARTIAL_FAILURE,
        format!(
            "{} of {} workspaces of {} could not be triggered",
            report.failed(),
            report.attempted(),
            report.organization
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mocks::MockWorkspaceApi;
    use crate::testing::remote_workspaces;
    use crate::tfcloud::filter::TagFilter;
    use crate::tfcloud::orchestrator::Orchestrator;

    #[tokio::test]
    async fn test_partial_failure_error() {
        let api = MockWorkspaceApi::builder()
            .with_workspaces(remote_workspaces(3))
            .with_run_failure("ws-1", 404)
            .build();
        let report = Orchestrator::new(api)
            .trigger_all_report("acme", &TagFilter::default())
            .await
            .unwrap();

        let err = partial_failure(&report);

        assert_eq!(err.code(), ErrorCode::TRIGGER_PARTIAL_FAILURE);
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("1 of 3 workspaces of acme"));
    }
}
