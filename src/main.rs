use clap::Parser;
use tfc_trigger::cli::{execute_command, Cli};
use tfc_trigger::config::load_settings;
use tfc_trigger::error::{describe_error_code, TfcError};
use tfc_trigger::logging::init_tracing;
use tracing::{debug, trace};

// Single-threaded: run creation calls are interleaved on one task.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        let exit_code = match e.downcast_ref::<TfcError>() {
            Some(err) => {
                eprintln!("Error: {}", err.user_message());
                debug!(code = err.code(), "{}", describe_error_code(err.code()));
                err.exit_code()
            }
            None => {
                eprintln!("Error: {e:#}");
                1
            }
        };
        debug!("Exiting with code {}", exit_code);
        std::process::exit(exit_code);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = load_settings(cli.config.as_deref()).await?;
    cli.apply_to(&mut settings);
    settings.validate()?;

    init_tracing(cli.verbose, settings.log_format);

    debug!("tfc-trigger started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());
    trace!("Effective settings: {:?}", settings);

    execute_command(cli.command, &settings).await
}
