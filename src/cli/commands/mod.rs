//! Command implementation modules
//!
//! Each subcommand lives in its own module; they share the client setup below.

pub mod handle_event;
pub mod list;
pub mod trigger_all;

pub use handle_event::run_handle_event;
pub use list::run_list;
pub use trigger_all::run_trigger_all;

use crate::config::{resolve_token, Settings};
use crate::error::Result;
use crate::tfcloud::client::TerraformCloud;
use crate::tfcloud::orchestrator::Orchestrator;
use tracing::{debug, warn};

/// Resolve the token and build an orchestrator from the effective settings
pub fn build_orchestrator(
    settings: &Settings,
    token_flag: Option<&str>,
) -> Result<Orchestrator<TerraformCloud>> {
    let token = match resolve_token(token_flag, &settings.base_url)? {
        Some((token, source)) => {
            debug!("Using API token from {}", source);
            Some(token)
        }
        None => {
            warn!("No API token found, requests will be sent without authorization");
            None
        }
    };

    let client = TerraformCloud::new(settings.client_config(token))?;
    Ok(Orchestrator::new(client)
        .with_max_in_flight(settings.max_in_flight)
        .with_message(settings.message.clone()))
}
