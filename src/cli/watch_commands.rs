/*
CLI Commands

Command-line entrypoints: run the long-lived trigger server, or perform a
single check for one provider and exit.
*/

use crate::config::Settings;
use crate::core::platform::container::appointment::ProviderId;
use crate::setup::{self, service_runner};
use clap::{Args, Parser, Subcommand};
use log::info;

#[derive(Debug, Parser)]
#[command(name = "slotwatch", version, about = "Watch a provider for new appointment slots")]
pub struct Cli {
    /// Configuration file name, without extension
    #[arg(short, long, default_value = "config", global = true)]
    pub config: String,

    #[command(subcommand)]
    pub command: WatchCommands,
}

#[derive(Debug, Subcommand)]
pub enum WatchCommands {
    /// Serve the HTTP trigger endpoints (and the scheduler when enabled)
    Serve,
    /// Check one provider now and notify subscribers if a new slot qualifies
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Provider identifier (ItemKeyIndex)
    pub provider_id: ProviderId,
}

pub async fn run(command: WatchCommands, settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        WatchCommands::Serve => setup::setup_and_run(settings).await,
        WatchCommands::Check(args) => {
            let services = service_runner::build_services(&settings).await?;
            let result = services.orchestrator.check_and_notify(&args.provider_id).await;
            services.repository.pool().close().await;

            let outcome = result?;
            info!("Check for {} finished: {:?}", args.provider_id, outcome);
            Ok(())
        }
    }
}
