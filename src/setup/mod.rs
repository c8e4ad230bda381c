pub mod http_server;
pub mod service_runner;

use crate::config::Settings;
use std::sync::Arc;

/// Serve the trigger endpoints, with the in-process scheduler when enabled.
pub async fn setup_and_run(config: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let config = Arc::new(config);
    let services = service_runner::build_services(&config).await?;

    let scheduler = service_runner::spawn_scheduler(&config, services.orchestrator.clone());
    let served = http_server::run_http_server(config, services.orchestrator).await;

    if let Some(handle) = scheduler {
        handle.abort();
    }
    services.repository.pool().close().await;

    Ok(served?)
}
