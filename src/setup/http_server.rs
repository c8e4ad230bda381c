use std::sync::Arc;
use actix_web::{web, App, HttpServer};
use log::info;
use crate::config::Settings;
use crate::core::platform::manager::orchestrator::AppointmentOrchestrator;

pub async fn run_http_server(config: Arc<Settings>, orchestrator: Arc<AppointmentOrchestrator>) -> std::io::Result<()> {
    let orchestrator = web::Data::new(orchestrator);
    let server_config = config.server.clone();

    info!("Listening on {}:{}", server_config.host, server_config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(orchestrator.clone())
            .configure(crate::infrastructure::web::trigger_controller::configure)
    })
    .bind(format!("{}:{}", server_config.host, server_config.port))?
    .run()
    .await
}
