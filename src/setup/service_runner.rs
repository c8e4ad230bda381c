use std::sync::Arc;
use std::time::Duration;
use log::info;
use url::Url;
use crate::config::application_settings::Settings;
use crate::core::platform::manager::notification_service::NotificationService;
use crate::core::platform::manager::orchestrator::AppointmentOrchestrator;
use crate::core::platform::manager::scheduler::CheckScheduler;
use crate::infrastructure::adapters::input::http_appointment_fetcher::HttpAppointmentFetcher;
use crate::infrastructure::adapters::notifications::telegram_notification_adapter::TelegramNotificationAdapter;
use crate::infrastructure::repositories::sqlite_appointment_repository::SqliteAppointmentRepository;

/// Everything a check needs, wired from settings.
pub struct Services {
    pub orchestrator: Arc<AppointmentOrchestrator>,
    pub repository: SqliteAppointmentRepository,
}

pub async fn build_services(settings: &Settings) -> Result<Services, Box<dyn std::error::Error>> {
    let repository = SqliteAppointmentRepository::new(&settings.database)
        .await
        .map_err(|e| format!("Failed to initialize database: {}", e))?;
    info!("Database ready at {}", settings.database.url);

    let fetcher = HttpAppointmentFetcher::new(&settings.scraper)
        .map_err(|e| format!("Failed to initialize appointment fetcher: {}", e))?;

    let telegram = TelegramNotificationAdapter::new(&settings.telegram)
        .map_err(|e| format!("Failed to initialize Telegram adapter: {}", e))?;

    let booking_url = Url::parse(&settings.scraper.booking_url)
        .map_err(|e| format!("Invalid scraper.booking_url: {}", e))?;

    let repository_arc = Arc::new(repository.clone());
    let notifier = NotificationService::new(Arc::new(telegram), repository_arc.clone());
    let orchestrator = Arc::new(AppointmentOrchestrator::new(
        Arc::new(fetcher),
        repository_arc,
        notifier,
        booking_url,
        settings.notification.window_days,
    ));

    Ok(Services { orchestrator, repository })
}

/// Spawn the interval scheduler when enabled and there is something to check.
pub fn spawn_scheduler(settings: &Settings, orchestrator: Arc<AppointmentOrchestrator>) -> Option<tokio::task::JoinHandle<()>> {
    let config = &settings.scheduler;
    if !config.enabled {
        info!("Scheduler disabled");
        return None;
    }
    if config.provider_ids.is_empty() {
        info!("Scheduler enabled but no provider ids configured");
        return None;
    }

    let scheduler = CheckScheduler::new(
        orchestrator,
        config.provider_ids.clone(),
        Duration::from_secs(config.interval_secs),
    );
    Some(tokio::spawn(scheduler.start()))
}
