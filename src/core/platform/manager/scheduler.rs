/*
Scheduler

Background timer that runs a check for every configured provider on a fixed
interval. A raised check is logged and the loop carries on with the next
provider; nothing is carried over between ticks.
*/

use crate::core::platform::container::appointment::ProviderId;
use crate::core::platform::manager::orchestrator::AppointmentOrchestrator;
use log::{error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

pub struct CheckScheduler {
    orchestrator: Arc<AppointmentOrchestrator>,
    provider_ids: Vec<ProviderId>,
    tick_interval: Duration,
}

impl CheckScheduler {
    pub fn new(orchestrator: Arc<AppointmentOrchestrator>, provider_ids: Vec<ProviderId>, tick_interval: Duration) -> Self {
        Self { orchestrator, provider_ids, tick_interval }
    }

    /// Check every provider once; returns how many checks raised.
    pub async fn run_once(&self) -> usize {
        let mut failures = 0;
        for provider_id in &self.provider_ids {
            if let Err(e) = self.orchestrator.check_and_notify(provider_id).await {
                error!("Scheduled check for {} failed: {}", provider_id, e);
                failures += 1;
            }
        }
        failures
    }

    /// Runs forever; the first tick fires immediately.
    pub async fn start(self) {
        info!(
            "Scheduler started: {} provider(s) every {}s",
            self.provider_ids.len(),
            self.tick_interval.as_secs()
        );

        let mut ticker = interval(self.tick_interval.max(Duration::from_secs(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let failures = self.run_once().await;
            if failures > 0 {
                info!("Scheduler tick finished with {} failed check(s)", failures);
            }
        }
    }
}
