/*
Trigger Controller

HTTP surface used by external schedulers and uptime probes:

- GET  /health               liveness, always "OK"
- POST /check/{provider_id}  run one check-and-notify for a provider
*/

use crate::core::platform::container::appointment::ProviderId;
use crate::core::platform::manager::orchestrator::AppointmentOrchestrator;
use crate::error::CheckError;
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

async fn health() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

async fn check_provider(
    orchestrator: web::Data<Arc<AppointmentOrchestrator>>,
    path: web::Path<String>,
) -> Result<HttpResponse, CheckError> {
    let provider_id = ProviderId::new(path.into_inner())?;
    let outcome = orchestrator.check_and_notify(&provider_id).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(health)))
        .service(web::resource("/check/{provider_id}").route(web::post().to(check_provider)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::input::appointment_date_port::AppointmentDatePort;
    use crate::application::ports::output::notification_port::{ChatNotificationPort, NotificationPortResult};
    use crate::core::platform::container::subscription::ChatId;
    use crate::core::platform::manager::notification_service::NotificationService;
    use crate::error::FetchError;
    use crate::infrastructure::repositories::in_memory_appointment_repository::InMemoryAppointmentRepository;
    use actix_web::{http::StatusCode, test, App};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use url::Url;

    /// "down" fails, every other provider has nothing published.
    struct StubDates;

    #[async_trait]
    impl AppointmentDatePort for StubDates {
        async fn fetch_next_date(&self, provider_id: &ProviderId) -> Result<Option<NaiveDate>, FetchError> {
            if provider_id.as_str() == "down" {
                return Err(FetchError::HttpStatus(503));
            }
            Ok(None)
        }
    }

    struct SilentPort;

    #[async_trait]
    impl ChatNotificationPort for SilentPort {
        fn channel(&self) -> &'static str {
            "silent"
        }

        async fn send_message(&self, _chat_id: ChatId, _text: &str) -> NotificationPortResult<()> {
            Ok(())
        }
    }

    fn orchestrator() -> web::Data<Arc<AppointmentOrchestrator>> {
        let store = Arc::new(InMemoryAppointmentRepository::new());
        web::Data::new(Arc::new(AppointmentOrchestrator::new(
            Arc::new(StubDates),
            store.clone(),
            NotificationService::new(Arc::new(SilentPort), store),
            Url::parse("https://booking.example.com/doctor").unwrap(),
            60,
        )))
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(App::new().configure(configure)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert_eq!(body, web::Bytes::from_static(b"OK"));
    }

    #[actix_web::test]
    async fn test_check_returns_outcome() {
        let app = test::init_service(App::new().app_data(orchestrator()).configure(configure)).await;
        let req = test::TestRequest::post().uri("/check/71234").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body, serde_json::json!({"outcome": "no_appointment"}));
    }

    #[actix_web::test]
    async fn test_check_fetch_failure_is_bad_gateway() {
        let app = test::init_service(App::new().app_data(orchestrator()).configure(configure)).await;
        let req = test::TestRequest::post().uri("/check/down").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[actix_web::test]
    async fn test_check_blank_provider_is_bad_request() {
        let app = test::init_service(App::new().app_data(orchestrator()).configure(configure)).await;
        let req = test::TestRequest::post().uri("/check/%20").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
