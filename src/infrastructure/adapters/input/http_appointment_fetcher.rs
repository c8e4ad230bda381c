use crate::application::ports::input::appointment_date_port::AppointmentDatePort;
use crate::config::application_settings::ScraperConfig;
use crate::core::platform::container::appointment::ProviderId;
use crate::error::FetchError;
use crate::infrastructure::adapters::input::embedded_state::extract_appointment_date;
use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL};
use std::future::Future;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

/// Run `operation` until it succeeds or `policy.max_attempts` is reached,
/// sleeping `policy.delay` between attempts. The closure receives the 1-based
/// attempt number.
pub async fn with_retry<T, F, Fut>(policy: RetryPolicy, mut operation: F) -> Result<T, FetchError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= attempts => {
                return Err(FetchError::AttemptsExhausted {
                    attempts,
                    last: Box::new(e),
                });
            }
            Err(e) => {
                warn!("Attempt {}/{} failed: {}", attempt, attempts, e);
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
        }
    }
}

/// Scrapes the provider search page for the next published appointment.
#[derive(Debug, Clone)]
pub struct HttpAppointmentFetcher {
    client: reqwest::Client,
    search_url: Url,
    retry: RetryPolicy,
}

impl HttpAppointmentFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self, FetchError> {
        let search_url = Url::parse(&config.search_url)?;

        // Browser-like headers; the site rejects obvious bots.
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            search_url,
            retry: RetryPolicy {
                max_attempts: config.max_attempts,
                delay: Duration::from_millis(config.retry_delay_ms),
            },
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// `<search_url>?ItemKeyIndex=<provider id>`
    pub fn lookup_url(&self, provider_id: &ProviderId) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut().append_pair("ItemKeyIndex", provider_id.as_str());
        url
    }

    async fn fetch_once(&self, url: &Url) -> Result<Option<NaiveDate>, FetchError> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(extract_appointment_date(&body)?)
    }
}

#[async_trait]
impl AppointmentDatePort for HttpAppointmentFetcher {
    async fn fetch_next_date(&self, provider_id: &ProviderId) -> Result<Option<NaiveDate>, FetchError> {
        let url = &self.lookup_url(provider_id);
        with_retry(self.retry, move |attempt| {
            debug!("Fetching {} (attempt {})", url, attempt);
            self.fetch_once(url)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::application_settings::Settings;
    use crate::error::ExtractError;
    use mockito::{Matcher, Server};
    use std::sync::atomic::{AtomicU32, Ordering};

    const PAGE_WITH_DATE: &str = r#"<html><head><script>
        window.__INITIAL_STATE__ = {"doctor":{"nextAvailableAppointment":{"date":"05/03/24"}}};
    </script></head><body></body></html>"#;

    const PAGE_WITHOUT_DATE: &str = r#"<html><head><script>
        window.__INITIAL_STATE__ = {"doctor":{"name":"Dr. Who"}};
    </script></head><body></body></html>"#;

    fn fast_retry() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_millis(1),
        }
    }

    fn fetcher_for(server: &Server) -> HttpAppointmentFetcher {
        let mut config = Settings::default().scraper;
        config.search_url = format!("{}/search", server.url());
        HttpAppointmentFetcher::new(&config).unwrap().with_retry_policy(fast_retry())
    }

    #[test]
    fn test_lookup_url() {
        let mut config = Settings::default().scraper;
        config.search_url = "https://scheduling.example.com/search/doctor".to_string();
        let fetcher = HttpAppointmentFetcher::new(&config).unwrap();
        let url = fetcher.lookup_url(&ProviderId::new("71234").unwrap());
        assert_eq!(url.as_str(), "https://scheduling.example.com/search/doctor?ItemKeyIndex=71234");
    }

    #[test]
    fn test_invalid_search_url() {
        let mut config = Settings::default().scraper;
        config.search_url = "not a url".to_string();
        assert!(matches!(HttpAppointmentFetcher::new(&config), Err(FetchError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_fetch_next_date_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::UrlEncoded("ItemKeyIndex".into(), "71234".into()))
            .match_header("user-agent", Matcher::Regex("Mozilla".into()))
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(PAGE_WITH_DATE)
            .expect(1)
            .create_async()
            .await;

        let fetcher = fetcher_for(&server);
        let date = fetcher.fetch_next_date(&ProviderId::new("71234").unwrap()).await.unwrap();

        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 5));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_next_date_none_published() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(PAGE_WITHOUT_DATE)
            .expect(1)
            .create_async()
            .await;

        let fetcher = fetcher_for(&server);
        let date = fetcher.fetch_next_date(&ProviderId::new("1").unwrap()).await.unwrap();

        assert_eq!(date, None);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_gives_up_after_three_attempts() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(503)
            .expect(3)
            .create_async()
            .await;

        let fetcher = fetcher_for(&server);
        let result = fetcher.fetch_next_date(&ProviderId::new("1").unwrap()).await;

        match result {
            Err(FetchError::AttemptsExhausted { attempts, last }) => {
                assert_eq!(attempts, 3);
                assert!(matches!(*last, FetchError::HttpStatus(503)));
            }
            other => panic!("Expected exhausted attempts, got {:?}", other),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_state_is_retried() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html><body>maintenance</body></html>")
            .expect(3)
            .create_async()
            .await;

        let fetcher = fetcher_for(&server);
        let result = fetcher.fetch_next_date(&ProviderId::new("1").unwrap()).await;

        assert!(matches!(
            result,
            Err(FetchError::AttemptsExhausted { ref last, .. })
                if matches!(**last, FetchError::Extract(ExtractError::MissingState))
        ));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_recovers_after_one_failed_attempt() {
        let mut server = Server::new_async().await;
        let unavailable = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(503)
            .expect(1)
            .create_async()
            .await;
        let page = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(PAGE_WITH_DATE)
            .expect(1)
            .create_async()
            .await;

        let fetcher = fetcher_for(&server);
        let date = fetcher.fetch_next_date(&ProviderId::new("71234").unwrap()).await.unwrap();

        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 5));
        unavailable.assert_async().await;
        page.assert_async().await;
    }

    #[tokio::test]
    async fn test_with_retry_recovers_after_one_failure() {
        let calls = AtomicU32::new(0);
        let result = with_retry(fast_retry(), |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 1 {
                    Err(FetchError::HttpStatus(500))
                } else {
                    Ok(NaiveDate::from_ymd_opt(2024, 3, 5))
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(result, NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_with_retry_stops_on_first_success() {
        let calls = AtomicU32::new(0);
        let result: Result<u8, FetchError> = with_retry(fast_retry(), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(7) }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_with_retry_zero_attempts_still_tries_once() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy { max_attempts: 0, delay: Duration::from_millis(1) };
        let result: Result<(), FetchError> = with_retry(policy, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(FetchError::HttpStatus(500)) }
        })
        .await;

        assert!(matches!(result, Err(FetchError::AttemptsExhausted { attempts: 1, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
