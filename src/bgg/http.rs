//! HTTP access to the BoardGameGeek XML API 2

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, warn};

use super::xml_parser::{parse_game, parse_game_list};
use super::GameSource;
use crate::bgg_errors::BggError;
use crate::config::BggConfig;
use crate::game::{Game, GameList};

const ID_SEARCH: &str = "thing";
const NAME_SEARCH: &str = "search";

/// Client for the BoardGameGeek XML API
#[derive(Debug, Clone)]
pub struct BggClient {
    http: reqwest::Client,
    config: BggConfig,
}

impl BggClient {
    pub fn new(config: BggConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    /// Send a single request and return the response body
    async fn send_request(
        &self,
        request_type: &str,
        params: &[(&str, &str)],
    ) -> Result<String, BggError> {
        let path = format!("{}{}", self.config.api_path, request_type);
        let response = self
            .http
            .get(&path)
            .query(params)
            .send()
            .await
            .map_err(classify_request_error)?;

        debug!(url = %response.url(), status = %response.status(), "BoardGameGeek response received");

        let response = response.error_for_status().map_err(classify_request_error)?;
        response.text().await.map_err(classify_request_error)
    }

    /// Run a query, retrying recoverable failures, and parse its response
    async fn search<T>(
        &self,
        request_type: &str,
        params: &[(&str, &str)],
        parse: fn(&str) -> Result<T, BggError>,
    ) -> Result<T, BggError> {
        with_retry(self.config.attempts_limit, move || async move {
            let body = self.send_request(request_type, params).await?;
            parse(&body)
        })
        .await
    }
}

#[async_trait]
impl GameSource for BggClient {
    async fn fetch_by_id(&self, id: &str) -> Result<Game, BggError> {
        self.search(ID_SEARCH, &[("id", id), ("stats", "1")], parse_game)
            .await
    }

    async fn fetch_by_name(&self, name: &str) -> Result<GameList, BggError> {
        let mut list = self
            .search(NAME_SEARCH, &[("query", name)], parse_game_list)
            .await?;
        list.original_search = name.to_string();
        Ok(list)
    }

    async fn fetch_by_name_exact(&self, name: &str) -> Result<GameList, BggError> {
        let mut list = self
            .search(NAME_SEARCH, &[("query", name), ("exact", "1")], parse_game_list)
            .await?;
        list.original_search = name.to_string();
        Ok(list)
    }
}

/// Map a transport failure to `Unreachable`, deciding whether it is worth a retry
fn classify_request_error(err: reqwest::Error) -> BggError {
    if err.is_timeout() {
        warn!(error = %err, "BoardGameGeek request timeout");
        BggError::Unreachable { fatal: false }
    } else if err.is_status() || err.is_body() || err.is_decode() {
        warn!(error = %err, "BoardGameGeek answered with an error");
        BggError::Unreachable { fatal: false }
    } else {
        error!(error = %err, "Network error. Check connection.");
        BggError::Unreachable { fatal: true }
    }
}

/// Run `operation` until it succeeds, fails with a non-recoverable error, or
/// `attempts_limit` attempts have been made.
///
/// Retries are immediate. When the attempts run out the failure is reported
/// as fatal, so callers never retry on their own.
pub async fn with_retry<T, F, Fut>(attempts_limit: u32, mut operation: F) -> Result<T, BggError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, BggError>>,
{
    let mut attempts = 1;
    loop {
        match operation().await {
            Err(err) if err.is_recoverable() => {
                if attempts >= attempts_limit {
                    error!(attempts, "BoardGameGeek still unreachable, giving up");
                    return Err(BggError::Unreachable { fatal: true });
                }
                attempts += 1;
                debug!(attempts, "Retrying BoardGameGeek request");
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_retry_stops_after_limit() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), BggError> = with_retry(3, move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(BggError::Unreachable { fatal: false })
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(result, Err(BggError::Unreachable { fatal: true }));
    }

    #[tokio::test]
    async fn test_retry_aborts_on_fatal_error() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), BggError> = with_retry(3, move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(BggError::Unreachable { fatal: true })
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result, Err(BggError::Unreachable { fatal: true }));
    }

    #[tokio::test]
    async fn test_retry_recovers_after_transient_failure() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = with_retry(3, move || async move {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(BggError::Unreachable { fatal: false })
            } else {
                Ok("30549")
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(result, Ok("30549"));
    }

    #[tokio::test]
    async fn test_parse_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), BggError> = with_retry(3, move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(BggError::NoResult)
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result, Err(BggError::NoResult));
    }

    #[tokio::test]
    async fn test_connection_refused_is_fatal() {
        // Nothing listens on port 9 of the loopback interface
        let client = BggClient::new(BggConfig {
            api_path: "http://127.0.0.1:9/xmlapi2/".to_string(),
            request_timeout_secs: 5,
            attempts_limit: 3,
        })
        .unwrap();

        let result = client.fetch_by_id("30549").await;
        assert_eq!(result, Err(BggError::Unreachable { fatal: true }));
    }
}
