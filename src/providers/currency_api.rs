use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

use crate::core::rates::{FetchError, RateSource, RawRatesPayload, Result};

pub const DEFAULT_BASE_URL: &str =
    "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api@latest/v1/currencies";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// Accepts both `{"date", "base", "rates": {..}}` and the live shape where the
// table sits under the base code itself: `{"date", "usd": {..}}`.
#[derive(Debug, Deserialize)]
struct RatesResponse {
    date: String,
    base: Option<String>,
    rates: Option<BTreeMap<String, f64>>,
    #[serde(flatten)]
    nested: HashMap<String, serde_json::Value>,
}

fn parse_rates_response(body: &str, base_code: &str) -> Result<RawRatesPayload> {
    let mut response: RatesResponse = serde_json::from_str(body).map_err(|e| {
        FetchError::Decode(format!("Failed to parse JSON response for {base_code}: {e}"))
    })?;

    if let Some(rates) = response.rates {
        let base = response
            .base
            .map_or_else(|| base_code.to_string(), |b| b.to_lowercase());
        return Ok(RawRatesPayload {
            date: response.date,
            base,
            rates,
        });
    }

    let table = response
        .nested
        .remove(base_code)
        .ok_or_else(|| FetchError::Decode(format!("No rate table found for {base_code}")))?;
    let rates: BTreeMap<String, f64> = serde_json::from_value(table).map_err(|e| {
        FetchError::Decode(format!("Invalid rate table for {base_code}: {e}"))
    })?;

    Ok(RawRatesPayload {
        date: response.date,
        base: base_code.to_string(),
        rates,
    })
}

/// Client for the free currency API published on jsDelivr.
pub struct CurrencyApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl CurrencyApiClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("curconv/0.1")
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(CurrencyApiClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn fetch(&self, url: String, base_code: &str) -> Result<RawRatesPayload> {
        debug!("Requesting exchange rates from {}", url);
        let started = Instant::now();

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        debug!(
            %status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Received rates response"
        );

        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                url,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        parse_rates_response(&text, base_code)
    }
}

#[async_trait]
impl RateSource for CurrencyApiClient {
    #[instrument(name = "LatestRatesFetch", skip(self), fields(base = %base_code))]
    async fn fetch_latest(&self, base_code: &str) -> Result<RawRatesPayload> {
        let base_code = base_code.to_lowercase();
        let url = format!("{}/{}.json", self.base_url, base_code);
        self.fetch(url, &base_code).await
    }

    #[instrument(name = "HistoricalRatesFetch", skip(self), fields(base = %base_code, date = %date))]
    async fn fetch_historical(&self, date: &str, base_code: &str) -> Result<RawRatesPayload> {
        let base_code = base_code.to_lowercase();
        let url = format!("{}/{}/{}.json", self.base_url, date, base_code);
        self.fetch(url, &base_code).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(request_path: &str, status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(request_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .expect(1)
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_fetch_latest_nested_table() {
        let mock_response = r#"{
            "date": "2024-01-01",
            "usd": {
                "eur": 0.9,
                "gbp": 0.8,
                "jpy": 141
            }
        }"#;
        let mock_server = create_mock_server("/usd.json", 200, mock_response).await;

        let client = CurrencyApiClient::new(&mock_server.uri()).unwrap();
        let payload = client.fetch_latest("USD").await.unwrap();

        assert_eq!(payload.date, "2024-01-01");
        assert_eq!(payload.base, "usd");
        assert_eq!(payload.rates.len(), 3);
        assert_eq!(payload.rates["eur"], 0.9);
        assert_eq!(payload.rates["jpy"], 141.0);
    }

    #[tokio::test]
    async fn test_fetch_latest_flat_table() {
        let mock_response = r#"{
            "date": "2024-01-01",
            "base": "usd",
            "rates": {"eur": 0.9, "gbp": 0.8}
        }"#;
        let mock_server = create_mock_server("/usd.json", 200, mock_response).await;

        let client = CurrencyApiClient::new(&format!("{}/", mock_server.uri())).unwrap();
        let payload = client.fetch_latest("usd").await.unwrap();

        assert_eq!(payload.base, "usd");
        assert_eq!(
            payload.rates.keys().collect::<Vec<_>>(),
            vec!["eur", "gbp"]
        );
    }

    #[tokio::test]
    async fn test_fetch_historical() {
        let mock_response = r#"{"date": "2023-03-15", "eur": {"usd": 1.06}}"#;
        let mock_server = create_mock_server("/2023-03-15/eur.json", 200, mock_response).await;

        let client = CurrencyApiClient::new(&mock_server.uri()).unwrap();
        let payload = client.fetch_historical("2023-03-15", "EUR").await.unwrap();

        assert_eq!(payload.date, "2023-03-15");
        assert_eq!(payload.base, "eur");
        assert_eq!(payload.rates["usd"], 1.06);
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let mock_server = create_mock_server("/usd.json", 404, "Not Found").await;

        let client = CurrencyApiClient::new(&mock_server.uri()).unwrap();
        let result = client.fetch_latest("usd").await;

        let err = result.unwrap_err();
        assert!(matches!(err, FetchError::Http { status: 404, .. }));
        assert_eq!(
            err.to_string(),
            format!("HTTP error: 404 for {}/usd.json", mock_server.uri())
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_server = create_mock_server("/usd.json", 200, "<html>oops</html>").await;

        let client = CurrencyApiClient::new(&mock_server.uri()).unwrap();
        let err = client.fetch_latest("usd").await.unwrap_err();

        assert!(matches!(err, FetchError::Decode(_)));
        assert!(
            err.to_string()
                .contains("Failed to parse JSON response for usd")
        );
    }

    #[tokio::test]
    async fn test_missing_rate_table() {
        let mock_response = r#"{"date": "2024-01-01", "eur": {"usd": 1.1}}"#;
        let mock_server = create_mock_server("/usd.json", 200, mock_response).await;

        let client = CurrencyApiClient::new(&mock_server.uri()).unwrap();
        let err = client.fetch_latest("usd").await.unwrap_err();

        assert!(matches!(err, FetchError::Decode(_)));
        assert_eq!(
            err.to_string(),
            "Failed to decode rates response: No rate table found for usd"
        );
    }

    #[tokio::test]
    async fn test_non_numeric_rate_is_a_decode_error() {
        let mock_response = r#"{"date": "2024-01-01", "usd": {"eur": "cheap"}}"#;
        let mock_server = create_mock_server("/usd.json", 200, mock_response).await;

        let client = CurrencyApiClient::new(&mock_server.uri()).unwrap();
        let err = client.fetch_latest("usd").await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_request_timeout() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/usd.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"date": "2024-01-01", "usd": {}}"#)
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let client =
            CurrencyApiClient::with_timeout(&mock_server.uri(), Duration::from_millis(200))
                .unwrap();
        let err = client.fetch_latest("usd").await.unwrap_err();

        assert!(matches!(err, FetchError::Transport { .. }));
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let client = CurrencyApiClient::new("http://127.0.0.1:1").unwrap();
        let err = client.fetch_latest("usd").await.unwrap_err();

        assert!(matches!(err, FetchError::Transport { .. }));
        assert!(!err.is_timeout());
    }
}
