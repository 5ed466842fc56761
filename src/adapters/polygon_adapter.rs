//! Polygon.io data adapter.
//!
//! Fetches daily aggregates from the `/v2/aggs` endpoint with a blocking
//! HTTP client. Transient failures (connect, timeout, 429, 5xx) are retried
//! with exponential backoff; authentication problems are not.

use crate::domain::error::SellwatchError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.polygon.io";

/// Aggregates response. `results` is absent both on errors and on queries
/// with no bars in range.
#[derive(Debug, Deserialize)]
struct AggsResponse {
    results: Option<Vec<AggBar>>,
    status: Option<String>,
    error: Option<String>,
}

/// One daily aggregate: `t` is the window start in epoch milliseconds.
#[derive(Debug, Deserialize)]
struct AggBar {
    t: i64,
    o: f64,
    h: f64,
    l: f64,
    c: f64,
    v: f64,
}

#[derive(Debug)]
pub struct PolygonAdapter {
    client: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
    max_retries: u32,
    base_delay: Duration,
}

impl PolygonAdapter {
    pub fn new(api_key: String, base_url: String) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            api_key,
            base_url,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }

    /// Reads `[provider] api_key` with a `POLYGON_API_KEY` environment
    /// fallback; `[provider] base_url` may redirect to a mirror.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, SellwatchError> {
        let api_key = config
            .get_string("provider", "api_key")
            .or_else(|| std::env::var("POLYGON_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| SellwatchError::ConfigMissing {
                section: "provider".into(),
                key: "api_key".into(),
            })?;

        let base_url = config
            .get_string("provider", "base_url")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self::new(api_key, base_url))
    }

    fn aggs_url(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/v2/aggs/ticker/{}/range/1/day/{}/{}",
            self.base_url, ticker, start, end
        )
    }

    fn convert_bars(ticker: &str, results: Vec<AggBar>) -> Result<Vec<OhlcvBar>, SellwatchError> {
        let mut bars = Vec::with_capacity(results.len());

        for agg in results {
            let date = chrono::DateTime::from_timestamp_millis(agg.t)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| SellwatchError::Provider {
                    ticker: ticker.to_string(),
                    reason: format!("invalid timestamp: {}", agg.t),
                })?;

            bars.push(OhlcvBar {
                ticker: ticker.to_string(),
                date,
                open: agg.o,
                high: agg.h,
                low: agg.l,
                close: agg.c,
                // Polygon reports volume as a float for adjusted data.
                volume: agg.v.round() as i64,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn fetch_with_retry(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, SellwatchError> {
        let url = self.aggs_url(ticker, start, end);
        let provider_err = |reason: String| SellwatchError::Provider {
            ticker: ticker.to_string(),
            reason,
        };
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                std::thread::sleep(self.base_delay * 2u32.pow(attempt - 1));
            }

            let response = self
                .client
                .get(&url)
                .query(&[
                    ("adjusted", "true"),
                    ("sort", "asc"),
                    ("limit", "5000"),
                    ("apiKey", self.api_key.as_str()),
                ])
                .send();

            match response {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::UNAUTHORIZED
                        || status == reqwest::StatusCode::FORBIDDEN
                    {
                        return Err(provider_err(format!(
                            "authentication rejected (HTTP {})",
                            status.as_u16()
                        )));
                    }

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS
                        || status.is_server_error()
                    {
                        last_error = Some(provider_err(format!("HTTP {}", status.as_u16())));
                        continue;
                    }

                    if !status.is_success() {
                        return Err(provider_err(format!("HTTP {}", status.as_u16())));
                    }

                    let aggs: AggsResponse = resp
                        .json()
                        .map_err(|e| provider_err(format!("failed to parse response: {}", e)))?;

                    if aggs.status.as_deref() == Some("ERROR") {
                        return Err(provider_err(
                            aggs.error.unwrap_or_else(|| "unspecified API error".into()),
                        ));
                    }

                    return Self::convert_bars(ticker, aggs.results.unwrap_or_default());
                }
                Err(e) => {
                    if e.is_connect() || e.is_timeout() {
                        last_error = Some(provider_err(e.to_string()));
                        continue;
                    }
                    return Err(provider_err(e.to_string()));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| provider_err("max retries exceeded".into())))
    }
}

impl DataPort for PolygonAdapter {
    fn fetch_daily(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, SellwatchError> {
        self.fetch_with_retry(ticker, start_date, end_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn aggs_url_includes_ticker_and_range() {
        let adapter = PolygonAdapter::new("key".into(), DEFAULT_BASE_URL.into());
        assert_eq!(
            adapter.aggs_url("AAPL", date("2025-01-02"), date("2025-08-01")),
            "https://api.polygon.io/v2/aggs/ticker/AAPL/range/1/day/2025-01-02/2025-08-01"
        );
    }

    #[test]
    fn converts_epoch_millis_to_dates() {
        let body = r#"{
            "status": "OK",
            "results": [
                {"t": 1746057600000, "o": 100.0, "h": 110.0, "l": 90.0, "c": 105.0, "v": 50000.0},
                {"t": 1746144000000, "o": 105.0, "h": 112.0, "l": 104.0, "c": 111.0, "v": 60000.5}
            ]
        }"#;
        let resp: AggsResponse = serde_json::from_str(body).unwrap();
        let bars = PolygonAdapter::convert_bars("AAPL", resp.results.unwrap()).unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, date("2025-05-01"));
        assert_eq!(bars[1].date, date("2025-05-02"));
        assert!((bars[0].close - 105.0).abs() < f64::EPSILON);
        // Fractional volume rounds to the nearest share.
        assert_eq!(bars[1].volume, 60001);
        assert_eq!(bars[0].ticker, "AAPL");
    }

    #[test]
    fn convert_sorts_out_of_order_results() {
        let results = vec![
            AggBar {
                t: 1746144000000,
                o: 105.0,
                h: 112.0,
                l: 104.0,
                c: 111.0,
                v: 1.0,
            },
            AggBar {
                t: 1746057600000,
                o: 100.0,
                h: 110.0,
                l: 90.0,
                c: 105.0,
                v: 1.0,
            },
        ];
        let bars = PolygonAdapter::convert_bars("AAPL", results).unwrap();
        assert_eq!(bars[0].date, date("2025-05-01"));
        assert_eq!(bars[1].date, date("2025-05-02"));
    }

    #[test]
    fn absent_results_means_no_data() {
        let resp: AggsResponse =
            serde_json::from_str(r#"{"status": "OK", "resultsCount": 0}"#).unwrap();
        let bars = PolygonAdapter::convert_bars("AAPL", resp.results.unwrap_or_default()).unwrap();
        assert!(bars.is_empty());
    }

    #[test]
    fn api_error_body_is_detected() {
        let resp: AggsResponse =
            serde_json::from_str(r#"{"status": "ERROR", "error": "Unknown API Key"}"#).unwrap();
        assert_eq!(resp.status.as_deref(), Some("ERROR"));
        assert_eq!(resp.error.as_deref(), Some("Unknown API Key"));
        assert!(resp.results.is_none());
    }

    #[test]
    fn from_config_without_key_fails() {
        use crate::adapters::file_config_adapter::FileConfigAdapter;

        // The env fallback must not mask a genuinely missing key.
        if std::env::var("POLYGON_API_KEY").is_ok() {
            return;
        }
        let config = FileConfigAdapter::from_string("[provider]\nsource = polygon\n").unwrap();
        let err = PolygonAdapter::from_config(&config).unwrap_err();
        assert!(matches!(err, SellwatchError::ConfigMissing { key, .. } if key == "api_key"));
    }

    #[test]
    fn from_config_reads_key_and_base_url() {
        use crate::adapters::file_config_adapter::FileConfigAdapter;

        let config = FileConfigAdapter::from_string(
            "[provider]\napi_key = abc\nbase_url = http://localhost:8321\n",
        )
        .unwrap();
        let adapter = PolygonAdapter::from_config(&config).unwrap();
        assert_eq!(
            adapter.aggs_url("AAPL", date("2025-01-02"), date("2025-01-03")),
            "http://localhost:8321/v2/aggs/ticker/AAPL/range/1/day/2025-01-02/2025-01-03"
        );
    }
}
