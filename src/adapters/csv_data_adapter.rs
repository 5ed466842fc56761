//! CSV file data adapter.
//!
//! Serves daily bars from local `{TICKER}.csv` files
//! (`date,open,high,low,close,volume`), for offline runs and tests.

use crate::domain::error::SellwatchError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug)]
pub struct CsvDataAdapter {
    base_path: PathBuf,
}

impl CsvDataAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, SellwatchError> {
        let data_dir =
            config
                .get_string("provider", "data_dir")
                .ok_or_else(|| SellwatchError::ConfigMissing {
                    section: "provider".into(),
                    key: "data_dir".into(),
                })?;
        Ok(Self::new(PathBuf::from(data_dir)))
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }
}

fn parse_field<T: FromStr>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<T, String> {
    let raw = record
        .get(index)
        .ok_or_else(|| format!("missing {} column", name))?;
    raw.trim()
        .parse()
        .map_err(|_| format!("invalid {} value '{}'", name, raw))
}

impl DataPort for CsvDataAdapter {
    fn fetch_daily(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, SellwatchError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| SellwatchError::Provider {
            ticker: ticker.to_string(),
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let provider_err = |reason: String| SellwatchError::Provider {
            ticker: ticker.to_string(),
            reason,
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| provider_err(format!("CSV parse error: {}", e)))?;

            let date_str: String = parse_field(&record, 0, "date").map_err(&provider_err)?;
            let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
                .map_err(|_| provider_err(format!("invalid date value '{}'", date_str)))?;

            if date < start_date || date > end_date {
                continue;
            }

            bars.push(OhlcvBar {
                ticker: ticker.to_string(),
                date,
                open: parse_field(&record, 1, "open").map_err(&provider_err)?,
                high: parse_field(&record, 2, "high").map_err(&provider_err)?,
                low: parse_field(&record, 3, "low").map_err(&provider_err)?,
                close: parse_field(&record, 4, "close").map_err(&provider_err)?,
                volume: parse_field(&record, 5, "volume").map_err(&provider_err)?,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "date,open,high,low,close,volume\n\
            2025-06-18,100.0,110.0,90.0,105.0,50000\n\
            2025-06-16,95.0,101.0,94.0,100.0,40000\n\
            2025-06-17,100.0,106.0,99.0,104.0,45000\n";
        fs::write(path.join("AAPL.csv"), csv_content).unwrap();

        fs::write(
            path.join("MSFT.csv"),
            "date,open,high,low,close,volume\n2025-06-16,400.0,not_a_number,399.0,405.0,1000\n",
        )
        .unwrap();

        (dir, path)
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn fetch_daily_returns_sorted_bars() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvDataAdapter::new(path);

        let bars = adapter
            .fetch_daily("AAPL", date("2025-06-16"), date("2025-06-18"))
            .unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].date, date("2025-06-16"));
        assert_eq!(bars[2].date, date("2025-06-18"));
        assert!((bars[2].close - 105.0).abs() < f64::EPSILON);
        assert_eq!(bars[2].volume, 50000);
        assert_eq!(bars[0].ticker, "AAPL");
    }

    #[test]
    fn fetch_daily_filters_by_date_range() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvDataAdapter::new(path);

        let bars = adapter
            .fetch_daily("AAPL", date("2025-06-17"), date("2025-06-17"))
            .unwrap();

        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date, date("2025-06-17"));
    }

    #[test]
    fn fetch_daily_missing_file_is_a_provider_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvDataAdapter::new(path);

        let err = adapter
            .fetch_daily("XYZ", date("2025-06-16"), date("2025-06-18"))
            .unwrap_err();
        assert!(matches!(err, SellwatchError::Provider { ticker, .. } if ticker == "XYZ"));
    }

    #[test]
    fn fetch_daily_malformed_value_is_a_provider_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvDataAdapter::new(path);

        let err = adapter
            .fetch_daily("MSFT", date("2025-06-16"), date("2025-06-18"))
            .unwrap_err();
        assert!(
            matches!(err, SellwatchError::Provider { reason, .. } if reason.contains("high"))
        );
    }

    #[test]
    fn from_config_requires_data_dir() {
        use crate::adapters::file_config_adapter::FileConfigAdapter;

        let config = FileConfigAdapter::from_string("[provider]\nsource = csv\n").unwrap();
        let err = CsvDataAdapter::from_config(&config).unwrap_err();
        assert!(matches!(err, SellwatchError::ConfigMissing { key, .. } if key == "data_dir"));
    }
}
