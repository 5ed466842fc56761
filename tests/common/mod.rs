#![allow(dead_code)]

use chrono::NaiveDate;
use sellwatch::domain::error::SellwatchError;
pub use sellwatch::domain::ohlcv::OhlcvBar;
use sellwatch::domain::position::Position;
use sellwatch::ports::data_port::DataPort;
use std::collections::HashMap;

#[derive(Debug)]
pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_daily(
        &self,
        ticker: &str,
        _start_date: NaiveDate,
        _end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, SellwatchError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(SellwatchError::Provider {
                ticker: ticker.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(ticker).cloned().unwrap_or_default())
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn make_bar(ticker: &str, day: &str, close: f64) -> OhlcvBar {
    OhlcvBar {
        ticker: ticker.to_string(),
        date: date(day),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000,
    }
}

pub fn make_position(ticker: &str, purchase_day: &str, purchase_price: f64) -> Position {
    Position {
        ticker: ticker.to_string(),
        purchase_date: date(purchase_day),
        purchase_price,
        shares: 10,
    }
}
