//! Daily OHLCV bar representation.

use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct OhlcvBar {
    pub ticker: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl OhlcvBar {
    /// (high + low) / 2 — the assumed fill price for a same-day exit order.
    pub fn mid_price(&self) -> f64 {
        (self.high + self.low) / 2.0
    }
}
