//! Per-ticker price history view.
//!
//! Wraps the daily bar sequence for one ticker and answers the two queries
//! the exit rules need: the most recent bar, and the highest close since a
//! given date. Pure and read-only; "no data" is `None`, never zero.

use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct PriceHistory {
    bars: Vec<OhlcvBar>,
}

impl PriceHistory {
    /// Build a view from a bar sequence. Bars are sorted ascending by date;
    /// duplicate dates collapse to the first occurrence.
    pub fn new(mut bars: Vec<OhlcvBar>) -> Self {
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        Self { bars }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bar_count(&self) -> usize {
        self.bars.len()
    }

    /// The chronologically last bar, or `None` when no data is available.
    /// No interpolation: a bar several days stale is returned as-is.
    pub fn latest_bar(&self) -> Option<&OhlcvBar> {
        self.bars.last()
    }

    /// Maximum close among bars dated on or after `date`, or `None` when the
    /// window is empty. Callers must treat `None` as "cannot be evaluated",
    /// not as a numeric zero.
    pub fn max_close_since(&self, date: NaiveDate) -> Option<f64> {
        let mut max: Option<f64> = None;
        for bar in self.bars.iter().filter(|b| b.date >= date) {
            max = Some(match max {
                Some(m) => m.max(bar.close),
                None => bar.close,
            });
        }
        max
    }

    /// First and last bar dates, or `None` when empty.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.bars.first(), self.bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }
}
