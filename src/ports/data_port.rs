//! Price-history access port trait.

use crate::domain::error::SellwatchError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

/// A daily-bar provider. Implementations return bars in ascending date
/// order, at most one per calendar day; an empty vector means the provider
/// has no data for the ticker in the requested range.
pub trait DataPort: std::fmt::Debug {
    fn fetch_daily(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, SellwatchError>;
}
