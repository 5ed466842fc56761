//! Open position representation.

use chrono::NaiveDate;

/// One open holding: what was bought, when, and at what price.
///
/// Field validation (positive price, positive share count, no future purchase
/// date) happens at the holdings-load boundary; the rule engine assumes these
/// invariants hold.
#[derive(Debug, Clone)]
pub struct Position {
    pub ticker: String,
    pub purchase_date: NaiveDate,
    pub purchase_price: f64,
    pub shares: i64,
}

impl Position {
    /// Calendar days between purchase and `as_of`. Negative if `as_of`
    /// precedes the purchase date.
    pub fn days_held(&self, as_of: NaiveDate) -> i64 {
        (as_of - self.purchase_date).num_days()
    }
}
