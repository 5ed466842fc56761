//! Exit rule engine.
//!
//! Applies the ordered rule set to one position against its price history:
//! minimum holding period, then stop-loss, profit target, and trailing stop.
//! First match wins. Evaluation is a pure function of the position, the
//! history view, and the configured thresholds.

use crate::domain::ohlcv::OhlcvBar;
use crate::domain::position::Position;
use crate::domain::price_history::PriceHistory;
use chrono::NaiveDate;

/// Which rule triggered a sell alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    StopLoss,
    ProfitTarget,
    TrailingStop,
}

impl std::fmt::Display for ExitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ExitReason::StopLoss => "Stop loss",
            ExitReason::ProfitTarget => "Profit target",
            ExitReason::TrailingStop => "Trailing stop",
        };
        write!(f, "{label}")
    }
}

/// Advisory sell alert for one triggering position.
#[derive(Debug, Clone)]
pub struct ExitAlert {
    pub ticker: String,
    pub reason: ExitReason,
    pub purchase_date: NaiveDate,
    pub purchase_price: f64,
    pub latest_date: NaiveDate,
    pub latest_close: f64,
    pub exit_price: f64,
    pub return_percent: f64,
    pub days_held: i64,
}

/// Outcome of one evaluation. The hold arm carries the same diagnostics a
/// sell alert would, so verbose output does not need a second engine.
#[derive(Debug, Clone)]
pub enum Verdict {
    Sell(ExitAlert),
    Hold { days_held: i64, return_percent: f64 },
}

impl Verdict {
    pub fn into_alert(self) -> Option<ExitAlert> {
        match self {
            Verdict::Sell(alert) => Some(alert),
            Verdict::Hold { .. } => None,
        }
    }
}

/// The five exit-rule tunables. Fractions are of the purchase price (or of
/// the high-water mark for `trailing_drop`), not percent.
#[derive(Debug, Clone, PartialEq)]
pub struct ExitRules {
    /// Days below which no sell rule fires at all.
    pub min_hold_days: i64,
    /// Sell when close drops below `purchase * (1 - stop_loss)`.
    pub stop_loss: f64,
    /// Sell when close rises above `purchase * (1 + profit_target)`.
    pub profit_target: f64,
    /// Trailing protection arms only above `purchase * (1 + trailing_activation)`.
    pub trailing_activation: f64,
    /// Sell when close drops below `high_water * (1 - trailing_drop)`.
    pub trailing_drop: f64,
}

impl Default for ExitRules {
    fn default() -> Self {
        ExitRules {
            min_hold_days: 30,
            stop_loss: 0.10,
            profit_target: 0.60,
            trailing_activation: 0.20,
            trailing_drop: 0.10,
        }
    }
}

/// Round to 2 decimals, half away from zero (`f64::round` semantics).
/// Applied uniformly to every reported return percentage.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl ExitRules {
    /// Evaluate one position against its price history.
    ///
    /// Returns `None` when the history has no bars (the caller skips such
    /// positions; missing data is neither a sell nor a hold signal).
    /// Otherwise every input maps to a well-formed verdict; days held are
    /// measured to the latest bar's date, not to wall-clock today, so a
    /// lagging provider shifts rule timing rather than being papered over.
    pub fn evaluate(&self, position: &Position, history: &PriceHistory) -> Option<Verdict> {
        let latest = history.latest_bar()?;

        let days_held = position.days_held(latest.date);
        let exit_price = latest.mid_price();
        let return_percent = round2(
            (exit_price - position.purchase_price) / position.purchase_price * 100.0,
        );

        if days_held < self.min_hold_days {
            return Some(Verdict::Hold {
                days_held,
                return_percent,
            });
        }

        match self.triggered_reason(position, latest, history) {
            Some(reason) => Some(Verdict::Sell(ExitAlert {
                ticker: position.ticker.clone(),
                reason,
                purchase_date: position.purchase_date,
                purchase_price: position.purchase_price,
                latest_date: latest.date,
                latest_close: latest.close,
                exit_price,
                return_percent,
                days_held,
            })),
            None => Some(Verdict::Hold {
                days_held,
                return_percent,
            }),
        }
    }

    /// The ordered rule chain. Comparisons are strict: a close exactly at a
    /// threshold does not trigger.
    fn triggered_reason(
        &self,
        position: &Position,
        latest: &OhlcvBar,
        history: &PriceHistory,
    ) -> Option<ExitReason> {
        let purchase = position.purchase_price;

        if latest.close < purchase * (1.0 - self.stop_loss) {
            return Some(ExitReason::StopLoss);
        }
        if latest.close > purchase * (1.0 + self.profit_target) {
            return Some(ExitReason::ProfitTarget);
        }
        if latest.close > purchase * (1.0 + self.trailing_activation) {
            // An unavailable high-water mark means the trailing rule cannot
            // be evaluated; it must not fire, and no other rule fires in its
            // place.
            let high_since = history.max_close_since(position.purchase_date)?;
            if latest.close < high_since * (1.0 - self.trailing_drop) {
                return Some(ExitReason::TrailingStop);
            }
        }
        None
    }
}
