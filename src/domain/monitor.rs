//! Monitor run: one evaluation pass over the holdings list.
//!
//! Decouples "how many positions" from "how one position is judged": the
//! loop fetches and skips, the engine in [`exit_rules`](super::exit_rules)
//! decides. Alerts come back in holdings order.

use crate::domain::exit_rules::{ExitAlert, ExitRules, Verdict};
use crate::domain::position::Position;
use crate::domain::price_history::PriceHistory;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;

/// Why a position produced no verdict this run.
#[derive(Debug, Clone)]
pub enum SkipReason {
    FetchFailed { reason: String },
    NoData,
}

#[derive(Debug, Clone)]
pub struct SkippedPosition {
    pub ticker: String,
    pub reason: SkipReason,
}

/// Everything a run produced: alerts in holdings order, plus the skip list
/// for callers that want to log it. Skips are not errors.
#[derive(Debug)]
pub struct MonitorResult {
    pub alerts: Vec<ExitAlert>,
    pub skipped: Vec<SkippedPosition>,
    pub evaluated: usize,
}

/// Evaluate every position once. Bars are fetched per ticker over
/// `[purchase_date, as_of]`; a fetch failure or empty history skips the
/// position and the run continues. With `trace` set, per-position
/// commentary goes to stderr.
pub fn run_monitor(
    data_port: &dyn DataPort,
    positions: &[Position],
    rules: &ExitRules,
    as_of: NaiveDate,
    trace: bool,
) -> MonitorResult {
    let mut alerts = Vec::new();
    let mut skipped = Vec::new();
    let mut evaluated = 0;

    for position in positions {
        if trace {
            eprintln!(
                "Analyzing {}: purchased {} @ {:.2}, {} shares",
                position.ticker, position.purchase_date, position.purchase_price, position.shares
            );
        }

        let bars = match data_port.fetch_daily(&position.ticker, position.purchase_date, as_of) {
            Ok(bars) => bars,
            Err(e) => {
                eprintln!("warning: skipping {} ({})", position.ticker, e);
                skipped.push(SkippedPosition {
                    ticker: position.ticker.clone(),
                    reason: SkipReason::FetchFailed {
                        reason: e.to_string(),
                    },
                });
                continue;
            }
        };

        let history = PriceHistory::new(bars);
        let Some(verdict) = rules.evaluate(position, &history) else {
            eprintln!("warning: skipping {} (no price data)", position.ticker);
            skipped.push(SkippedPosition {
                ticker: position.ticker.clone(),
                reason: SkipReason::NoData,
            });
            continue;
        };

        evaluated += 1;
        match verdict {
            Verdict::Sell(alert) => {
                if trace {
                    eprintln!(
                        "  >>> SELL: {} ({:.2}%, {} days held)",
                        alert.reason, alert.return_percent, alert.days_held
                    );
                }
                alerts.push(alert);
            }
            Verdict::Hold {
                days_held,
                return_percent,
            } => {
                if trace {
                    eprintln!(
                        "  no sell trigger: {:.2}% return, {} days held",
                        return_percent, days_held
                    );
                }
            }
        }
    }

    MonitorResult {
        alerts,
        skipped,
        evaluated,
    }
}
