//! Console alert adapter.
//!
//! Renders the run's sell alerts as a plain-text report on stdout.

use crate::domain::error::SellwatchError;
use crate::domain::exit_rules::ExitAlert;
use crate::ports::alert_port::AlertPort;

pub struct ConsoleAlertAdapter;

/// Build the report text. Separated from the write path so it can be
/// asserted on directly.
pub fn render(alerts: &[ExitAlert]) -> String {
    if alerts.is_empty() {
        return "No sell alerts triggered today.\n".to_string();
    }

    let mut out = String::from("!!! SELL ALERTS !!!\n");
    for alert in alerts {
        out.push_str(&format!("\nTicker: {}\n", alert.ticker));
        out.push_str(&format!("  Reason: {}\n", alert.reason));
        out.push_str(&format!(
            "  Purchase: {} @ ${:.2}\n",
            alert.purchase_date, alert.purchase_price
        ));
        out.push_str(&format!(
            "  Current: {} @ ${:.2}\n",
            alert.latest_date, alert.latest_close
        ));
        out.push_str(&format!(
            "  Recommended Exit Price: ${:.2}\n",
            alert.exit_price
        ));
        out.push_str(&format!(
            "  Return: {:.2}% (Days Held: {})\n",
            alert.return_percent, alert.days_held
        ));
    }
    out
}

impl AlertPort for ConsoleAlertAdapter {
    fn write(&self, alerts: &[ExitAlert]) -> Result<(), SellwatchError> {
        print!("{}", render(alerts));
        Ok(())
    }
}
