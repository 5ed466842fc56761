//! CSV alert adapter.

use crate::domain::error::SellwatchError;
use crate::domain::exit_rules::ExitAlert;
use crate::ports::alert_port::AlertPort;
use std::path::PathBuf;

pub struct CsvAlertAdapter {
    path: PathBuf,
}

impl CsvAlertAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl AlertPort for CsvAlertAdapter {
    fn write(&self, alerts: &[ExitAlert]) -> Result<(), SellwatchError> {
        let mut writer = csv::Writer::from_path(&self.path)
            .map_err(|e| SellwatchError::Io(std::io::Error::other(e)))?;

        writer
            .write_record([
                "Ticker",
                "Reason",
                "Purchase Date",
                "Purchase Price",
                "Latest Date",
                "Latest Close",
                "Exit Price",
                "Return %",
                "Days Held",
            ])
            .map_err(|e| SellwatchError::Io(std::io::Error::other(e)))?;

        for alert in alerts {
            writer
                .write_record([
                    alert.ticker.clone(),
                    alert.reason.to_string(),
                    alert.purchase_date.to_string(),
                    format!("{:.2}", alert.purchase_price),
                    alert.latest_date.to_string(),
                    format!("{:.2}", alert.latest_close),
                    format!("{:.2}", alert.exit_price),
                    format!("{:.2}", alert.return_percent),
                    alert.days_held.to_string(),
                ])
                .map_err(|e| SellwatchError::Io(std::io::Error::other(e)))?;
        }

        writer
            .flush()
            .map_err(|e| SellwatchError::Io(std::io::Error::other(e)))?;
        Ok(())
    }
}
