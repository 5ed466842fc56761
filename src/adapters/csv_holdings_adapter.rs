//! CSV holdings adapter.
//!
//! Reads the holdings table by header name: `Ticker`, `Purchase Date`,
//! `Purchase Price`, `Shares`. A file with missing required columns rejects
//! the whole load; an individual row that fails to parse or violates the
//! position invariants is skipped with a warning.

use crate::domain::error::SellwatchError;
use crate::domain::position::Position;
use crate::ports::holdings_port::HoldingsPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

const REQUIRED_COLUMNS: [&str; 4] = ["Ticker", "Purchase Date", "Purchase Price", "Shares"];

pub struct CsvHoldingsAdapter {
    path: PathBuf,
    as_of: NaiveDate,
}

impl CsvHoldingsAdapter {
    /// `as_of` bounds the purchase date: rows dated in the future relative
    /// to the evaluation date are invalid and skipped here, at the load
    /// boundary, so the rule engine never sees them.
    pub fn new(path: PathBuf, as_of: NaiveDate) -> Self {
        Self { path, as_of }
    }

    fn parse_row(
        &self,
        record: &csv::StringRecord,
        columns: &[usize; 4],
    ) -> Result<Position, String> {
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();
        let [ticker_col, date_col, price_col, shares_col] = *columns;

        let ticker = field(ticker_col).to_uppercase();
        if ticker.is_empty() {
            return Err("empty ticker".to_string());
        }

        let purchase_date = NaiveDate::parse_from_str(field(date_col), "%Y-%m-%d")
            .map_err(|_| format!("invalid purchase date '{}'", field(date_col)))?;
        if purchase_date > self.as_of {
            return Err(format!("purchase date {} is in the future", purchase_date));
        }

        let purchase_price: f64 = field(price_col)
            .parse()
            .map_err(|_| format!("invalid purchase price '{}'", field(price_col)))?;
        if purchase_price <= 0.0 {
            return Err("purchase price must be positive".to_string());
        }

        let shares: i64 = field(shares_col)
            .parse()
            .map_err(|_| format!("invalid share count '{}'", field(shares_col)))?;
        if shares <= 0 {
            return Err("share count must be positive".to_string());
        }

        Ok(Position {
            ticker,
            purchase_date,
            purchase_price,
            shares,
        })
    }
}

impl HoldingsPort for CsvHoldingsAdapter {
    fn load(&self) -> Result<Vec<Position>, SellwatchError> {
        let content = fs::read_to_string(&self.path).map_err(|e| SellwatchError::Holdings {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| SellwatchError::Holdings {
                reason: format!("CSV header error: {}", e),
            })?
            .clone();

        let mut columns = [0usize; 4];
        for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| SellwatchError::Holdings {
                    reason: format!("missing required column '{}'", name),
                })?;
        }

        let mut positions = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            // Header is line 1.
            let line = i + 2;
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("warning: skipping holdings line {} ({})", line, e);
                    continue;
                }
            };
            match self.parse_row(&record, &columns) {
                Ok(position) => positions.push(position),
                Err(reason) => {
                    eprintln!("warning: skipping holdings line {} ({})", line, reason);
                }
            }
        }

        Ok(positions)
    }
}
