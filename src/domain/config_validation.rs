//! Configuration validation.
//!
//! Validates all config fields before a monitor run.

use crate::domain::error::SellwatchError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_monitor_config(config: &dyn ConfigPort) -> Result<(), SellwatchError> {
    validate_provider_source(config)?;
    validate_holdings_file(config)?;
    validate_rule_thresholds(config)?;
    validate_as_of(config)?;
    Ok(())
}

fn validate_provider_source(config: &dyn ConfigPort) -> Result<(), SellwatchError> {
    let source = config
        .get_string("provider", "source")
        .unwrap_or_else(|| "polygon".to_string());

    match source.as_str() {
        "polygon" => Ok(()),
        "csv" => match config.get_string("provider", "data_dir") {
            Some(dir) if !dir.trim().is_empty() => Ok(()),
            _ => Err(SellwatchError::ConfigMissing {
                section: "provider".to_string(),
                key: "data_dir".to_string(),
            }),
        },
        other => Err(SellwatchError::ConfigInvalid {
            section: "provider".to_string(),
            key: "source".to_string(),
            reason: format!("unknown source '{}' (expected polygon or csv)", other),
        }),
    }
}

fn validate_holdings_file(config: &dyn ConfigPort) -> Result<(), SellwatchError> {
    match config.get_string("holdings", "file") {
        Some(f) if !f.trim().is_empty() => Ok(()),
        _ => Err(SellwatchError::ConfigMissing {
            section: "holdings".to_string(),
            key: "file".to_string(),
        }),
    }
}

fn validate_rule_thresholds(config: &dyn ConfigPort) -> Result<(), SellwatchError> {
    let min_hold_days = config.get_int("rules", "min_hold_days", 30);
    if min_hold_days < 0 {
        return Err(SellwatchError::ConfigInvalid {
            section: "rules".to_string(),
            key: "min_hold_days".to_string(),
            reason: "min_hold_days must be non-negative".to_string(),
        });
    }

    for (key, default) in [
        ("stop_loss_pct", 10.0),
        ("profit_target_pct", 60.0),
        ("trailing_activation_pct", 20.0),
        ("trailing_drop_pct", 10.0),
    ] {
        let value = config.get_double("rules", key, default);
        if value <= 0.0 || value >= 100.0 {
            return Err(SellwatchError::ConfigInvalid {
                section: "rules".to_string(),
                key: key.to_string(),
                reason: format!("{} must be between 0 and 100 (exclusive)", key),
            });
        }
    }

    Ok(())
}

fn validate_as_of(config: &dyn ConfigPort) -> Result<(), SellwatchError> {
    match config.get_string("monitor", "as_of") {
        None => Ok(()),
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(|_| ())
            .map_err(|_| SellwatchError::ConfigInvalid {
                section: "monitor".to_string(),
                key: "as_of".to_string(),
                reason: "invalid as_of format, expected YYYY-MM-DD".to_string(),
            }),
    }
}
