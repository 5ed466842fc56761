//! Concrete adapter implementations for ports.

pub mod console_alert_adapter;
pub mod csv_alert_adapter;
pub mod csv_data_adapter;
pub mod csv_holdings_adapter;
pub mod file_config_adapter;
pub mod polygon_adapter;
