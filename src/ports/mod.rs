//! Port traits decoupling the domain from its collaborators.

pub mod alert_port;
pub mod config_port;
pub mod data_port;
pub mod holdings_port;
