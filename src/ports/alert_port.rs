//! Alert output port trait.

use crate::domain::error::SellwatchError;
use crate::domain::exit_rules::ExitAlert;

/// Port for presenting a run's sell alerts. The destination (console, file)
/// is fixed at adapter construction.
pub trait AlertPort {
    fn write(&self, alerts: &[ExitAlert]) -> Result<(), SellwatchError>;
}
