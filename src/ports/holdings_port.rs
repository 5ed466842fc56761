//! Holdings store port trait.

use crate::domain::error::SellwatchError;
use crate::domain::position::Position;

/// The current list of open positions. A load error means the whole run
/// proceeds with no positions; per-row problems are the adapter's concern.
pub trait HoldingsPort {
    fn load(&self) -> Result<Vec<Position>, SellwatchError>;
}
