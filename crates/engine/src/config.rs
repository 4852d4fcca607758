//! Engine configuration.

use std::time::Duration;

use gridfall_types::{FALL_INTERVAL_TICKS, TICK_PERIOD_MS};

use crate::error::{EngineError, Result};

/// Tunable engine parameters. Board dimensions are fixed constants in
/// `gridfall-types`; everything time-related lives here.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Clock period; every scheduling decision happens on this quantum.
    pub tick_period: Duration,
    /// Ticks between automatic one-row descents of the falling piece.
    pub fall_interval_ticks: u32,
    /// Seed for the default piece/color source.
    pub seed: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_millis(TICK_PERIOD_MS),
            fall_interval_ticks: FALL_INTERVAL_TICKS,
            seed: 1,
        }
    }
}

impl EngineConfig {
    /// Reject degenerate configurations before any task is spawned.
    pub fn validate(&self) -> Result<()> {
        if self.tick_period.is_zero() {
            return Err(EngineError::InvalidConfig(
                "tick_period must be non-zero".to_string(),
            ));
        }
        if self.fall_interval_ticks == 0 {
            return Err(EngineError::InvalidConfig(
                "fall_interval_ticks must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
