use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{
    DECAY_STEP, DEFAULT_TICK_PERIOD_MS, MAX_DRONES, PATH_DISTANCE_CAP, SHUTDOWN_GRACE_MS,
};
use crate::error::FlightError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    /// Maximum number of drones that may be registered at once.
    pub max_drones: usize,
    /// Interval between two scheduled ticks, in milliseconds.
    pub tick_period_ms: u64,
    /// Longest straight-line distance planned by a single path request.
    pub path_distance_cap: f64,
    /// Decay added to each unoccupied cell after every tick.
    pub decay_step: u32,
    /// How long `stop` waits for the tick thread before detaching it.
    pub shutdown_grace_ms: u64,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            max_drones: MAX_DRONES,
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
            path_distance_cap: PATH_DISTANCE_CAP,
            decay_step: DECAY_STEP,
            shutdown_grace_ms: SHUTDOWN_GRACE_MS,
        }
    }
}

impl FlightConfig {
    pub fn validate(&self) -> Result<(), FlightError> {
        if self.max_drones == 0 {
            return Err(FlightError::InvalidConfig("max_drones must be positive"));
        }
        if self.tick_period_ms == 0 {
            return Err(FlightError::InvalidTickPeriod);
        }
        if !self.path_distance_cap.is_finite() || self.path_distance_cap <= 0.0 {
            return Err(FlightError::InvalidConfig(
                "path_distance_cap must be a positive finite distance",
            ));
        }
        Ok(())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}
