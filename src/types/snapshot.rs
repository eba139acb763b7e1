use serde::{Deserialize, Serialize};

use super::drone::{Drone, DroneState};
use super::position::Position;

/// Floats per drone in the flat snapshot: x, y, state, pending steps.
pub const SNAPSHOT_FIELD_COUNT: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicDroneSnapshot {
    pub name: String,
    pub position: Position,
    pub target: Option<Position>,
    pub state: DroneState,
    pub pending_steps: usize,
    pub history_len: usize,
}

impl From<&Drone> for PublicDroneSnapshot {
    fn from(drone: &Drone) -> Self {
        Self {
            name: drone.name().to_string(),
            position: drone.current_position(),
            target: drone.target_position(),
            state: drone.state(),
            pending_steps: drone.target_path().len(),
            history_len: drone.history_path().len(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    pub tick: u64,
    pub drones: Vec<PublicDroneSnapshot>,
    pub visited: usize,
    pub total_cells: usize,
    pub restarts: u64,
}
