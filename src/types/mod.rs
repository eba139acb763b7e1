pub mod cell;
pub mod drone;
pub mod metrics;
pub mod position;
pub mod snapshot;

pub use cell::Cell;
pub use drone::{Drone, DroneState};
pub use metrics::TickMetrics;
pub use position::Position;
pub use snapshot::{PublicDroneSnapshot, SimulationSnapshot, SNAPSHOT_FIELD_COUNT};
