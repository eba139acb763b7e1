//! Tick-driven coverage simulation: drones claim the most valuable unvisited
//! cells of a weighted grid, path toward them one king move per tick, side-step
//! around each other, and start a new round once every cell has been visited.

pub mod config;
pub mod constants;
pub mod data;
pub mod dependency;
pub mod error;
pub mod logic;
pub mod service;
pub mod types;

pub use config::FlightConfig;
pub use data::{FlightData, Grid};
pub use dependency::{ColorGrid, OccupancyObserver, PALETTE};
pub use error::FlightError;
pub use logic::{FlightLogic, MoveOutcome, Navigator, TickReport};
pub use service::{FlightCenter, FlightHandler};
#[cfg(not(target_arch = "wasm32"))]
pub use service::TickScheduler;
pub use types::{Cell, Drone, DroneState, Position, PublicDroneSnapshot, SimulationSnapshot};
