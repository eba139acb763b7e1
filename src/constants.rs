// Shared simulation constants

// Registration limits
pub const MAX_DRONES: usize = 10;

// Navigation
pub const PATH_DISTANCE_CAP: f64 = 6.0; // Longest straight-line leg planned per request

// Scheduling
pub const DEFAULT_TICK_PERIOD_MS: u64 = 500;
pub const SHUTDOWN_GRACE_MS: u64 = 2_000; // Time the tick thread gets to exit on stop

// Decay added to every unoccupied cell per tick
pub const DECAY_STEP: u32 = 1;

// Overlay color of a drone = registration index + offset
pub const DRONE_COLOR_OFFSET: usize = 3;
