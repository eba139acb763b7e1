use thiserror::Error;

/// Errors surfaced by the flight simulation.
///
/// None of these are fatal to a running simulation: callers may retry with
/// different input. Only scheduler misconfiguration is rejected eagerly.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FlightError {
    #[error("capacity exceeded: at most {max} drones can be registered")]
    CapacityExceeded { max: usize },
    #[error("position ({x}, {y}) is invalid")]
    InvalidPosition { x: i32, y: i32 },
    #[error("a drone named {0:?} is already registered")]
    DuplicateName(String),
    #[error("drone name must not be blank")]
    BlankName,
    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("tick period must be greater than zero")]
    InvalidTickPeriod,
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("failed to spawn tick thread: {0}")]
    SchedulerSpawn(String),
}
