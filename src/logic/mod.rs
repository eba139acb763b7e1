mod navigator;
mod sim_logic;
mod valuation;

pub use navigator::{next_step, Navigator};
pub use sim_logic::FlightLogic;
pub use valuation::{closest_target, most_valuable_targets};

/// What a single drone did during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// No target left to claim; the drone holds position.
    Idle,
    /// A fresh path was queued; movement starts next tick.
    Planned,
    Moved,
    /// The next step was blocked and the drone side-stepped into a free neighbor.
    Detoured,
    /// Blocked with no free neighbor.
    Waited,
    /// No path to the claimed target; the claim was dropped.
    TargetAbandoned,
}

/// Result of one engine step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    /// Coverage was complete and the round started over.
    pub restarted: bool,
    /// One outcome per processed drone, in registration order.
    pub outcomes: Vec<MoveOutcome>,
}
