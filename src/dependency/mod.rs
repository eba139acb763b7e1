mod color_grid;
mod performance;

pub use color_grid::{ColorGrid, OccupancyObserver, PALETTE};
pub use performance::{measure, performance_now};
