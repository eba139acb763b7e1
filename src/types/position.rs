use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Value snapshot of a grid location held by drones and paths.
///
/// Identity is the coordinate pair only; the static value rides along so a
/// drone can report what it collected without consulting the grid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub value: i32,
}

impl Position {
    pub fn new(x: i32, y: i32, value: i32) -> Self {
        Self { x, y, value }
    }

    /// Coordinate-only position, used for lookups where the value is unknown.
    pub fn at(x: i32, y: i32) -> Self {
        Self::new(x, y, 0)
    }

    pub fn coords(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Euclidean distance between two positions.
    pub fn distance(&self, other: &Position) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        dx.hypot(dy)
    }

    /// Number of king moves between two positions.
    pub fn chebyshev(&self, other: &Position) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.hash(state);
        self.y.hash(state);
    }
}
