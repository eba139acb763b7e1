use std::hash::{Hash, Hasher};

use super::position::Position;

/// Grid-resident cell. Coordinates and value are fixed at construction;
/// decay and occupancy change every tick.
#[derive(Debug, Clone, Copy)]
pub struct Cell {
    x: i32,
    y: i32,
    value: i32,
    decay: u32,
    occupied: bool,
}

impl Cell {
    pub fn new(x: i32, y: i32, value: i32) -> Self {
        Self {
            x,
            y,
            value,
            decay: 0,
            occupied: false,
        }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn decay(&self) -> u32 {
        self.decay
    }

    pub fn is_occupied(&self) -> bool {
        self.occupied
    }

    /// Ranking key: static value aged by decay.
    pub fn effective_value(&self) -> i64 {
        i64::from(self.value) + i64::from(self.decay)
    }

    /// Copy out the immutable part for use outside the grid.
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y, self.value)
    }

    pub(crate) fn set_occupied(&mut self, occupied: bool) {
        self.occupied = occupied;
        if occupied {
            self.decay = 0;
        }
    }

    pub(crate) fn set_decay(&mut self, decay: u32) {
        self.decay = decay;
    }

    pub(crate) fn age(&mut self, amount: u32) {
        self.decay = self.decay.saturating_add(amount);
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.hash(state);
        self.y.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cell_is_fresh() {
        let cell = Cell::new(1, 2, 7);
        assert_eq!(cell.decay(), 0);
        assert!(!cell.is_occupied());
        assert_eq!(cell.position(), Position::at(1, 2));
        assert_eq!(cell.position().value, 7);
    }

    #[test]
    fn decay_saturates_and_resets_on_occupation() {
        let mut cell = Cell::new(0, 0, 1);
        cell.set_decay(u32::MAX - 1);
        cell.age(5);
        assert_eq!(cell.decay(), u32::MAX);
        assert_eq!(cell.effective_value(), 1 + i64::from(u32::MAX));

        cell.set_occupied(true);
        assert_eq!(cell.decay(), 0);
        assert!(cell.is_occupied());
    }
}
