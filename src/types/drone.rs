use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::position::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u32", from = "u32")]
pub enum DroneState {
    Idle = 0,
    Seeking = 1,
    Moving = 2,
}

impl From<DroneState> for u32 {
    fn from(state: DroneState) -> u32 {
        state as u32
    }
}

impl From<u32> for DroneState {
    fn from(value: u32) -> DroneState {
        match value {
            1 => DroneState::Seeking,
            2 => DroneState::Moving,
            _ => DroneState::Idle,
        }
    }
}

/// A drone only ever holds position snapshots, never grid cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drone {
    name: String,
    current_position: Position,
    target_position: Option<Position>,
    target_path: VecDeque<Position>,
    history_path: Vec<Position>,
}

impl Drone {
    pub fn new(name: impl Into<String>, initial_position: Position) -> Self {
        Self {
            name: name.into(),
            current_position: initial_position,
            target_position: None,
            target_path: VecDeque::new(),
            history_path: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn current_position(&self) -> Position {
        self.current_position
    }

    pub fn target_position(&self) -> Option<Position> {
        self.target_position
    }

    pub fn target_path(&self) -> &VecDeque<Position> {
        &self.target_path
    }

    pub fn history_path(&self) -> &[Position] {
        &self.history_path
    }

    pub fn state(&self) -> DroneState {
        match (self.target_position, self.target_path.is_empty()) {
            (None, _) => DroneState::Idle,
            (Some(_), true) => DroneState::Seeking,
            (Some(_), false) => DroneState::Moving,
        }
    }

    /// True when there is nothing left to reach.
    pub fn is_target_reached(&self) -> bool {
        match self.target_position {
            None => true,
            Some(target) => target == self.current_position,
        }
    }

    pub fn next_possible_move(&self) -> Option<Position> {
        self.target_path.front().copied()
    }

    /// Step onto the head of the pending path.
    pub fn move_to_next(&mut self) -> Option<Position> {
        let next = self.target_path.pop_front()?;
        self.history_path.push(self.current_position);
        self.current_position = next;
        Some(next)
    }

    /// Undo the last step, returning the restored position.
    pub fn go_back(&mut self) -> Option<Position> {
        let previous = self.history_path.pop()?;
        self.current_position = previous;
        Some(previous)
    }

    /// Sum of static values over every position this drone has stood on.
    pub fn path_value(&self) -> i64 {
        self.history_path
            .iter()
            .chain(std::iter::once(&self.current_position))
            .map(|position| i64::from(position.value))
            .sum()
    }

    pub(crate) fn set_target(&mut self, target: Option<Position>) {
        self.target_position = target;
    }

    pub(crate) fn set_path(&mut self, path: impl IntoIterator<Item = Position>) {
        self.target_path = path.into_iter().collect();
    }

    pub(crate) fn clear_path(&mut self) {
        self.target_path.clear();
    }

    pub(crate) fn push_front_step(&mut self, step: Position) {
        self.target_path.push_front(step);
    }

    /// Teleport without consuming the path; the old position goes to history.
    pub(crate) fn relocate(&mut self, position: Position) {
        self.history_path.push(self.current_position);
        self.current_position = position;
    }

    pub(crate) fn clear_history(&mut self) {
        self.history_path.clear();
    }
}
