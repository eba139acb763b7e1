use tracing::{debug, info, trace, warn};

use super::navigator::Navigator;
use super::valuation::closest_target;
use super::{MoveOutcome, TickReport};
use crate::config::FlightConfig;
use crate::data::{FlightData, Grid};
use crate::dependency::{measure, OccupancyObserver};
use crate::error::FlightError;
use crate::types::{Drone, Position, SimulationSnapshot, SNAPSHOT_FIELD_COUNT};

/// The simulation engine: owns all mutable state and advances it one tick
/// at a time. Callers needing shared access wrap it in a single lock.
pub struct FlightLogic {
    data: FlightData,
    navigator: Navigator,
    flat_snapshot: Vec<f32>,
}

impl Default for FlightLogic {
    fn default() -> Self {
        Self::new(FlightConfig::default())
    }
}

impl FlightLogic {
    pub fn new(config: FlightConfig) -> Self {
        Self {
            navigator: Navigator::new(config.path_distance_cap),
            data: FlightData::new(config),
            flat_snapshot: Vec::new(),
        }
    }

    pub fn with_observer(config: FlightConfig, observer: Box<dyn OccupancyObserver>) -> Self {
        Self {
            navigator: Navigator::new(config.path_distance_cap),
            data: FlightData::with_observer(config, observer),
            flat_snapshot: Vec::new(),
        }
    }

    pub fn data(&self) -> &FlightData {
        &self.data
    }

    pub fn config(&self) -> &FlightConfig {
        self.data.config()
    }

    /// Replace the grid. Drones, claims and visits from the previous grid
    /// are dropped. A ragged matrix leaves the current state untouched.
    pub fn build_grid(&mut self, matrix: &[Vec<i32>]) -> Result<(), FlightError> {
        let grid = Grid::build(matrix)?;
        info!(
            width = grid.width(),
            height = grid.height(),
            "navigation grid built"
        );
        self.data.replace_grid(grid);
        Ok(())
    }

    pub fn register_drone(&mut self, name: &str, x: i32, y: i32) -> Result<Drone, FlightError> {
        if name.trim().is_empty() {
            return Err(FlightError::BlankName);
        }
        let max = self.data.config().max_drones;
        if self.data.drone_len() >= max {
            return Err(FlightError::CapacityExceeded { max });
        }
        if self.data.drone_index(name).is_some() {
            return Err(FlightError::DuplicateName(name.to_string()));
        }
        let position = self
            .data
            .grid()
            .position(x, y)
            .ok_or(FlightError::InvalidPosition { x, y })?;
        if self.data.grid().is_occupied(x, y) {
            return Err(FlightError::InvalidPosition { x, y });
        }

        let drone = Drone::new(name, position);
        let index = self.data.push_drone(drone.clone());
        self.data.occupy(index, position);
        info!(drone = name, x, y, "drone registered");
        Ok(drone)
    }

    pub fn find_drone(&self, name: &str) -> Option<Drone> {
        let index = self.data.drone_index(name)?;
        self.data.drone(index).cloned()
    }

    /// Manual position override. Unknown drones and off-grid coordinates are
    /// discarded and reported as `false`.
    pub fn record_position(&mut self, name: &str, x: i32, y: i32) -> bool {
        let Some(index) = self.data.drone_index(name) else {
            warn!(drone = name, "position update for unknown drone discarded");
            return false;
        };
        let Some(position) = self.data.grid().position(x, y) else {
            warn!(drone = name, x, y, "off-grid position update discarded");
            return false;
        };
        let Some(drone) = self.data.drone_mut(index) else {
            return false;
        };

        let previous = drone.current_position();
        drone.relocate(position);
        drone.clear_path();
        self.data.shift_occupancy(index, previous, position);
        debug!(drone = name, x, y, "position recorded");
        true
    }

    /// Undo the drone's last step if the cell it came from is free.
    pub fn go_back(&mut self, name: &str) -> Option<Position> {
        let index = self.data.drone_index(name)?;
        let drone = self.data.drone(index)?;
        let current = drone.current_position();
        let previous = *drone.history_path().last()?;
        if self.data.grid().is_occupied(previous.x, previous.y) {
            return None;
        }

        let drone = self.data.drone_mut(index)?;
        drone.go_back();
        drone.clear_path();
        self.data.shift_occupancy(index, current, previous);
        debug!(drone = name, x = previous.x, y = previous.y, "stepped back");
        Some(previous)
    }

    pub fn path_for(&self, name: &str) -> Vec<Position> {
        self.data
            .drone_index(name)
            .and_then(|index| self.data.drone(index))
            .map(|drone| drone.target_path().iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn reset_all(&mut self) {
        self.data.reset_state();
        info!("simulation reset");
    }

    pub fn start(&mut self) {
        self.data.set_running(true);
    }

    pub fn pause(&mut self) {
        self.data.set_running(false);
    }

    pub fn running(&self) -> bool {
        self.data.running()
    }

    /// Step only while running.
    pub fn update(&mut self) -> Option<TickReport> {
        if self.data.running() {
            Some(self.step())
        } else {
            None
        }
    }

    pub fn step(&mut self) -> TickReport {
        let (report, duration) = measure(|| self.run_tick());
        self.data.metrics_mut().update_tick(duration);
        report
    }

    fn run_tick(&mut self) -> TickReport {
        self.data.increment_tick();
        let mut report = TickReport {
            tick: self.data.tick(),
            ..TickReport::default()
        };
        if self.data.grid().is_empty() {
            return report;
        }

        for index in 0..self.data.drone_len() {
            if self.data.coverage_complete() {
                self.restart();
                report.restarted = true;
                return report;
            }
            report.outcomes.push(self.advance_drone(index));
        }

        let decay_step = self.data.config().decay_step;
        self.data.grid_mut().apply_decay(decay_step, false);
        report
    }

    fn restart(&mut self) {
        for drone in self.data.drones() {
            info!(
                drone = drone.name(),
                path_value = drone.path_value(),
                steps = drone.history_path().len(),
                "coverage round finished"
            );
        }
        self.data.restart_coverage();
        self.data.metrics_mut().record_restart();
        info!(
            tick = self.data.tick(),
            restarts = self.data.metrics().restarts,
            "grid fully covered, starting over"
        );
    }

    fn advance_drone(&mut self, index: usize) -> MoveOutcome {
        let Some(drone) = self.data.drone(index) else {
            return MoveOutcome::Idle;
        };
        let name = drone.name().to_string();
        let current = drone.current_position();
        let needs_target = drone.is_target_reached()
            || drone
                .target_position()
                .map_or(false, |target| self.data.is_visited(&target));

        if needs_target {
            self.data.release_claim(&name);
            let excluded = self.data.exclusion_set();
            let target = closest_target(&current, self.data.grid(), &excluded);
            if let Some(drone) = self.data.drone_mut(index) {
                drone.set_target(target);
                drone.clear_path();
            }
            match target {
                Some(target) => {
                    // An idle drone gave its cell up; take it back.
                    if !self.data.grid().is_occupied(current.x, current.y) {
                        self.data.occupy(index, current);
                    }
                    debug!(drone = %name, x = target.x, y = target.y, "target claimed");
                }
                None => {
                    self.data.release_cell(index, current);
                    trace!(drone = %name, "no target available");
                    return MoveOutcome::Idle;
                }
            }
        }

        let Some(target) = self.data.drone(index).and_then(Drone::target_position) else {
            return MoveOutcome::Idle;
        };
        self.data.claim(&name, target);

        match self.data.drone(index).and_then(Drone::next_possible_move) {
            Some(next) => self.try_move(index, &name, current, next),
            None => self.plan_path(index, &name, current, target),
        }
    }

    fn try_move(
        &mut self,
        index: usize,
        name: &str,
        current: Position,
        next: Position,
    ) -> MoveOutcome {
        if !self.data.grid().is_occupied(next.x, next.y) {
            if let Some(drone) = self.data.drone_mut(index) {
                drone.move_to_next();
            }
            self.data.shift_occupancy(index, current, next);
            trace!(drone = name, x = next.x, y = next.y, "moved");
            return MoveOutcome::Moved;
        }

        let grid = self.data.grid();
        let detour = grid
            .neighbors(&current)
            .into_iter()
            .find(|neighbor| !grid.is_occupied(neighbor.x, neighbor.y));

        match detour {
            Some(detour) => {
                if let Some(drone) = self.data.drone_mut(index) {
                    // The blocked step is still queued behind the detour.
                    drone.push_front_step(detour);
                    drone.move_to_next();
                    // Stale after the side-step; re-planned next tick.
                    drone.clear_path();
                }
                self.data.shift_occupancy(index, current, detour);
                debug!(
                    drone = name,
                    blocked_x = next.x,
                    blocked_y = next.y,
                    x = detour.x,
                    y = detour.y,
                    "detoured around occupied cell"
                );
                MoveOutcome::Detoured
            }
            None => {
                trace!(drone = name, x = next.x, y = next.y, "blocked, waiting");
                MoveOutcome::Waited
            }
        }
    }

    fn plan_path(
        &mut self,
        index: usize,
        name: &str,
        current: Position,
        target: Position,
    ) -> MoveOutcome {
        let path = self.navigator.compute_path(current, target, self.data.grid());
        if path.is_empty() {
            if let Some(drone) = self.data.drone_mut(index) {
                drone.set_target(None);
            }
            self.data.release_claim(name);
            self.data.release_cell(index, current);
            warn!(
                drone = name,
                x = target.x,
                y = target.y,
                "no path to target, claim released"
            );
            return MoveOutcome::TargetAbandoned;
        }

        debug!(drone = name, steps = path.len(), "path planned");
        if let Some(drone) = self.data.drone_mut(index) {
            drone.set_path(path);
        }
        MoveOutcome::Planned
    }

    pub fn tick(&self) -> u64 {
        self.data.tick()
    }

    pub fn drone_count(&self) -> usize {
        self.data.drone_len()
    }

    pub fn last_tick_duration(&self) -> f64 {
        self.data.metrics().last_tick_duration_ms
    }

    pub fn restart_count(&self) -> u64 {
        self.data.metrics().restarts
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        self.data.build_public_snapshot()
    }

    pub fn colors(&self) -> Vec<Vec<String>> {
        self.data.colors()
    }

    /// Drone state packed as `SNAPSHOT_FIELD_COUNT` floats per drone.
    pub fn flat_snapshot(&mut self) -> &[f32] {
        self.flat_snapshot.clear();
        self.flat_snapshot
            .reserve(self.data.drone_len() * SNAPSHOT_FIELD_COUNT);
        for drone in self.data.drones() {
            let position = drone.current_position();
            self.flat_snapshot.extend_from_slice(&[
                position.x as f32,
                position.y as f32,
                u32::from(drone.state()) as f32,
                drone.target_path().len() as f32,
            ]);
        }
        &self.flat_snapshot
    }
}
