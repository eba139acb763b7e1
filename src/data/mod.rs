mod grid;

pub use grid::Grid;

use std::collections::{HashMap, HashSet};

use crate::config::FlightConfig;
use crate::constants::DRONE_COLOR_OFFSET;
use crate::dependency::{ColorGrid, OccupancyObserver};
use crate::types::{Drone, Position, PublicDroneSnapshot, SimulationSnapshot, TickMetrics};

/// Everything the simulation mutates: the grid, the drone registry (in
/// registration order), claimed targets and the visited set.
pub struct FlightData {
    config: FlightConfig,
    tick: u64,
    running: bool,
    grid: Grid,
    drones: Vec<Drone>,
    claimed_targets: HashMap<String, Position>,
    visited: HashSet<Position>,
    observer: Box<dyn OccupancyObserver>,
    metrics: TickMetrics,
}

impl FlightData {
    pub fn new(config: FlightConfig) -> Self {
        Self::with_observer(config, Box::new(ColorGrid::new()))
    }

    pub fn with_observer(config: FlightConfig, observer: Box<dyn OccupancyObserver>) -> Self {
        Self {
            drones: Vec::with_capacity(config.max_drones),
            config,
            tick: 0,
            running: false,
            grid: Grid::default(),
            claimed_targets: HashMap::new(),
            visited: HashSet::new(),
            observer,
            metrics: TickMetrics::default(),
        }
    }

    pub fn config(&self) -> &FlightConfig {
        &self.config
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn increment_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn drones(&self) -> &[Drone] {
        &self.drones
    }

    pub fn drone_len(&self) -> usize {
        self.drones.len()
    }

    pub fn drone(&self, index: usize) -> Option<&Drone> {
        self.drones.get(index)
    }

    pub fn drone_mut(&mut self, index: usize) -> Option<&mut Drone> {
        self.drones.get_mut(index)
    }

    pub fn drone_index(&self, name: &str) -> Option<usize> {
        self.drones.iter().position(|drone| drone.name() == name)
    }

    pub fn push_drone(&mut self, drone: Drone) -> usize {
        self.drones.push(drone);
        self.drones.len() - 1
    }

    pub fn claimed_targets(&self) -> &HashMap<String, Position> {
        &self.claimed_targets
    }

    pub fn claim(&mut self, name: &str, target: Position) {
        self.claimed_targets.insert(name.to_string(), target);
    }

    pub fn release_claim(&mut self, name: &str) {
        self.claimed_targets.remove(name);
    }

    pub fn visited(&self) -> &HashSet<Position> {
        &self.visited
    }

    pub fn is_visited(&self, position: &Position) -> bool {
        self.visited.contains(position)
    }

    pub fn coverage_complete(&self) -> bool {
        !self.grid.is_empty() && self.visited.len() >= self.grid.len()
    }

    /// Cells no drone may pick as a fresh target: visited or already claimed.
    pub fn exclusion_set(&self) -> HashSet<Position> {
        let mut excluded = self.visited.clone();
        excluded.extend(self.claimed_targets.values().copied());
        excluded
    }

    fn color_of(index: usize) -> usize {
        index + DRONE_COLOR_OFFSET
    }

    /// Mark `position` occupied by drone `index`, visited, and painted.
    pub fn occupy(&mut self, index: usize, position: Position) {
        self.grid.set_occupied(position.x, position.y, true);
        self.visited.insert(position);
        self.observer
            .set_color(position.x, position.y, Some(Self::color_of(index)));
    }

    /// Free `position` unless a drone other than `index` stands on it.
    pub fn release_cell(&mut self, index: usize, position: Position) {
        let shared = self
            .drones
            .iter()
            .enumerate()
            .any(|(other, drone)| other != index && drone.current_position() == position);
        if !shared {
            self.grid.set_occupied(position.x, position.y, false);
        }
    }

    /// Move drone `index`'s occupancy from `from` to `to`.
    pub fn shift_occupancy(&mut self, index: usize, from: Position, to: Position) {
        self.release_cell(index, from);
        self.occupy(index, to);
    }

    /// Swap in a new grid; drones, claims and visits belong to the old one.
    pub fn replace_grid(&mut self, grid: Grid) {
        self.observer
            .reset(grid.width(), grid.height(), &grid.values());
        self.grid = grid;
        self.drones.clear();
        self.claimed_targets.clear();
        self.visited.clear();
        self.tick = 0;
    }

    /// Drop every drone and return the grid to its freshly built state.
    pub fn reset_state(&mut self) {
        self.drones.clear();
        self.claimed_targets.clear();
        self.visited.clear();
        self.grid.clear_occupancy();
        self.grid.apply_decay(0, true);
        self.observer.clear();
        self.tick = 0;
    }

    /// Begin a new coverage round from wherever the drones currently are.
    pub fn restart_coverage(&mut self) {
        self.claimed_targets.clear();
        self.visited.clear();
        self.observer.clear();
        self.grid.clear_occupancy();
        for index in 0..self.drones.len() {
            let mut position = self.drones[index].current_position();
            // Idle drones can end a round stacked under another drone.
            if self.grid.is_occupied(position.x, position.y) {
                let grid = &self.grid;
                if let Some(free) = grid
                    .neighbors(&position)
                    .into_iter()
                    .find(|neighbor| !grid.is_occupied(neighbor.x, neighbor.y))
                {
                    self.drones[index].relocate(free);
                    position = free;
                }
            }
            let drone = &mut self.drones[index];
            drone.set_target(None);
            drone.clear_path();
            drone.clear_history();
            self.occupy(index, position);
        }
        self.grid.apply_decay(0, true);
    }

    pub fn colors(&self) -> Vec<Vec<String>> {
        self.observer.colors()
    }

    pub fn metrics(&self) -> &TickMetrics {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut TickMetrics {
        &mut self.metrics
    }

    pub fn build_public_snapshot(&self) -> SimulationSnapshot {
        SimulationSnapshot {
            tick: self.tick,
            drones: self.drones.iter().map(PublicDroneSnapshot::from).collect(),
            visited: self.visited.len(),
            total_cells: self.grid.len(),
            restarts: self.metrics.restarts,
        }
    }
}

impl Default for FlightData {
    fn default() -> Self {
        Self::new(FlightConfig::default())
    }
}
