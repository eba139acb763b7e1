#[cfg(not(target_arch = "wasm32"))]
mod scheduler;
mod sim_handler;

#[cfg(not(target_arch = "wasm32"))]
pub use scheduler::TickScheduler;
pub use sim_handler::FlightHandler;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::FlightConfig;
use crate::dependency::OccupancyObserver;
use crate::error::FlightError;
use crate::logic::{FlightLogic, TickReport};
use crate::types::{Drone, Position, SimulationSnapshot};

/// Thread-safe entry point: every operation takes the one engine lock, so
/// caller threads and the tick thread never interleave inside a step.
#[derive(Clone)]
pub struct FlightCenter {
    inner: Arc<Mutex<FlightLogic>>,
}

impl FlightCenter {
    pub fn new(config: FlightConfig) -> Result<Self, FlightError> {
        config.validate()?;
        Ok(Self::from_logic(FlightLogic::new(config)))
    }

    pub fn with_observer(
        config: FlightConfig,
        observer: Box<dyn OccupancyObserver>,
    ) -> Result<Self, FlightError> {
        config.validate()?;
        Ok(Self::from_logic(FlightLogic::with_observer(config, observer)))
    }

    fn from_logic(logic: FlightLogic) -> Self {
        Self {
            inner: Arc::new(Mutex::new(logic)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FlightLogic> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn build_grid(&self, matrix: &[Vec<i32>]) -> Result<(), FlightError> {
        self.lock().build_grid(matrix)
    }

    pub fn register_drone(&self, name: &str, x: i32, y: i32) -> Result<Drone, FlightError> {
        self.lock().register_drone(name, x, y)
    }

    pub fn find_drone(&self, name: &str) -> Option<Drone> {
        self.lock().find_drone(name)
    }

    pub fn record_position(&self, name: &str, x: i32, y: i32) -> bool {
        self.lock().record_position(name, x, y)
    }

    pub fn go_back(&self, name: &str) -> Option<Position> {
        self.lock().go_back(name)
    }

    pub fn path_for(&self, name: &str) -> Vec<Position> {
        self.lock().path_for(name)
    }

    pub fn reset_all(&self) {
        self.lock().reset_all();
    }

    pub fn step(&self) -> TickReport {
        self.lock().step()
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        self.lock().snapshot()
    }

    pub fn colors(&self) -> Vec<Vec<String>> {
        self.lock().colors()
    }

    pub fn tick(&self) -> u64 {
        self.lock().tick()
    }

    /// Drive this engine from the process-wide tick scheduler. Returns
    /// `Ok(false)` if the scheduler is already running.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn start(&self) -> Result<bool, FlightError> {
        let period = self.lock().config().tick_period();
        let center = self.clone();
        let started = TickScheduler::global().start(period, move || {
            center.step();
        })?;
        if started {
            self.lock().start();
        }
        Ok(started)
    }

    /// Stop the process-wide scheduler if this engine is the one it drives.
    /// Returns `false` when this engine was not running.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn stop(&self) -> bool {
        let grace = {
            let mut logic = self.lock();
            if !logic.running() {
                return false;
            }
            logic.pause();
            logic.config().shutdown_grace()
        };
        TickScheduler::global().stop(grace);
        true
    }

    pub fn running(&self) -> bool {
        self.lock().running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::{Duration, Instant};

    fn center_with_grid(width: usize, height: usize) -> FlightCenter {
        let center = FlightCenter::new(FlightConfig::default()).expect("valid config");
        center
            .build_grid(&vec![vec![1; width]; height])
            .expect("grid");
        center
    }

    #[test]
    fn rejects_invalid_config() {
        let config = FlightConfig {
            tick_period_ms: 0,
            ..FlightConfig::default()
        };
        assert!(matches!(
            FlightCenter::new(config),
            Err(FlightError::InvalidTickPeriod)
        ));
    }

    #[test]
    fn concurrent_registration_is_serialized() {
        let center = center_with_grid(4, 4);
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let center = center.clone();
                thread::spawn(move || {
                    center
                        .register_drone(&format!("drone-{i}"), i % 4, i / 4)
                        .is_ok()
                })
            })
            .collect();
        let registered = handles
            .into_iter()
            .map(|handle| handle.join().expect("register thread"))
            .filter(|ok| *ok)
            .count();

        assert_eq!(registered, 8);
        assert_eq!(center.snapshot().drones.len(), 8);
        assert!(center.find_drone("drone-5").is_some());
    }

    #[test]
    fn clones_share_one_engine() {
        let center = center_with_grid(3, 3);
        let other = center.clone();
        center.register_drone("a", 0, 0).expect("drone");
        other.step();

        assert_eq!(center.tick(), 1);
        assert_eq!(center.path_for("a"), vec![Position::at(1, 0)]);
        assert!(center.record_position("a", 2, 2));
        assert_eq!(other.go_back("a"), Some(Position::at(0, 0)));

        other.reset_all();
        assert!(center.find_drone("a").is_none());
        assert_eq!(center.colors().len(), 3);
    }

    // Tests that touch the process-wide scheduler must not overlap.
    static GLOBAL_SCHEDULER_GUARD: Mutex<()> = Mutex::new(());

    fn center_on_fast_ticks() -> FlightCenter {
        let config = FlightConfig {
            tick_period_ms: 5,
            ..FlightConfig::default()
        };
        let center = FlightCenter::new(config).expect("valid config");
        center.build_grid(&vec![vec![1; 3]; 3]).expect("grid");
        center
    }

    #[test]
    fn only_the_driving_engine_stops_the_scheduler() {
        let _guard = GLOBAL_SCHEDULER_GUARD
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let driver = center_on_fast_ticks();
        let bystander = center_on_fast_ticks();

        assert_eq!(driver.start(), Ok(true));
        assert_eq!(bystander.start(), Ok(false));
        assert!(!bystander.running());

        assert!(!bystander.stop());
        assert!(driver.running());
        assert!(TickScheduler::global().is_running());

        assert!(driver.stop());
        assert!(!driver.running());
        assert!(!TickScheduler::global().is_running());
    }

    #[test]
    fn scheduler_drives_the_engine() {
        let _guard = GLOBAL_SCHEDULER_GUARD
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let center = center_on_fast_ticks();
        center.register_drone("a", 0, 0).expect("drone");

        assert_eq!(center.start(), Ok(true));
        assert_eq!(center.start(), Ok(false));
        assert!(center.running());

        let deadline = Instant::now() + Duration::from_secs(2);
        while center.tick() < 3 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(2));
        }
        assert!(center.tick() >= 3);

        assert!(center.stop());
        assert!(!center.stop());
        assert!(!center.running());
    }
}
