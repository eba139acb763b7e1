use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::constants::SHUTDOWN_GRACE_MS;
use crate::error::FlightError;

const TICK_THREAD_NAME: &str = "flight-tick";

static GLOBAL_SCHEDULER: TickScheduler = TickScheduler::new();

struct TickWorker {
    stop_tx: Sender<()>,
    exited_rx: Receiver<()>,
    handle: JoinHandle<()>,
}

/// Drives a step function from one background thread at a fixed rate.
///
/// `start` and `stop` are idempotent. The process-wide instance lives behind
/// [`TickScheduler::global`]; it must be stopped before it can be started
/// with a different step function.
pub struct TickScheduler {
    running: AtomicBool,
    worker: Mutex<Option<TickWorker>>,
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TickScheduler {
    pub const fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            worker: Mutex::new(None),
        }
    }

    pub fn global() -> &'static TickScheduler {
        &GLOBAL_SCHEDULER
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Run `step` now and then every `period`. Returns `Ok(false)` when
    /// already running.
    pub fn start<F>(&self, period: Duration, mut step: F) -> Result<bool, FlightError>
    where
        F: FnMut() + Send + 'static,
    {
        if period.is_zero() {
            return Err(FlightError::InvalidTickPeriod);
        }
        if self.is_running() {
            return Ok(false);
        }

        let mut slot = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return Ok(false);
        }

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let (exited_tx, exited_rx) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name(TICK_THREAD_NAME.into())
            .spawn(move || {
                let mut next_tick = Instant::now();
                loop {
                    step();
                    next_tick += period;
                    let wait = next_tick.saturating_duration_since(Instant::now());
                    match stop_rx.recv_timeout(wait) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                let _ = exited_tx.send(());
            })
            .map_err(|err| FlightError::SchedulerSpawn(err.to_string()))?;

        *slot = Some(TickWorker {
            stop_tx,
            exited_rx,
            handle,
        });
        self.running.store(true, Ordering::Release);
        info!(period_ms = period.as_millis() as u64, "tick scheduler started");
        Ok(true)
    }

    /// Cancel future ticks and wait up to `grace` for the thread to exit.
    /// A thread that overruns the grace period is detached. Returns `false`
    /// when nothing was running.
    pub fn stop(&self, grace: Duration) -> bool {
        if !self.is_running() {
            return false;
        }

        let mut slot = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(worker) = slot.take() else {
            return false;
        };
        self.running.store(false, Ordering::Release);

        let _ = worker.stop_tx.send(());
        match worker.exited_rx.recv_timeout(grace) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if worker.handle.join().is_err() {
                    warn!("tick thread panicked");
                }
                info!("tick scheduler stopped");
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    grace_ms = grace.as_millis() as u64,
                    "tick thread missed its shutdown grace period, detaching"
                );
            }
        }
        true
    }
}

impl Drop for TickScheduler {
    fn drop(&mut self) {
        self.stop(Duration::from_millis(SHUTDOWN_GRACE_MS));
    }
}
