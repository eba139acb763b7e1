#[derive(Clone, Copy, Debug, Default)]
pub struct TickMetrics {
    pub last_tick_duration_ms: f64,
    pub restarts: u64,
}

impl TickMetrics {
    pub fn update_tick(&mut self, duration: f64) {
        if duration >= 0.0 {
            self.last_tick_duration_ms = duration;
        }
    }

    pub fn record_restart(&mut self) {
        self.restarts = self.restarts.wrapping_add(1);
    }
}
