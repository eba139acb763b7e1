#[cfg(target_arch = "wasm32")]
thread_local! {
    static PERFORMANCE: Option<web_sys::Performance> =
        web_sys::window().and_then(|w| w.performance());
}

#[cfg(target_arch = "wasm32")]
pub fn performance_now() -> f64 {
    PERFORMANCE.with(|perf| perf.as_ref().map(|p| p.now()).unwrap_or(0.0))
}

/// Milliseconds since the first call in this process.
#[cfg(not(target_arch = "wasm32"))]
pub fn performance_now() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static ORIGIN: OnceLock<Instant> = OnceLock::new();
    ORIGIN.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

/// Run `f` and report how long it took in milliseconds.
pub fn measure<F, T>(f: F) -> (T, f64)
where
    F: FnOnce() -> T,
{
    let start = performance_now();
    let result = f();
    let end = performance_now();
    let duration = if end >= start { end - start } else { 0.0 };
    (result, duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_monotonic() {
        let first = performance_now();
        let second = performance_now();
        assert!(second >= first);
    }

    #[test]
    fn measure_returns_result_and_non_negative_duration() {
        let (value, duration) = measure(|| (0..1000).sum::<u32>());
        assert_eq!(value, 499_500);
        assert!(duration >= 0.0);
    }
}
