use std::time::{Duration, Instant};

use log::info;

/// Runs `f` and logs how long it took under `label`. Returns the result of `f`
/// together with the elapsed time.
pub fn timed<T, F>(label: &str, f: F) -> (T, Duration)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();
    info!(label = label, seconds = elapsed.as_secs_f64(); "Finished timed block");
    (result, elapsed)
}
