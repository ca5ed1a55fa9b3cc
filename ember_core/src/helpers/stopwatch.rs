use std::time::{Duration, Instant};

/// Measures the time between laps.
///
/// `rewind` hands part of a lap back, which lets a fixed-step loop carry
/// leftover time into the next tick instead of dropping it.
pub struct Stopwatch {
    start: Instant,
    marker: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            marker: Duration::ZERO,
        }
    }

    /// Time since the previous lap (or since construction).
    pub fn lap(&mut self) -> Duration {
        let elapsed = self.start.elapsed();
        let delta = elapsed - self.marker;

        self.marker = elapsed;
        delta
    }

    /// Move the marker back, so the next lap includes `duration` again.
    /// Rewinding past the start saturates.
    pub fn rewind(&mut self, duration: Duration) {
        self.marker = self.marker.saturating_sub(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewind_carries_time_into_the_next_lap() {
        let mut stopwatch = Stopwatch::new();
        stopwatch.lap();

        stopwatch.rewind(Duration::from_millis(50));
        assert!(stopwatch.lap() >= Duration::from_millis(50));

        // The carried time was consumed by the lap above.
        assert!(stopwatch.lap() < Duration::from_millis(50));
    }

    #[test]
    fn rewind_past_the_start_saturates() {
        let mut stopwatch = Stopwatch::new();
        stopwatch.rewind(Duration::from_secs(3600));

        assert!(stopwatch.lap() < Duration::from_secs(3600));
    }
}
