use std::time::Instant;

/// Measures a single trial.
///
/// Elapsed time is always derived from the recorded start instant, so
/// reading it on every tick never accumulates rounding error.
#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    started_at: Option<Instant>,
    frozen_ms: Option<u64>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts measuring at `now`. No-op when already running or stopped.
    pub fn start(&mut self, now: Instant) {
        if self.started_at.is_none() && self.frozen_ms.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Freezes the elapsed value at `now` and returns it.
    pub fn stop(&mut self, now: Instant) -> u64 {
        if let Some(ms) = self.frozen_ms {
            return ms;
        }
        let ms = self.elapsed_ms(now);
        self.started_at = None;
        self.frozen_ms = Some(ms);
        ms
    }

    pub fn reset(&mut self) {
        self.started_at = None;
        self.frozen_ms = None;
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_stopped(&self) -> bool {
        self.frozen_ms.is_some()
    }

    pub fn elapsed_ms(&self, now: Instant) -> u64 {
        match (self.frozen_ms, self.started_at) {
            (Some(ms), _) => ms,
            (None, Some(start)) => now.saturating_duration_since(start).as_millis() as u64,
            (None, None) => 0,
        }
    }
}
