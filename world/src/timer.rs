//! Whole-second play timer backing elapsed-time bookkeeping.

use std::time::Duration;

/// Elapsed time advances in fixed whole-second increments.
const ELAPSED_QUANTUM: Duration = Duration::from_millis(1000);

/// Session clock that accumulates play time while running.
///
/// Raw tick deltas gather in an accumulator and promote to elapsed time one
/// quantum at a time, so the reported value only ever moves in 1000 ms steps.
/// Halting is idempotent and preserves the elapsed value for best-time
/// bookkeeping; beginning resets the clock to zero.
#[derive(Clone, Debug, Default)]
pub(crate) struct PlayTimer {
    running: bool,
    accumulator: Duration,
    elapsed: Duration,
}

impl PlayTimer {
    /// Starts the clock from zero.
    pub(crate) fn begin(&mut self) {
        self.running = true;
        self.accumulator = Duration::ZERO;
        self.elapsed = Duration::ZERO;
    }

    /// Stops the clock, keeping the elapsed value; stopping twice is a no-op.
    pub(crate) fn halt(&mut self) {
        self.running = false;
    }

    /// Accrues a tick delta, promoting whole quanta into elapsed time.
    pub(crate) fn advance(&mut self, dt: Duration) {
        if !self.running {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(dt);
        while self.accumulator >= ELAPSED_QUANTUM {
            self.accumulator -= ELAPSED_QUANTUM;
            self.elapsed = self.elapsed.saturating_add(ELAPSED_QUANTUM);
        }
    }

    /// Elapsed play time in milliseconds, quantized to whole seconds.
    pub(crate) fn elapsed_millis(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }

    /// Whether the clock is currently accruing time.
    pub(crate) fn is_running(&self) -> bool {
        self.running
    }
}
