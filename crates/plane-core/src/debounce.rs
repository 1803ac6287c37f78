use std::time::Duration;

/// Coalesces bursts of values into the last one, released after `quiet`
/// has passed without a new push.
#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<T>,
    idle_for: Duration,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            idle_for: Duration::ZERO,
        }
    }

    /// Replace the pending value and restart the quiet period.
    pub fn push(&mut self, value: T) {
        self.pending = Some(value);
        self.idle_for = Duration::ZERO;
    }

    pub fn advance(&mut self, dt: Duration) -> Option<T> {
        if self.pending.is_none() {
            return None;
        }
        self.idle_for += dt;
        if self.idle_for >= self.quiet {
            self.idle_for = Duration::ZERO;
            self.pending.take()
        } else {
            None
        }
    }

    /// Release the pending value without waiting.
    pub fn flush(&mut self) -> Option<T> {
        self.idle_for = Duration::ZERO;
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }
}
