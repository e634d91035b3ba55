//! Debounced autosave window.
//!
//! # Responsibility
//! - Coalesce bursts of note edits into one pending save deadline.
//!
//! # Invariants
//! - At most one deadline is outstanding; a new edit restarts the window
//!   instead of queuing another save.
//! - Flushing or cancelling always leaves no deadline behind.
//!
//! The debouncer is a plain state machine over caller-supplied instants,
//! so the single-threaded host loop decides when time advances and tests
//! need no real timers.

use std::time::{Duration, Instant};

/// Default idle window before a pending edit is persisted.
pub const DEFAULT_SAVE_WINDOW: Duration = Duration::from_millis(400);

/// Single-deadline debounce state machine for persistence writes.
#[derive(Debug, Clone)]
pub struct SaveDebouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl SaveDebouncer {
    /// Creates a debouncer with the given idle window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Restarts the pending window from `now`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Returns whether a save is outstanding.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns whether the outstanding save is due at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Clears and reports a due deadline; leaves a not-yet-due one armed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            return true;
        }
        false
    }

    /// Drops any outstanding deadline, reporting whether one existed.
    ///
    /// Used when the caller is about to save unconditionally (selection
    /// change, deletion) and must not leave a stale deadline armed.
    pub fn flush(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}

impl Default for SaveDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::SaveDebouncer;
    use std::time::{Duration, Instant};

    const WINDOW: Duration = Duration::from_millis(100);

    #[test]
    fn nothing_is_due_without_a_schedule() {
        let debouncer = SaveDebouncer::new(WINDOW);
        assert!(!debouncer.is_pending());
        assert!(!debouncer.is_due(Instant::now()));
    }

    #[test]
    fn deadline_fires_only_after_the_window() {
        let mut debouncer = SaveDebouncer::new(WINDOW);
        let t0 = Instant::now();
        debouncer.schedule(t0);
        assert!(!debouncer.is_due(t0 + Duration::from_millis(99)));
        assert!(debouncer.is_due(t0 + WINDOW));
    }

    #[test]
    fn rescheduling_restarts_the_window() {
        let mut debouncer = SaveDebouncer::new(WINDOW);
        let t0 = Instant::now();
        debouncer.schedule(t0);
        debouncer.schedule(t0 + Duration::from_millis(80));
        assert!(!debouncer.is_due(t0 + WINDOW));
        assert!(debouncer.is_due(t0 + Duration::from_millis(180)));
    }

    #[test]
    fn take_due_clears_exactly_once() {
        let mut debouncer = SaveDebouncer::new(WINDOW);
        let t0 = Instant::now();
        debouncer.schedule(t0);
        assert!(debouncer.take_due(t0 + WINDOW));
        assert!(!debouncer.take_due(t0 + WINDOW));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn flush_reports_and_drops_pending_state() {
        let mut debouncer = SaveDebouncer::new(WINDOW);
        assert!(!debouncer.flush());
        debouncer.schedule(Instant::now());
        assert!(debouncer.flush());
        assert!(!debouncer.is_pending());
    }
}
