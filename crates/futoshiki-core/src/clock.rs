//! The elapsed-time clock of a session.
//!
//! At most one timer is ever active per session. Starting an already running
//! clock and stopping an idle one are both no-ops, so the per-second tick can
//! never be counted twice.

/// Token for the single running timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActiveTimer;

/// Optional active timer with idempotent start and stop.
///
/// Elapsed time is counted by the session from the host's one-second tick
/// while the timer is held.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    active: Option<ActiveTimer>,
}

impl Clock {
    /// Start the timer. Returns false if it was already running.
    pub fn start(&mut self) -> bool {
        if self.active.is_some() {
            return false;
        }
        self.active = Some(ActiveTimer);
        true
    }

    /// Release the timer. Returns false if none was running.
    pub fn stop(&mut self) -> bool {
        self.active.take().is_some()
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_is_idempotent() {
        let mut clock = Clock::default();
        assert!(clock.start());
        assert!(!clock.start());
        assert!(clock.is_running());
        assert!(clock.stop());
        assert!(!clock.is_running());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut clock = Clock::default();
        assert!(!clock.stop());
        clock.start();
        assert!(clock.stop());
        assert!(!clock.stop());
        assert!(!clock.is_running());
    }

    #[test]
    fn test_restart_after_stop() {
        let mut clock = Clock::default();
        clock.start();
        clock.stop();
        assert!(clock.start());
        assert!(clock.is_running());
    }
}
