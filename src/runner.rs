//! Cooperative run-state shared by every solver.
//!
//! A solver embeds a [`RunnerState`] and checks [`RunnerState::stopped`]
//! at each outer loop iteration: after a coset definition, a rule
//! insertion, or a pair dequeue. Killing is cooperative and
//! non-destructive; a killed runner returns promptly from `run` and its
//! state is simply never queried again.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const REPORT_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct RunnerState {
    started: bool,
    finished: bool,
    dead: Arc<AtomicBool>,
    deadline: Option<Instant>,
    last_report: Option<Instant>,
}

impl RunnerState {
    pub fn new() -> Self {
        Self {
            started: false,
            finished: false,
            dead: Arc::new(AtomicBool::new(false)),
            deadline: None,
            last_report: None,
        }
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn set_started(&mut self) {
        self.started = true;
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn set_finished(&mut self, value: bool) {
        self.finished = value;
    }

    pub fn dead(&self) -> bool {
        self.dead.load(Ordering::Acquire)
    }

    pub fn kill(&self) {
        self.dead.store(true, Ordering::Release);
    }

    /// Handle for a race coordinator to kill this runner from another
    /// thread.
    pub fn kill_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.dead)
    }

    /// Adopt another runner's kill flag, so that a composite solver and
    /// the engines it drives die together.
    pub fn share_kill(&mut self, flag: Arc<AtomicBool>) {
        self.dead = flag;
    }

    pub fn set_deadline_in(&mut self, t: Duration) {
        self.deadline = Instant::now().checked_add(t);
    }

    pub fn clear_deadline(&mut self) {
        self.deadline = None;
    }

    pub fn timed_out(&self) -> bool {
        match self.deadline {
            Some(d) => Instant::now() >= d,
            None => false,
        }
    }

    /// True when the runner must stop advancing: killed or out of time.
    /// Finishing is tracked separately.
    pub fn stopped(&self) -> bool {
        self.dead() || self.timed_out()
    }

    /// Rate limit for reporter output: true at most once per second.
    pub fn report_due(&mut self) -> bool {
        let now = Instant::now();
        match self.last_report {
            Some(prev) if now.duration_since(prev) < REPORT_INTERVAL => false,
            _ => {
                self.last_report = Some(now);
                true
            }
        }
    }
}

impl Default for RunnerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_idle() {
        let s = RunnerState::new();
        assert!(!s.started());
        assert!(!s.finished());
        assert!(!s.dead());
        assert!(!s.stopped());
    }

    #[test]
    fn kill_handle_is_shared() {
        let s = RunnerState::new();
        let h = s.kill_handle();
        assert!(!s.dead());
        h.store(true, std::sync::atomic::Ordering::Release);
        assert!(s.dead());
        assert!(s.stopped());
    }

    #[test]
    fn deadline_expires() {
        let mut s = RunnerState::new();
        s.set_deadline_in(Duration::from_secs(0));
        assert!(s.timed_out());
        s.clear_deadline();
        assert!(!s.timed_out());
    }

    #[test]
    fn report_is_rate_limited() {
        let mut s = RunnerState::new();
        assert!(s.report_due());
        assert!(!s.report_due());
    }
}
