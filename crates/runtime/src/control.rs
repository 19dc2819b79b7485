//! Cross-thread control flags.
//!
//! - [`ReadinessGate`]: may the pulse thread touch the stage right now?
//! - [`StopSignal`]: should everybody wind down? Waiting on it is interruptible.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

/// Permission flag for touching the render surface and shared stage.
///
/// The foreground thread closes the gate before it mutates shared state
/// (resize, teardown) and reopens it once the state is consistent again.
#[derive(Debug)]
pub struct ReadinessGate {
    open: AtomicBool,
}

impl ReadinessGate {
    pub fn new(open: bool) -> Self {
        Self {
            open: AtomicBool::new(open),
        }
    }

    pub fn open(&self) {
        self.open.store(true, Ordering::Release);
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::Release);
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }
}

impl Default for ReadinessGate {
    fn default() -> Self {
        Self::new(false)
    }
}

/// One-shot stop flag with an interruptible timed wait.
#[derive(Debug, Default)]
pub struct StopSignal {
    stopped: Mutex<bool>,
    cv: Condvar,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag and wake every waiter.
    pub fn signal(&self) {
        let mut stopped = self.stopped.lock().unwrap_or_else(PoisonError::into_inner);
        *stopped = true;
        self.cv.notify_all();
    }

    pub fn is_stopped(&self) -> bool {
        *self.stopped.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block for at most `timeout`, returning early when stopped.
    ///
    /// Returns `true` if the stop signal was raised.
    pub fn wait(&self, timeout: Duration) -> bool {
        let stopped = self.stopped.lock().unwrap_or_else(PoisonError::into_inner);
        let (stopped, _) = self
            .cv
            .wait_timeout_while(stopped, timeout, |s| !*s)
            .unwrap_or_else(PoisonError::into_inner);
        *stopped
    }
}

/// Flags shared by the foreground loop and the pulse thread.
#[derive(Debug, Default)]
pub struct Control {
    pub gate: ReadinessGate,
    pub stop: StopSignal,
}

impl Control {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop everything: close the gate first so no new tick starts.
    pub fn shutdown(&self) {
        self.gate.close();
        self.stop.signal();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn gate_starts_closed_and_toggles() {
        let gate = ReadinessGate::default();
        assert!(!gate.is_open());
        gate.open();
        assert!(gate.is_open());
        gate.close();
        assert!(!gate.is_open());
    }

    #[test]
    fn wait_times_out_without_signal() {
        let stop = StopSignal::new();
        let start = Instant::now();
        assert!(!stop.wait(Duration::from_millis(20)));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn wait_returns_immediately_once_stopped() {
        let stop = StopSignal::new();
        stop.signal();
        let start = Instant::now();
        assert!(stop.wait(Duration::from_secs(5)));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn signal_interrupts_a_pending_wait() {
        let stop = Arc::new(StopSignal::new());
        let waiter = {
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let start = Instant::now();
                let stopped = stop.wait(Duration::from_secs(10));
                (stopped, start.elapsed())
            })
        };
        thread::sleep(Duration::from_millis(20));
        stop.signal();
        let (stopped, elapsed) = waiter.join().unwrap();
        assert!(stopped);
        assert!(elapsed < Duration::from_secs(5));
    }

    #[test]
    fn shutdown_closes_gate_and_stops() {
        let control = Control::new();
        control.gate.open();
        control.shutdown();
        assert!(!control.gate.is_open());
        assert!(control.stop.is_stopped());
    }
}
