//! Pulse scheduler: a background thread that ticks the stage at a fixed pace.
//!
//! Each cycle waits for the draw interval *or* the stop signal, whichever
//! comes first. A stop ends the loop without ticking; otherwise one tick runs
//! if the readiness gate is open. Tick failures are logged and the loop keeps
//! going.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{error, info, warn};

use crate::control::Control;

/// Something the scheduler can tick.
pub trait Pulse: Send {
    fn pulse(&mut self, now: Instant) -> Result<()>;
}

/// Handle to a running pulse thread.
pub struct PulseHandle {
    name: String,
    thread: Option<JoinHandle<()>>,
    done: mpsc::Receiver<()>,
}

impl PulseHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wait at most `timeout` for the thread to finish.
    ///
    /// Returns `false` if it did not; the thread is then left detached.
    pub fn join_timeout(mut self, timeout: Duration) -> bool {
        match self.done.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if let Some(thread) = self.thread.take() {
                    if thread.join().is_err() {
                        warn!("[{}] thread panicked", self.name);
                    }
                }
                true
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!("[{}] did not stop within {:?}; detaching", self.name, timeout);
                false
            }
        }
    }
}

/// Start the pulse thread.
///
/// The caller is responsible for raising `control.stop` and then calling
/// [`PulseHandle::join_timeout`].
pub fn spawn_pulse<T>(
    name: &str,
    interval: Duration,
    control: Arc<Control>,
    target: Arc<Mutex<T>>,
) -> Result<PulseHandle>
where
    T: Pulse + 'static,
{
    let (done_tx, done_rx) = mpsc::channel();
    let thread_name = name.to_string();

    let thread = thread::Builder::new()
        .name(thread_name.clone())
        .spawn(move || {
            info!("Thread '{}' started.", thread_name);
            let ticks = run_pulse_loop(&thread_name, interval, &control, &target);
            info!("[{}] Shutdown complete after {} ticks.", thread_name, ticks);
            let _ = done_tx.send(());
        })
        .with_context(|| format!("failed to spawn thread '{}'", name))?;

    Ok(PulseHandle {
        name: name.to_string(),
        thread: Some(thread),
        done: done_rx,
    })
}

/// The scheduler loop. Returns the number of ticks performed.
pub fn run_pulse_loop<T: Pulse>(
    name: &str,
    interval: Duration,
    control: &Control,
    target: &Mutex<T>,
) -> u64 {
    let mut ticks = 0u64;
    loop {
        if control.stop.wait(interval) {
            break;
        }
        if !control.gate.is_open() {
            continue;
        }

        let mut stage = target.lock().unwrap_or_else(PoisonError::into_inner);
        // The foreground may have closed the gate while we waited for the lock.
        if !control.gate.is_open() {
            continue;
        }

        let now = Instant::now();
        match panic::catch_unwind(AssertUnwindSafe(|| stage.pulse(now))) {
            Ok(Ok(())) => ticks += 1,
            Ok(Err(e)) => warn!("[{}] tick failed: {:#}", name, e),
            Err(_) => error!("[{}] tick panicked", name),
        }
    }
    ticks
}
