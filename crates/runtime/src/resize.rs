//! Resize monitor.
//!
//! Terminals do not always deliver a resize event (e.g. when the change
//! happens while the process is suspended), so every foreground iteration
//! also compares a polled size against the last one seen.

use std::sync::{Mutex, PoisonError};

use anyhow::Result;
use log::info;
use rand::Rng;

use crate::control::Control;
use crate::core::RenderPort;
use crate::input::InputEvent;
use crate::stage::Stage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeMonitor {
    last: (u16, u16),
}

impl ResizeMonitor {
    pub fn new(initial: (u16, u16)) -> Self {
        Self { last: initial }
    }

    pub fn last(&self) -> (u16, u16) {
        self.last
    }

    /// Report new dimensions if `event` or `polled` differs from the last size.
    pub fn observe(&mut self, event: InputEvent, polled: Option<(u16, u16)>) -> Option<(u16, u16)> {
        let reported = match event {
            InputEvent::Resize(w, h) => Some((w, h)),
            _ => None,
        };
        let size = reported
            .filter(|&s| s != self.last)
            .or_else(|| polled.filter(|&s| s != self.last))?;
        self.last = size;
        Some(size)
    }
}

/// Rebuild the stage for `size` with the gate closed.
///
/// The gate is reopened only if the new size fits. Returns whether it did.
pub fn apply_resize<P, R>(control: &Control, stage: &Mutex<Stage<P, R>>, size: (u16, u16)) -> Result<bool>
where
    P: RenderPort,
    R: Rng,
{
    control.gate.close();
    let mut stage = stage.lock().unwrap_or_else(PoisonError::into_inner);
    let fits = stage.resize(size.0, size.1)?;
    if fits {
        control.gate.open();
    }
    info!("resized to {}x{} (gate {})", size.0, size.1, if fits { "open" } else { "closed" });
    Ok(fits)
}
