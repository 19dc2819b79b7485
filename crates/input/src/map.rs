//! Mapping from terminal events to input events.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What the foreground loop needs to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Quit key or Ctrl-C.
    Quit,
    /// Terminal reported new dimensions `(width, height)`.
    Resize(u16, u16),
    /// Timeout or an event nobody cares about.
    Idle,
}

/// Check if key should quit the animation.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(
        key.code,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
    ) || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Classify a raw terminal event.
pub fn map_event(event: Event) -> InputEvent {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release && should_quit(key) => {
            InputEvent::Quit
        }
        Event::Resize(w, h) => InputEvent::Resize(w, h),
        _ => InputEvent::Idle,
    }
}

/// Wait up to `timeout` for one terminal event.
pub fn poll_input(timeout: Duration) -> Result<InputEvent> {
    if event::poll(timeout)? {
        return Ok(map_event(event::read()?));
    }
    Ok(InputEvent::Idle)
}
