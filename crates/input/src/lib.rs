//! Terminal input module.
//!
//! The animation only cares about two things from the keyboard and the
//! terminal: "quit" and "the size changed". This crate maps `crossterm` events
//! into [`InputEvent`] and wraps the bounded-timeout poll used by the
//! foreground loop.

pub mod map;

pub use map::{map_event, poll_input, should_quit, InputEvent};
