//! Terminal surface module.
//!
//! Everything that knows what a terminal looks like lives here:
//!
//! - [`port`]: crossterm-backed [`RenderPort`](tui_defrag_core::RenderPort)
//! - [`layout`]: pure geometry of the defrag box and the two panels
//! - [`panels`]: status/information text with per-character diffing
//! - [`throttle`]: refresh limiter for the status panel
//!
//! Only [`port`] performs I/O; the rest is pure and unit-tested against
//! [`MemoryPort`](tui_defrag_core::MemoryPort).

pub mod layout;
pub mod panels;
pub mod port;
pub mod throttle;

pub use tui_defrag_core as core;
pub use tui_defrag_types as types;

pub use layout::{draw_too_small, fits, min_size, BlockKind, Layout, TextBlock};
pub use panels::{info_lines, StatusPanel, StatusView, TextPanel};
pub use port::CrosstermPort;
pub use throttle::RenderThrottle;
