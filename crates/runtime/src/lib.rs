//! Runtime module - threads, shared state and configuration
//!
//! Glues the engine and the terminal together:
//!
//! - [`stage`]: the mutex-guarded bundle of port, engine and layout
//! - [`pulse`]: background thread ticking the stage at a fixed interval
//! - [`control`]: readiness gate and interruptible stop signal
//! - [`resize`]: resize detection and gated stage rebuilds
//! - [`poll`]: tolerance for transient input poll failures
//! - [`config`]: environment-driven settings

pub mod config;
pub mod control;
pub mod poll;
pub mod pulse;
pub mod resize;
pub mod stage;

pub use tui_defrag_core as core;
pub use tui_defrag_engine as engine;
pub use tui_defrag_input as input;
pub use tui_defrag_term as term;
pub use tui_defrag_types as types;

pub use config::RuntimeConfig;
pub use control::{Control, ReadinessGate, StopSignal};
pub use poll::{PollFailures, MAX_POLL_FAILURES};
pub use pulse::{run_pulse_loop, spawn_pulse, Pulse, PulseHandle};
pub use resize::{apply_resize, ResizeMonitor};
pub use stage::Stage;
