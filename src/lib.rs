//! TUI Defrag (workspace facade crate).
//!
//! Exposes `tui_defrag::{types,core,engine,term,input,runtime}` while the
//! implementation lives in dedicated crates under `crates/`.

pub use tui_defrag_core as core;
pub use tui_defrag_engine as engine;
pub use tui_defrag_input as input;
pub use tui_defrag_runtime as runtime;
pub use tui_defrag_term as term;
pub use tui_defrag_types as types;
