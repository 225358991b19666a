//! Falling-block puzzle simulation (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so integration tests, benches
//! and the binary can use `tetris_sim::{types,core,engine,adapter}`.

pub use tetris_sim_adapter as adapter;
pub use tetris_sim_core as core;
pub use tetris_sim_engine as engine;
pub use tetris_sim_types as types;
