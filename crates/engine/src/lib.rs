//! Engine module - the game clock.
//!
//! Bridges a pure [`Session`](tetris_sim_core::Session) to any timer service.
//! The engine exposes discrete handlers (`on_tick`, `on_input`,
//! `on_interval_change`) and never blocks. Each handler runs to completion
//! before the next is dispatched, so a tick can never observe a half-applied
//! input and vice versa.
//!
//! - [`clock`]: [`GameClock`], the [`Scheduler`] interface and tick tokens
//! - [`virtual_time`]: [`VirtualScheduler`], deterministic time for headless runs

pub mod clock;
pub mod virtual_time;

pub use tetris_sim_core as core;
pub use tetris_sim_types as types;

pub use clock::{Driver, GameClock, Scheduler, TickOutcome, TickToken};
pub use virtual_time::VirtualScheduler;
