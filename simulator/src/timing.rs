//! Timing constants for the simulator.
//!
//! These constants use `std::time::Duration` which is not available in `no_std`
//! environments, so they are defined here rather than in the core crate.

use std::time::Duration;

use instrument_cluster::config::TICK_MS;

/// Simulation tick. The main loop sleeps if a tick completes early.
pub const TICK: Duration = Duration::from_millis(TICK_MS as u64);
