//! Instrument cluster core - platform-independent logic for the dual-display
//! vehicle instrument simulator.
//!
//! This crate holds everything that can be tested on the host: the vehicle
//! simulation, the input/output adapters, the display driver abstraction and the
//! gauge renderer. The desktop simulator (`simulator/`) and the RP2350 firmware
//! (`pico2/`) only supply a clock, pins and draw targets.
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test
//! ```
//!
//! Tests run with `std` enabled (via `cfg_attr`), allowing use of the standard
//! test framework while the firmware build stays `no_std`.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

// === Time, configuration, errors ===
pub mod clock;
pub mod config;
pub mod error;

// === Simulation ===
pub mod idle;
pub mod input;
pub mod vehicle;

// === Rendering ===
pub mod colors;
pub mod display;
pub mod render;
pub mod widgets;

// === Outputs and glue ===
pub mod cluster;
pub mod outputs;

pub use clock::Millis;
pub use cluster::{Cluster, FuelNotice, fuel_notice};
pub use config::SimConfig;
pub use display::{DisplayDriver, Font, NoBacklight, Panel};
pub use error::{ClusterError, Result};
pub use input::{AccelLatch, InputSnapshot, InputSource, LineLevels, PinInputs, PolledInputs};
pub use outputs::{GpioOutputs, OutputSink};
pub use render::{GaugeRenderer, GaugeStyle, RenderState};
pub use vehicle::{OutputEvent, VehicleSim, VehicleState};
