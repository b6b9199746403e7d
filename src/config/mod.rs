//! Simulation configuration.
//!
//! - `layout`: Display geometry for the cluster and info panels
//!
//! Every tunable of the vehicle simulation lives in [`SimConfig`]. The defaults are
//! compile-time constants, re-exported individually so firmware code can use them in
//! `const` contexts.

pub mod layout;

use crate::error::{ClusterError, Result};

// =============================================================================
// Tick Configuration
// =============================================================================

/// Main loop period in milliseconds.
pub const TICK_MS: u32 = 10;

/// Button debounce window in milliseconds.
pub const DEBOUNCE_MS: u32 = 50;

// =============================================================================
// Vehicle Defaults
// =============================================================================

/// Top speed in km/h.
pub const MAX_SPEED: f32 = 200.0;

/// Redline RPM (full scale of the tachometer).
pub const MAX_RPM: u16 = 8000;

/// Engine idle RPM (stationary, fuelled).
pub const IDLE_RPM: u16 = 800;

/// Speed gained per accelerate press (km/h).
pub const ACCELERATE_STEP: f32 = 5.0;

/// Speed lost per tick while refuel is held in motion (km/h).
pub const BRAKE_STEP: f32 = 2.0;

/// Speed lost per decay interval with fuel in the tank (km/h).
pub const DECAY_STEP: f32 = 1.0;

/// Speed lost per decay interval on an empty tank (stall-coast, km/h).
pub const EMPTY_DECAY_STEP: f32 = 3.0;

/// Interval between speed decay steps.
pub const DECAY_INTERVAL_MS: u32 = 200;

// =============================================================================
// Fuel Defaults
// =============================================================================

/// Fuel gained per whole second of refuelling (percent).
pub const REFUEL_RATE_PER_SEC: f32 = 10.0;

/// Fuel burned per second at idle RPM (percent).
pub const FUEL_BASE_PER_SEC: f32 = 0.05;

/// Fuel burned per second at redline (percent).
pub const FUEL_MAX_PER_SEC: f32 = 0.6;

// =============================================================================
// Indicator Defaults
// =============================================================================

/// Low-fuel buzzer toggle period.
pub const BUZZER_INTERVAL_MS: u32 = 400;

/// Turn signal blink toggle period.
pub const BLINK_INTERVAL_MS: u32 = 500;

// =============================================================================
// Idle Wobble Defaults
// =============================================================================

/// Interval between idle RPM refreshes.
pub const IDLE_UPDATE_MS: u32 = 120;

/// Peak RPM deviation of the sinusoidal idle wobble.
pub const IDLE_WOBBLE_AMPLITUDE: u16 = 40;

/// Period of one full idle wobble cycle.
pub const IDLE_WOBBLE_PERIOD_MS: u32 = 1500;

/// Peak RPM deviation of the idle jitter.
pub const IDLE_NOISE_AMPLITUDE: u16 = 15;

/// Jitter is re-keyed once per this many milliseconds.
pub const IDLE_NOISE_PERIOD_MS: u32 = 37;

/// Tunables of the vehicle simulation.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SimConfig {
    pub max_speed: f32,
    pub max_rpm: u16,
    pub idle_rpm: u16,
    pub accelerate_step: f32,
    pub brake_step: f32,
    pub decay_step: f32,
    pub empty_decay_step: f32,
    pub decay_interval_ms: u32,
    pub refuel_rate_per_sec: f32,
    pub fuel_base_per_sec: f32,
    pub fuel_max_per_sec: f32,
    pub buzzer_interval_ms: u32,
    pub blink_interval_ms: u32,
    pub idle_update_ms: u32,
    pub idle_wobble_amplitude: u16,
    pub idle_wobble_period_ms: u32,
    pub idle_noise_amplitude: u16,
    pub idle_noise_period_ms: u32,
}

impl SimConfig {
    /// Compile-time defaults.
    pub const DEFAULT: Self = Self {
        max_speed: MAX_SPEED,
        max_rpm: MAX_RPM,
        idle_rpm: IDLE_RPM,
        accelerate_step: ACCELERATE_STEP,
        brake_step: BRAKE_STEP,
        decay_step: DECAY_STEP,
        empty_decay_step: EMPTY_DECAY_STEP,
        decay_interval_ms: DECAY_INTERVAL_MS,
        refuel_rate_per_sec: REFUEL_RATE_PER_SEC,
        fuel_base_per_sec: FUEL_BASE_PER_SEC,
        fuel_max_per_sec: FUEL_MAX_PER_SEC,
        buzzer_interval_ms: BUZZER_INTERVAL_MS,
        blink_interval_ms: BLINK_INTERVAL_MS,
        idle_update_ms: IDLE_UPDATE_MS,
        idle_wobble_amplitude: IDLE_WOBBLE_AMPLITUDE,
        idle_wobble_period_ms: IDLE_WOBBLE_PERIOD_MS,
        idle_noise_amplitude: IDLE_NOISE_AMPLITUDE,
        idle_noise_period_ms: IDLE_NOISE_PERIOD_MS,
    };

    /// Check that the configuration keeps every clamp invariant reachable.
    ///
    /// # Errors
    ///
    /// Returns `ClusterError::InvalidConfig` naming the first offending option.
    #[allow(clippy::neg_cmp_op_on_partial_ord)] // NaN must fail every check
    pub fn validate(&self) -> Result<()> {
        if !(self.max_speed > 0.0) {
            return Err(ClusterError::InvalidConfig("max_speed must be positive"));
        }
        if self.max_rpm <= self.idle_rpm {
            return Err(ClusterError::InvalidConfig("max_rpm must exceed idle_rpm"));
        }
        let steps = [
            self.accelerate_step,
            self.brake_step,
            self.decay_step,
            self.empty_decay_step,
        ];
        if steps.iter().any(|step| !(*step >= 0.0)) {
            return Err(ClusterError::InvalidConfig("speed steps must be non-negative"));
        }
        let intervals = [
            self.decay_interval_ms,
            self.buzzer_interval_ms,
            self.blink_interval_ms,
            self.idle_update_ms,
            self.idle_wobble_period_ms,
            self.idle_noise_period_ms,
        ];
        if intervals.contains(&0) {
            return Err(ClusterError::InvalidConfig("intervals must be non-zero"));
        }
        if !(self.refuel_rate_per_sec >= 0.0) {
            return Err(ClusterError::InvalidConfig("refuel rate must be non-negative"));
        }
        if !(self.fuel_base_per_sec >= 0.0) || !(self.fuel_base_per_sec <= self.fuel_max_per_sec) {
            return Err(ClusterError::InvalidConfig("fuel burn rates must satisfy 0 <= base <= max"));
        }
        let swing = u32::from(self.idle_wobble_amplitude) + u32::from(self.idle_noise_amplitude);
        if swing > u32::from(self.idle_rpm) || u32::from(self.idle_rpm) + swing > u32::from(self.max_rpm) {
            return Err(ClusterError::InvalidConfig("idle wobble exceeds rpm range"));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self { Self::DEFAULT }
}
