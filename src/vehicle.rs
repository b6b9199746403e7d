//! Vehicle simulation core.
//!
//! [`VehicleSim`] owns the whole vehicle state and advances it once per tick from an
//! [`InputSnapshot`] and the current instant. It never touches a display or a pin:
//! everything the outside world needs comes back in an [`OutputEvent`].
//!
//! # Tick Pipeline
//!
//! Stages run in a fixed order; earlier stages can suppress later ones.
//!
//! 1. **Fuel gate** - an empty tank discards the accelerate edge.
//! 2. **Refuel vs. drive** - refuel held: brake while moving, accrue whole seconds of
//!    fuel while stopped. Refuel released: apply the accelerate edge.
//! 3. **Decay** - speed bleeds off every `decay_interval_ms` (faster on an empty tank).
//! 4. **Fuel burn** - while driving, burn fuel at a rate interpolated by RPM.
//! 5. **Buzzer** - toggles every `buzzer_interval_ms` on an empty tank, off otherwise.
//! 6. **Turn signals** - shared blink phase toggles while either button is held.
//! 7. **Idle wobble** - stationary, fuelled and not refuelling: refresh the idle RPM.
//! 8. **RPM** - recompute from final speed and fuel.
//!
//! # Timers
//!
//! Each periodic effect remembers the instant it last fired. Decay, buzzer, blink and
//! idle fire at most once per tick and restart from `now`. Refuel advances its timer
//! only by the whole seconds it consumed, so fractional seconds carry over. The burn
//! timer is reset whenever burning is inactive so a long pause never burns in one go.

use crate::clock::Millis;
use crate::config::SimConfig;
use crate::idle::idle_rpm_at;
use crate::input::InputSnapshot;

/// Mutable vehicle record, exclusively owned by [`VehicleSim`].
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VehicleState {
    /// Current speed, `0..=max_speed`.
    pub speed_kmh: f32,
    /// Current RPM, `0..=max_rpm`; zero whenever the tank is empty.
    pub rpm: u16,
    /// Fuel level, `0.0..=100.0`.
    pub fuel_percent: f32,
    /// Blink phase shared by both turn signals.
    pub turn_blink_state: bool,
    /// Low-fuel buzzer phase.
    pub buzzer_state: bool,
    pub last_decay: Millis,
    pub last_refuel: Millis,
    pub last_fuel_burn: Millis,
    pub last_blink: Millis,
    pub last_buzzer: Millis,
    pub last_idle_update: Millis,
}

impl VehicleState {
    /// Stopped with an empty tank, every timer starting at `now`.
    pub const fn new(now: Millis) -> Self {
        Self {
            speed_kmh: 0.0,
            rpm: 0,
            fuel_percent: 0.0,
            turn_blink_state: false,
            buzzer_state: false,
            last_decay: now,
            last_refuel: now,
            last_fuel_burn: now,
            last_blink: now,
            last_buzzer: now,
            last_idle_update: now,
        }
    }
}

/// Everything the renderer and output sink need after one tick.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputEvent {
    pub speed: f32,
    pub rpm: u16,
    pub fuel_percent: f32,
    /// Left LED / arrow lit this tick.
    pub left_on: bool,
    /// Right LED / arrow lit this tick.
    pub right_on: bool,
    /// Buzzer line driven this tick.
    pub buzzer_on: bool,
    /// Refuel, acceleration, decay or burn changed speed or fuel this tick.
    pub changed: bool,
    /// The idle refresh produced a new wobbled RPM this tick.
    pub idle_rpm_changed: bool,
    /// RPM differs from the previous tick (covers the idle-to-baseline switch).
    pub rpm_changed: bool,
}

impl OutputEvent {
    /// Whether the gauge (needle/segments and readouts) needs a redraw.
    #[inline]
    pub const fn gauge_dirty(&self) -> bool { self.changed || self.idle_rpm_changed || self.rpm_changed }
}

/// Baseline RPM curve.
///
/// - empty tank: `0`
/// - stopped: `idle_rpm` (the wobbled value comes from [`idle_rpm_at`])
/// - moving: linear from `idle_rpm` at standstill to `max_rpm` at `max_speed`
pub fn compute_rpm(
    config: &SimConfig,
    speed: f32,
    fuel: f32,
) -> u16 {
    if fuel <= 0.0 {
        return 0;
    }
    if speed <= 0.0 || config.max_speed <= 0.0 {
        return config.idle_rpm;
    }

    // Multiply before dividing so exact ratios (5 of 200 km/h) stay exact
    let span = f32::from(config.max_rpm.saturating_sub(config.idle_rpm));
    let scaled = (speed.min(config.max_speed) * span / config.max_speed).clamp(0.0, span);
    config.idle_rpm + scaled as u16
}

/// Deterministic vehicle state machine.
pub struct VehicleSim {
    config: SimConfig,
    state: VehicleState,
    /// Wobbled idle RPM from the previous idle refresh.
    idle_rpm: u16,
}

impl VehicleSim {
    /// Create a stopped vehicle with an empty tank.
    ///
    /// The config is taken as-is; [`SimConfig::validate`] is the caller's job
    /// ([`Cluster::new`](crate::cluster::Cluster::new) does it). An invalid config
    /// gives meaningless numbers but never panics.
    pub fn new(
        config: SimConfig,
        now: Millis,
    ) -> Self {
        Self {
            config,
            state: VehicleState::new(now),
            idle_rpm: config.idle_rpm,
        }
    }

    /// Start with `percent` fuel in the tank (clamped to `0..=100`).
    #[must_use]
    pub fn with_fuel(
        mut self,
        percent: f32,
    ) -> Self {
        self.state.fuel_percent = percent.clamp(0.0, 100.0);
        self.state.rpm = compute_rpm(&self.config, self.state.speed_kmh, self.state.fuel_percent);
        self
    }

    #[inline]
    pub const fn state(&self) -> &VehicleState { &self.state }

    #[inline]
    pub const fn config(&self) -> &SimConfig { &self.config }

    /// Advance the simulation to `now` with this tick's inputs.
    pub fn advance(
        &mut self,
        now: Millis,
        inputs: InputSnapshot,
    ) -> OutputEvent {
        let mut accelerate = inputs.accelerate_pressed;
        let mut changed = false;
        let previous_rpm = self.state.rpm;

        // 1. No acceleration on an empty tank
        if self.state.fuel_percent <= 0.0 {
            accelerate = false;
        }

        // 2. Refuel and drive are mutually exclusive
        if inputs.refuel_held {
            changed |= self.refuel_or_brake(now);
        } else {
            self.state.last_refuel = now;
            if accelerate {
                changed |= self.accelerate();
            }
        }

        // 3-4
        changed |= self.decay(now);
        changed |= self.burn_fuel(now, inputs.refuel_held);

        // 5-6
        self.update_buzzer(now);
        let any_turn = inputs.turn_left_held || inputs.turn_right_held;
        self.update_blink(now, any_turn);

        // 7. Idle wobble
        let idling = self.state.speed_kmh <= 0.0 && self.state.fuel_percent > 0.0 && !inputs.refuel_held;
        let idle_rpm_changed = idling && self.update_idle(now);

        // 8
        self.state.rpm = if idling {
            self.idle_rpm
        } else {
            compute_rpm(&self.config, self.state.speed_kmh, self.state.fuel_percent)
        };

        OutputEvent {
            speed: self.state.speed_kmh,
            rpm: self.state.rpm,
            fuel_percent: self.state.fuel_percent,
            left_on: inputs.turn_left_held && self.state.turn_blink_state,
            right_on: inputs.turn_right_held && self.state.turn_blink_state,
            buzzer_on: self.state.buzzer_state,
            changed,
            idle_rpm_changed,
            rpm_changed: self.state.rpm != previous_rpm,
        }
    }

    /// Refuel held: brake toward zero while moving, otherwise accrue whole seconds.
    fn refuel_or_brake(
        &mut self,
        now: Millis,
    ) -> bool {
        if self.state.speed_kmh > 0.0 {
            let before = self.state.speed_kmh;
            self.state.speed_kmh = (before - self.config.brake_step).max(0.0);
            self.state.last_refuel = now;
            return self.state.speed_kmh != before;
        }

        let whole_secs = now.since(self.state.last_refuel) / 1000;
        if whole_secs == 0 {
            return false;
        }
        self.state.last_refuel = self.state.last_refuel.add_ms(whole_secs * 1000);

        let before = self.state.fuel_percent;
        let gained = whole_secs as f32 * self.config.refuel_rate_per_sec;
        self.state.fuel_percent = (before + gained).min(100.0);
        self.state.fuel_percent != before
    }

    fn accelerate(&mut self) -> bool {
        let before = self.state.speed_kmh;
        if before >= self.config.max_speed {
            return false;
        }
        self.state.speed_kmh = (before + self.config.accelerate_step).min(self.config.max_speed);
        self.state.speed_kmh != before
    }

    fn decay(
        &mut self,
        now: Millis,
    ) -> bool {
        if now.since(self.state.last_decay) < self.config.decay_interval_ms {
            return false;
        }
        self.state.last_decay = now;

        if self.state.speed_kmh <= 0.0 {
            return false;
        }
        let step = if self.state.fuel_percent <= 0.0 {
            self.config.empty_decay_step
        } else {
            self.config.decay_step
        };
        let before = self.state.speed_kmh;
        self.state.speed_kmh = (before - step).max(0.0);
        self.state.speed_kmh != before
    }

    fn burn_fuel(
        &mut self,
        now: Millis,
        refueling: bool,
    ) -> bool {
        let burning = !refueling && self.state.speed_kmh > 0.0 && self.state.fuel_percent > 0.0;
        if !burning {
            self.state.last_fuel_burn = now;
            return false;
        }

        let elapsed_ms = now.since(self.state.last_fuel_burn);
        self.state.last_fuel_burn = now;

        let rpm = compute_rpm(&self.config, self.state.speed_kmh, self.state.fuel_percent);
        let ratio = if self.config.max_rpm == 0 {
            0.0
        } else {
            (f32::from(rpm) / f32::from(self.config.max_rpm)).clamp(0.0, 1.0)
        };
        let per_sec =
            self.config.fuel_base_per_sec + (self.config.fuel_max_per_sec - self.config.fuel_base_per_sec) * ratio;
        let burned = per_sec * elapsed_ms as f32 / 1000.0;
        if burned <= 0.0 {
            return false;
        }

        let before = self.state.fuel_percent;
        self.state.fuel_percent = (before - burned).max(0.0);
        self.state.fuel_percent != before
    }

    fn update_buzzer(
        &mut self,
        now: Millis,
    ) {
        if self.state.fuel_percent > 0.0 {
            self.state.buzzer_state = false;
            return;
        }
        if now.since(self.state.last_buzzer) >= self.config.buzzer_interval_ms {
            self.state.last_buzzer = now;
            self.state.buzzer_state = !self.state.buzzer_state;
        }
    }

    fn update_blink(
        &mut self,
        now: Millis,
        any_turn_held: bool,
    ) {
        if !any_turn_held {
            self.state.turn_blink_state = false;
            return;
        }
        if now.since(self.state.last_blink) >= self.config.blink_interval_ms {
            self.state.last_blink = now;
            self.state.turn_blink_state = !self.state.turn_blink_state;
        }
    }

    /// Refresh the wobbled idle RPM; true if it differs from the previous refresh.
    fn update_idle(
        &mut self,
        now: Millis,
    ) -> bool {
        if now.since(self.state.last_idle_update) < self.config.idle_update_ms {
            return false;
        }
        self.state.last_idle_update = now;

        let rpm = idle_rpm_at(&self.config, now);
        if rpm == self.idle_rpm {
            return false;
        }
        self.idle_rpm = rpm;
        true
    }
}

// =============================================================================
// Unit Tests (run on host with: cargo test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TICK_MS;

    const IDLE: InputSnapshot = InputSnapshot {
        accelerate_pressed: false,
        refuel_held: false,
        turn_left_held: false,
        turn_right_held: false,
    };

    const ACCEL: InputSnapshot = InputSnapshot {
        accelerate_pressed: true,
        ..IDLE
    };

    const REFUEL: InputSnapshot = InputSnapshot {
        refuel_held: true,
        ..IDLE
    };

    fn flat_config() -> SimConfig {
        SimConfig {
            idle_wobble_amplitude: 0,
            idle_noise_amplitude: 0,
            ..SimConfig::DEFAULT
        }
    }

    /// Advance every tick from `from` (exclusive) to `to` (inclusive).
    fn run(
        sim: &mut VehicleSim,
        from: u32,
        to: u32,
        inputs: InputSnapshot,
    ) -> OutputEvent {
        let mut t = from;
        let mut event = sim.advance(Millis::new(from), inputs);
        while t < to {
            t += TICK_MS;
            event = sim.advance(Millis::new(t), inputs);
        }
        event
    }

    // -------------------------------------------------------------------------
    // RPM Curve Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_rpm_curve_scenario() {
        let config = SimConfig::DEFAULT;
        assert_eq!(compute_rpm(&config, 5.0, 100.0), 980);
    }

    #[test]
    fn test_rpm_curve_edges() {
        let config = SimConfig::DEFAULT;
        assert_eq!(compute_rpm(&config, 100.0, 0.0), 0, "empty tank");
        assert_eq!(compute_rpm(&config, 0.0, 50.0), config.idle_rpm);
        assert_eq!(compute_rpm(&config, config.max_speed, 50.0), config.max_rpm);
        assert_eq!(compute_rpm(&config, 1_000.0, 50.0), config.max_rpm, "over-range speed clamps");
        assert_eq!(compute_rpm(&config, 100.0, 50.0), 4400);
    }

    // -------------------------------------------------------------------------
    // Startup
    // -------------------------------------------------------------------------

    #[test]
    fn test_starts_stopped_and_empty() {
        let sim = VehicleSim::new(SimConfig::DEFAULT, Millis::ZERO);
        assert_eq!(sim.state().speed_kmh, 0.0);
        assert_eq!(sim.state().fuel_percent, 0.0);
        assert_eq!(sim.state().rpm, 0);
    }

    #[test]
    fn test_with_fuel_clamps() {
        let sim = VehicleSim::new(SimConfig::DEFAULT, Millis::ZERO).with_fuel(250.0);
        assert_eq!(sim.state().fuel_percent, 100.0);
        assert_eq!(sim.state().rpm, SimConfig::DEFAULT.idle_rpm);
    }

    // -------------------------------------------------------------------------
    // Acceleration
    // -------------------------------------------------------------------------

    #[test]
    fn test_accelerate_once() {
        let mut sim = VehicleSim::new(SimConfig::DEFAULT, Millis::ZERO).with_fuel(100.0);
        let event = sim.advance(Millis::new(10), ACCEL);
        assert!(event.changed);
        assert_eq!(event.speed, 5.0);
        assert_eq!(event.rpm, 980);
    }

    #[test]
    fn test_accelerate_on_empty_tank_ignored() {
        let mut sim = VehicleSim::new(SimConfig::DEFAULT, Millis::ZERO);
        let event = sim.advance(Millis::new(10), ACCEL);
        assert_eq!(event.speed, 0.0);
        assert!(!event.changed);
        assert_eq!(event.rpm, 0);
    }

    #[test]
    fn test_accelerate_clamps_to_max_speed() {
        let config = SimConfig::DEFAULT;
        let mut sim = VehicleSim::new(config, Millis::ZERO).with_fuel(100.0);
        // 50 presses inside one decay window would overshoot 200 km/h
        for i in 1..=50 {
            sim.advance(Millis::new(i), ACCEL);
        }
        assert_eq!(sim.state().speed_kmh, config.max_speed);
        assert_eq!(sim.state().rpm, config.max_rpm);

        let event = sim.advance(Millis::new(60), ACCEL);
        assert_eq!(event.speed, config.max_speed, "accelerating at top speed is a no-op");
    }

    #[test]
    fn test_refuel_discards_accelerate_edge() {
        let mut sim = VehicleSim::new(SimConfig::DEFAULT, Millis::ZERO).with_fuel(50.0);
        let inputs = InputSnapshot {
            accelerate_pressed: true,
            refuel_held: true,
            ..IDLE
        };
        let event = sim.advance(Millis::new(10), inputs);
        assert_eq!(event.speed, 0.0);
    }

    // -------------------------------------------------------------------------
    // Refuel
    // -------------------------------------------------------------------------

    #[test]
    fn test_refuel_one_second_gains_exact_rate() {
        let config = SimConfig::DEFAULT;
        let mut sim = VehicleSim::new(config, Millis::ZERO);
        let event = run(&mut sim, 0, 990, REFUEL);
        assert_eq!(event.fuel_percent, 0.0);

        let event = sim.advance(Millis::new(1000), REFUEL);
        assert!(event.changed);
        assert_eq!(event.fuel_percent, config.refuel_rate_per_sec);
    }

    #[test]
    fn test_refuel_carries_fractional_second() {
        let config = SimConfig::DEFAULT;
        let mut sim = VehicleSim::new(config, Millis::ZERO);

        // Single late tick: 2.5 s elapsed, 2 s credited, 500 ms carried
        let event = sim.advance(Millis::new(2_500), REFUEL);
        assert_eq!(event.fuel_percent, 2.0 * config.refuel_rate_per_sec);
        assert_eq!(sim.state().last_refuel, Millis::new(2_000));

        // The carried 500 ms completes the third second at 3000
        let event = sim.advance(Millis::new(2_990), REFUEL);
        assert_eq!(event.fuel_percent, 2.0 * config.refuel_rate_per_sec);
        let event = sim.advance(Millis::new(3_000), REFUEL);
        assert_eq!(event.fuel_percent, 3.0 * config.refuel_rate_per_sec);
    }

    #[test]
    fn test_refuel_caps_at_full() {
        let mut sim = VehicleSim::new(SimConfig::DEFAULT, Millis::ZERO).with_fuel(95.0);
        let event = sim.advance(Millis::new(1_000), REFUEL);
        assert_eq!(event.fuel_percent, 100.0);
        assert!(event.changed);

        let event = sim.advance(Millis::new(5_000), REFUEL);
        assert_eq!(event.fuel_percent, 100.0);
        assert!(!event.changed, "a full tank does not change");
    }

    #[test]
    fn test_refuel_release_resets_accrual() {
        let config = SimConfig::DEFAULT;
        let mut sim = VehicleSim::new(config, Millis::ZERO);
        sim.advance(Millis::new(900), REFUEL);
        sim.advance(Millis::new(910), IDLE);
        // Re-pressing must not credit the 910 ms before the release
        let event = sim.advance(Millis::new(1_500), REFUEL);
        assert_eq!(event.fuel_percent, 0.0);
        let event = sim.advance(Millis::new(1_910), REFUEL);
        assert_eq!(event.fuel_percent, config.refuel_rate_per_sec);
    }

    #[test]
    fn test_refuel_while_moving_brakes_without_fuel_gain() {
        let config = SimConfig::DEFAULT;
        let mut sim = VehicleSim::new(config, Millis::ZERO).with_fuel(50.0);
        for i in 1..=6 {
            sim.advance(Millis::new(i), ACCEL);
        }
        assert_eq!(sim.state().speed_kmh, 30.0);

        let mut previous_speed = sim.state().speed_kmh;
        let previous_fuel = sim.state().fuel_percent;
        let mut t = 10;
        while sim.state().speed_kmh > 0.0 {
            t += TICK_MS;
            let event = sim.advance(Millis::new(t), REFUEL);
            assert!(event.speed < previous_speed, "speed must strictly fall while braking");
            assert!(event.fuel_percent <= previous_fuel, "no fuel gained while moving");
            previous_speed = event.speed;
        }
        assert_eq!(sim.state().fuel_percent, previous_fuel);
    }

    // -------------------------------------------------------------------------
    // Decay and Burn
    // -------------------------------------------------------------------------

    #[test]
    fn test_decay_every_interval() {
        let config = SimConfig::DEFAULT;
        let mut sim = VehicleSim::new(config, Millis::ZERO).with_fuel(100.0);
        sim.advance(Millis::new(10), ACCEL);

        let event = sim.advance(Millis::new(190), IDLE);
        assert_eq!(event.speed, 5.0);
        let event = sim.advance(Millis::new(200), IDLE);
        assert_eq!(event.speed, 5.0 - config.decay_step);
        assert!(event.changed);
    }

    #[test]
    fn test_empty_tank_coasts_faster() {
        let config = SimConfig::DEFAULT;
        let mut sim = VehicleSim::new(config, Millis::ZERO).with_fuel(100.0);
        for i in 1..=4 {
            sim.advance(Millis::new(i), ACCEL);
        }
        sim.state.fuel_percent = 0.0;

        let event = sim.advance(Millis::new(200), IDLE);
        assert_eq!(event.speed, 20.0 - config.empty_decay_step);
        assert_eq!(event.rpm, 0);
    }

    #[test]
    fn test_decay_floors_at_zero() {
        let config = SimConfig {
            decay_step: 7.0,
            ..SimConfig::DEFAULT
        };
        let mut sim = VehicleSim::new(config, Millis::ZERO).with_fuel(100.0);
        sim.advance(Millis::new(10), ACCEL);
        let event = sim.advance(Millis::new(200), IDLE);
        assert_eq!(event.speed, 0.0);
    }

    #[test]
    fn test_fuel_burn_scales_with_rpm() {
        let config = SimConfig {
            decay_interval_ms: 60_000,
            ..SimConfig::DEFAULT
        };

        let mut slow = VehicleSim::new(config, Millis::ZERO).with_fuel(100.0);
        slow.advance(Millis::ZERO, ACCEL);
        slow.advance(Millis::new(1_000), IDLE);

        let mut fast = VehicleSim::new(config, Millis::ZERO).with_fuel(100.0);
        for _ in 0..40 {
            fast.advance(Millis::ZERO, ACCEL);
        }
        fast.advance(Millis::new(1_000), IDLE);

        let slow_burn = 100.0 - slow.state().fuel_percent;
        let fast_burn = 100.0 - fast.state().fuel_percent;
        assert!(slow_burn > 0.0);
        assert!(fast_burn > slow_burn);
        assert!((fast_burn - config.fuel_max_per_sec).abs() < 1e-4, "redline burns the max rate");
    }

    #[test]
    fn test_no_burst_burn_after_standstill() {
        let config = SimConfig::DEFAULT;
        let mut sim = VehicleSim::new(config, Millis::ZERO).with_fuel(100.0);
        // Stationary for a minute: burn timer keeps resetting
        run(&mut sim, 0, 60_000, IDLE);
        assert_eq!(sim.state().fuel_percent, 100.0);

        sim.advance(Millis::new(60_010), ACCEL);
        let burned = 100.0 - sim.state().fuel_percent;
        assert!(burned < 0.01, "only one tick worth of fuel may burn, got {burned}");
    }

    #[test]
    fn test_running_dry_stops_engine() {
        let config = SimConfig::DEFAULT;
        let mut sim = VehicleSim::new(config, Millis::ZERO).with_fuel(0.001);
        for _ in 0..40 {
            sim.advance(Millis::ZERO, ACCEL);
        }
        let event = sim.advance(Millis::new(1_000), IDLE);
        assert_eq!(event.fuel_percent, 0.0);
        assert_eq!(event.rpm, 0);
    }

    // -------------------------------------------------------------------------
    // Buzzer
    // -------------------------------------------------------------------------

    #[test]
    fn test_buzzer_toggles_every_interval_when_empty() {
        let config = SimConfig::DEFAULT;
        let mut sim = VehicleSim::new(config, Millis::ZERO);

        let mut expected = false;
        let mut t = 0;
        while t <= 4_000 {
            let event = sim.advance(Millis::new(t), IDLE);
            if t > 0 && t % config.buzzer_interval_ms == 0 {
                expected = !expected;
            }
            assert_eq!(event.buzzer_on, expected, "t={t}");
            t += TICK_MS;
        }
    }

    #[test]
    fn test_buzzer_silenced_by_fuel() {
        let mut sim = VehicleSim::new(SimConfig::DEFAULT, Millis::ZERO);
        let event = sim.advance(Millis::new(400), IDLE);
        assert!(event.buzzer_on);

        let event = sim.advance(Millis::new(1_400), REFUEL);
        assert!(event.fuel_percent > 0.0);
        assert!(!event.buzzer_on, "buzzer goes quiet on the tick fuel arrives");
    }

    // -------------------------------------------------------------------------
    // Turn Signals
    // -------------------------------------------------------------------------

    #[test]
    fn test_turn_signal_blinks_only_held_side() {
        let config = SimConfig::DEFAULT;
        let mut sim = VehicleSim::new(config, Millis::ZERO);
        let left = InputSnapshot {
            turn_left_held: true,
            ..IDLE
        };

        let event = sim.advance(Millis::new(500), left);
        assert!(event.left_on);
        assert!(!event.right_on);

        let event = sim.advance(Millis::new(990), left);
        assert!(event.left_on);
        let event = sim.advance(Millis::new(1_000), left);
        assert!(!event.left_on);
        let event = sim.advance(Millis::new(1_500), left);
        assert!(event.left_on);
    }

    #[test]
    fn test_turn_signal_release_clears_same_tick() {
        let mut sim = VehicleSim::new(SimConfig::DEFAULT, Millis::ZERO);
        let both = InputSnapshot {
            turn_left_held: true,
            turn_right_held: true,
            ..IDLE
        };
        let event = sim.advance(Millis::new(500), both);
        assert!(event.left_on && event.right_on);

        let event = sim.advance(Millis::new(510), IDLE);
        assert!(!event.left_on);
        assert!(!event.right_on);
        assert!(!sim.state().turn_blink_state);
    }

    // -------------------------------------------------------------------------
    // Idle Wobble
    // -------------------------------------------------------------------------

    #[test]
    fn test_idle_wobble_reports_changes() {
        let config = SimConfig::DEFAULT;
        let mut sim = VehicleSim::new(config, Millis::ZERO).with_fuel(100.0);
        let bound = config.idle_wobble_amplitude + config.idle_noise_amplitude;

        let mut saw_change = false;
        let mut t = 0;
        while t <= 5_000 {
            let event = sim.advance(Millis::new(t), IDLE);
            saw_change |= event.idle_rpm_changed;
            assert!(!event.changed, "idling changes neither speed nor fuel");
            assert!(event.rpm.abs_diff(config.idle_rpm) <= bound);
            t += TICK_MS;
        }
        assert!(saw_change);
    }

    #[test]
    fn test_idle_flat_never_reports_change() {
        let config = flat_config();
        let mut sim = VehicleSim::new(config, Millis::ZERO).with_fuel(100.0);
        let event = run(&mut sim, 0, 3_000, IDLE);
        assert!(!event.idle_rpm_changed);
        assert_eq!(event.rpm, config.idle_rpm);
    }

    #[test]
    fn test_no_wobble_while_refueling() {
        let config = SimConfig::DEFAULT;
        let mut sim = VehicleSim::new(config, Millis::ZERO).with_fuel(50.0);
        let mut t = 0;
        while t <= 2_000 {
            let event = sim.advance(Millis::new(t), REFUEL);
            assert!(!event.idle_rpm_changed);
            assert_eq!(event.rpm, config.idle_rpm);
            t += TICK_MS;
        }
    }

    #[test]
    fn test_rpm_switch_on_refuel_marks_gauge_dirty() {
        let config = SimConfig::DEFAULT;
        let mut sim = VehicleSim::new(config, Millis::ZERO).with_fuel(100.0);

        let mut previous = sim.state().rpm;
        let mut t = 0;
        while t <= 6_000 {
            let inputs = if t < 3_000 { IDLE } else { REFUEL };
            let event = sim.advance(Millis::new(t), inputs);
            assert!(event.rpm == previous || event.gauge_dirty(), "t={t}: rpm moved without a redraw");
            assert_eq!(event.rpm_changed, event.rpm != previous);
            if t >= 3_000 {
                assert!(!event.changed, "full tank at standstill");
                assert_eq!(event.rpm, config.idle_rpm);
            }
            previous = event.rpm;
            t += TICK_MS;
        }
    }

    // -------------------------------------------------------------------------
    // Change Flags
    // -------------------------------------------------------------------------

    #[test]
    fn test_zero_steps_report_no_change() {
        let config = SimConfig {
            decay_step: 0.0,
            brake_step: 0.0,
            ..flat_config()
        };
        assert_eq!(config.validate(), Ok(()));

        let mut sim = VehicleSim::new(config, Millis::ZERO).with_fuel(100.0);
        assert!(sim.advance(Millis::new(10), ACCEL).changed);

        // Decay fires at 200 ms and refuel brakes, both with a zero step
        let speed = sim.state().speed_kmh;
        let fuel = sim.state().fuel_percent;
        let event = sim.advance(Millis::new(200), REFUEL);
        assert_eq!(event.speed, speed);
        assert_eq!(event.fuel_percent, fuel);
        assert!(!event.changed);
        assert!(!event.gauge_dirty());
    }

    #[test]
    fn test_zero_accelerate_step_reports_no_change() {
        let config = SimConfig {
            accelerate_step: 0.0,
            ..flat_config()
        };
        let mut sim = VehicleSim::new(config, Millis::ZERO).with_fuel(100.0);
        let event = sim.advance(Millis::new(10), ACCEL);
        assert_eq!(event.speed, 0.0);
        assert!(!event.changed);
    }

    #[test]
    fn test_unvalidated_config_does_not_panic() {
        let config = SimConfig {
            max_speed: 0.0,
            max_rpm: 500,
            idle_wobble_period_ms: 0,
            idle_noise_period_ms: 0,
            ..SimConfig::DEFAULT
        };
        assert!(config.validate().is_err());
        assert_eq!(compute_rpm(&config, 50.0, 50.0), config.idle_rpm);

        let inverted = SimConfig {
            max_rpm: 500,
            ..SimConfig::DEFAULT
        };
        assert_eq!(compute_rpm(&inverted, 100.0, 50.0), inverted.idle_rpm);

        let mut sim = VehicleSim::new(config, Millis::ZERO).with_fuel(100.0);
        let event = run(&mut sim, 0, 2_000, ACCEL);
        assert!(event.rpm <= config.idle_rpm);
    }

    // -------------------------------------------------------------------------
    // Invariants over a long mixed run
    // -------------------------------------------------------------------------

    #[test]
    fn test_clamp_invariants_hold() {
        let config = SimConfig::DEFAULT;
        let mut sim = VehicleSim::new(config, Millis::ZERO);

        let mut t = 0u32;
        for step in 0..20_000u32 {
            t += TICK_MS;
            let phase = (step / 700) % 4;
            let inputs = InputSnapshot {
                accelerate_pressed: phase == 1 && step % 3 == 0,
                refuel_held: phase == 0 || (phase == 3 && step % 5 == 0),
                turn_left_held: phase == 2,
                turn_right_held: step % 11 == 0,
            };
            let event = sim.advance(Millis::new(t), inputs);

            assert!((0.0..=config.max_speed).contains(&event.speed));
            assert!((0.0..=100.0).contains(&event.fuel_percent));
            assert!(event.rpm <= config.max_rpm);
            if event.fuel_percent <= 0.0 {
                assert_eq!(event.rpm, 0);
            }
        }
    }
}
