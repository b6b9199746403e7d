//! Idle RPM wobble.
//!
//! A stationary engine does not sit on a perfectly flat idle. The tachometer gets a
//! slow sinusoidal wobble plus a small jitter layered on `idle_rpm`:
//!
//! ```text
//! rpm = idle_rpm + wobble_amp * sin(2π t / wobble_period) + jitter(t / noise_period)
//! ```
//!
//! The jitter is a xorshift hash of the time bucket, so the same instant always maps
//! to the same RPM and the deviation never exceeds `wobble_amp + noise_amp`.

use core::f32::consts::TAU;

#[cfg(not(test))]
use micromath::F32Ext;

use crate::clock::Millis;
use crate::config::SimConfig;

/// Idle RPM (wobble + jitter) at instant `now`, clamped to `0..=max_rpm`.
pub fn idle_rpm_at(
    config: &SimConfig,
    now: Millis,
) -> u16 {
    let t = now.as_millis();
    let wobble_period = config.idle_wobble_period_ms.max(1);

    let phase = (t % wobble_period) as f32 / wobble_period as f32;
    let wave = (phase * TAU).sin().clamp(-1.0, 1.0);
    let wobble = f32::from(config.idle_wobble_amplitude) * wave;

    let noise = jitter(t / config.idle_noise_period_ms.max(1), config.idle_noise_amplitude);

    let rpm = f32::from(config.idle_rpm) + wobble + noise as f32;
    rpm.clamp(0.0, f32::from(config.max_rpm)) as u16
}

/// Deterministic jitter in `-amplitude..=amplitude` for a time bucket.
fn jitter(
    key: u32,
    amplitude: u16,
) -> i32 {
    if amplitude == 0 {
        return 0;
    }

    // xorshift32 over a scrambled key; zero is a fixed point so avoid it
    let mut x = key.wrapping_mul(0x9E37_79B9) ^ 0x5BD1_E995;
    if x == 0 {
        x = 1;
    }
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;

    let span = 2 * u32::from(amplitude) + 1;
    (x % span) as i32 - i32::from(amplitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_within_amplitude() {
        let config = SimConfig::DEFAULT;
        let bound = i32::from(config.idle_wobble_amplitude) + i32::from(config.idle_noise_amplitude);

        for t in (0..20_000).step_by(7) {
            let rpm = idle_rpm_at(&config, Millis::new(t));
            let deviation = (i32::from(rpm) - i32::from(config.idle_rpm)).abs();
            assert!(deviation <= bound, "t={t}: rpm {rpm} strays {deviation} from idle");
        }
    }

    #[test]
    fn test_idle_deterministic() {
        let config = SimConfig::DEFAULT;
        for t in [0, 37, 120, 999, 123_456] {
            assert_eq!(idle_rpm_at(&config, Millis::new(t)), idle_rpm_at(&config, Millis::new(t)));
        }
    }

    #[test]
    fn test_idle_actually_wobbles() {
        let config = SimConfig::DEFAULT;
        let first = idle_rpm_at(&config, Millis::new(0));
        let varies = (1..50).any(|i| idle_rpm_at(&config, Millis::new(i * config.idle_update_ms)) != first);
        assert!(varies);
    }

    #[test]
    fn test_flat_idle_without_amplitudes() {
        let config = SimConfig {
            idle_wobble_amplitude: 0,
            idle_noise_amplitude: 0,
            ..SimConfig::DEFAULT
        };
        for t in (0..5_000).step_by(120) {
            assert_eq!(idle_rpm_at(&config, Millis::new(t)), config.idle_rpm);
        }
    }

    #[test]
    fn test_zero_periods_do_not_divide_by_zero() {
        let config = SimConfig {
            idle_wobble_period_ms: 0,
            idle_noise_period_ms: 0,
            ..SimConfig::DEFAULT
        };
        for t in [0, 1, 750, 123_456] {
            let rpm = idle_rpm_at(&config, Millis::new(t));
            assert!(rpm <= config.max_rpm);
        }
    }

    #[test]
    fn test_jitter_bounds() {
        for key in 0..1_000 {
            let value = jitter(key, 15);
            assert!((-15..=15).contains(&value));
        }
        assert_eq!(jitter(42, 0), 0);
    }
}
