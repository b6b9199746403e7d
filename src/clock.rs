//! Millisecond clock for the simulation tick.
//!
//! The core only ever compares instants, so a wrapping `u32` millisecond counter
//! is enough (it wraps after ~49.7 days). Platforms convert their own monotonic
//! time into [`Millis`] once per tick.

/// Monotonic millisecond instant with wraparound-safe differences.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Millis(u32);

impl Millis {
    /// Instant zero (boot).
    pub const ZERO: Self = Self(0);

    /// Wrap a raw millisecond count.
    #[inline]
    pub const fn new(ms: u32) -> Self { Self(ms) }

    /// Raw millisecond count.
    #[inline]
    pub const fn as_millis(self) -> u32 { self.0 }

    /// Milliseconds elapsed from `earlier` to `self`.
    ///
    /// Correct across the `u32` wrap point as long as the real gap is below ~49 days.
    #[inline]
    pub const fn since(
        self,
        earlier: Millis,
    ) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// Instant `ms` milliseconds after `self`.
    #[inline]
    pub const fn add_ms(
        self,
        ms: u32,
    ) -> Self {
        Self(self.0.wrapping_add(ms))
    }
}

impl From<u32> for Millis {
    fn from(ms: u32) -> Self { Self(ms) }
}
