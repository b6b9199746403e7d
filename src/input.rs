//! Button input for the simulation tick.
//!
//! Four logical buttons feed the core:
//!
//! | Button     | Kind            | Source                                   |
//! |------------|-----------------|------------------------------------------|
//! | Accelerate | Edge, latched   | Interrupt (or debounced polling) -> [`AccelLatch`] |
//! | Refuel     | Level           | Polled every tick                        |
//! | Turn left  | Level           | Polled every tick                        |
//! | Turn right | Level           | Polled every tick                        |
//!
//! All lines are active-low with pull-ups: pressed means the line reads low.
//!
//! # Edge Latching
//!
//! An accelerate press sets a single pending flag which the next tick takes and
//! clears. Several presses inside one tick period collapse into one edge; there is no
//! queue.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::digital::InputPin;

use crate::clock::Millis;
use crate::config::DEBOUNCE_MS;
use crate::error::{ClusterError, Result};

/// Button state sampled for one tick.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputSnapshot {
    /// An accelerate press happened since the previous snapshot.
    pub accelerate_pressed: bool,
    /// Refuel button is held right now.
    pub refuel_held: bool,
    /// Left turn-signal button is held right now.
    pub turn_left_held: bool,
    /// Right turn-signal button is held right now.
    pub turn_right_held: bool,
}

/// Anything that can produce one [`InputSnapshot`] per tick.
pub trait InputSource {
    /// Sample the buttons, consuming any latched accelerate edge.
    ///
    /// # Errors
    ///
    /// Returns `ClusterError::Gpio` if a button line cannot be read.
    fn snapshot(&mut self) -> Result<InputSnapshot>;
}

// =============================================================================
// Accelerate Edge Latch
// =============================================================================

/// Pending accelerate edge shared between the interrupt side and the tick loop.
///
/// Safe to place in a `static`; both sides only need `&self`.
#[derive(Debug, Default)]
pub struct AccelLatch {
    pending: AtomicBool,
}

impl AccelLatch {
    /// Create a latch with no pending edge.
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
        }
    }

    /// Record an edge (interrupt side).
    #[inline]
    pub fn set(&self) { self.pending.store(true, Ordering::Release); }

    /// Take and clear the pending edge (tick side).
    #[inline]
    pub fn take(&self) -> bool { self.pending.swap(false, Ordering::AcqRel) }

    /// Check for a pending edge without consuming it.
    #[inline]
    pub fn is_pending(&self) -> bool { self.pending.load(Ordering::Acquire) }
}

// =============================================================================
// Button Debounce
// =============================================================================

/// Button debounce state with time-based edge detection.
#[derive(Debug, Default)]
pub struct ButtonState {
    was_pressed: bool,
    last_change: Option<Millis>,
}

impl ButtonState {
    /// Create a new button state (not pressed).
    pub const fn new() -> Self {
        Self {
            was_pressed: false,
            last_change: None,
        }
    }

    /// Returns true only on the falling edge (button just pressed).
    ///
    /// Buttons are active-low, so `is_low` means pressed. Level changes inside the
    /// debounce window after the previous accepted change are ignored.
    pub fn just_pressed(
        &mut self,
        now: Millis,
        is_low: bool,
    ) -> bool {
        if is_low != self.was_pressed {
            if let Some(last) = self.last_change
                && now.since(last) < DEBOUNCE_MS
            {
                return false;
            }

            self.was_pressed = is_low;
            self.last_change = Some(now);

            return is_low;
        }

        false
    }
}

// =============================================================================
// GPIO Input Source
// =============================================================================

/// Input source over real pins: the accelerate edge arrives through a shared
/// [`AccelLatch`] (set by an interrupt or edge-wait task), the level buttons are
/// read directly every tick.
pub struct PinInputs<'a, R, L, Rt> {
    latch: &'a AccelLatch,
    refuel: R,
    turn_left: L,
    turn_right: Rt,
}

impl<'a, R, L, Rt> PinInputs<'a, R, L, Rt>
where
    R: InputPin,
    L: InputPin,
    Rt: InputPin,
{
    /// Create an input source from the shared latch and the three level pins.
    pub fn new(
        latch: &'a AccelLatch,
        refuel: R,
        turn_left: L,
        turn_right: Rt,
    ) -> Self {
        Self {
            latch,
            refuel,
            turn_left,
            turn_right,
        }
    }
}

impl<R, L, Rt> InputSource for PinInputs<'_, R, L, Rt>
where
    R: InputPin,
    L: InputPin,
    Rt: InputPin,
{
    fn snapshot(&mut self) -> Result<InputSnapshot> {
        let refuel_held = self.refuel.is_low().map_err(|_| ClusterError::Gpio)?;
        let turn_left_held = self.turn_left.is_low().map_err(|_| ClusterError::Gpio)?;
        let turn_right_held = self.turn_right.is_low().map_err(|_| ClusterError::Gpio)?;

        Ok(InputSnapshot {
            accelerate_pressed: self.latch.take(),
            refuel_held,
            turn_left_held,
            turn_right_held,
        })
    }
}

// =============================================================================
// Polled Input Source
// =============================================================================

/// Raw line levels, `true` meaning the line reads low (button pressed).
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct LineLevels {
    pub accelerate_low: bool,
    pub refuel_low: bool,
    pub turn_left_low: bool,
    pub turn_right_low: bool,
}

/// Input source for platforms without edge interrupts.
///
/// Call [`update`](Self::update) whenever the lines are sampled (at least once per
/// tick, more often is fine); debounced accelerate edges are latched until the next
/// [`snapshot`](InputSource::snapshot).
#[derive(Debug, Default)]
pub struct PolledInputs {
    accelerate: ButtonState,
    latch: AccelLatch,
    levels: LineLevels,
}

impl PolledInputs {
    pub const fn new() -> Self {
        Self {
            accelerate: ButtonState::new(),
            latch: AccelLatch::new(),
            levels: LineLevels {
                accelerate_low: false,
                refuel_low: false,
                turn_left_low: false,
                turn_right_low: false,
            },
        }
    }

    /// Feed freshly sampled line levels.
    pub fn update(
        &mut self,
        now: Millis,
        levels: LineLevels,
    ) {
        if self.accelerate.just_pressed(now, levels.accelerate_low) {
            self.latch.set();
        }
        self.levels = levels;
    }

    /// Most recently fed line levels.
    #[inline]
    pub const fn levels(&self) -> LineLevels { self.levels }
}

impl InputSource for PolledInputs {
    fn snapshot(&mut self) -> Result<InputSnapshot> {
        Ok(InputSnapshot {
            accelerate_pressed: self.latch.take(),
            refuel_held: self.levels.refuel_low,
            turn_left_held: self.levels.turn_left_low,
            turn_right_held: self.levels.turn_right_low,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
