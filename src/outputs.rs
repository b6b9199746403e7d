//! Indicator LEDs and buzzer.
//!
//! All three outputs are active-high. [`GpioOutputs`] only touches a pin when its
//! level actually changes; the first [`apply`](OutputSink::apply) writes every pin so
//! the hardware starts from a known state.

use embedded_hal::digital::OutputPin;

use crate::error::{ClusterError, Result};

/// Destination for the per-tick indicator levels.
pub trait OutputSink {
    /// Drive the left/right indicator LEDs and the buzzer.
    ///
    /// # Errors
    ///
    /// Returns `ClusterError::Gpio` if a pin cannot be driven.
    fn apply(
        &mut self,
        left_on: bool,
        right_on: bool,
        buzzer_on: bool,
    ) -> Result<()>;
}

/// Output sink over three GPIO pins.
pub struct GpioOutputs<L, R, B> {
    left: L,
    right: R,
    buzzer: B,
    /// Last written levels: left, right, buzzer.
    last: Option<[bool; 3]>,
}

impl<L, R, B> GpioOutputs<L, R, B>
where
    L: OutputPin,
    R: OutputPin,
    B: OutputPin,
{
    pub const fn new(
        left: L,
        right: R,
        buzzer: B,
    ) -> Self {
        Self {
            left,
            right,
            buzzer,
            last: None,
        }
    }

    /// Levels written by the last `apply`, if any.
    #[inline]
    pub const fn last_levels(&self) -> Option<[bool; 3]> { self.last }

    /// Release the pins.
    pub fn into_parts(self) -> (L, R, B) { (self.left, self.right, self.buzzer) }
}

fn drive<P: OutputPin>(
    pin: &mut P,
    on: bool,
) -> Result<()> {
    let result = if on { pin.set_high() } else { pin.set_low() };
    result.map_err(|_| ClusterError::Gpio)
}

impl<L, R, B> OutputSink for GpioOutputs<L, R, B>
where
    L: OutputPin,
    R: OutputPin,
    B: OutputPin,
{
    fn apply(
        &mut self,
        left_on: bool,
        right_on: bool,
        buzzer_on: bool,
    ) -> Result<()> {
        let next = [left_on, right_on, buzzer_on];
        let prev = self.last;
        let changed = |i: usize| prev.is_none_or(|p| p[i] != next[i]);

        if changed(0) {
            drive(&mut self.left, left_on)?;
        }
        if changed(1) {
            drive(&mut self.right, right_on)?;
        }
        if changed(2) {
            drive(&mut self.buzzer, buzzer_on)?;
        }

        self.last = Some(next);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use core::cell::RefCell;
    use std::rc::Rc;

    use embedded_hal::digital::{ErrorKind, ErrorType};

    use super::*;

    /// Output pin that logs every write into a shared journal.
    struct LogPin {
        name: &'static str,
        log: Rc<RefCell<Vec<(&'static str, bool)>>>,
    }

    impl ErrorType for LogPin {
        type Error = core::convert::Infallible;
    }

    impl OutputPin for LogPin {
        fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
            self.log.borrow_mut().push((self.name, false));
            Ok(())
        }

        fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
            self.log.borrow_mut().push((self.name, true));
            Ok(())
        }
    }

    struct BrokenPin;

    impl ErrorType for BrokenPin {
        type Error = ErrorKind;
    }

    impl OutputPin for BrokenPin {
        fn set_low(&mut self) -> core::result::Result<(), Self::Error> { Err(ErrorKind::Other) }

        fn set_high(&mut self) -> core::result::Result<(), Self::Error> { Err(ErrorKind::Other) }
    }

    fn outputs() -> (GpioOutputs<LogPin, LogPin, LogPin>, Rc<RefCell<Vec<(&'static str, bool)>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let pin = |name| LogPin {
            name,
            log: Rc::clone(&log),
        };
        (GpioOutputs::new(pin("left"), pin("right"), pin("buzzer")), log)
    }

    #[test]
    fn test_first_apply_writes_all() {
        let (mut out, log) = outputs();
        out.apply(false, true, false).unwrap();
        assert_eq!(*log.borrow(), [("left", false), ("right", true), ("buzzer", false)]);
        assert_eq!(out.last_levels(), Some([false, true, false]));
    }

    #[test]
    fn test_only_changes_written() {
        let (mut out, log) = outputs();
        out.apply(false, false, false).unwrap();
        log.borrow_mut().clear();

        out.apply(false, false, false).unwrap();
        assert!(log.borrow().is_empty());

        out.apply(true, false, true).unwrap();
        assert_eq!(*log.borrow(), [("left", true), ("buzzer", true)]);
    }

    #[test]
    fn test_pin_failure_maps_to_gpio() {
        let mut out = GpioOutputs::new(BrokenPin, BrokenPin, BrokenPin);
        assert_eq!(out.apply(true, false, false), Err(ClusterError::Gpio));
        assert_eq!(out.last_levels(), None);
    }
}
