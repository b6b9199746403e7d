//! Fuel bar row on the info panel.

use embedded_graphics::{pixelcolor::Rgb565, prelude::*, primitives::Rectangle};

use crate::colors::{DIM, GREEN, RED};
use crate::config::layout::{FUEL_BAR_HEIGHT, FUEL_BAR_PITCH, FUEL_BAR_WIDTH, FUEL_BAR_X, FUEL_BAR_Y, FUEL_BARS, FUEL_LOW_BARS};
use crate::display::DisplayDriver;
use crate::error::Result;

/// Whole percent shown for `fuel_percent`, rounded up so only a truly empty tank
/// reads 0.
pub fn display_percent(fuel_percent: f32) -> u8 {
    let clamped = fuel_percent.clamp(0.0, 100.0);
    let whole = clamped as u8;
    if f32::from(whole) < clamped { whole + 1 } else { whole }
}

/// Lit bar count for a displayed percentage, rounded up.
#[inline]
pub const fn lit_bars(percent: u8) -> u8 {
    let percent = if percent > 100 { 100 } else { percent };
    ((percent as u16 * FUEL_BARS as u16).div_ceil(100)) as u8
}

/// Color of lit bars; the whole row turns red when fuel is low.
#[inline]
pub const fn lit_color(bars: u8) -> Rgb565 {
    if bars <= FUEL_LOW_BARS { RED } else { GREEN }
}

/// Bounds of bar `index`.
pub fn bar_area(index: u8) -> Rectangle {
    Rectangle::new(
        Point::new(FUEL_BAR_X + i32::from(index) * FUEL_BAR_PITCH, FUEL_BAR_Y),
        Size::new(FUEL_BAR_WIDTH, FUEL_BAR_HEIGHT),
    )
}

/// Draw the full bar row for `bars` lit bars.
pub fn draw_fuel_bars<D: DisplayDriver + ?Sized>(
    display: &mut D,
    bars: u8,
) -> Result<()> {
    let color = lit_color(bars);
    for index in 0..FUEL_BARS {
        display.fill_rect(bar_area(index), if index < bars { color } else { DIM })?;
    }
    Ok(())
}
