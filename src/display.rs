//! Display driver abstraction.
//!
//! The renderer talks to both panels through [`DisplayDriver`], a small set of
//! drawing operations every backend can offer: full clear, 1px lines, text with an
//! opaque background, raw pixel blits and filled rectangles.
//!
//! [`Panel`] adapts any `embedded-graphics` [`DrawTarget`] (the mipidsi panels on
//! hardware, `SimulatorDisplay` on the desktop) plus a backlight pin into a driver.
//!
//! # Initialization Guard
//!
//! A `Panel` refuses to draw until [`DisplayDriver::init`] succeeded, so a render
//! call issued before start-up surfaces as `ClusterError::NotInitialized` instead of
//! writing to an unconfigured controller.

use core::convert::Infallible;

use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyleBuilder},
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use embedded_hal::digital::{ErrorType, OutputPin};
use profont::{PROFONT_12_POINT, PROFONT_24_POINT};

use crate::colors::BLACK;
use crate::error::{ClusterError, Result};

// =============================================================================
// Fonts
// =============================================================================

/// Fonts available to the renderer.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Font {
    /// Labels, RPM readout, fuel text.
    Small,
    /// Speed readouts.
    Large,
}

impl Font {
    /// Backing monospace font.
    pub const fn mono(self) -> &'static MonoFont<'static> {
        match self {
            Self::Small => &PROFONT_12_POINT,
            Self::Large => &PROFONT_24_POINT,
        }
    }

    /// Advance width of one glyph in pixels.
    #[inline]
    pub const fn char_width(self) -> u32 { self.mono().character_size.width + self.mono().character_spacing }

    /// Glyph cell height in pixels.
    #[inline]
    pub const fn char_height(self) -> u32 { self.mono().character_size.height }

    /// Width of `text` rendered in this font.
    #[inline]
    pub fn text_width(
        self,
        text: &str,
    ) -> u32 {
        text.len() as u32 * self.char_width()
    }
}

// =============================================================================
// Driver Trait
// =============================================================================

/// Drawing surface used by the gauge renderer.
pub trait DisplayDriver {
    /// Prepare the panel for drawing and clear it.
    ///
    /// # Errors
    ///
    /// Returns `ClusterError::DisplayInit` if the panel does not respond.
    fn init(&mut self) -> Result<()>;

    /// Switch the backlight on.
    ///
    /// # Errors
    ///
    /// Returns `ClusterError::Backlight` if the backlight pin cannot be driven.
    fn backlight_on(&mut self) -> Result<()>;

    /// Fill the whole panel with `color`.
    ///
    /// # Errors
    ///
    /// Returns `ClusterError::NotInitialized` before `init`, `ClusterError::Draw` if
    /// the transfer fails.
    fn clear(
        &mut self,
        color: Rgb565,
    ) -> Result<()>;

    /// Draw a 1px line between two points, both inclusive.
    ///
    /// # Errors
    ///
    /// Same as [`clear`](Self::clear).
    fn draw_line(
        &mut self,
        from: Point,
        to: Point,
        color: Rgb565,
    ) -> Result<()>;

    /// Draw `text` with its top-left corner at `origin`, glyph cells filled with `bg`.
    ///
    /// # Errors
    ///
    /// Same as [`clear`](Self::clear).
    fn draw_text(
        &mut self,
        origin: Point,
        text: &str,
        font: Font,
        fg: Rgb565,
        bg: Rgb565,
    ) -> Result<()>;

    /// Copy row-major `pixels` into `area`.
    ///
    /// # Errors
    ///
    /// `ClusterError::Draw` if `pixels` does not cover `area` exactly, otherwise same
    /// as [`clear`](Self::clear).
    fn blit(
        &mut self,
        area: Rectangle,
        pixels: &[Rgb565],
    ) -> Result<()>;

    /// Panel size in pixels.
    fn size(&self) -> Size;

    /// Fill `area` with `color`.
    ///
    /// The provided implementation draws one horizontal line per row; drivers with a
    /// native fill should override it.
    ///
    /// # Errors
    ///
    /// Same as [`clear`](Self::clear).
    fn fill_rect(
        &mut self,
        area: Rectangle,
        color: Rgb565,
    ) -> Result<()> {
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };

        for y in area.top_left.y..=bottom_right.y {
            self.draw_line(Point::new(area.top_left.x, y), Point::new(bottom_right.x, y), color)?;
        }

        Ok(())
    }
}

// =============================================================================
// Panel Adapter
// =============================================================================

/// Backlight stand-in for targets without a backlight line (simulator, tests).
#[derive(Clone, Copy, Debug, Default)]
pub struct NoBacklight;

impl ErrorType for NoBacklight {
    type Error = Infallible;
}

impl OutputPin for NoBacklight {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> { Ok(()) }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> { Ok(()) }
}

/// [`DisplayDriver`] over an `embedded-graphics` draw target and a backlight pin.
pub struct Panel<D, BL> {
    target: D,
    backlight: BL,
    initialized: bool,
}

impl<D, BL> Panel<D, BL>
where
    D: DrawTarget<Color = Rgb565>,
    BL: OutputPin,
{
    /// Wrap a draw target. The panel stays unusable until [`DisplayDriver::init`].
    pub const fn new(
        target: D,
        backlight: BL,
    ) -> Self {
        Self {
            target,
            backlight,
            initialized: false,
        }
    }

    /// Whether `init` has completed.
    #[inline]
    pub const fn is_initialized(&self) -> bool { self.initialized }

    /// Borrow the underlying draw target.
    #[inline]
    pub const fn target(&self) -> &D { &self.target }

    /// Mutably borrow the underlying draw target.
    #[inline]
    pub const fn target_mut(&mut self) -> &mut D { &mut self.target }

    /// Release the draw target and backlight pin.
    pub fn into_parts(self) -> (D, BL) { (self.target, self.backlight) }

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized { Ok(()) } else { Err(ClusterError::NotInitialized) }
    }
}

impl<D, BL> DisplayDriver for Panel<D, BL>
where
    D: DrawTarget<Color = Rgb565>,
    BL: OutputPin,
{
    fn init(&mut self) -> Result<()> {
        self.target.clear(BLACK).map_err(|_| ClusterError::DisplayInit)?;
        self.initialized = true;
        Ok(())
    }

    fn backlight_on(&mut self) -> Result<()> { self.backlight.set_high().map_err(|_| ClusterError::Backlight) }

    fn clear(
        &mut self,
        color: Rgb565,
    ) -> Result<()> {
        self.ensure_initialized()?;
        self.target.clear(color).map_err(|_| ClusterError::Draw)
    }

    fn draw_line(
        &mut self,
        from: Point,
        to: Point,
        color: Rgb565,
    ) -> Result<()> {
        self.ensure_initialized()?;
        Line::new(from, to)
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(&mut self.target)
            .map_err(|_| ClusterError::Draw)
    }

    fn draw_text(
        &mut self,
        origin: Point,
        text: &str,
        font: Font,
        fg: Rgb565,
        bg: Rgb565,
    ) -> Result<()> {
        self.ensure_initialized()?;
        let style = MonoTextStyleBuilder::new()
            .font(font.mono())
            .text_color(fg)
            .background_color(bg)
            .build();
        Text::with_baseline(text, origin, style, Baseline::Top)
            .draw(&mut self.target)
            .map(|_| ())
            .map_err(|_| ClusterError::Draw)
    }

    fn blit(
        &mut self,
        area: Rectangle,
        pixels: &[Rgb565],
    ) -> Result<()> {
        self.ensure_initialized()?;
        if pixels.len() != (area.size.width * area.size.height) as usize {
            return Err(ClusterError::Draw);
        }
        self.target
            .fill_contiguous(&area, pixels.iter().copied())
            .map_err(|_| ClusterError::Draw)
    }

    fn size(&self) -> Size { self.target.bounding_box().size }

    fn fill_rect(
        &mut self,
        area: Rectangle,
        color: Rgb565,
    ) -> Result<()> {
        self.ensure_initialized()?;
        self.target.fill_solid(&area, color).map_err(|_| ClusterError::Draw)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
