//! Color constants for both panels.
//!
//! Standard colors come from the `RgbColor` trait constants; the dim "off" shades are
//! hand-picked so unlit segments and bars stay visible as an outline of the scale.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

/// Background of both panels.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Numeric readouts and labels.
pub const WHITE: Rgb565 = Rgb565::WHITE;

/// Lit gauge segments, lit turn arrows, healthy fuel bars.
pub const GREEN: Rgb565 = Rgb565::GREEN;

/// Redline segments, needle, low fuel bars and the EMPTY warning.
pub const RED: Rgb565 = Rgb565::RED;

/// Scale frame and tick marks.
pub const AMBER: Rgb565 = Rgb565::new(31, 40, 0);

/// Unlit segments, bars and arrows.
/// RGB565: (4, 8, 4) - roughly 12% brightness.
pub const DIM: Rgb565 = Rgb565::new(4, 8, 4);
