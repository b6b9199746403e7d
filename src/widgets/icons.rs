//! Turn-signal arrow icons.
//!
//! Icons are 1-bit 16x16 bitmaps, one `u16` per row with the most significant bit
//! as the leftmost pixel. They are expanded into an `Rgb565` buffer and blitted in a
//! single transfer.

use embedded_graphics::{pixelcolor::Rgb565, prelude::*, primitives::Rectangle};

use crate::colors::BLACK;
use crate::config::layout::ARROW_SIZE;
use crate::display::DisplayDriver;
use crate::error::Result;

const ICON_PIXELS: usize = (ARROW_SIZE * ARROW_SIZE) as usize;

/// Left-pointing arrow.
pub const ARROW_LEFT: [u16; 16] = [
    0b00000000_00000000,
    0b00000011_00000000,
    0b00000011_00000000,
    0b00001111_00000000,
    0b00001111_00000000,
    0b00111111_11111110,
    0b00111111_11111110,
    0b11111111_11111110,
    0b11111111_11111110,
    0b00111111_11111110,
    0b00111111_11111110,
    0b00001111_00000000,
    0b00001111_00000000,
    0b00000011_00000000,
    0b00000011_00000000,
    0b00000000_00000000,
];

/// Right-pointing arrow, the left arrow mirrored.
pub const ARROW_RIGHT: [u16; 16] = mirror(&ARROW_LEFT);

const fn mirror(bitmap: &[u16; 16]) -> [u16; 16] {
    let mut out = [0u16; 16];
    let mut row = 0;
    while row < 16 {
        out[row] = bitmap[row].reverse_bits();
        row += 1;
    }
    out
}

/// Expand a bitmap into row-major pixels, set bits in `color`, clear bits black.
pub fn expand(
    bitmap: &[u16; 16],
    color: Rgb565,
) -> [Rgb565; ICON_PIXELS] {
    let mut pixels = [BLACK; ICON_PIXELS];
    for (y, bits) in bitmap.iter().enumerate() {
        for x in 0..16 {
            if bits & (0x8000 >> x) != 0 {
                pixels[y * 16 + x] = color;
            }
        }
    }
    pixels
}

/// Blit `bitmap` at `top_left` in `color`.
pub fn draw_icon<D: DisplayDriver + ?Sized>(
    display: &mut D,
    top_left: Point,
    bitmap: &[u16; 16],
    color: Rgb565,
) -> Result<()> {
    let pixels = expand(bitmap, color);
    display.blit(Rectangle::new(top_left, Size::new(ARROW_SIZE, ARROW_SIZE)), &pixels)
}
