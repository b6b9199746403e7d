//! Tachometer geometry and drawing.
//!
//! Angles are in degrees in screen coordinates (y grows downward, so positive angles
//! run clockwise). The scale starts at [`SWEEP_START_DEG`] and covers [`SWEEP_DEG`].

#[cfg(not(test))]
use micromath::F32Ext;

use embedded_graphics::{pixelcolor::Rgb565, prelude::*};

use crate::colors::{AMBER, BLACK, DIM, GREEN, RED};
use crate::config::layout::{
    GAUGE_CX,
    GAUGE_CY,
    NEEDLE_INNER,
    NEEDLE_OUTER,
    NEEDLE_TICKS,
    RADIUS_FRAME,
    RADIUS_INNER,
    RADIUS_OUTER,
    REDLINE_SEGMENT,
    SEGMENT_HALF_WIDTH_DEG,
    SEGMENTS,
    SWEEP_DEG,
    SWEEP_START_DEG,
};
use crate::display::DisplayDriver;
use crate::error::Result;

// =============================================================================
// Geometry
// =============================================================================

/// Point at `radius` from the gauge centre along `deg`.
pub fn polar(
    deg: f32,
    radius: i32,
) -> Point {
    let rad = deg.to_radians();
    let r = radius as f32;
    Point::new(GAUGE_CX + (r * rad.cos()).round() as i32, GAUGE_CY + (r * rad.sin()).round() as i32)
}

/// Scale angle for `fraction` of full scale, clamped to the sweep.
#[inline]
pub fn scale_angle(fraction: f32) -> f32 { SWEEP_START_DEG + SWEEP_DEG * fraction.clamp(0.0, 1.0) }

/// Number of lit segments for `rpm`, rounded down, at most [`SEGMENTS`].
pub fn segment_level(
    rpm: u16,
    max_rpm: u16,
) -> u8 {
    if max_rpm == 0 {
        return 0;
    }
    let level = u32::from(rpm) * u32::from(SEGMENTS) / u32::from(max_rpm);
    level.min(u32::from(SEGMENTS)) as u8
}

/// Needle angle in tenths of a degree, used as the redraw key.
pub fn needle_angle(
    rpm: u16,
    max_rpm: u16,
) -> i32 {
    if max_rpm == 0 {
        return (SWEEP_START_DEG * 10.0) as i32;
    }
    let fraction = f32::from(rpm) / f32::from(max_rpm);
    (scale_angle(fraction) * 10.0).round() as i32
}

/// Lit color of segment `index`.
#[inline]
pub const fn segment_color(index: u8) -> Rgb565 {
    if index >= REDLINE_SEGMENT { RED } else { GREEN }
}

// =============================================================================
// Segmented Presentation
// =============================================================================

/// Draw one ring segment as a fan of radial 1px lines.
pub fn draw_segment<D: DisplayDriver + ?Sized>(
    display: &mut D,
    index: u8,
    color: Rgb565,
) -> Result<()> {
    let centre = SWEEP_START_DEG + SWEEP_DEG * (f32::from(index) + 0.5) / f32::from(SEGMENTS);
    for offset in -SEGMENT_HALF_WIDTH_DEG..=SEGMENT_HALF_WIDTH_DEG {
        let deg = centre + offset as f32;
        display.draw_line(polar(deg, RADIUS_INNER), polar(deg, RADIUS_OUTER), color)?;
    }
    Ok(())
}

/// Bring the ring from `prev` lit segments to `level`.
///
/// With no previous level every segment is drawn; otherwise only the segments whose
/// state changed are touched.
pub fn update_segments<D: DisplayDriver + ?Sized>(
    display: &mut D,
    prev: Option<u8>,
    level: u8,
) -> Result<()> {
    let level = level.min(SEGMENTS);
    match prev {
        None => {
            for index in 0..SEGMENTS {
                let color = if index < level { segment_color(index) } else { DIM };
                draw_segment(display, index, color)?;
            }
        }
        Some(prev) if level > prev => {
            for index in prev..level {
                draw_segment(display, index, segment_color(index))?;
            }
        }
        Some(prev) => {
            for index in level..prev.min(SEGMENTS) {
                draw_segment(display, index, DIM)?;
            }
        }
    }
    Ok(())
}

// =============================================================================
// Needle Presentation
// =============================================================================

/// Draw the needle at `angle_decideg` (tenths of a degree), two lines wide.
pub fn draw_needle<D: DisplayDriver + ?Sized>(
    display: &mut D,
    angle_decideg: i32,
    color: Rgb565,
) -> Result<()> {
    let deg = angle_decideg as f32 / 10.0;
    display.draw_line(polar(deg, NEEDLE_INNER), polar(deg, NEEDLE_OUTER), color)?;
    display.draw_line(polar(deg + 0.7, NEEDLE_INNER), polar(deg + 0.7, NEEDLE_OUTER), color)
}

/// Move the needle from `prev` to `angle_decideg`, erasing the old one.
pub fn update_needle<D: DisplayDriver + ?Sized>(
    display: &mut D,
    prev: Option<i32>,
    angle_decideg: i32,
) -> Result<()> {
    if let Some(prev) = prev {
        draw_needle(display, prev, BLACK)?;
    }
    draw_needle(display, angle_decideg, RED)
}

/// Major ticks for the needle scale; the last interval is marked red.
pub fn draw_scale_ticks<D: DisplayDriver + ?Sized>(display: &mut D) -> Result<()> {
    let intervals = f32::from(NEEDLE_TICKS - 1);
    for tick in 0..NEEDLE_TICKS {
        let deg = SWEEP_START_DEG + SWEEP_DEG * f32::from(tick) / intervals;
        let color = if tick + 2 >= NEEDLE_TICKS { RED } else { AMBER };
        display.draw_line(polar(deg, RADIUS_INNER), polar(deg, RADIUS_OUTER), color)?;
    }

    // Redline arc along the outer edge of the last interval
    let redline_start = SWEEP_START_DEG + SWEEP_DEG * (intervals - 1.0) / intervals;
    let mut deg = redline_start;
    while deg < SWEEP_START_DEG + SWEEP_DEG {
        let p = polar(deg, RADIUS_OUTER);
        display.draw_line(p, p, RED)?;
        deg += 1.0;
    }
    Ok(())
}

/// Dotted frame circle around the whole gauge.
pub fn draw_frame<D: DisplayDriver + ?Sized>(display: &mut D) -> Result<()> {
    for step in 0..120 {
        let p = polar(step as f32 * 3.0, RADIUS_FRAME);
        display.draw_line(p, p, AMBER)?;
    }
    Ok(())
}
