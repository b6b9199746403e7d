//! Display geometry for both panels.
//!
//! # Optimization: Pre-computed Layout Constants
//!
//! Positions are `const` so the renderer never recomputes them per tick. Only the
//! arc points of the gauge need trigonometry, and those are computed on demand in
//! [`crate::widgets`].

// =============================================================================
// Cluster Panel (ILI9341, 240x320 portrait)
// =============================================================================

/// Cluster panel width in pixels.
pub const CLUSTER_WIDTH: u32 = 240;

/// Cluster panel height in pixels.
pub const CLUSTER_HEIGHT: u32 = 320;

/// Gauge centre X.
pub const GAUGE_CX: i32 = (CLUSTER_WIDTH / 2) as i32;

/// Gauge centre Y.
pub const GAUGE_CY: i32 = (CLUSTER_HEIGHT / 2) as i32;

/// Outer radius of the segment ring / tick marks.
pub const RADIUS_OUTER: i32 = 110;

/// Inner radius of the segment ring / tick marks.
pub const RADIUS_INNER: i32 = 85;

/// Radius of the decorative frame circle.
pub const RADIUS_FRAME: i32 = RADIUS_OUTER + 8;

/// Needle starts this far from the centre so it never crosses the readouts.
pub const NEEDLE_INNER: i32 = 50;

/// Needle tip radius.
pub const NEEDLE_OUTER: i32 = RADIUS_INNER - 4;

/// Scale start angle in degrees (screen coordinates, y down, clockwise).
/// 135 degrees is lower-left of the centre.
pub const SWEEP_START_DEG: f32 = 135.0;

/// Scale sweep in degrees, ending lower-right.
pub const SWEEP_DEG: f32 = 270.0;

/// Number of segments in the segmented presentation.
pub const SEGMENTS: u8 = 12;

/// Segments from this index upward are drawn in the redline color.
pub const REDLINE_SEGMENT: u8 = SEGMENTS - 2;

/// Angular half-width of one segment in degrees.
pub const SEGMENT_HALF_WIDTH_DEG: i32 = 8;

/// Number of major tick marks for the needle presentation (one per 1000 rpm at 8000).
pub const NEEDLE_TICKS: u8 = 9;

/// Speed readout top Y, 3 large digits centred above the gauge centre.
pub const SPEED_TEXT_Y: i32 = GAUGE_CY - 40;

/// "km/h" label top Y.
pub const SPEED_UNIT_Y: i32 = GAUGE_CY - 8;

/// RPM readout top Y, 4 small digits centred below the gauge centre.
pub const RPM_TEXT_Y: i32 = GAUGE_CY + 12;

/// "RPM" label top Y.
pub const RPM_LABEL_Y: i32 = GAUGE_CY + 30;

// =============================================================================
// Info Panel (ST7789, 240x135 landscape)
// =============================================================================

/// Info panel width in pixels.
pub const INFO_WIDTH: u32 = 240;

/// Info panel height in pixels.
pub const INFO_HEIGHT: u32 = 135;

/// Turn arrow icon edge length in pixels.
pub const ARROW_SIZE: u32 = 16;

/// Left arrow top-left X.
pub const ARROW_LEFT_X: i32 = 8;

/// Right arrow top-left X.
pub const ARROW_RIGHT_X: i32 = INFO_WIDTH as i32 - 8 - ARROW_SIZE as i32;

/// Both arrows' top Y.
pub const ARROW_Y: i32 = 8;

/// Number of fuel bars.
pub const FUEL_BARS: u8 = 10;

/// Bars at or below this count are drawn in the warning color.
pub const FUEL_LOW_BARS: u8 = 2;

/// Fuel bar width.
pub const FUEL_BAR_WIDTH: u32 = 16;

/// Fuel bar height.
pub const FUEL_BAR_HEIGHT: u32 = 24;

/// Horizontal pitch between fuel bars.
pub const FUEL_BAR_PITCH: i32 = 20;

/// First fuel bar X, centres the row of bars.
pub const FUEL_BAR_X: i32 = (INFO_WIDTH as i32 - FUEL_BARS as i32 * FUEL_BAR_PITCH + (FUEL_BAR_PITCH - FUEL_BAR_WIDTH as i32)) / 2;

/// Fuel bar top Y.
pub const FUEL_BAR_Y: i32 = 100;

/// Fuel percent / EMPTY text Y.
pub const FUEL_TEXT_Y: i32 = 78;

/// Speed readout Y on the info panel.
pub const INFO_SPEED_Y: i32 = 34;
