//! Gauge renderer and render state tracking.
//!
//! [`GaugeRenderer`] owns both panels and draws the vehicle state onto them:
//!
//! | Panel   | Element          | Update trigger                         |
//! |---------|------------------|----------------------------------------|
//! | Cluster | Frame, labels    | Once, in `draw_background`             |
//! | Cluster | Segments/needle  | Segment level or needle angle changed  |
//! | Cluster | Speed, RPM text  | Displayed integer changed              |
//! | Info    | Speed text       | Displayed integer changed              |
//! | Info    | Turn arrows      | Arrow on/off state changed             |
//! | Info    | Fuel text, bars  | Displayed percent changed              |
//!
//! # Incremental Updates
//!
//! SPI panels are slow to fill, so nothing is cleared per frame. [`RenderState`]
//! remembers what is currently on the glass and every element is redrawn only when
//! its displayed value differs. Segments are updated as a delta between the old and
//! new level; the needle is erased by redrawing it in the background color before
//! drawing it at its new angle.
//!
//! Text is drawn with an opaque background and fixed field widths, so a shorter
//! number overwrites the digits of a longer one.

use core::fmt::Write;

use embedded_graphics::{pixelcolor::Rgb565, prelude::*};
use heapless::String;

use crate::colors::{AMBER, BLACK, DIM, GREEN, RED, WHITE};
use crate::config::layout::{
    ARROW_LEFT_X,
    ARROW_RIGHT_X,
    ARROW_Y,
    FUEL_BAR_X,
    FUEL_TEXT_Y,
    INFO_SPEED_Y,
    RPM_LABEL_Y,
    RPM_TEXT_Y,
    SPEED_TEXT_Y,
    SPEED_UNIT_Y,
};
use crate::display::{DisplayDriver, Font};
use crate::error::Result;
use crate::widgets::fuel::{display_percent, draw_fuel_bars, lit_bars};
use crate::widgets::gauge::{draw_frame, draw_scale_ticks, needle_angle, segment_level, update_needle, update_segments};
use crate::widgets::icons::{ARROW_LEFT, ARROW_RIGHT, draw_icon};

/// EMPTY warning text; blanked with the same number of spaces.
const EMPTY_TEXT: &str = "EMPTY";
const EMPTY_BLANK: &str = "     ";

// =============================================================================
// Gauge Style
// =============================================================================

/// Tachometer presentation, fixed at construction.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GaugeStyle {
    /// Red needle over a ticked scale.
    Needle,
    /// Ring of lit segments, the last ones red.
    #[default]
    Segmented,
}

// =============================================================================
// Render State
// =============================================================================

/// What is currently shown on both panels.
///
/// `None` means "unknown", which forces the next render of that element.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct RenderState {
    /// Displayed speed, whole km/h.
    pub speed: Option<u16>,
    /// Displayed RPM.
    pub rpm: Option<u16>,
    /// Lit segment count (segmented style).
    pub segment_level: Option<u8>,
    /// Needle angle in tenths of a degree (needle style).
    pub needle_angle: Option<i32>,
    /// Displayed fuel percent.
    pub fuel_percent: Option<u8>,
    /// Lit fuel bars.
    pub fuel_bars: Option<u8>,
    /// Left arrow lit.
    pub left_on: Option<bool>,
    /// Right arrow lit.
    pub right_on: Option<bool>,
}

impl RenderState {
    /// Nothing known about the panels.
    pub const fn new() -> Self {
        Self {
            speed: None,
            rpm: None,
            segment_level: None,
            needle_angle: None,
            fuel_percent: None,
            fuel_bars: None,
            left_on: None,
            right_on: None,
        }
    }

    /// Forget everything, forcing a full redraw of every element.
    #[inline]
    pub fn invalidate(&mut self) { *self = Self::new(); }
}

// =============================================================================
// Gauge Renderer
// =============================================================================

/// Draws the vehicle state onto the cluster panel `C` and the info panel `I`.
pub struct GaugeRenderer<C, I> {
    cluster: C,
    info: I,
    style: GaugeStyle,
    state: RenderState,
}

impl<C, I> GaugeRenderer<C, I>
where
    C: DisplayDriver,
    I: DisplayDriver,
{
    /// Create a renderer over two initialized panels.
    pub const fn new(
        cluster: C,
        info: I,
        style: GaugeStyle,
    ) -> Self {
        Self {
            cluster,
            info,
            style,
            state: RenderState::new(),
        }
    }

    /// Tachometer presentation in use.
    #[inline]
    pub const fn style(&self) -> GaugeStyle { self.style }

    /// What the renderer believes is on the panels.
    #[inline]
    pub const fn state(&self) -> &RenderState { &self.state }

    /// Borrow the cluster panel.
    #[inline]
    pub const fn cluster(&self) -> &C { &self.cluster }

    /// Borrow the info panel.
    #[inline]
    pub const fn info(&self) -> &I { &self.info }

    /// Mutably borrow both panels.
    #[inline]
    pub const fn panels_mut(&mut self) -> (&mut C, &mut I) { (&mut self.cluster, &mut self.info) }

    /// Clear both panels and draw the static parts: frame, scale ticks and labels.
    ///
    /// Dynamic elements are marked unknown so the next render draws them in full.
    ///
    /// # Errors
    ///
    /// Propagates driver errors.
    pub fn draw_background(&mut self) -> Result<()> {
        self.cluster.clear(BLACK)?;
        self.info.clear(BLACK)?;

        draw_frame(&mut self.cluster)?;
        if self.style == GaugeStyle::Needle {
            draw_scale_ticks(&mut self.cluster)?;
        }

        let cluster_width = self.cluster.size().width;
        draw_centered(&mut self.cluster, cluster_width, SPEED_UNIT_Y, "km/h", Font::Small, AMBER)?;
        draw_centered(&mut self.cluster, cluster_width, RPM_LABEL_Y, "RPM", Font::Small, AMBER)?;

        let info_width = self.info.size().width;
        let unit_x = info_speed_x(info_width) + Font::Large.text_width("000") as i32 + 4;
        let unit_y = INFO_SPEED_Y + (Font::Large.char_height() - Font::Small.char_height()) as i32;
        self.info
            .draw_text(Point::new(unit_x, unit_y), "km/h", Font::Small, AMBER, BLACK)?;

        self.state.invalidate();
        Ok(())
    }

    /// Update the tachometer and speed readouts.
    ///
    /// `speed` is clamped to `0..=max_speed` and shown as whole km/h; the gauge
    /// position is `rpm / max_rpm` of full scale.
    ///
    /// # Errors
    ///
    /// Propagates driver errors.
    pub fn render(
        &mut self,
        speed: f32,
        rpm: u16,
        max_speed: f32,
        max_rpm: u16,
    ) -> Result<()> {
        let speed = displayed_speed(speed, max_speed);

        match self.style {
            GaugeStyle::Segmented => {
                let level = segment_level(rpm, max_rpm);
                if self.state.segment_level != Some(level) {
                    update_segments(&mut self.cluster, self.state.segment_level, level)?;
                    self.state.segment_level = Some(level);
                }
            }
            GaugeStyle::Needle => {
                let angle = needle_angle(rpm, max_rpm);
                if self.state.needle_angle != Some(angle) {
                    update_needle(&mut self.cluster, self.state.needle_angle, angle)?;
                    self.state.needle_angle = Some(angle);
                }
            }
        }

        if self.state.speed != Some(speed) {
            let mut text: String<8> = String::new();
            write!(text, "{speed:>3}").ok();

            let cluster_width = self.cluster.size().width;
            draw_centered(&mut self.cluster, cluster_width, SPEED_TEXT_Y, &text, Font::Large, WHITE)?;

            let x = info_speed_x(self.info.size().width);
            self.info
                .draw_text(Point::new(x, INFO_SPEED_Y), &text, Font::Large, WHITE, BLACK)?;

            self.state.speed = Some(speed);
        }

        if self.state.rpm != Some(rpm) {
            let mut text: String<8> = String::new();
            write!(text, "{rpm:>4}").ok();

            let cluster_width = self.cluster.size().width;
            draw_centered(&mut self.cluster, cluster_width, RPM_TEXT_Y, &text, Font::Small, WHITE)?;

            self.state.rpm = Some(rpm);
        }

        Ok(())
    }

    /// Light or dim the turn arrows; each arrow is redrawn only when it changes.
    ///
    /// # Errors
    ///
    /// Propagates driver errors.
    pub fn render_turn_signals(
        &mut self,
        left_on: bool,
        right_on: bool,
    ) -> Result<()> {
        if self.state.left_on != Some(left_on) {
            let color = if left_on { GREEN } else { DIM };
            draw_icon(&mut self.info, Point::new(ARROW_LEFT_X, ARROW_Y), &ARROW_LEFT, color)?;
            self.state.left_on = Some(left_on);
        }

        if self.state.right_on != Some(right_on) {
            let color = if right_on { GREEN } else { DIM };
            draw_icon(&mut self.info, Point::new(ARROW_RIGHT_X, ARROW_Y), &ARROW_RIGHT, color)?;
            self.state.right_on = Some(right_on);
        }

        Ok(())
    }

    /// Update the fuel percentage text, EMPTY warning and bar row.
    ///
    /// # Errors
    ///
    /// Propagates driver errors.
    pub fn render_fuel_bars(
        &mut self,
        fuel_percent: f32,
    ) -> Result<()> {
        let percent = display_percent(fuel_percent);
        if self.state.fuel_percent == Some(percent) {
            return Ok(());
        }

        let mut text: String<16> = String::new();
        write!(text, "FUEL {percent:>3}%").ok();
        self.info
            .draw_text(Point::new(FUEL_BAR_X, FUEL_TEXT_Y), &text, Font::Small, WHITE, BLACK)?;

        let was_empty = self.state.fuel_percent.map(|p| p == 0);
        let is_empty = percent == 0;
        if was_empty != Some(is_empty) {
            let (warning, color) = if is_empty { (EMPTY_TEXT, RED) } else { (EMPTY_BLANK, BLACK) };
            let x = self.info.size().width as i32 - FUEL_BAR_X - Font::Small.text_width(EMPTY_TEXT) as i32;
            self.info
                .draw_text(Point::new(x, FUEL_TEXT_Y), warning, Font::Small, color, BLACK)?;
        }

        let bars = lit_bars(percent);
        if self.state.fuel_bars != Some(bars) {
            draw_fuel_bars(&mut self.info, bars)?;
            self.state.fuel_bars = Some(bars);
        }

        self.state.fuel_percent = Some(percent);
        Ok(())
    }
}

/// Whole km/h shown for `speed`.
fn displayed_speed(
    speed: f32,
    max_speed: f32,
) -> u16 {
    let max = if max_speed > 0.0 { max_speed } else { 0.0 };
    (speed.clamp(0.0, max) + 0.5) as u16
}

/// Left edge of the 3-digit speed field on the info panel.
fn info_speed_x(width: u32) -> i32 { (width as i32 - Font::Large.text_width("000") as i32) / 2 - 24 }

/// Draw `text` horizontally centred on a panel `width` pixels wide.
fn draw_centered<D: DisplayDriver + ?Sized>(
    display: &mut D,
    width: u32,
    y: i32,
    text: &str,
    font: Font,
    color: Rgb565,
) -> Result<()> {
    let x = (width as i32 - font.text_width(text) as i32) / 2;
    display.draw_text(Point::new(x, y), text, font, color, BLACK)
}

// =============================================================================
// Unit Tests
// =============================================================================
