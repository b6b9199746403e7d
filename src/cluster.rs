//! Tick glue: simulation core, renderer and outputs wired together.
//!
//! Platforms own the clock and the input source; once per [`TICK_MS`](crate::config::TICK_MS)
//! they call [`Cluster::tick`] with the current instant and the sampled buttons:
//!
//! ```text
//! inputs ──► VehicleSim::advance ──► OutputEvent
//!                                       │
//!            gauge_dirty() ─────────────┼──► render gauge + fuel bars
//!            every tick ────────────────┼──► render turn arrows
//!            every tick ────────────────┴──► LEDs + buzzer
//! ```

use crate::clock::Millis;
use crate::config::SimConfig;
use crate::display::DisplayDriver;
use crate::error::Result;
use crate::input::InputSnapshot;
use crate::outputs::OutputSink;
use crate::render::{GaugeRenderer, GaugeStyle};
use crate::vehicle::{OutputEvent, VehicleSim, VehicleState};

/// Fuel milestones platforms report in their logs.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FuelNotice {
    /// The tank just ran dry.
    Empty,
    /// Refueling just reached 100%.
    Full,
}

/// Milestone crossed between two consecutive fuel readings, if any.
pub fn fuel_notice(
    before: f32,
    after: f32,
) -> Option<FuelNotice> {
    if before > 0.0 && after <= 0.0 {
        Some(FuelNotice::Empty)
    } else if before < 100.0 && after >= 100.0 {
        Some(FuelNotice::Full)
    } else {
        None
    }
}

/// The whole instrument cluster.
pub struct Cluster<C, I, O> {
    sim: VehicleSim,
    renderer: GaugeRenderer<C, I>,
    outputs: O,
}

impl<C, I, O> Cluster<C, I, O>
where
    C: DisplayDriver,
    I: DisplayDriver,
    O: OutputSink,
{
    /// Build a cluster, rejecting an unusable config.
    ///
    /// # Errors
    ///
    /// Returns `ClusterError::InvalidConfig` if `config` fails validation.
    pub fn new(
        config: SimConfig,
        style: GaugeStyle,
        cluster_panel: C,
        info_panel: I,
        outputs: O,
        now: Millis,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            sim: VehicleSim::new(config, now),
            renderer: GaugeRenderer::new(cluster_panel, info_panel, style),
            outputs,
        })
    }

    /// Start with `percent` fuel in the tank.
    #[must_use]
    pub fn with_fuel(
        mut self,
        percent: f32,
    ) -> Self {
        self.sim = self.sim.with_fuel(percent);
        self
    }

    /// Bring up both panels and draw the initial frame.
    ///
    /// Initializes and lights both panels, draws the static background, then renders
    /// every dynamic element once and drives all outputs to their current level.
    ///
    /// # Errors
    ///
    /// Propagates panel and output errors.
    pub fn start(&mut self) -> Result<()> {
        {
            let (cluster, info) = self.renderer.panels_mut();
            cluster.init()?;
            info.init()?;
            cluster.backlight_on()?;
            info.backlight_on()?;
        }

        self.renderer.draw_background()?;

        let config = *self.sim.config();
        let state = *self.sim.state();
        self.renderer
            .render(state.speed_kmh, state.rpm, config.max_speed, config.max_rpm)?;
        self.renderer.render_fuel_bars(state.fuel_percent)?;
        self.renderer.render_turn_signals(false, false)?;
        self.outputs.apply(false, false, false)
    }

    /// Advance the simulation to `now` and push the result to panels and outputs.
    ///
    /// # Errors
    ///
    /// Propagates renderer and output errors; the simulation step itself never fails.
    pub fn tick(
        &mut self,
        now: Millis,
        inputs: InputSnapshot,
    ) -> Result<OutputEvent> {
        let event = self.sim.advance(now, inputs);

        if event.gauge_dirty() {
            let config = self.sim.config();
            let (max_speed, max_rpm) = (config.max_speed, config.max_rpm);
            self.renderer.render(event.speed, event.rpm, max_speed, max_rpm)?;
            self.renderer.render_fuel_bars(event.fuel_percent)?;
        }

        self.renderer.render_turn_signals(event.left_on, event.right_on)?;
        self.outputs.apply(event.left_on, event.right_on, event.buzzer_on)?;

        Ok(event)
    }

    #[inline]
    pub const fn state(&self) -> &VehicleState { self.sim.state() }

    #[inline]
    pub const fn config(&self) -> &SimConfig { self.sim.config() }

    #[inline]
    pub const fn renderer(&self) -> &GaugeRenderer<C, I> { &self.renderer }

    #[inline]
    pub const fn outputs(&self) -> &O { &self.outputs }
}
