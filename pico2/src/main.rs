//! Instrument Cluster Firmware for Raspberry Pi Pico 2 (RP2350)
//!
//! Drives an ILI9341 tachometer panel and an ST7789 info panel from the vehicle
//! simulation in `instrument-cluster`.
//!
//! # Wiring
//!
//! | Function        | GPIO | Notes                                   |
//! |-----------------|------|-----------------------------------------|
//! | Accelerate      | 2    | Active-low, edge task (see `button`)    |
//! | Refuel          | 3    | Active-low, polled every tick           |
//! | Turn left       | 4    | Active-low, polled every tick           |
//! | Turn right      | 5    | Active-low, polled every tick           |
//! | Left LED        | 6    | Active-high                             |
//! | Right LED       | 7    | Active-high                             |
//! | Buzzer          | 8    | Active-high                             |
//!
//! Display pins are listed in [`display`].
//!
//! # Architecture
//!
//! - Accelerate task: waits for the button edge and sets the shared latch
//! - Main task: every `TICK_MS` samples inputs, ticks the cluster and sleeps
//!
//! A render or GPIO failure in the tick is fatal: it is logged over RTT and the
//! firmware panics.

#![no_std]
#![no_main]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]

mod button;
mod display;

use defmt::{error, info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::spi::Spi;
use embassy_time::{Instant, Timer};
use instrument_cluster::config::TICK_MS;
use instrument_cluster::{
    AccelLatch,
    Cluster,
    FuelNotice,
    GaugeStyle,
    GpioOutputs,
    InputSource,
    Millis,
    Panel,
    PinInputs,
    SimConfig,
    fuel_notice,
};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::button::accelerate_task;
use crate::display::{DI_BUFFER_SIZE, display_spi_config, init_cluster_display, init_info_display};

// Program metadata for `picotool info`
#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_program_name!(c"pico2-instrument-cluster"),
    embassy_rp::binary_info::rp_program_description!(c"Dual-display vehicle instrument cluster simulator"),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];

/// Tachometer presentation.
const GAUGE_STYLE: GaugeStyle = GaugeStyle::Segmented;

/// Pending accelerate edge, set by [`accelerate_task`], taken by the tick loop.
static ACCEL_LATCH: AccelLatch = AccelLatch::new();

/// mipidsi batching buffers, one per panel.
static CLUSTER_DI_BUFFER: StaticCell<[u8; DI_BUFFER_SIZE]> = StaticCell::new();
static INFO_DI_BUFFER: StaticCell<[u8; DI_BUFFER_SIZE]> = StaticCell::new();

/// Current instant on the simulation clock (wraps after ~49.7 days).
fn now() -> Millis { Millis::new(Instant::now().as_millis() as u32) }

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Instrument cluster starting...");

    let p = embassy_rp::init(Default::default());

    // Buttons (active-low, internal pull-ups)
    let accelerate = Input::new(p.PIN_2, Pull::Up);
    let refuel = Input::new(p.PIN_3, Pull::Up);
    let turn_left = Input::new(p.PIN_4, Pull::Up);
    let turn_right = Input::new(p.PIN_5, Pull::Up);

    // Indicators (active-high, start off)
    let led_left = Output::new(p.PIN_6, Level::Low);
    let led_right = Output::new(p.PIN_7, Level::Low);
    let buzzer = Output::new(p.PIN_8, Level::Low);

    // Cluster panel: ILI9341 on SPI1
    let cluster_spi = Spi::new_blocking_txonly(p.SPI1, p.PIN_10, p.PIN_11, display_spi_config());
    let cluster_display = unwrap!(init_cluster_display(
        cluster_spi,
        Output::new(p.PIN_13, Level::High),
        Output::new(p.PIN_12, Level::Low),
        Output::new(p.PIN_14, Level::High),
        CLUSTER_DI_BUFFER.init([0; DI_BUFFER_SIZE]),
    ));
    let cluster_backlight = Output::new(p.PIN_15, Level::Low);
    info!("Cluster display initialized");

    // Info panel: ST7789 on SPI0
    let info_spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, display_spi_config());
    let info_display = unwrap!(init_info_display(
        info_spi,
        Output::new(p.PIN_17, Level::High),
        Output::new(p.PIN_16, Level::Low),
        Output::new(p.PIN_20, Level::High),
        INFO_DI_BUFFER.init([0; DI_BUFFER_SIZE]),
    ));
    let info_backlight = Output::new(p.PIN_21, Level::Low);
    info!("Info display initialized");

    let mut cluster = unwrap!(Cluster::new(
        SimConfig::DEFAULT,
        GAUGE_STYLE,
        Panel::new(cluster_display, cluster_backlight),
        Panel::new(info_display, info_backlight),
        GpioOutputs::new(led_left, led_right, buzzer),
        now(),
    ));
    unwrap!(cluster.start());
    info!("Cluster started ({} gauge), tank empty", GAUGE_STYLE);

    spawner.spawn(accelerate_task(accelerate, &ACCEL_LATCH)).unwrap();
    info!("Accelerate task spawned");

    let mut inputs = PinInputs::new(&ACCEL_LATCH, refuel, turn_left, turn_right);

    info!("Starting main loop...");

    loop {
        let snapshot = match inputs.snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Input read failed: {}", e);
                panic!("input failure");
            }
        };

        let fuel_before = cluster.state().fuel_percent;
        match cluster.tick(now(), snapshot) {
            Ok(event) => match fuel_notice(fuel_before, event.fuel_percent) {
                Some(FuelNotice::Empty) => warn!("Tank empty"),
                Some(FuelNotice::Full) => info!("Tank full"),
                None => {}
            },
            Err(e) => {
                error!("Tick failed: {}", e);
                panic!("cluster failure");
            }
        }

        Timer::after_millis(u64::from(TICK_MS)).await;
    }
}
