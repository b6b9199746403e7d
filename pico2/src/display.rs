//! Display drivers for the two SPI panels.
//!
//! Pin mapping:
//!
//! | Panel                     | Bus  | SCK | MOSI | DC | CS | RST | BL |
//! |---------------------------|------|-----|------|----|----|-----|----|
//! | Cluster, ILI9341 240x320  | SPI1 | 10  | 11   | 12 | 13 | 14  | 15 |
//! | Info, ST7789 135x240      | SPI0 | 18  | 19   | 16 | 17 | 20  | 21 |
//!
//! Each panel has its own bus, so neither needs bus sharing.

use embassy_rp::gpio::Output;
use embassy_rp::peripherals::{SPI0, SPI1};
use embassy_rp::spi::{Blocking, Config as SpiConfig, Spi};
use embassy_time::Delay;
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use instrument_cluster::ClusterError;
use instrument_cluster::config::layout::{CLUSTER_HEIGHT, CLUSTER_WIDTH, INFO_HEIGHT, INFO_WIDTH};
use mipidsi::Builder;
use mipidsi::interface::SpiInterface;
use mipidsi::models::{ILI9341Rgb565, ST7789};
use mipidsi::options::{ColorInversion, ColorOrder, Orientation, Rotation};

/// Size of the mipidsi command/pixel batching buffer per panel.
pub const DI_BUFFER_SIZE: usize = 512;

/// ST7789 135x240 module: visible window offset inside the 240x320 controller RAM.
const INFO_OFFSET_X: u16 = 52;
const INFO_OFFSET_Y: u16 = 40;

/// Cluster panel (ILI9341 on SPI1).
pub type ClusterDisplay = mipidsi::Display<
    SpiInterface<'static, ExclusiveDevice<Spi<'static, SPI1, Blocking>, Output<'static>, NoDelay>, Output<'static>>,
    ILI9341Rgb565,
    Output<'static>,
>;

/// Info panel (ST7789 on SPI0).
pub type InfoDisplay = mipidsi::Display<
    SpiInterface<'static, ExclusiveDevice<Spi<'static, SPI0, Blocking>, Output<'static>, NoDelay>, Output<'static>>,
    ST7789,
    Output<'static>,
>;

/// Initialize the ILI9341 cluster panel in portrait orientation.
///
/// # Errors
///
/// Returns `ClusterError::DisplayInit` if the controller does not accept the init
/// sequence.
pub fn init_cluster_display(
    spi: Spi<'static, SPI1, Blocking>,
    cs: Output<'static>,
    dc: Output<'static>,
    rst: Output<'static>,
    buffer: &'static mut [u8],
) -> Result<ClusterDisplay, ClusterError> {
    let spi_device = ExclusiveDevice::new_no_delay(spi, cs).map_err(|_| ClusterError::DisplayInit)?;
    let di = SpiInterface::new(spi_device, dc, buffer);

    Builder::new(ILI9341Rgb565, di)
        .display_size(CLUSTER_WIDTH as u16, CLUSTER_HEIGHT as u16)
        .color_order(ColorOrder::Bgr)
        .reset_pin(rst)
        .init(&mut Delay)
        .map_err(|_| ClusterError::DisplayInit)
}

/// Initialize the ST7789 info panel, rotated to 240x135 landscape.
///
/// # Errors
///
/// Returns `ClusterError::DisplayInit` if the controller does not accept the init
/// sequence.
pub fn init_info_display(
    spi: Spi<'static, SPI0, Blocking>,
    cs: Output<'static>,
    dc: Output<'static>,
    rst: Output<'static>,
    buffer: &'static mut [u8],
) -> Result<InfoDisplay, ClusterError> {
    let spi_device = ExclusiveDevice::new_no_delay(spi, cs).map_err(|_| ClusterError::DisplayInit)?;
    let di = SpiInterface::new(spi_device, dc, buffer);

    // Native panel is 135x240 (portrait); rotate 90° for 240x135
    Builder::new(ST7789, di)
        .display_size(INFO_HEIGHT as u16, INFO_WIDTH as u16)
        .display_offset(INFO_OFFSET_X, INFO_OFFSET_Y)
        .orientation(Orientation::new().rotate(Rotation::Deg90))
        .invert_colors(ColorInversion::Inverted)
        .reset_pin(rst)
        .init(&mut Delay)
        .map_err(|_| ClusterError::DisplayInit)
}

/// SPI configuration shared by both panels.
///
/// Both controllers accept well above 40MHz for writes; 40MHz keeps long jumper
/// wires reliable.
pub fn display_spi_config() -> SpiConfig {
    let mut config = SpiConfig::default();
    config.frequency = 40_000_000; // 40MHz
    config
}
