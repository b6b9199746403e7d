//! Sub-rectangle views into the shared simulator window.
//!
//! Both panels render into one `SimulatorDisplay` so a single SDL window shows the
//! cluster and info displays side by side. Each [`Viewport`] clips to its own size
//! and shifts pixels by its offset before forwarding them.

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_graphics::Pixel;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::SimulatorDisplay;

/// Shared window framebuffer.
pub type SharedDisplay = Rc<RefCell<SimulatorDisplay<Rgb565>>>;

/// Draw target covering `size` pixels of the shared display at `offset`.
pub struct Viewport {
    display: SharedDisplay,
    offset: Point,
    size: Size,
}

impl Viewport {
    pub fn new(
        display: &SharedDisplay,
        offset: Point,
        size: Size,
    ) -> Self {
        Self {
            display: Rc::clone(display),
            offset,
            size,
        }
    }
}

impl OriginDimensions for Viewport {
    fn size(&self) -> Size { self.size }
}

impl DrawTarget for Viewport {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (offset, size) = (self.offset, self.size);
        let inside = move |p: Point| p.x >= 0 && p.y >= 0 && (p.x as u32) < size.width && (p.y as u32) < size.height;

        self.display.borrow_mut().draw_iter(
            pixels
                .into_iter()
                .filter(|Pixel(p, _)| inside(*p))
                .map(|Pixel(p, color)| Pixel(p + offset, color)),
        )
    }
}
