//! Drawing primitives for both panels.
//!
//! - [`gauge`]: tachometer geometry, segment ring, needle, scale ticks and frame
//! - [`icons`]: turn-signal arrow bitmaps
//! - [`fuel`]: fuel bar row
//!
//! Every function is generic over [`DisplayDriver`](crate::display::DisplayDriver) and
//! only draws; deciding *when* to draw is the renderer's job.

pub mod fuel;
pub mod gauge;
pub mod icons;
