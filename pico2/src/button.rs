//! Accelerate button edge task.
//!
//! The accelerate button is edge-triggered: each press must count exactly once, no
//! matter how long it is held. A dedicated task waits for the falling edge, records
//! it in the shared [`AccelLatch`] and then sits out contact bounce before arming
//! for the next press. The tick loop consumes the latch once per tick.

use embassy_rp::gpio::Input;
use embassy_time::Timer;
use instrument_cluster::AccelLatch;
use instrument_cluster::config::DEBOUNCE_MS;

#[embassy_executor::task]
pub async fn accelerate_task(
    mut button: Input<'static>,
    latch: &'static AccelLatch,
) {
    loop {
        button.wait_for_falling_edge().await;
        latch.set();

        // Ignore bounce on press, wait for release, ignore bounce on release
        Timer::after_millis(u64::from(DEBOUNCE_MS)).await;
        button.wait_for_high().await;
        Timer::after_millis(u64::from(DEBOUNCE_MS)).await;
    }
}
