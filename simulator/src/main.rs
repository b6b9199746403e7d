//! Instrument cluster simulator for desktop platforms.
//!
//! Renders both panels side by side in one `embedded-graphics-simulator` window and
//! maps the keyboard onto the four buttons:
//!
//! | Key           | Button              |
//! |---------------|---------------------|
//! | Up / Space    | Accelerate (edge)   |
//! | R             | Refuel (hold)       |
//! | Left          | Left turn (hold)    |
//! | Right         | Right turn (hold)   |
//!
//! Pass `--needle` for the needle gauge; the segmented ring is the default.

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]

mod outputs;
mod timing;
mod viewport;

use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::Instant;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use instrument_cluster::colors::BLACK;
use instrument_cluster::config::layout::{CLUSTER_HEIGHT, CLUSTER_WIDTH, INFO_HEIGHT, INFO_WIDTH};
use instrument_cluster::{
    Cluster,
    FuelNotice,
    GaugeStyle,
    InputSource,
    LineLevels,
    Millis,
    NoBacklight,
    Panel,
    PolledInputs,
    SimConfig,
    fuel_notice,
};

use crate::outputs::ConsoleOutputs;
use crate::timing::TICK;
use crate::viewport::Viewport;

/// Gap between the two panels in the window.
const PANEL_GAP: u32 = 12;

/// Starting fuel so the car can drive right away.
const START_FUEL: f32 = 60.0;

fn main() {
    let window_size = Size::new(CLUSTER_WIDTH + PANEL_GAP + INFO_WIDTH, CLUSTER_HEIGHT);
    let display = Rc::new(RefCell::new(SimulatorDisplay::<Rgb565>::new(window_size)));
    display.borrow_mut().clear(BLACK).ok();

    let output_settings = OutputSettingsBuilder::new().scale(2).build();
    let mut window = Window::new("Instrument Cluster Sim", &output_settings);

    let style = if std::env::args().any(|arg| arg == "--needle") {
        GaugeStyle::Needle
    } else {
        GaugeStyle::Segmented
    };

    let cluster_view = Viewport::new(&display, Point::zero(), Size::new(CLUSTER_WIDTH, CLUSTER_HEIGHT));
    let info_view = Viewport::new(
        &display,
        Point::new((CLUSTER_WIDTH + PANEL_GAP) as i32, 0),
        Size::new(INFO_WIDTH, INFO_HEIGHT),
    );

    let boot = Instant::now();
    let now = || Millis::new(boot.elapsed().as_millis() as u32);

    let cluster = Cluster::new(
        SimConfig::DEFAULT,
        style,
        Panel::new(cluster_view, NoBacklight),
        Panel::new(info_view, NoBacklight),
        ConsoleOutputs::new(),
        now(),
    );
    let mut cluster = match cluster {
        Ok(cluster) => cluster.with_fuel(START_FUEL),
        Err(e) => {
            eprintln!("[ERROR] {e}");
            return;
        }
    };

    if let Err(e) = cluster.start() {
        eprintln!("[ERROR] start failed: {e}");
        return;
    }
    println!("[INFO] Cluster started ({style:?} gauge, fuel {START_FUEL:.0}%)");
    println!("[INFO] Keys: Up/Space accelerate, R refuel, Left/Right turn signals");
    window.update(&display.borrow());

    let mut inputs = PolledInputs::new();
    let mut levels = LineLevels::default();

    loop {
        let tick_start = Instant::now();

        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => return,
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if repeat {
                        continue;
                    }
                    set_level(&mut levels, keycode, true);
                }
                SimulatorEvent::KeyUp { keycode, .. } => set_level(&mut levels, keycode, false),
                _ => {}
            }
            // Feed every edge so a press and release inside one tick still latches
            inputs.update(now(), levels);
        }
        inputs.update(now(), levels);

        let snapshot = match inputs.snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                eprintln!("[ERROR] input: {e}");
                return;
            }
        };

        let fuel_before = cluster.state().fuel_percent;
        match cluster.tick(now(), snapshot) {
            Ok(event) => match fuel_notice(fuel_before, event.fuel_percent) {
                Some(FuelNotice::Empty) => println!("[WARN] Tank empty"),
                Some(FuelNotice::Full) => println!("[INFO] Tank full"),
                None => {}
            },
            Err(e) => {
                eprintln!("[ERROR] render failed: {e}");
                return;
            }
        }

        window.update(&display.borrow());

        let elapsed = tick_start.elapsed();
        if elapsed < TICK {
            thread::sleep(TICK - elapsed);
        }
    }
}

/// Map a key to its button line; pressed keys read low.
fn set_level(
    levels: &mut LineLevels,
    keycode: Keycode,
    pressed: bool,
) {
    match keycode {
        Keycode::Up | Keycode::Space => levels.accelerate_low = pressed,
        Keycode::R => levels.refuel_low = pressed,
        Keycode::Left => levels.turn_left_low = pressed,
        Keycode::Right => levels.turn_right_low = pressed,
        _ => {}
    }
}
