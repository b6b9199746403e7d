//! Console stand-in for the indicator LEDs and buzzer.

use instrument_cluster::{OutputSink, Result};

/// Prints every LED/buzzer level change to stdout.
pub struct ConsoleOutputs {
    last: Option<[bool; 3]>,
}

impl ConsoleOutputs {
    pub const fn new() -> Self { Self { last: None } }
}

impl OutputSink for ConsoleOutputs {
    fn apply(
        &mut self,
        left_on: bool,
        right_on: bool,
        buzzer_on: bool,
    ) -> Result<()> {
        let next = [left_on, right_on, buzzer_on];
        if let Some(prev) = self.last {
            for (name, (was, is)) in ["LED left", "LED right", "Buzzer"].iter().zip(prev.iter().zip(next.iter())) {
                if was != is {
                    println!("[{name}] {}", if *is { "ON" } else { "OFF" });
                }
            }
        }
        self.last = Some(next);
        Ok(())
    }
}
