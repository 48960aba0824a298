use std::io::BufRead;

use sensor_emulator::config::Correction;
use sensor_emulator::control::Setpoint;

use crate::read;
use crate::sensor::Emulator;

/// Apply each control line from stdin and print what a controller then reads.
///
/// Bad lines are logged and skipped, as the firmware does.
pub(crate) fn action(emulator: &mut Emulator, correction: &Correction) -> anyhow::Result<()> {
    for line in std::io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match Setpoint::parse(&line) {
            Ok(setpoint) => setpoint.apply_to(emulator.peripheral(), correction),
            Err(e) => {
                log::warn!("ignoring control line {line:?}: {e}");
                continue;
            }
        }
        println!("{}", read::measure(emulator.peripheral())?);
    }
    Ok(())
}
