use embassy_rp::{
    peripherals::UART0,
    uart::{self, UartRx, UartTx},
};
use heapless::Vec;
use sensor_emulator::config::Correction;
use sensor_emulator::control::Setpoint;
use sensor_emulator::{Bme280, Sht4x};

use crate::sensors::{self, Shared};
use crate::signals::RELAY_SIGNAL;

/// Longest control line accepted, terminator excluded.
const MAX_LINE_LENGTH: usize = 128;

/// Read JSON control lines and apply them to both sensors.
///
/// Lines end at CR or LF. Over-long lines are dropped whole.
#[embassy_executor::task]
pub(crate) async fn control(
    mut driver: UartRx<'static, UART0, uart::Async>,
    bme: &'static Shared<Bme280>,
    sht: &'static Shared<Sht4x>,
    correction: Correction,
) -> ! {
    defmt::info!("UART control task started");
    let mut line: Vec<u8, MAX_LINE_LENGTH> = Vec::new();
    let mut overflowed = false;
    let mut buf = [0u8; 1];
    loop {
        if let Err(e) = driver.read(&mut buf).await {
            defmt::error!("Error on read: {:?}", e);
            continue;
        }
        match buf[0] {
            b'\r' | b'\n' => {
                if overflowed {
                    defmt::warn!("Dropped control line longer than {} bytes", MAX_LINE_LENGTH);
                } else if !line.is_empty() {
                    apply(&line, bme, sht, &correction);
                }
                line.clear();
                overflowed = false;
            }
            byte => {
                if line.push(byte).is_err() {
                    overflowed = true;
                }
            }
        }
    }
}

fn apply(line: &[u8], bme: &Shared<Bme280>, sht: &Shared<Sht4x>, correction: &Correction) {
    match Setpoint::parse_bytes(line) {
        Ok(setpoint) => {
            defmt::info!(
                "Set-point: temperature {:?}, humidity {:?}",
                setpoint.temperature,
                setpoint.humidity
            );
            sensors::apply(bme, &setpoint, correction);
            sensors::apply(sht, &setpoint, correction);
        }
        Err(e) => defmt::warn!("Ignoring control line {=[u8]:a}: {}", line, e),
    }
}

/// Send a relay report line whenever the thermostat's outputs change.
#[embassy_executor::task]
pub(crate) async fn report(mut driver: UartTx<'static, UART0, uart::Async>) -> ! {
    defmt::info!("UART report task started");
    let mut buf = [0u8; 64];
    loop {
        let report = RELAY_SIGNAL.wait().await;
        let len = match report.write_line(&mut buf) {
            Ok(len) => len,
            Err(e) => {
                defmt::error!("Could not serialise {}: {}", report, e);
                continue;
            }
        };
        if let Err(e) = driver.write(&buf[..len]).await {
            defmt::error!("Error on write: {:?}", e);
        }
    }
}
