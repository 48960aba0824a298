use embassy_rp::i2c::Instance;
use embassy_rp::i2c_slave::{self, I2cSlave};
use embassy_rp::peripherals::{I2C0, I2C1};
use heapless::Vec;
use sensor_emulator::bus::MAX_WRITE_LENGTH;
use sensor_emulator::{Bme280, Peripheral, REGISTER_COUNT, Sht4x};

use crate::sensors::Shared;

/// What the controller clocks in after the emulator's reply runs out.
const FILL: u8 = 0xFF;

#[embassy_executor::task]
pub(crate) async fn bme280_target(
    mut driver: I2cSlave<'static, I2C0>,
    sensor: &'static Shared<Bme280>,
) -> ! {
    defmt::info!("BME280 target task started");
    serve(&mut driver, sensor).await
}

#[embassy_executor::task]
pub(crate) async fn sht4x_target(
    mut driver: I2cSlave<'static, I2C1>,
    sensor: &'static Shared<Sht4x>,
) -> ! {
    defmt::info!("SHT4x target task started");
    serve(&mut driver, sensor).await
}

/// Hand every transfer addressed to us to the emulated sensor.
async fn serve<T: Instance, P: Peripheral>(
    driver: &mut I2cSlave<'static, T>,
    sensor: &Shared<P>,
) -> ! {
    let mut receive_buffer = [0_u8; MAX_WRITE_LENGTH];
    loop {
        match driver.listen(&mut receive_buffer).await {
            Err(e) => defmt::error!("Error from I2C target driver: {:?}", e),
            Ok(i2c_slave::Command::GeneralCall(n)) => {
                defmt::debug!("General call ignored: {=[u8]:#X}", receive_buffer[..n]);
            }
            Ok(i2c_slave::Command::Write(n)) => write(sensor, &receive_buffer[..n]),
            Ok(i2c_slave::Command::WriteRead(n)) => {
                write(sensor, &receive_buffer[..n]);
                respond(driver, sensor).await;
            }
            Ok(i2c_slave::Command::Read) => respond(driver, sensor).await,
        }
    }
}

fn write<P: Peripheral>(sensor: &Shared<P>, bytes: &[u8]) {
    defmt::debug!("Write: {=[u8]:#X}", bytes);
    sensor.lock(|cell| cell.borrow_mut().on_write(bytes));
}

/// Send the sensor's reply, then the fill byte for as long as the controller reads.
async fn respond<T: Instance, P: Peripheral>(
    driver: &mut I2cSlave<'static, T>,
    sensor: &Shared<P>,
) {
    // Copy the reply out so the lock isn't held while waiting on the bus.
    let mut reply: Vec<u8, REGISTER_COUNT> = Vec::new();
    sensor.lock(|cell| {
        let mut sensor = cell.borrow_mut();
        let bytes = sensor.on_read_request();
        let len = bytes.len().min(REGISTER_COUNT);
        // Cannot fail: the length is capped at the capacity.
        let _ = reply.extend_from_slice(&bytes[..len]);
    });
    if let Err(e) = driver.respond_and_fill(&reply, FILL).await {
        defmt::error!("Error responding to read: {:?}", e);
    }
}
