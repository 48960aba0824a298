#![no_std]
#![no_main]

use core::cell::RefCell;

use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::i2c;
use embassy_rp::i2c_slave::{self, I2cSlave};
use embassy_rp::peripherals::{I2C0, I2C1, UART0};
use embassy_rp::uart;
use embassy_sync::blocking_mutex::Mutex;
use sensor_emulator::config::{Bme280Config, Correction, SensirionConfig};
use sensor_emulator::{Bme280, Peripheral, Sht4x};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

mod sensors;
mod signals;
mod tasks;

use sensors::Shared;

/// Correction for the thermostat under test, so its display shows the set-point.
const CORRECTION: Correction = Correction::ECOBEE;
const UART_BAUD_RATE: u32 = 115_200;

bind_interrupts!(struct UartInterupts {
    UART0_IRQ => uart::InterruptHandler<UART0>;
});

bind_interrupts!(struct I2cInterrupts {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
    I2C1_IRQ => i2c::InterruptHandler<I2C1>;
});

static BME280: StaticCell<Shared<Bme280>> = StaticCell::new();
static SHT4X: StaticCell<Shared<Sht4x>> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    // Emulated sensors, at their start-up values.
    let bme_config = Bme280Config::default()
        .with_temperature(CORRECTION.apply(sensor_emulator::config::DEFAULT_TEMPERATURE));
    let sht_config = SensirionConfig::default()
        .with_temperature(CORRECTION.apply(sensor_emulator::config::DEFAULT_TEMPERATURE));
    let bme: &'static Shared<Bme280> =
        BME280.init(Mutex::new(RefCell::new(Bme280::with_config(&bme_config))));
    let sht: &'static Shared<Sht4x> =
        SHT4X.init(Mutex::new(RefCell::new(Sht4x::with_config(&sht_config))));

    // BME280 target on I2C0.
    let mut bme_target_config = i2c_slave::Config::default();
    bme_target_config.addr = bme.lock(|cell| cell.borrow().address()).into();
    let bme_target = I2cSlave::new(p.I2C0, p.PIN_21, p.PIN_20, I2cInterrupts, bme_target_config);

    // SHT4x target on I2C1.
    let mut sht_target_config = i2c_slave::Config::default();
    sht_target_config.addr = sht.lock(|cell| cell.borrow().address()).into();
    let sht_target = I2cSlave::new(p.I2C1, p.PIN_15, p.PIN_14, I2cInterrupts, sht_target_config);

    // Control channel.
    let mut uart_config = uart::Config::default();
    uart_config.baudrate = UART_BAUD_RATE;
    let uart = uart::Uart::new(
        p.UART0,
        p.PIN_0,
        p.PIN_1,
        UartInterupts,
        p.DMA_CH1,
        p.DMA_CH2,
        uart_config,
    );
    let (uart_tx, uart_rx) = uart.split();

    // Thermostat fan, heat and cool outputs.
    let fan = Input::new(p.PIN_2, Pull::Down);
    let heat = Input::new(p.PIN_3, Pull::Down);
    let cool = Input::new(p.PIN_4, Pull::Down);

    defmt::info!("Spawning BME280 target task.");
    spawner
        .spawn(tasks::i2c::bme280_target(bme_target, bme))
        .expect("Failed to spawn BME280 target task.");

    defmt::info!("Spawning SHT4x target task.");
    spawner
        .spawn(tasks::i2c::sht4x_target(sht_target, sht))
        .expect("Failed to spawn SHT4x target task.");

    defmt::info!("Spawning UART control task.");
    spawner
        .spawn(tasks::uart::control(uart_rx, bme, sht, CORRECTION))
        .expect("Failed to spawn UART control task.");

    defmt::info!("Spawning UART report task.");
    spawner
        .spawn(tasks::uart::report(uart_tx))
        .expect("Failed to spawn UART report task.");

    defmt::info!("Spawning relay monitor task.");
    spawner
        .spawn(tasks::pin::relays(fan, heat, cool))
        .expect("Failed to spawn relay monitor task.");
}
