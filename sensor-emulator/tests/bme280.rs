//! Drive the BME280 emulator the way a thermostat's driver would, over the
//! emulated bus, and decode what it reads with the datasheet formulas.
use embedded_hal::i2c::{I2c, Operation};
use sensor_emulator::bme280::BusState;
use sensor_emulator::bme280::calibration::Calibration;
use sensor_emulator::bme280::registers::*;
use sensor_emulator::config::{Bme280Config, WritePolicy};
use sensor_emulator::{Bme280, EmulatedBus, Error, Peripheral, REGISTER_COUNT, RegisterFile};

const ADDRESS: u8 = 0x76;

/// What a controller decodes from one burst read of the data registers.
struct Measurement {
    celsius: f64,
    humidity: f64,
    pascal: f64,
}

/// Read the whole register space, starting at 0x00.
fn dump(bus: &mut impl I2c<Error = Error>) -> Result<RegisterFile, Error> {
    let mut bytes = [0u8; REGISTER_COUNT];
    bus.write_read(ADDRESS, &[0x00], &mut bytes)?;
    Ok(RegisterFile::from_snapshot(bytes))
}

fn adc_20_bit([msb, lsb, xlsb]: [u8; 3]) -> i32 {
    (i32::from(msb) << 12) | (i32::from(lsb) << 4) | (i32::from(xlsb) >> 4)
}

/// Burst read 0xF7..=0xFE as drivers do, so all three values come from one sample.
fn measure(bme: &mut Bme280, calibration: &Calibration) -> Result<Measurement, Error> {
    let mut bus = EmulatedBus::new();
    bus.attach(bme)?;
    let mut data = [0u8; 8];
    bus.write_read(ADDRESS, &[PRESS_DATA], &mut data)?;

    let adc_p = adc_20_bit([data[0], data[1], data[2]]);
    let adc_t = adc_20_bit([data[3], data[4], data[5]]);
    let adc_h = i32::from(u16::from_be_bytes([data[6], data[7]]));
    let (t_fine, centi) = calibration.compensate_temperature(adc_t);
    Ok(Measurement {
        celsius: f64::from(centi) / 100.0,
        humidity: f64::from(calibration.compensate_humidity(adc_h, t_fine)) / 1024.0,
        pascal: f64::from(calibration.compensate_pressure(adc_p, t_fine)) / 256.0,
    })
}

fn calibration_over_bus(bme: &mut Bme280) -> Result<Calibration, Error> {
    let mut bus = EmulatedBus::new();
    bus.attach(bme)?;
    Ok(Calibration::from_registers(&dump(&mut bus)?))
}

#[test]
fn chip_id() -> Result<(), Error> {
    let mut bme = Bme280::new();
    let mut bus = EmulatedBus::new();
    bus.attach(&mut bme)?;
    let mut id = [0u8];
    bus.write_read(ADDRESS, &[CHIP_ID], &mut id)?;
    assert_eq!(id, [0x60]);
    Ok(())
}

/// A read before any address has been written starts at 0x00; once an address is
/// latched, reads start there.
#[test]
fn read_before_first_write_starts_at_zero() {
    let mut bme = Bme280::new();
    assert_eq!(bme.bus_state(), BusState::Idle);
    let window = bme.on_read_request();
    assert_eq!(window.len(), REGISTER_COUNT);
    assert_eq!(window[usize::from(CHIP_ID)], 0x60);

    bme.on_write(&[PRESS_DATA]);
    assert_eq!(bme.bus_state(), BusState::AddressLatched);
    assert_eq!(bme.on_read_request().len(), 9);
}

/// Writing an address and a value, then reading, returns the rest of the register
/// space from that address.
#[test]
fn read_window_starts_at_latched_address() {
    let mut bme = Bme280::new();
    bme.set_temperature(22.0);
    bme.on_write(&[PRESS_DATA, 0x00]);

    let window = bme.on_read_request();
    assert_eq!(window.len(), REGISTER_COUNT - usize::from(PRESS_DATA));
    assert_eq!(window[0], 0x00);
    let expected = bme.registers().as_bytes()[usize::from(PRESS_DATA)..].to_vec();
    assert_eq!(bme.on_read_request(), expected.as_slice());
}

#[test]
fn temperature_round_trip() -> Result<(), Error> {
    let mut bme = Bme280::new();
    let calibration = calibration_over_bus(&mut bme)?;
    for tenths in (-200..=500).step_by(5) {
        let celsius = f64::from(tenths) / 10.0;
        bme.set_temperature(celsius);
        let measurement = measure(&mut bme, &calibration)?;
        assert!(
            (measurement.celsius - celsius).abs() <= 0.01,
            "set {celsius}, read {}",
            measurement.celsius
        );
    }
    Ok(())
}

#[test]
fn humidity_round_trip() -> Result<(), Error> {
    let mut bme = Bme280::new();
    let calibration = calibration_over_bus(&mut bme)?;
    for celsius in [-20.0, 0.0, 22.0, 35.0, 50.0] {
        bme.set_temperature(celsius);
        for percent in (0..=100).step_by(5).map(f64::from) {
            bme.set_humidity(percent);
            let measurement = measure(&mut bme, &calibration)?;
            assert!(
                (measurement.humidity - percent).abs() < 0.05,
                "set {percent} % at {celsius} °C, read {}",
                measurement.humidity
            );
        }
    }
    Ok(())
}

#[test]
fn humidity_is_clamped() {
    let mut bme = Bme280::new();
    bme.set_temperature(22.0);

    bme.set_humidity(100.0);
    let full = bme.adc_h();
    bme.set_humidity(150.0);
    assert_eq!(bme.adc_h(), full);

    bme.set_humidity(0.0);
    let empty = bme.adc_h();
    bme.set_humidity(-10.0);
    assert_eq!(bme.adc_h(), empty);
}

/// Before any temperature is set, humidity is encoded against the power-on
/// temperature pattern.
#[test]
fn humidity_before_temperature() {
    let mut bme = Bme280::new();
    bme.set_humidity(45.0);
    assert_eq!(bme.adc_t(), 0x80000);
    assert_eq!(bme.t_fine(), 117_705);
    assert!((bme.humidity() - 45.0).abs() < 0.05);
}

#[test]
fn changing_temperature_moves_humidity() {
    let mut bme = Bme280::new();
    bme.set_temperature(10.0);
    bme.set_humidity(50.0);
    bme.set_temperature(30.0);
    assert!((bme.humidity() - 50.0).abs() > 0.05);
    bme.set_humidity(50.0);
    assert!((bme.humidity() - 50.0).abs() < 0.05);
}

#[test]
fn pressure_is_fixed() -> Result<(), Error> {
    let mut bme = Bme280::with_config(&Bme280Config::default());
    let calibration = calibration_over_bus(&mut bme)?;
    let measurement = measure(&mut bme, &calibration)?;
    assert_eq!(bme.adc_p(), (RAW_PRESSURE >> 4) as i32);
    assert!((90_000.0..110_000.0).contains(&measurement.pascal));
    assert_eq!(measurement.pascal, bme.pressure());
    Ok(())
}

#[test]
fn config_sets_start_up_values() {
    let config = Bme280Config::default()
        .with_address(0x77)
        .unwrap()
        .with_temperature(18.5)
        .with_humidity(65.0);
    let bme = Bme280::with_config(&config);
    assert_eq!(bme.address(), 0x77);
    assert!((bme.temperature() - 18.5).abs() <= 0.01);
    assert!((bme.humidity() - 65.0).abs() < 0.05);
    assert_eq!(
        Bme280Config::default().with_address(0x44),
        Err(Error::InvalidAddress(0x44))
    );
}

/// A controller configuring the sensor writes address/value pairs in one transfer.
#[test]
fn register_writes() -> Result<(), Error> {
    let mut bme = Bme280::new();
    let mut bus = EmulatedBus::new();
    bus.attach(&mut bme)?;
    bus.transaction(
        ADDRESS,
        &mut [
            Operation::Write(&[CTRL_HUM, 0x01]),
            Operation::Write(&[CTRL_MEAS, 0x27, CONFIG, 0xA0]),
        ],
    )?;
    let mut control = [0u8; 4];
    bus.write_read(ADDRESS, &[CTRL_HUM], &mut control)?;
    assert_eq!(control, [0x01, 0x00, 0x27, 0xA0]);
    Ok(())
}

#[test]
fn permissive_policy_allows_calibration_writes() {
    let mut bme = Bme280::new();
    bme.on_write(&[DIG_T1, 0x00]);
    assert_eq!(bme.registers().get(DIG_T1), 0x00);
}

#[test]
fn strict_policy_protects_calibration() {
    let config = Bme280Config::default().with_write_policy(WritePolicy::ControlRegistersOnly);
    let mut bme = Bme280::with_config(&config);
    let before = bme.calibration();
    bme.on_write(&[DIG_T1, 0x00, TEMP_DATA, 0x00, CTRL_MEAS, 0x27]);
    assert_eq!(bme.calibration(), before);
    assert_ne!(bme.registers().get(TEMP_DATA), 0x00);
    assert_eq!(bme.registers().get(CTRL_MEAS), 0x27);
}

#[test]
fn soft_reset() {
    let mut bme = Bme280::new();
    bme.set_temperature(25.0);
    let temperature = bme.adc_t();
    bme.on_write(&[CTRL_HUM, 0x01, CTRL_MEAS, 0x27, CONFIG, 0xA0]);

    // Anything other than the reset word is ignored.
    bme.on_write(&[SOFT_RESET, 0x42]);
    assert_eq!(bme.registers().get(CTRL_MEAS), 0x27);

    bme.on_write(&[SOFT_RESET, SOFT_RESET_WORD]);
    for register in [SOFT_RESET, CTRL_HUM, STATUS, CTRL_MEAS, CONFIG] {
        assert_eq!(bme.registers().get(register), 0x00, "register {register:#04x}");
    }
    assert_eq!(bme.adc_t(), temperature);
}
