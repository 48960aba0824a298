//! A test rig steering a BME280 and an SHT4x together over the control channel.
use sensor_emulator::config::{Bme280Config, Correction};
use sensor_emulator::control::Setpoint;
use sensor_emulator::{Bme280, Error, Peripheral, Sht4x};

const LINES: &str = r#"{"temperature": 19.0}
{"humidity": 55}
{"temperature": 24.5, "humidity": 30.0}
"#;

#[test]
fn lines_drive_both_sensors() -> Result<(), Error> {
    let mut bme = Bme280::with_config(&Bme280Config::default());
    let mut sht = Sht4x::new();
    let mut expected = 22.0;

    for line in LINES.lines() {
        let setpoint = Setpoint::parse(line)?;
        setpoint.apply(&mut [&mut bme, &mut sht], &Correction::IDENTITY);
        expected = setpoint.temperature.unwrap_or(expected);

        let sensors: [&dyn Peripheral; 2] = [&bme, &sht];
        for sensor in sensors {
            assert!((sensor.temperature() - expected).abs() < 0.01, "{}", sensor.kind());
            // The BME280's humidity drifts when only the temperature changes.
            if let Some(humidity) = setpoint.humidity {
                assert!((sensor.humidity() - humidity).abs() < 0.05, "{}", sensor.kind());
            }
        }
    }
    Ok(())
}

/// The thermostat applies its own correction, so the value sent is pre-distorted.
#[test]
fn correction_cancels_thermostat_offset() -> Result<(), Error> {
    let mut bme = Bme280::new();
    Setpoint::parse(r#"{"temperature": 21.0}"#)?.apply_to(&mut bme, &Correction::ECOBEE);
    let displayed = bme.temperature() * Correction::ECOBEE.gain - Correction::ECOBEE.offset;
    assert!((displayed - 21.0).abs() < 0.02);
    Ok(())
}

#[test]
fn bad_lines_leave_sensors_alone() {
    let mut sht = Sht4x::new();
    for line in ["", "{}", "{\"temperature\": \"warm\"}", "{\"fan\": 1}"] {
        if let Ok(setpoint) = Setpoint::parse(line) {
            setpoint.apply_to(&mut sht, &Correction::IDENTITY);
        }
    }
    assert!((sht.temperature() - 22.0).abs() < 0.01);
    assert!((sht.humidity() - 50.0).abs() < 0.01);
}
