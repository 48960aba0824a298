use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use sensor_emulator::Peripheral;
use sensor_emulator::config::Correction;
use sensor_emulator::control::Setpoint;

/// An emulated sensor shared between its I2C target task and the control task.
///
/// Every access happens inside a critical section, so a control update can never
/// land between a bus write and the read that follows it.
pub(crate) type Shared<P> = Mutex<CriticalSectionRawMutex, RefCell<P>>;

/// Apply a set-point to one shared sensor.
pub(crate) fn apply<P: Peripheral>(
    sensor: &Shared<P>,
    setpoint: &Setpoint,
    correction: &Correction,
) {
    sensor.lock(|cell| setpoint.apply_to(&mut *cell.borrow_mut(), correction));
}
