use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use sensor_emulator::control::RelayReport;

/// Latest state of the thermostat's relay outputs, waiting to be reported.
pub(crate) static RELAY_SIGNAL: Signal<CriticalSectionRawMutex, RelayReport> = Signal::new();
