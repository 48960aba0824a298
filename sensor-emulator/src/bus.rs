//! An in-memory I2C bus with emulated peripherals attached.
//!
//! [`EmulatedBus`] implements the `embedded_hal` [`I2c`] trait, so sensor drivers
//! and thermostat code written against `embedded_hal` can be pointed at the
//! emulators on a host, exactly as they would talk to the real parts.
use embedded_hal::i2c::{self, I2c, Operation, SevenBitAddress};
use heapless::Vec;

use crate::register_file::REGISTER_COUNT;
use crate::{Error, Peripheral};

/// Number of peripherals that can share one bus.
pub const MAX_PERIPHERALS: usize = 4;

/// Longest write transfer accepted: a register address and a value for every register.
pub const MAX_WRITE_LENGTH: usize = REGISTER_COUNT + 1;

/// What the controller reads once the target stops driving SDA.
const RELEASED_BUS: u8 = 0xFF;

/// Host-side I2C bus connecting a controller to emulated peripherals.
#[derive(Default)]
pub struct EmulatedBus<'a> {
    peripherals: Vec<&'a mut dyn Peripheral, MAX_PERIPHERALS>,
}

impl<'a> EmulatedBus<'a> {
    /// Bus with nothing attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect `peripheral` at its own address.
    pub fn attach(&mut self, peripheral: &'a mut dyn Peripheral) -> Result<(), Error> {
        let address = peripheral.address();
        if self.peripherals.iter().any(|p| p.address() == address) {
            return Err(Error::AddressInUse(address));
        }
        self.peripherals
            .push(peripheral)
            .map_err(|_| Error::BusFull)?;
        log::debug!("bus: attached peripheral at {address:#04x}");
        Ok(())
    }

    /// Addresses that will acknowledge.
    pub fn addresses(&self) -> impl Iterator<Item = u8> + '_ {
        self.peripherals.iter().map(|p| p.address())
    }

    fn target(&mut self, address: u8) -> Result<&mut (dyn Peripheral + 'a), Error> {
        self.peripherals
            .iter_mut()
            .find(|p| p.address() == address)
            .map(|p| &mut **p)
            .ok_or(Error::NoAcknowledge { address })
    }
}

impl i2c::ErrorType for EmulatedBus<'_> {
    type Error = Error;
}

/// Helper to chunk operations based on type (enum case).
fn same_operation_type(a: &Operation, b: &Operation) -> bool {
    core::mem::discriminant(a) == core::mem::discriminant(b)
}

impl I2c<SevenBitAddress> for EmulatedBus<'_> {
    /// Execute the provided operations against the peripheral at `address`.
    ///
    /// Each run of adjacent operations of the same kind is one transfer, as it
    /// would be on the wire. A write transfer is gathered into one buffer and
    /// handed to the peripheral in a single call; an empty one only probes the
    /// address. A read transfer asks the peripheral for its response once and
    /// spreads it across the read buffers, padding with 0xFF past its end.
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let target = self.target(address)?;
        for transfer in operations.chunk_by_mut(same_operation_type) {
            match transfer {
                [Operation::Write(_), ..] => {
                    let mut write_data: Vec<u8, MAX_WRITE_LENGTH> = Vec::new();
                    for op in transfer.iter() {
                        let Operation::Write(buf) = op else {
                            unreachable!("Chunking ensures only writes here.")
                        };
                        write_data
                            .extend_from_slice(buf)
                            .map_err(|_| Error::TransferTooLong)?;
                    }
                    if !write_data.is_empty() {
                        target.on_write(&write_data);
                    }
                }
                [Operation::Read(_), ..] => {
                    let response = target.on_read_request();
                    let mut bytes = response
                        .iter()
                        .copied()
                        .chain(core::iter::repeat(RELEASED_BUS));
                    for op in transfer.iter_mut() {
                        let Operation::Read(their_buffer) = op else {
                            unreachable!("Chunking ensures only reads here.")
                        };
                        their_buffer.fill_with(|| bytes.next().unwrap_or(RELEASED_BUS));
                    }
                }
                [] => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SensirionConfig;
    use crate::{Bme280, Sht31, Sht4x};

    #[test]
    fn attach_rejects_duplicates() {
        let mut first = Sht4x::new();
        let mut second = Sht31::new();
        let mut bus = EmulatedBus::new();
        bus.attach(&mut first).unwrap();
        assert_eq!(bus.attach(&mut second), Err(Error::AddressInUse(0x44)));
    }

    #[test]
    fn attach_rejects_fifth_peripheral() {
        let config = SensirionConfig::default();
        let mut sensors = [0x44, 0x45, 0x46, 0x47, 0x48].map(|address| {
            Sht4x::with_config(&SensirionConfig { address, ..config })
        });
        let mut bus = EmulatedBus::new();
        let mut results = sensors.iter_mut().map(|s| bus.attach(s));
        for _ in 0..MAX_PERIPHERALS {
            assert_eq!(results.next(), Some(Ok(())));
        }
        assert_eq!(results.next(), Some(Err(Error::BusFull)));
    }

    #[test]
    fn addresses_in_attach_order() {
        let mut sht = Sht4x::new();
        let mut bme = Bme280::new();
        let mut bus = EmulatedBus::new();
        assert_eq!(bus.addresses().next(), None);
        bus.attach(&mut sht).unwrap();
        bus.attach(&mut bme).unwrap();
        assert!(bus.addresses().eq([0x44, 0x76]));
    }

    #[test]
    fn unknown_address_is_not_acknowledged() {
        let mut bus = EmulatedBus::new();
        assert_eq!(
            bus.write(0x76, &[0xD0]),
            Err(Error::NoAcknowledge { address: 0x76 })
        );
    }

    #[test]
    fn short_response_is_padded() {
        let mut sht = Sht31::new();
        let mut bus = EmulatedBus::new();
        bus.attach(&mut sht).unwrap();
        let mut status = [0; 5];
        bus.write_read(0x44, &[0xF3, 0x2D], &mut status).unwrap();
        assert_eq!(&status[..2], &[0x80, 0x08]);
        assert_eq!(&status[3..], &[0xFF, 0xFF]);
    }

    #[test]
    fn read_spans_several_buffers() {
        let mut sht = Sht4x::new();
        let mut bus = EmulatedBus::new();
        bus.attach(&mut sht).unwrap();
        let mut temperature = [0; 3];
        let mut humidity = [0; 3];
        bus.transaction(
            0x44,
            &mut [
                Operation::Write(&[0xFD]),
                Operation::Read(&mut temperature),
                Operation::Read(&mut humidity),
            ],
        )
        .unwrap();
        drop(bus);

        let mut expected = [0; 6];
        sht.on_write(&[0xFD]);
        expected.copy_from_slice(sht.on_read_request());
        assert_eq!(temperature, expected[..3]);
        assert_eq!(humidity, expected[3..]);
    }

    #[test]
    fn oversized_write_is_rejected() {
        let mut sht = Sht4x::new();
        let mut bus = EmulatedBus::new();
        bus.attach(&mut sht).unwrap();
        let data = [0; MAX_WRITE_LENGTH + 1];
        assert_eq!(bus.write(0x44, &data), Err(Error::TransferTooLong));
    }
}
