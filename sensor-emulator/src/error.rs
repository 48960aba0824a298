use core::fmt;

/// Problems outside the bus handlers themselves.
///
/// The emulated bus handlers never fail: malformed traffic is logged and ignored,
/// the way a real sensor simply doesn't respond usefully. Errors only come from the
/// host-side bus adapter, the serial control channel and configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// No emulated peripheral is attached at this 7-bit address.
    NoAcknowledge {
        /// Address the controller tried to reach.
        address: u8,
    },
    /// A coalesced write transfer is longer than any emulated sensor accepts.
    TransferTooLong,
    /// The emulated bus has no free slot for another peripheral.
    BusFull,
    /// A peripheral is already attached at this address.
    AddressInUse(u8),
    /// A control line was not valid JSON for a control message.
    InvalidControlMessage,
    /// A control line parsed, but set neither temperature nor humidity.
    EmptyControlMessage,
    /// The relay report did not fit the provided buffer.
    ReportTooLong,
    /// The address is not one the chosen sensor can be strapped to.
    InvalidAddress(u8),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoAcknowledge { address } => {
                write!(f, "no emulated peripheral acknowledged address {address:#04x}")
            }
            Error::TransferTooLong => f.write_str("write transfer too long"),
            Error::BusFull => f.write_str("no free peripheral slot on the emulated bus"),
            Error::AddressInUse(address) => {
                write!(f, "address {address:#04x} is already in use")
            }
            Error::InvalidControlMessage => f.write_str("control line is not a valid message"),
            Error::EmptyControlMessage => {
                f.write_str("control message sets neither temperature nor humidity")
            }
            Error::ReportTooLong => f.write_str("relay report does not fit the buffer"),
            Error::InvalidAddress(address) => {
                write!(f, "{address:#04x} is not a valid address for this sensor")
            }
        }
    }
}

impl core::error::Error for Error {}

impl embedded_hal::i2c::Error for Error {
    fn kind(&self) -> embedded_hal::i2c::ErrorKind {
        use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
        match self {
            Error::NoAcknowledge { .. } => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
            _ => ErrorKind::Other,
        }
    }
}
