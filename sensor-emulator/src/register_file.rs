/// Number of addressable bytes in an emulated register map.
pub const REGISTER_COUNT: usize = 256;

/// Byte-addressable register space with a latched address pointer.
///
/// This is the memory a memory-mapped sensor exposes on the bus. The controller
/// sets [`RegisterFile::address`] with the first byte of a write, and reads
/// continue from there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterFile {
    bytes: [u8; REGISTER_COUNT],
    address: u8,
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    /// All registers zero, address pointer at 0x00.
    pub const fn new() -> Self {
        Self {
            bytes: [0; REGISTER_COUNT],
            address: 0,
        }
    }

    /// Registers loaded from a dump of a real device.
    pub const fn from_snapshot(bytes: [u8; REGISTER_COUNT]) -> Self {
        Self { bytes, address: 0 }
    }

    /// Address most recently latched by the bus controller.
    pub fn address(&self) -> u8 {
        self.address
    }

    pub(crate) fn latch_address(&mut self, address: u8) {
        self.address = address;
    }

    /// Value of a single register.
    pub fn get(&self, register: u8) -> u8 {
        self.bytes[usize::from(register)]
    }

    /// Overwrite a single register.
    pub fn set(&mut self, register: u8, value: u8) {
        self.bytes[usize::from(register)] = value;
    }

    /// Read `N` consecutive registers starting at `start`.
    ///
    /// # Panics
    ///
    /// If the range runs past register 0xFF.
    pub fn read_array<const N: usize>(&self, start: u8) -> [u8; N] {
        let start = usize::from(start);
        let mut out = [0u8; N];
        out.copy_from_slice(&self.bytes[start..start + N]);
        out
    }

    /// Write consecutive registers starting at `start`.
    ///
    /// # Panics
    ///
    /// If the range runs past register 0xFF.
    pub fn write_slice(&mut self, start: u8, values: &[u8]) {
        let start = usize::from(start);
        self.bytes[start..start + values.len()].copy_from_slice(values);
    }

    /// Little-endian unsigned 16-bit value at `register`, `register + 1`.
    pub fn u16_le(&self, register: u8) -> u16 {
        u16::from_le_bytes(self.read_array(register))
    }

    /// Little-endian signed 16-bit value at `register`, `register + 1`.
    pub fn i16_le(&self, register: u8) -> i16 {
        i16::from_le_bytes(self.read_array(register))
    }

    /// Everything from the latched address to the end of the register space.
    pub fn window(&self) -> &[u8] {
        &self.bytes[usize::from(self.address)..]
    }

    /// The whole register space.
    pub fn as_bytes(&self) -> &[u8; REGISTER_COUNT] {
        &self.bytes
    }
}
