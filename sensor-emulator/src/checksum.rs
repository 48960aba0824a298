use crc::{Algorithm, Crc};

/// CRC-8 that Sensirion uses on every 2-byte data word.
///
/// Polynomial 0x31 (x⁸ + x⁵ + x⁴ + 1), initialised to 0xFF, no reflection and no
/// final XOR. See section 4.4 of the SHT4x datasheet or 4.12 of the SHT3x datasheet.
const CRC_8_SENSIRION: Algorithm<u8> = Algorithm {
    width: 8,
    poly: 0x31,
    init: 0xFF,
    refin: false,
    refout: false,
    xorout: 0x00,
    check: 0xF7,
    residue: 0x00,
};

const SENSIRION: Crc<u8> = Crc::<u8>::new(&CRC_8_SENSIRION);

/// Compute the Sensirion CRC-8 of `data`.
pub fn crc8(data: &[u8]) -> u8 {
    SENSIRION.checksum(data)
}

/// A 16-bit data word as sent on the bus: MSB, LSB, CRC of both.
pub(crate) fn word_with_crc(word: u16) -> [u8; 3] {
    let [msb, lsb] = word.to_be_bytes();
    [msb, lsb, crc8(&[msb, lsb])]
}
