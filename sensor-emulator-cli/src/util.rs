pub(crate) fn u8_from_hex(value: &str) -> Result<u8, std::num::ParseIntError> {
    let s = if value.to_ascii_lowercase().starts_with("0x") {
        &value[2..]
    } else {
        value
    };
    u8::from_str_radix(s, 16)
}

/// Bytes as space-separated hex pairs.
pub(crate) fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_addresses() {
        assert_eq!(u8_from_hex("0x76"), Ok(0x76));
        assert_eq!(u8_from_hex("0X44"), Ok(0x44));
        assert_eq!(u8_from_hex("45"), Ok(0x45));
        assert!(u8_from_hex("0x100").is_err());
    }
}
