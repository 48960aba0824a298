pub(crate) mod i2c;
pub(crate) mod pin;
pub(crate) mod uart;
