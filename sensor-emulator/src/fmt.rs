//! Logging shim: warnings go to `defmt` on firmware builds and `log` elsewhere.
//!
//! Format strings passed here must stay within the syntax both backends accept:
//! positional `{}` arguments with at most a `:?` or `:#x` hint.

macro_rules! warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::warn!($($arg)*);
        #[cfg(not(feature = "defmt"))]
        log::warn!($($arg)*);
    }};
}
