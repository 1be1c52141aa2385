//! Binary-coded decimal helpers.
//!
//! Every clock and alarm value the DS3231 holds is stored one decimal digit
//! per nibble: tens in bits 7..4, units in bits 3..0. Arithmetic in this crate
//! is always done on decoded values; only encoded bytes go on the bus.

/// Error returned by [`try_encode`].
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BcdError {
    /// Value is above the allowed maximum for the field
    OutOfRange {
        /// The rejected value
        value: u8,
        /// The largest value the field accepts
        max: u8,
    },
}

/// Encodes `value` (0-99) as BCD.
///
/// Values above 99 are not checked: the tens digit is shifted into the high
/// nibble and any overflow is dropped, so `encode(200)` yields `0x40`.
/// Use [`try_encode`] when the input is not already known to be in range.
#[must_use]
pub const fn encode(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

/// Decodes a BCD byte into its decimal value.
///
/// Nibbles above 9 are not rejected and decode arithmetically
/// (`0xFF` becomes 165).
#[must_use]
pub const fn decode(bcd: u8) -> u8 {
    (bcd >> 4) * 10 + (bcd & 0x0F)
}

/// Encodes `value` as BCD after checking it against `max`.
///
/// # Errors
///
/// Returns [`BcdError::OutOfRange`] if `value > max` or `value > 99`.
pub fn try_encode(value: u8, max: u8) -> Result<u8, BcdError> {
    if value > max || value > 99 {
        return Err(BcdError::OutOfRange { value, max });
    }
    Ok(encode(value))
}
