//! Wall-clock snapshots read from the DS3231 timekeeping registers.
//!
//! The wake scheduler only needs seconds, minutes and hours, read in one
//! burst starting at the seconds register. Values are decoded from BCD but
//! not range checked: a corrupted register decodes to an out-of-range number
//! and is passed through as-is. [`ClockSnapshot::to_naive_time`] is the
//! checked way out.

use chrono::NaiveTime;

use crate::bcd;
use crate::fmt::debug;
use crate::registers::{Hours, TimeRepresentation};

/// Number of bytes read by the time reader (seconds, minutes, hours).
pub const CLOCK_REGISTER_COUNT: usize = 3;

/// Seconds, minutes and hours of the RTC at the instant they were read.
///
/// A snapshot goes stale as soon as it is taken; read a fresh one for every
/// scheduling decision.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockSnapshot {
    /// Seconds (0-59 on a healthy clock)
    pub seconds: u8,
    /// Minutes (0-59 on a healthy clock)
    pub minutes: u8,
    /// Hours (0-23 on a healthy clock in 24-hour mode)
    pub hours: u8,
}

/// Errors from converting a [`ClockSnapshot`] into a checked time.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// One of the decoded fields is outside its calendar range
    OutOfRange(ClockSnapshot),
}

impl ClockSnapshot {
    /// Decodes the seconds, minutes and hours registers.
    ///
    /// The hours byte is reduced to its low six bits before decoding, which
    /// drops the 12/24-hour select bit. Only 24-hour mode reads are
    /// meaningful; a 12-hour register decodes to the wrong hour.
    #[must_use]
    pub fn from_registers(data: [u8; CLOCK_REGISTER_COUNT]) -> Self {
        let hours = Hours::from(data[2]);
        if hours.time_representation() == TimeRepresentation::TwelveHour {
            debug!("hours register {:#x} is in 12-hour mode", data[2]);
        }
        Self {
            seconds: bcd::decode(data[0]),
            minutes: bcd::decode(data[1]),
            hours: bcd::decode(hours.twenty_four_hour_bcd()),
        }
    }

    /// Returns true if every field is within its calendar range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.seconds < 60 && self.minutes < 60 && self.hours < 24
    }

    /// Converts the snapshot to a chrono time of day.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::OutOfRange`] if any field is out of range.
    pub fn to_naive_time(&self) -> Result<NaiveTime, ClockError> {
        NaiveTime::from_hms_opt(
            u32::from(self.hours),
            u32::from(self.minutes),
            u32::from(self.seconds),
        )
        .ok_or(ClockError::OutOfRange(*self))
    }
}

impl From<[u8; CLOCK_REGISTER_COUNT]> for ClockSnapshot {
    fn from(data: [u8; CLOCK_REGISTER_COUNT]) -> Self {
        Self::from_registers(data)
    }
}
