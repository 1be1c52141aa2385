//! Alarm 1 targets for the wake scheduler.
//!
//! The scheduler only ever uses one alarm 1 mode: match on minutes and
//! seconds, with the hours and day/date fields masked off. The alarm therefore
//! fires once per hour, whenever the wall clock reaches `mm:ss`, regardless of
//! the hour or date.
//!
//! [`AlarmSpec::after`] computes a target relative to a clock snapshot. It
//! carries seconds into minutes but never minutes into hours: with the hour
//! field masked, any hour value matches, so the carry would have nowhere to
//! go. An hour-precise alarm would need that carry added here.

use chrono::Timelike;

use crate::bcd;
use crate::registers::{AlarmDayDate, AlarmHours, AlarmMinutes, AlarmSeconds};
use crate::time::ClockSnapshot;

/// Error type for alarm target construction.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmError {
    /// Invalid time component value
    InvalidTime(&'static str),
}

/// Absolute alarm 1 target within any hour.
///
/// Two targets with the same minute and second are the same alarm no matter
/// when they were programmed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmSpec {
    minute: u8,
    second: u8,
}

impl AlarmSpec {
    /// Creates a target from a minute and second.
    ///
    /// # Errors
    ///
    /// Returns [`AlarmError::InvalidTime`] if either value is above 59.
    pub fn new(minute: u8, second: u8) -> Result<Self, AlarmError> {
        if minute > 59 {
            return Err(AlarmError::InvalidTime("minutes must be 0-59"));
        }
        if second > 59 {
            return Err(AlarmError::InvalidTime("seconds must be 0-59"));
        }
        Ok(Self { minute, second })
    }

    /// Creates a target from the minute and second of a chrono time.
    #[must_use]
    pub fn from_time<T: Timelike>(time: &T) -> Self {
        // chrono reports leap seconds as second 59
        Self {
            minute: (time.minute() % 60) as u8,
            second: (time.second() % 60) as u8,
        }
    }

    /// Computes the target `offset_minutes:offset_seconds` after `now`.
    ///
    /// Seconds wrap at 60 and carry into minutes; minutes wrap at 60 and the
    /// carry is discarded. Out-of-range snapshot fields still produce a valid
    /// target because both results are reduced modulo 60.
    #[must_use]
    pub fn after(now: &ClockSnapshot, offset_minutes: u8, offset_seconds: u8) -> Self {
        let total_seconds = u16::from(now.seconds) + u16::from(offset_seconds);
        let second = (total_seconds % 60) as u8;
        let carry = total_seconds / 60;

        let total_minutes = u16::from(now.minutes) + u16::from(offset_minutes) + carry;
        let minute = (total_minutes % 60) as u8;

        Self { minute, second }
    }

    /// Minute the alarm matches on (0-59).
    #[must_use]
    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Second the alarm matches on (0-59).
    #[must_use]
    pub fn second(&self) -> u8 {
        self.second
    }
}

/// Register values for alarm 1 matching on minutes and seconds.
///
/// A1M1 and A1M2 are clear, A1M3 and A1M4 are set, so the hours and
/// day/date registers are written as `0x80`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Alarm1Registers {
    seconds: AlarmSeconds,
    minutes: AlarmMinutes,
    hours: AlarmHours,
    day_date: AlarmDayDate,
}

impl Alarm1Registers {
    /// Encodes `spec` into the four alarm 1 registers.
    #[must_use]
    pub fn from_spec(spec: &AlarmSpec) -> Self {
        // both values are at most 59, so the encoded top bit (the mask) is clear
        let seconds = AlarmSeconds::from(bcd::encode(spec.second));
        let minutes = AlarmMinutes::from(bcd::encode(spec.minute));

        let mut hours = AlarmHours::default();
        hours.set_alarm_mask3(true);
        let mut day_date = AlarmDayDate::default();
        day_date.set_alarm_mask4(true);

        Self {
            seconds,
            minutes,
            hours,
            day_date,
        }
    }

    /// Gets the alarm seconds register
    #[must_use]
    pub fn seconds(&self) -> AlarmSeconds {
        self.seconds
    }

    /// Gets the alarm minutes register
    #[must_use]
    pub fn minutes(&self) -> AlarmMinutes {
        self.minutes
    }

    /// Gets the alarm hours register
    #[must_use]
    pub fn hours(&self) -> AlarmHours {
        self.hours
    }

    /// Gets the alarm day/date register
    #[must_use]
    pub fn day_date(&self) -> AlarmDayDate {
        self.day_date
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Alarm1Registers {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Alarm1Registers {{ ");
        defmt::write!(f, "seconds: {}, ", self.seconds);
        defmt::write!(f, "minutes: {}, ", self.minutes);
        defmt::write!(f, "hours: {}, ", self.hours);
        defmt::write!(f, "day_date: {} ", self.day_date);
        defmt::write!(f, "}}");
    }
}
