//! Driver configuration.

use core::time::Duration;

/// Fixed I2C address of the DS3231.
pub const DEFAULT_ADDRESS: u8 = 0x68;

/// Wake cadence used when none is configured.
pub const DEFAULT_WAKE_INTERVAL: WakeInterval = WakeInterval {
    minutes: 0,
    seconds: 10,
};

/// Error returned when building a [`WakeInterval`].
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WakeIntervalError {
    /// The interval is zero, so the alarm would target the current second
    Zero,
    /// The interval is an hour or more, which an hour-agnostic alarm cannot
    /// tell apart from a shorter one
    TooLong,
}

/// Time between two consecutive wake alarms.
///
/// The alarm ignores hours, so only intervals shorter than one hour are
/// representable.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WakeInterval {
    minutes: u8,
    seconds: u8,
}

impl WakeInterval {
    /// Creates an interval of `minutes` and `seconds`.
    ///
    /// Seconds above 59 are allowed and carry into minutes.
    ///
    /// # Errors
    ///
    /// Returns an error if the total span is zero or at least one hour.
    pub fn new(minutes: u8, seconds: u8) -> Result<Self, WakeIntervalError> {
        Self::from_secs(u32::from(minutes) * 60 + u32::from(seconds))
    }

    /// Creates an interval from a number of seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if `total` is zero or at least 3600.
    pub fn from_secs(total: u32) -> Result<Self, WakeIntervalError> {
        match total {
            0 => Err(WakeIntervalError::Zero),
            1..=3599 => Ok(Self {
                minutes: (total / 60) as u8,
                seconds: (total % 60) as u8,
            }),
            _ => Err(WakeIntervalError::TooLong),
        }
    }

    /// Minutes part of the interval (0-59).
    #[must_use]
    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    /// Seconds part of the interval (0-59).
    #[must_use]
    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    /// Total span in seconds.
    #[must_use]
    pub fn as_secs(&self) -> u32 {
        u32::from(self.minutes) * 60 + u32::from(self.seconds)
    }
}

impl Default for WakeInterval {
    fn default() -> Self {
        DEFAULT_WAKE_INTERVAL
    }
}

impl TryFrom<Duration> for WakeInterval {
    type Error = WakeIntervalError;

    /// Converts whole seconds of `duration`; sub-second parts are dropped.
    fn try_from(duration: Duration) -> Result<Self, Self::Error> {
        let secs = u32::try_from(duration.as_secs()).map_err(|_| WakeIntervalError::TooLong)?;
        Self::from_secs(secs)
    }
}

impl From<WakeInterval> for Duration {
    fn from(interval: WakeInterval) -> Self {
        Duration::from_secs(u64::from(interval.as_secs()))
    }
}

/// Configuration for a [`crate::DS3231`] handle.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// I2C address of the device
    pub address: u8,
    /// Interval used by `arm_wake` and `service_wake`
    pub wake_interval: WakeInterval,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            wake_interval: DEFAULT_WAKE_INTERVAL,
        }
    }
}
