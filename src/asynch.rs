//! Async variant of the wake scheduler.
//!
//! Same operations and bus traffic as [`crate::DS3231`], over
//! `embedded-hal-async` traits. Only available with the `async` feature.
//!
//! # Example
//!
//! ```rust,ignore
//! use ds3231_wake::asynch::DS3231;
//!
//! let mut rtc = DS3231::new(i2c, 0x68);
//! rtc.arm_wake().await?;
//! loop {
//!     int_pin.wait_for_low().await;
//!     take_measurement().await;
//!     rtc.service_wake().await?;
//! }
//! ```

use embedded_hal_async::i2c::I2c;
use paste::paste;

use crate::fmt::{debug, trace, warn};
use crate::{
    Alarm1Registers, AlarmDayDate, AlarmHours, AlarmMinutes, AlarmSeconds, AlarmSpec,
    ClockSnapshot, Config, Control, DS3231Error, Hours, RegAddr, Status, WakeInterval,
    CLOCK_REGISTER_COUNT,
};

/// DS3231 async wake scheduler handle.
pub struct DS3231<I2C: I2c> {
    i2c: I2C,
    address: u8,
    wake_interval: WakeInterval,
}

impl<I2C: I2c> DS3231<I2C> {
    /// Creates a handle for the device at `address` using the default wake
    /// interval.
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            wake_interval: WakeInterval::default(),
        }
    }

    /// Creates a handle from a [`Config`].
    pub fn with_config(i2c: I2C, config: &Config) -> Self {
        Self {
            i2c,
            address: config.address,
            wake_interval: config.wake_interval,
        }
    }

    /// Gives the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Interval used by [`DS3231::arm_wake`] and [`DS3231::service_wake`].
    pub fn wake_interval(&self) -> WakeInterval {
        self.wake_interval
    }

    /// Changes the interval used for subsequent wakes.
    pub fn set_wake_interval(&mut self, interval: WakeInterval) {
        self.wake_interval = interval;
    }

    /// Reads one register with a write-then-read transfer.
    pub async fn read_register(&mut self, reg: RegAddr) -> Result<u8, DS3231Error<I2C::Error>> {
        let mut data = [0];
        self.i2c
            .write_read(self.address, &[reg as u8], &mut data)
            .await?;
        trace!("read {:?} = {:#x}", reg, data[0]);
        Ok(data[0])
    }

    /// Writes one register in a single `[address, value]` transaction.
    pub async fn write_register(
        &mut self,
        reg: RegAddr,
        value: u8,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        trace!("write {:?} = {:#x}", reg, value);
        self.i2c.write(self.address, &[reg as u8, value]).await?;
        Ok(())
    }

    /// Reads the current seconds, minutes and hours in one burst.
    pub async fn read_now(&mut self) -> Result<ClockSnapshot, DS3231Error<I2C::Error>> {
        let mut data = [0; CLOCK_REGISTER_COUNT];
        self.i2c
            .write_read(self.address, &[RegAddr::Seconds as u8], &mut data)
            .await?;
        let now = ClockSnapshot::from_registers(data);
        if !now.is_valid() {
            warn!("clock registers out of range: {:?}", now);
        }
        Ok(now)
    }

    /// Programs alarm 1 to fire whenever the clock reads `minute:second`.
    ///
    /// # Errors
    /// Returns [`DS3231Error::Alarm`] without touching the bus if either value
    /// is above 59.
    pub async fn set_alarm_at(
        &mut self,
        minute: u8,
        second: u8,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        let spec = AlarmSpec::new(minute, second).map_err(DS3231Error::Alarm)?;
        self.set_alarm(&spec).await
    }

    /// Programs alarm 1 with `spec` and enables its interrupt. Stops at the
    /// first failed transfer.
    pub async fn set_alarm(&mut self, spec: &AlarmSpec) -> Result<(), DS3231Error<I2C::Error>> {
        debug!("alarm 1 target {:?}", spec);
        let regs = Alarm1Registers::from_spec(spec);
        self.set_alarm1_seconds(regs.seconds()).await?;
        self.set_alarm1_minutes(regs.minutes()).await?;
        self.set_alarm1_hours(regs.hours()).await?;
        self.set_alarm1_day_date(regs.day_date()).await?;

        let mut control = self.control().await?;
        control.enable_alarm1_interrupt();
        self.set_control(control).await
    }

    /// Programs alarm 1 to fire `offset_minutes:offset_seconds` from now.
    /// Nothing is written if the time read fails.
    pub async fn schedule_in(
        &mut self,
        offset_minutes: u8,
        offset_seconds: u8,
    ) -> Result<AlarmSpec, DS3231Error<I2C::Error>> {
        let now = self.read_now().await?;
        let target = AlarmSpec::after(&now, offset_minutes, offset_seconds);
        debug!(
            "now {:?}, scheduling in {}m{}s",
            now, offset_minutes, offset_seconds
        );
        self.set_alarm(&target).await?;
        Ok(target)
    }

    /// Returns true if the alarm 1 flag (A1F) is set.
    pub async fn alarm1_fired(&mut self) -> Result<bool, DS3231Error<I2C::Error>> {
        Ok(self.status().await?.alarm1_flag())
    }

    /// Clears the alarm 1 flag, writing the status register only if it was
    /// set. Returns whether it was set.
    pub async fn clear_alarm1_flag(&mut self) -> Result<bool, DS3231Error<I2C::Error>> {
        let mut status = self.status().await?;
        if !status.alarm1_flag() {
            return Ok(false);
        }
        status.set_alarm1_flag(false);
        self.set_status(status).await?;
        Ok(true)
    }

    /// Clears a pending alarm 1 flag, then schedules the first wake.
    pub async fn arm_wake(&mut self) -> Result<AlarmSpec, DS3231Error<I2C::Error>> {
        self.clear_alarm1_flag().await?;
        let interval = self.wake_interval;
        self.schedule_in(interval.minutes(), interval.seconds())
            .await
    }

    /// If alarm 1 fired, schedules the next wake and then clears the flag.
    /// A failed call leaves the flag set, so it can simply be retried.
    pub async fn service_wake(&mut self) -> Result<Option<AlarmSpec>, DS3231Error<I2C::Error>> {
        if !self.alarm1_fired().await? {
            return Ok(None);
        }
        let interval = self.wake_interval;
        let target = self
            .schedule_in(interval.minutes(), interval.seconds())
            .await?;
        self.clear_alarm1_flag().await?;
        Ok(Some(target))
    }
}

// Register access implementations
macro_rules! impl_register_access {
    ($(($name:ident, $regaddr:expr, $typ:ty)),+) => {
        impl<I2C: I2c> DS3231<I2C> {
            $(
                paste! {
                    #[doc = concat!("Reads the ", stringify!($name), " register.")]
                    pub async fn $name(&mut self) -> Result<$typ, DS3231Error<I2C::Error>> {
                        Ok(<$typ>::from(self.read_register($regaddr).await?))
                    }

                    #[doc = concat!("Writes the ", stringify!($name), " register.")]
                    pub async fn [<set_ $name>](&mut self, value: $typ) -> Result<(), DS3231Error<I2C::Error>> {
                        self.write_register($regaddr, value.into()).await
                    }
                }
            )+
        }
    }
}

impl_register_access!(
    (hours, RegAddr::Hours, Hours),
    (alarm1_seconds, RegAddr::Alarm1Seconds, AlarmSeconds),
    (alarm1_minutes, RegAddr::Alarm1Minutes, AlarmMinutes),
    (alarm1_hours, RegAddr::Alarm1Hours, AlarmHours),
    (alarm1_day_date, RegAddr::Alarm1DayDate, AlarmDayDate),
    (control, RegAddr::Control, Control),
    (status, RegAddr::ControlStatus, Status)
);
