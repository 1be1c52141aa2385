//! DS3231 alarm-driven wake scheduling for low-power sensing nodes.
//!
//! A node sleeps until the DS3231 pulls its INT/SQW line low, does its work,
//! then programs the next alarm relative to the current time and sleeps
//! again. This crate covers the RTC side of that cycle:
//!
//! - reading the current seconds/minutes/hours ([`DS3231::read_now`])
//! - programming alarm 1 to match a minute and second, with hours and
//!   day/date masked ([`DS3231::set_alarm_at`])
//! - scheduling an alarm a relative offset from now ([`DS3231::schedule_in`])
//! - acknowledging a fired alarm and re-arming ([`DS3231::service_wake`])
//!
//! All bus traffic goes through [`embedded_hal::i2c::I2c`]. The handle owns
//! the bus for its lifetime; call [`DS3231::release`] before a sleep that
//! powers down the peripheral and construct a new handle after re-initialising
//! it. The alarm 1 flag is never cleared implicitly: until the caller clears it
//! (see [`DS3231::clear_alarm1_flag`]) the interrupt line stays asserted.
//!
//! # Example
//!
//! ```rust,ignore
//! use ds3231_wake::{Config, DS3231};
//!
//! let mut rtc = DS3231::with_config(i2c, &Config::default());
//! rtc.arm_wake()?;
//! loop {
//!     sleep_until_rtc_interrupt();
//!     take_measurement();
//!     rtc.service_wake()?;
//! }
//! ```
//!
//! # Features
//!
//! - `async`: adds [`asynch::DS3231`] over `embedded-hal-async`
//! - `log` / `defmt`: driver logging through the respective crate (mutually
//!   exclusive)

#![no_std]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Features \"defmt\" and \"log\" are mutually exclusive and cannot be enabled together");

pub mod alarm;
pub mod bcd;
pub mod config;
mod fmt;
pub mod registers;
pub mod time;

#[cfg(feature = "async")]
pub mod asynch;

use embedded_hal::i2c::I2c;
use paste::paste;

pub use crate::alarm::{Alarm1Registers, AlarmError, AlarmSpec};
pub use crate::config::{Config, WakeInterval, WakeIntervalError, DEFAULT_ADDRESS};
use crate::fmt::{debug, trace, warn};
pub use crate::registers::{
    AlarmDayDate, AlarmHours, AlarmMinutes, AlarmSeconds, Control, Hours, InterruptControl,
    RegAddr, Status, TimeRepresentation,
};
pub use crate::time::{ClockError, ClockSnapshot, CLOCK_REGISTER_COUNT};

/// Errors returned by the driver.
#[derive(Debug, PartialEq)]
pub enum DS3231Error<I2CE> {
    /// The bus transfer failed: NACK, timeout or no device. The causes are
    /// not distinguished beyond what the bus error carries.
    Transport(I2CE),
    /// The alarm target was rejected before any bus traffic
    Alarm(AlarmError),
}

impl<I2CE> From<I2CE> for DS3231Error<I2CE> {
    fn from(e: I2CE) -> Self {
        DS3231Error::Transport(e)
    }
}

/// DS3231 wake scheduler handle.
///
/// Multi-register operations such as [`DS3231::set_alarm`] are not atomic; the
/// handle assumes it is the only user of the bus while they run.
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

    /// Gives the bus back, e.g. before entering a sleep mode that stops the
    /// peripheral clock.
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

    /// Reads one register: an address-select write followed by a repeated
    /// start and a one byte read.
    ///
    /// # Errors
    /// Returns [`DS3231Error::Transport`] if either phase fails.
    pub fn read_register(&mut self, reg: RegAddr) -> Result<u8, DS3231Error<I2C::Error>> {
        let mut data = [0];
        self.i2c
            .write_read(self.address, &[reg as u8], &mut data)?;
        trace!("read {:?} = {:#x}", reg, data[0]);
        Ok(data[0])
    }

    /// Writes one register in a single `[address, value]` transaction.
    ///
    /// # Errors
    /// Returns [`DS3231Error::Transport`] if the device does not accept both
    /// bytes.
    pub fn write_register(
        &mut self,
        reg: RegAddr,
        value: u8,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        trace!("write {:?} = {:#x}", reg, value);
        self.i2c.write(self.address, &[reg as u8, value])?;
        Ok(())
    }

    /// Reads the current seconds, minutes and hours in one burst.
    ///
    /// # Errors
    /// Returns [`DS3231Error::Transport`] if the select write or the three
    /// byte read fails.
    pub fn read_now(&mut self) -> Result<ClockSnapshot, DS3231Error<I2C::Error>> {
        let mut data = [0; CLOCK_REGISTER_COUNT];
        self.i2c
            .write_read(self.address, &[RegAddr::Seconds as u8], &mut data)?;
        let now = ClockSnapshot::from_registers(data);
        if !now.is_valid() {
            warn!("clock registers out of range: {:?}", now);
        }
        Ok(now)
    }

    /// Programs alarm 1 to fire whenever the clock reads `minute:second`,
    /// in any hour.
    ///
    /// # Errors
    /// Returns [`DS3231Error::Alarm`] without touching the bus if either value
    /// is above 59, otherwise see [`DS3231::set_alarm`].
    pub fn set_alarm_at(&mut self, minute: u8, second: u8) -> Result<(), DS3231Error<I2C::Error>> {
        let spec = AlarmSpec::new(minute, second).map_err(DS3231Error::Alarm)?;
        self.set_alarm(&spec)
    }

    /// Programs alarm 1 with `spec` and enables its interrupt.
    ///
    /// Writes the seconds, minutes, hours (`0x80`) and day/date (`0x80`)
    /// alarm registers in that order, then sets INTCN and A1IE in the control
    /// register, keeping its other bits. The status register is left alone.
    ///
    /// # Errors
    /// Returns [`DS3231Error::Transport`] on the first failed transfer. The
    /// remaining steps are skipped and registers already written keep their
    /// new values.
    pub fn set_alarm(&mut self, spec: &AlarmSpec) -> Result<(), DS3231Error<I2C::Error>> {
        debug!("alarm 1 target {:?}", spec);
        let regs = Alarm1Registers::from_spec(spec);
        self.set_alarm1_seconds(regs.seconds())?;
        self.set_alarm1_minutes(regs.minutes())?;
        self.set_alarm1_hours(regs.hours())?;
        self.set_alarm1_day_date(regs.day_date())?;

        let mut control = self.control()?;
        control.enable_alarm1_interrupt();
        self.set_control(control)
    }

    /// Programs alarm 1 to fire `offset_minutes:offset_seconds` from now.
    ///
    /// Reads the clock fresh on every call. See [`AlarmSpec::after`] for how
    /// the target is computed.
    ///
    /// # Returns
    /// The target that was programmed.
    ///
    /// # Errors
    /// Returns [`DS3231Error::Transport`] if the time read fails, in which
    /// case no alarm register is written, or if programming the alarm fails.
    pub fn schedule_in(
        &mut self,
        offset_minutes: u8,
        offset_seconds: u8,
    ) -> Result<AlarmSpec, DS3231Error<I2C::Error>> {
        let now = self.read_now()?;
        let target = AlarmSpec::after(&now, offset_minutes, offset_seconds);
        debug!(
            "now {:?}, scheduling in {}m{}s",
            now, offset_minutes, offset_seconds
        );
        self.set_alarm(&target)?;
        Ok(target)
    }

    /// Returns true if the alarm 1 flag (A1F) is set.
    pub fn alarm1_fired(&mut self) -> Result<bool, DS3231Error<I2C::Error>> {
        Ok(self.status()?.alarm1_flag())
    }

    /// Clears the alarm 1 flag so the interrupt line can fire again.
    ///
    /// The status register is only written if the flag was set.
    ///
    /// # Returns
    /// Whether the flag was set.
    pub fn clear_alarm1_flag(&mut self) -> Result<bool, DS3231Error<I2C::Error>> {
        let mut status = self.status()?;
        if !status.alarm1_flag() {
            return Ok(false);
        }
        status.set_alarm1_flag(false);
        self.set_status(status)?;
        Ok(true)
    }

    /// Boot-time arming: clears a pending alarm 1 flag, then schedules the
    /// first wake one wake interval from now.
    pub fn arm_wake(&mut self) -> Result<AlarmSpec, DS3231Error<I2C::Error>> {
        self.clear_alarm1_flag()?;
        let interval = self.wake_interval;
        self.schedule_in(interval.minutes(), interval.seconds())
    }

    /// Wake-time re-arming: if alarm 1 fired, schedules the next wake one
    /// wake interval from now, then clears the flag.
    ///
    /// # Returns
    /// The new target, or `None` if the alarm had not fired (the wake came
    /// from somewhere else) and nothing was rescheduled.
    ///
    /// # Errors
    /// Returns [`DS3231Error::Transport`] on the first failed transfer. The
    /// flag is only cleared once the new alarm is programmed, so calling this
    /// again after an error retries the reschedule.
    pub fn service_wake(&mut self) -> Result<Option<AlarmSpec>, DS3231Error<I2C::Error>> {
        if !self.alarm1_fired()? {
            return Ok(None);
        }
        let interval = self.wake_interval;
        let target = self.schedule_in(interval.minutes(), interval.seconds())?;
        self.clear_alarm1_flag()?;
        Ok(Some(target))
    }
}

// Typed accessors over read_register/write_register
macro_rules! impl_register_access {
    ($(($name:ident, $regaddr:expr, $typ:ty)),+) => {
        impl<I2C: I2c> DS3231<I2C> {
            $(
                paste! {
                    #[doc = concat!("Reads the ", stringify!($name), " register.")]
                    pub fn $name(&mut self) -> Result<$typ, DS3231Error<I2C::Error>> {
                        Ok(<$typ>::from(self.read_register($regaddr)?))
                    }

                    #[doc = concat!("Writes the ", stringify!($name), " register.")]
                    pub fn [<set_ $name>](&mut self, value: $typ) -> Result<(), DS3231Error<I2C::Error>> {
                        self.write_register($regaddr, value.into())
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

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};

    const DEVICE_ADDRESS: u8 = 0x68;

    fn setup_mock(expectations: &[I2cTrans]) -> I2cMock {
        I2cMock::new(expectations)
    }

    fn read_time(seconds: u8, minutes: u8, hours: u8) -> I2cTrans {
        I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Seconds as u8],
            vec![seconds, minutes, hours],
        )
    }

    // Four alarm writes followed by the control read-modify-write
    fn program_alarm(minute_bcd: u8, second_bcd: u8, control_before: u8, control_after: u8) -> Vec<I2cTrans> {
        vec![
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Alarm1Seconds as u8, second_bcd]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Alarm1Minutes as u8, minute_bcd]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Alarm1Hours as u8, 0x80]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Alarm1DayDate as u8, 0x80]),
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::Control as u8],
                vec![control_before],
            ),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, control_after]),
        ]
    }

    #[test]
    fn test_read_register() {
        let mock = setup_mock(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::ControlStatus as u8],
            vec![0x89],
        )]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);
        assert_eq!(dev.read_register(RegAddr::ControlStatus), Ok(0x89));
        dev.i2c.done();
    }

    #[test]
    fn test_read_register_failure() {
        let mock = setup_mock(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Control as u8],
            vec![0x00],
        )
        .with_error(ErrorKind::Other)]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);
        assert_eq!(
            dev.read_register(RegAddr::Control),
            Err(DS3231Error::Transport(ErrorKind::Other))
        );
        dev.i2c.done();
    }

    #[test]
    fn test_write_register() {
        let mock = setup_mock(&[I2cTrans::write(
            DEVICE_ADDRESS,
            vec![RegAddr::Alarm1Minutes as u8, 0x42],
        )]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);
        assert_eq!(dev.write_register(RegAddr::Alarm1Minutes, 0x42), Ok(()));
        dev.i2c.done();
    }

    #[test]
    fn test_typed_register_access() {
        let mock = setup_mock(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x1C]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x1D]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Hours as u8], vec![0x65]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        let mut control = dev.control().unwrap();
        assert_eq!(control.interrupt_control(), InterruptControl::Interrupt);
        control.set_alarm1_interrupt_enable(true);
        dev.set_control(control).unwrap();

        let hours = dev.hours().unwrap();
        assert_eq!(hours.time_representation(), TimeRepresentation::TwelveHour);
        dev.i2c.done();
    }

    #[test]
    fn test_read_now() {
        let mock = setup_mock(&[read_time(0x58, 0x59, 0x23)]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);
        assert_eq!(
            dev.read_now(),
            Ok(ClockSnapshot {
                seconds: 58,
                minutes: 59,
                hours: 23
            })
        );
        dev.i2c.done();
    }

    #[test]
    fn test_read_now_masks_hour_flags() {
        let mock = setup_mock(&[read_time(0x00, 0x00, 0xE5)]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);
        assert_eq!(dev.read_now().unwrap().hours, 25);
        dev.i2c.done();
    }

    #[test]
    fn test_read_now_failure() {
        let mock = setup_mock(&[read_time(0, 0, 0).with_error(ErrorKind::NoAcknowledge(
            embedded_hal::i2c::NoAcknowledgeSource::Address,
        ))]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);
        assert!(matches!(
            dev.read_now(),
            Err(DS3231Error::Transport(ErrorKind::NoAcknowledge(_)))
        ));
        dev.i2c.done();
    }

    #[test]
    fn test_set_alarm_at_register_sequence() {
        let mock = setup_mock(&program_alarm(0x45, 0x30, 0x00, 0x05));
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);
        assert_eq!(dev.set_alarm_at(45, 30), Ok(()));
        dev.i2c.done();
    }

    #[test]
    fn test_set_alarm_at_preserves_control_bits() {
        let mock = setup_mock(&program_alarm(0x00, 0x03, 0x10, 0x15));
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);
        assert_eq!(dev.set_alarm_at(0, 3), Ok(()));
        dev.i2c.done();
    }

    #[test]
    fn test_set_alarm_at_rejects_out_of_range() {
        let mock = setup_mock(&[]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);
        assert_eq!(
            dev.set_alarm_at(60, 0),
            Err(DS3231Error::Alarm(AlarmError::InvalidTime(
                "minutes must be 0-59"
            )))
        );
        assert!(matches!(
            dev.set_alarm_at(0, 75),
            Err(DS3231Error::Alarm(_))
        ));
        dev.i2c.done();
    }

    #[test]
    fn test_set_alarm_stops_at_first_failed_write() {
        let mock = setup_mock(&[
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Alarm1Seconds as u8, 0x30]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Alarm1Minutes as u8, 0x45])
                .with_error(ErrorKind::Bus),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);
        assert_eq!(
            dev.set_alarm_at(45, 30),
            Err(DS3231Error::Transport(ErrorKind::Bus))
        );
        dev.i2c.done();
    }

    #[test]
    fn test_set_alarm_fails_on_control_read() {
        let mut expectations = program_alarm(0x45, 0x30, 0x00, 0x05);
        expectations.truncate(4);
        expectations.push(
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x00])
                .with_error(ErrorKind::Other),
        );
        let mock = setup_mock(&expectations);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);
        assert_eq!(
            dev.set_alarm_at(45, 30),
            Err(DS3231Error::Transport(ErrorKind::Other))
        );
        dev.i2c.done();
    }

    #[test]
    fn test_schedule_in_without_carry() {
        let mut expectations = vec![read_time(0x10, 0x05, 0x12)];
        expectations.extend(program_alarm(0x05, 0x20, 0x00, 0x05));
        let mock = setup_mock(&expectations);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);
        assert_eq!(dev.schedule_in(0, 10), Ok(AlarmSpec::new(5, 20).unwrap()));
        dev.i2c.done();
    }

    #[test]
    fn test_schedule_in_carries_into_next_hour() {
        // 23:59:58 + 5s -> 00:03, the hour is not part of the match
        let mut expectations = vec![read_time(0x58, 0x59, 0x23)];
        expectations.extend(program_alarm(0x00, 0x03, 0x04, 0x05));
        let mock = setup_mock(&expectations);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);
        assert_eq!(dev.schedule_in(0, 5), Ok(AlarmSpec::new(0, 3).unwrap()));
        dev.i2c.done();
    }

    #[test]
    fn test_schedule_in_time_read_failure_writes_nothing() {
        let mock = setup_mock(&[read_time(0, 0, 0).with_error(ErrorKind::Other)]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);
        assert_eq!(
            dev.schedule_in(1, 30),
            Err(DS3231Error::Transport(ErrorKind::Other))
        );
        dev.i2c.done();
    }

    #[test]
    fn test_alarm1_fired() {
        let mock = setup_mock(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x89]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x88]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);
        assert_eq!(dev.alarm1_fired(), Ok(true));
        assert_eq!(dev.alarm1_fired(), Ok(false));
        dev.i2c.done();
    }

    #[test]
    fn test_clear_alarm1_flag() {
        let mock = setup_mock(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x8B]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8, 0x8A]),
            // already clear: no write
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x08]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);
        assert_eq!(dev.clear_alarm1_flag(), Ok(true));
        assert_eq!(dev.clear_alarm1_flag(), Ok(false));
        dev.i2c.done();
    }

    #[test]
    fn test_clear_alarm1_flag_write_failure() {
        let mock = setup_mock(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x03]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8, 0x02])
                .with_error(ErrorKind::Other),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x03]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);
        assert_eq!(
            dev.clear_alarm1_flag(),
            Err(DS3231Error::Transport(ErrorKind::Other))
        );
        assert_eq!(dev.alarm1_fired(), Ok(true));
        dev.i2c.done();
    }

    #[test]
    fn test_arm_wake_clears_pending_flag_and_schedules() {
        let mut expectations = vec![
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x01]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8, 0x00]),
            read_time(0x55, 0x14, 0x08),
        ];
        expectations.extend(program_alarm(0x15, 0x05, 0x1C, 0x1D));
        let mock = setup_mock(&expectations);
        let mut dev = DS3231::with_config(mock, &Config::default());
        assert_eq!(dev.arm_wake(), Ok(AlarmSpec::new(15, 5).unwrap()));
        dev.i2c.done();
    }

    #[test]
    fn test_arm_wake_schedules_without_pending_flag() {
        let mut expectations = vec![
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x00]),
            read_time(0x00, 0x30, 0x08),
        ];
        expectations.extend(program_alarm(0x32, 0x30, 0x05, 0x05));
        let mock = setup_mock(&expectations);
        let config = Config {
            wake_interval: WakeInterval::new(2, 30).unwrap(),
            ..Config::default()
        };
        let mut dev = DS3231::with_config(mock, &config);
        assert_eq!(dev.arm_wake(), Ok(AlarmSpec::new(32, 30).unwrap()));
        dev.i2c.done();
    }

    #[test]
    fn test_service_wake_after_alarm() {
        let mut expectations = vec![
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x01]),
            read_time(0x52, 0x59, 0x10),
        ];
        expectations.extend(program_alarm(0x00, 0x02, 0x05, 0x05));
        // flag cleared only after the new alarm is in place
        expectations.extend([
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x01]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8, 0x00]),
        ]);
        let mock = setup_mock(&expectations);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);
        assert_eq!(dev.service_wake(), Ok(Some(AlarmSpec::new(0, 2).unwrap())));
        dev.i2c.done();
    }

    #[test]
    fn test_service_wake_retry_after_failed_reschedule() {
        let mut expectations = vec![
            // first attempt: time read fails, flag stays set
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x01]),
            read_time(0, 0, 0).with_error(ErrorKind::Other),
            // retry
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x01]),
            read_time(0x20, 0x41, 0x07),
        ];
        expectations.extend(program_alarm(0x41, 0x30, 0x05, 0x05));
        expectations.extend([
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x01]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8, 0x00]),
        ]);
        let mock = setup_mock(&expectations);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);
        assert_eq!(
            dev.service_wake(),
            Err(DS3231Error::Transport(ErrorKind::Other))
        );
        assert_eq!(dev.service_wake(), Ok(Some(AlarmSpec::new(41, 30).unwrap())));
        dev.i2c.done();
    }

    #[test]
    fn test_service_wake_retry_after_failed_flag_clear() {
        let mut expectations = vec![
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x01]),
            read_time(0x00, 0x10, 0x07),
        ];
        expectations.extend(program_alarm(0x10, 0x10, 0x05, 0x05));
        expectations.extend([
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x01]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8, 0x00])
                .with_error(ErrorKind::Other),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x01]),
            read_time(0x02, 0x10, 0x07),
        ]);
        expectations.extend(program_alarm(0x10, 0x12, 0x05, 0x05));
        expectations.extend([
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x01]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8, 0x00]),
        ]);
        let mock = setup_mock(&expectations);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);
        assert_eq!(
            dev.service_wake(),
            Err(DS3231Error::Transport(ErrorKind::Other))
        );
        assert_eq!(dev.service_wake(), Ok(Some(AlarmSpec::new(10, 12).unwrap())));
        dev.i2c.done();
    }

    #[test]
    fn test_service_wake_without_alarm() {
        let mock = setup_mock(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::ControlStatus as u8],
            vec![0x80],
        )]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);
        assert_eq!(dev.service_wake(), Ok(None));
        dev.i2c.done();
    }

    #[test]
    fn test_custom_address_and_release() {
        let mock = setup_mock(&[I2cTrans::write_read(0x57, vec![RegAddr::Control as u8], vec![0x00])]);
        let config = Config {
            address: 0x57,
            ..Config::default()
        };
        let mut dev = DS3231::with_config(mock, &config);
        assert_eq!(dev.wake_interval(), WakeInterval::default());
        dev.set_wake_interval(WakeInterval::new(1, 0).unwrap());
        assert_eq!(dev.wake_interval().as_secs(), 60);
        assert_eq!(dev.control(), Ok(Control::from(0x00)));

        let mut i2c = dev.release();
        i2c.done();
    }
}
