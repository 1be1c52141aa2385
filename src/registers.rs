//! Register map and bitfield types for the DS3231 registers used by the wake
//! scheduler.
//!
//! Only the timekeeping registers read by the time reader, the alarm 1 block
//! and the control/status pair are modelled. Each type wraps the raw byte so
//! reads and writes preserve bits this crate does not touch.

use bitfield::bitfield;

/// Register addresses on the DS3231.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegAddr {
    /// Seconds register (BCD 0-59)
    Seconds = 0x00,
    /// Minutes register (BCD 0-59)
    Minutes = 0x01,
    /// Hours register (BCD, bit 6 selects 12/24 hour mode)
    Hours = 0x02,
    /// Alarm 1 seconds register, bit 7 is A1M1
    Alarm1Seconds = 0x07,
    /// Alarm 1 minutes register, bit 7 is A1M2
    Alarm1Minutes = 0x08,
    /// Alarm 1 hours register, bit 7 is A1M3
    Alarm1Hours = 0x09,
    /// Alarm 1 day/date register, bit 7 is A1M4
    Alarm1DayDate = 0x0A,
    /// Control register
    Control = 0x0E,
    /// Control/Status register
    ControlStatus = 0x0F,
}

/// Time representation selected by bit 6 of the hours register.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeRepresentation {
    /// 24-hour format (0-23)
    TwentyFourHour = 0,
    /// 12-hour format (1-12 + AM/PM)
    TwelveHour = 1,
}
impl From<u8> for TimeRepresentation {
    /// Creates a `TimeRepresentation` from a raw register value. Only bit 0 is
    /// looked at.
    fn from(v: u8) -> Self {
        match v & 1 {
            0 => TimeRepresentation::TwentyFourHour,
            _ => TimeRepresentation::TwelveHour,
        }
    }
}
impl From<TimeRepresentation> for u8 {
    fn from(v: TimeRepresentation) -> Self {
        v as u8
    }
}

/// Function of the INT/SQW pin (INTCN bit).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptControl {
    /// Output square wave on INT/SQW pin
    SquareWave = 0,
    /// Drive INT/SQW low when an enabled alarm matches
    Interrupt = 1,
}
impl From<u8> for InterruptControl {
    /// Creates an `InterruptControl` from a raw register value. Only bit 0 is
    /// looked at.
    fn from(v: u8) -> Self {
        match v & 1 {
            0 => InterruptControl::SquareWave,
            _ => InterruptControl::Interrupt,
        }
    }
}
impl From<InterruptControl> for u8 {
    fn from(v: InterruptControl) -> Self {
        v as u8
    }
}

// This macro generates the From<u8> and Into<u8> implementations for the
// register type
macro_rules! from_register_u8 {
    ($typ:ty) => {
        impl From<u8> for $typ {
            fn from(v: u8) -> Self {
                paste::paste!([< $typ >](v))
            }
        }
        impl From<$typ> for u8 {
            fn from(v: $typ) -> Self {
                v.0
            }
        }
    };
}

bitfield! {
    /// Hours register as read from the timekeeping block.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Hours(u8);
    impl Debug;
    /// Time representation format (12/24 hour)
    pub from into TimeRepresentation, time_representation, set_time_representation: 6, 6;
    /// BCD hour in 24-hour mode: 20-hour bit, tens bit and units digit
    pub twenty_four_hour_bcd, set_twenty_four_hour_bcd: 5, 0;
}
from_register_u8!(Hours);

#[cfg(feature = "defmt")]
impl defmt::Format for Hours {
    fn format(&self, f: defmt::Formatter) {
        match self.time_representation() {
            TimeRepresentation::TwentyFourHour => {
                defmt::write!(f, "Hours({=u8:#x} 24h)", self.twenty_four_hour_bcd());
            }
            TimeRepresentation::TwelveHour => {
                defmt::write!(f, "Hours({=u8:#x} 12h)", self.0);
            }
        }
    }
}

// Alarm 1 registers. The mask bit excludes its field from the match.

bitfield! {
    /// Alarm 1 seconds register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AlarmSeconds(u8);
    impl Debug;
    /// Alarm mask bit 1 (A1M1)
    pub alarm_mask1, set_alarm_mask1: 7;
    /// Tens place of seconds (0-5)
    pub ten_seconds, set_ten_seconds: 6, 4;
    /// Ones place of seconds (0-9)
    pub seconds, set_seconds: 3, 0;
}
from_register_u8!(AlarmSeconds);

#[cfg(feature = "defmt")]
impl defmt::Format for AlarmSeconds {
    fn format(&self, f: defmt::Formatter) {
        let seconds = 10 * self.ten_seconds() + self.seconds();
        defmt::write!(f, "AlarmSeconds({}s", seconds);
        if self.alarm_mask1() {
            defmt::write!(f, ", masked");
        }
        defmt::write!(f, ")");
    }
}

bitfield! {
    /// Alarm 1 minutes register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AlarmMinutes(u8);
    impl Debug;
    /// Alarm mask bit 2 (A1M2)
    pub alarm_mask2, set_alarm_mask2: 7;
    /// Tens place of minutes (0-5)
    pub ten_minutes, set_ten_minutes: 6, 4;
    /// Ones place of minutes (0-9)
    pub minutes, set_minutes: 3, 0;
}
from_register_u8!(AlarmMinutes);

#[cfg(feature = "defmt")]
impl defmt::Format for AlarmMinutes {
    fn format(&self, f: defmt::Formatter) {
        let minutes = 10 * self.ten_minutes() + self.minutes();
        defmt::write!(f, "AlarmMinutes({}m", minutes);
        if self.alarm_mask2() {
            defmt::write!(f, ", masked");
        }
        defmt::write!(f, ")");
    }
}

bitfield! {
    /// Alarm 1 hours register. The wake scheduler always masks it.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AlarmHours(u8);
    impl Debug;
    /// Alarm mask bit 3 (A1M3)
    pub alarm_mask3, set_alarm_mask3: 7;
    /// Hour field, ignored while A1M3 is set
    pub hour_bcd, set_hour_bcd: 6, 0;
}
from_register_u8!(AlarmHours);

#[cfg(feature = "defmt")]
impl defmt::Format for AlarmHours {
    fn format(&self, f: defmt::Formatter) {
        if self.alarm_mask3() {
            defmt::write!(f, "AlarmHours(masked)");
        } else {
            defmt::write!(f, "AlarmHours({=u8:#x})", self.hour_bcd());
        }
    }
}

bitfield! {
    /// Alarm 1 day/date register. The wake scheduler always masks it.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AlarmDayDate(u8);
    impl Debug;
    /// Alarm mask bit 4 (A1M4)
    pub alarm_mask4, set_alarm_mask4: 7;
    /// Day/date field including the DY/DT select bit, ignored while A1M4 is set
    pub day_date_bcd, set_day_date_bcd: 6, 0;
}
from_register_u8!(AlarmDayDate);

#[cfg(feature = "defmt")]
impl defmt::Format for AlarmDayDate {
    fn format(&self, f: defmt::Formatter) {
        if self.alarm_mask4() {
            defmt::write!(f, "AlarmDayDate(masked)");
        } else {
            defmt::write!(f, "AlarmDayDate({=u8:#x})", self.day_date_bcd());
        }
    }
}

bitfield! {
    /// Control register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Control(u8);
    impl Debug;
    /// EOSC: oscillator stops on battery power when set
    pub oscillator_disabled, set_oscillator_disabled: 7;
    /// Enable square wave output on battery power
    pub battery_backed_square_wave, set_battery_backed_square_wave: 6;
    /// Force temperature conversion
    pub convert_temperature, set_convert_temperature: 5;
    /// Square wave rate select (RS2:RS1)
    pub square_wave_rate, set_square_wave_rate: 4, 3;
    /// INT/SQW pin function control
    pub from into InterruptControl, interrupt_control, set_interrupt_control: 2, 2;
    /// Enable alarm 2 interrupt
    pub alarm2_interrupt_enable, set_alarm2_interrupt_enable: 1;
    /// Enable alarm 1 interrupt
    pub alarm1_interrupt_enable, set_alarm1_interrupt_enable: 0;
}
from_register_u8!(Control);

impl Control {
    /// Routes alarms to the INT/SQW pin and enables the alarm 1 interrupt,
    /// leaving every other bit as it was.
    pub fn enable_alarm1_interrupt(&mut self) {
        self.set_interrupt_control(InterruptControl::Interrupt);
        self.set_alarm1_interrupt_enable(true);
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Control {
    fn format(&self, f: defmt::Formatter) {
        if self.oscillator_disabled() {
            defmt::write!(f, "Oscillator disabled");
        } else {
            defmt::write!(f, "Oscillator enabled");
        }
        if self.battery_backed_square_wave() {
            defmt::write!(f, ", Battery backed square wave enabled");
        }
        if self.convert_temperature() {
            defmt::write!(f, ", Temperature conversion enabled");
        }
        match self.interrupt_control() {
            InterruptControl::SquareWave => {
                defmt::write!(f, ", Square wave output (rate {})", self.square_wave_rate())
            }
            InterruptControl::Interrupt => defmt::write!(f, ", Interrupt output"),
        }
        if self.alarm2_interrupt_enable() {
            defmt::write!(f, ", Alarm 2 interrupt enabled");
        }
        if self.alarm1_interrupt_enable() {
            defmt::write!(f, ", Alarm 1 interrupt enabled");
        }
    }
}

bitfield! {
    /// Status register for device state and flags.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Status(u8);
    impl Debug;
    /// Oscillator stop flag
    pub oscillator_stop_flag, set_oscillator_stop_flag: 7;
    /// Enable 32kHz output
    pub enable_32khz_output, set_enable_32khz_output: 3;
    /// Device busy flag
    pub busy, set_busy: 2;
    /// Alarm 2 triggered flag
    pub alarm2_flag, set_alarm2_flag: 1;
    /// Alarm 1 triggered flag
    pub alarm1_flag, set_alarm1_flag: 0;
}
from_register_u8!(Status);

#[cfg(feature = "defmt")]
impl defmt::Format for Status {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Status(");
        let mut first = true;
        for (set, name) in [
            (self.oscillator_stop_flag(), "OSF"),
            (self.enable_32khz_output(), "EN32kHz"),
            (self.busy(), "BSY"),
            (self.alarm2_flag(), "A2F"),
            (self.alarm1_flag(), "A1F"),
        ] {
            if set {
                if !first {
                    defmt::write!(f, ", ");
                }
                defmt::write!(f, "{=str}", name);
                first = false;
            }
        }
        if first {
            defmt::write!(f, "clear");
        }
        defmt::write!(f, ")");
    }
}
