//! # DS3231 Wake Cycle Demo for ESP32
//!
//! Runs the sense-and-sleep cycle of a battery node against a DS3231:
//!
//! - On boot, drops any stale alarm 1 flag and schedules the first wake one
//!   wake interval from now (`arm_wake`)
//! - Waits for the SQW/INT line to go low
//! - Takes a "measurement" (here: logs the RTC time)
//! - Re-arms the alarm one interval later and clears the flag (`service_wake`)
//!
//! A real node would enter deep sleep with SQW/INT as its wake source instead
//! of polling the pin.
//!
//! ## Hardware Connections
//! - **SDA**: GPIO23 (I2C Data)
//! - **SCL**: GPIO15 (I2C Clock)
//! - **SQW/INT**: GPIO22 (open drain, needs a pull-up)
//!
//! ## Expected Output
//! ```
//! First wake at xx:00:25
//! Woke at 14:00:25
//! Next wake at xx:00:35
//! ```

#![no_std]
#![no_main]

use ds3231_wake::{Config, WakeInterval, DS3231};
use esp_backtrace as _;
use esp_hal::time::Rate;
use esp_hal::{
    clock::CpuClock,
    gpio::Input,
    i2c::master::{Config as I2cConfig, I2c},
    main,
    time::{Duration, Instant},
};
use log::{info, warn};

#[main]
fn main() -> ! {
    esp_println::logger::init_logger_from_env();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    info!("DS3231 wake cycle demo starting...");

    let sda = peripherals.GPIO23;
    let scl = peripherals.GPIO15;
    let sqw_int_pin = Input::new(peripherals.GPIO22, Default::default());

    let i2c_config = I2cConfig::default().with_frequency(Rate::from_khz(100));
    let i2c = I2c::new(peripherals.I2C0, i2c_config)
        .unwrap()
        .with_sda(sda)
        .with_scl(scl);

    let rtc_config = Config {
        wake_interval: WakeInterval::new(0, 10).unwrap(),
        ..Config::default()
    };
    let mut rtc = DS3231::with_config(i2c, &rtc_config);

    loop {
        match rtc.arm_wake() {
            Ok(target) => {
                info!(
                    "First wake at xx:{:02}:{:02}",
                    target.minute(),
                    target.second()
                );
                break;
            }
            Err(e) => {
                warn!("Failed to arm wake, retrying: {:?}", e);
                wait(Duration::from_millis(500));
            }
        }
    }

    loop {
        // INT/SQW is active low while A1F is set
        while sqw_int_pin.is_high() {
            wait(Duration::from_millis(50));
        }

        match rtc.read_now() {
            Ok(now) => info!("Woke at {:02}:{:02}:{:02}", now.hours, now.minutes, now.seconds),
            Err(e) => warn!("Failed to read time: {:?}", e),
        }

        match rtc.service_wake() {
            Ok(Some(target)) => info!(
                "Next wake at xx:{:02}:{:02}",
                target.minute(),
                target.second()
            ),
            Ok(None) => info!("Line low but alarm 1 did not fire"),
            // flag is still set, the next pass retries
            Err(e) => warn!("Failed to re-arm: {:?}", e),
        }

        wait(Duration::from_millis(100));
    }
}

fn wait(duration: Duration) {
    let start = Instant::now();
    while start.elapsed() < duration {
        // Busy wait
    }
}
