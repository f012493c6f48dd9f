//! A network alarm clock: the time comes from a remote clock source, five buttons set the
//! alarm, a two-line LCD shows both, and a buzzer sounds until the alarm is disarmed.
//!
//! The coordination core ([`debouncer`], [`time_sync`], [`display`], [`sounder`] over
//! [`shared_state`]) is hardware-independent and tested on the host. The `pico1`/`pico2`
//! features add the board drivers and the embassy tasks in [`alarm_clock`].
#![no_std]
#![allow(async_fn_in_trait, reason = "single-threaded executor, no Send bounds needed")]

// Must come first so the logging macros are visible in every module.
#[macro_use]
mod fmt;

pub mod alarm_clock;
pub mod alarm_setting;
pub mod button_event;
pub mod clock_time;
pub mod debouncer;
pub mod display;
mod error;
pub mod http_date;
mod shared_constants;
pub mod shared_state;
pub mod sounder;
pub mod time_sync;
pub mod unix_seconds;
pub mod wake;

#[cfg(any(feature = "pico1", feature = "pico2"))]
mod button_pins;
#[cfg(any(feature = "pico1", feature = "pico2"))]
mod buzzer;
#[cfg(any(feature = "pico1", feature = "pico2"))]
mod char_lcd;
#[cfg(any(feature = "pico1", feature = "pico2"))]
mod hardware;
#[cfg(all(feature = "wifi", any(feature = "pico1", feature = "pico2")))]
pub mod wifi;

// Re-export commonly used items
pub use alarm_clock::{AlarmClock, AlarmClockStatic};
pub use alarm_setting::{AlarmArm, AlarmSetting, Mode};
pub use button_event::{ButtonEvent, ButtonLine, LineMask};
pub use clock_time::ClockTime;
pub use debouncer::{ButtonInputs, InputDebouncer, LineLevels};
pub use display::{DisplayController, DisplaySink, Frame};
pub use error::{Error, QueryError, Result};
pub use shared_constants::*;
pub use shared_state::{SharedState, Snapshot};
pub use sounder::{AlarmSounder, AudioSink};
pub use time_sync::{ClockSource, FallbackSource, SyncOutcome, TimeSync};
pub use wake::Wake;

#[cfg(any(feature = "pico1", feature = "pico2"))]
pub use button_pins::ButtonPins;
#[cfg(any(feature = "pico1", feature = "pico2"))]
pub use buzzer::Buzzer;
#[cfg(any(feature = "pico1", feature = "pico2"))]
pub use char_lcd::CharLcd;
#[cfg(any(feature = "pico1", feature = "pico2"))]
pub use hardware::Hardware;
#[cfg(all(feature = "wifi", any(feature = "pico1", feature = "pico2")))]
pub use time_sync::{HttpDateSource, NetworkClock, NtpSource};
