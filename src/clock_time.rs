//! A wrap-around time of day (hour and minute) shared by the clock and the alarm.
//!
//! Every mutation goes through modular arithmetic, so a [`ClockTime`] is always in range:
//! hours `0..=23`, minutes `0..=59`. Untrusted input enters through [`ClockTime::new`]
//! (rejects out-of-range values) or [`ClockTime::from_wrapping`] (reduces them).
//!
//! # Example
//!
//! ```
//! use net_alarm_clock::clock_time::{ClockTime, local_hour};
//!
//! let alarm = ClockTime::MIDNIGHT.hour_down().minute_up();
//! assert_eq!((alarm.hour(), alarm.minute()), (23, 1));
//!
//! // 16:15 UTC is 08:15 eight hours west.
//! assert_eq!(local_hour(16, 8), 8);
//! ```

use core::fmt;

/// Hours in a day.
pub const HOURS_PER_DAY: u8 = 24;
/// Minutes in an hour.
pub const MINUTES_PER_HOUR: u8 = 60;

/// A valid time of day with minute resolution.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// `00:00`, the power-on alarm time.
    pub const MIDNIGHT: Self = Self { hour: 0, minute: 0 };

    /// Returns `None` unless `hour < 24` and `minute < 60`.
    #[must_use]
    pub const fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < HOURS_PER_DAY && minute < MINUTES_PER_HOUR {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// Reduce arbitrary values into range (`25:61` becomes `01:01`).
    #[must_use]
    #[expect(
        clippy::integer_division_remainder_used,
        reason = "Modulo keeps the fields in range"
    )]
    pub const fn from_wrapping(hour: u8, minute: u8) -> Self {
        Self {
            hour: hour % HOURS_PER_DAY,
            minute: minute % MINUTES_PER_HOUR,
        }
    }

    #[must_use]
    pub const fn hour(self) -> u8 {
        self.hour
    }

    #[must_use]
    pub const fn minute(self) -> u8 {
        self.minute
    }

    #[must_use]
    pub const fn hour_up(self) -> Self {
        Self {
            hour: hour_up(self.hour),
            minute: self.minute,
        }
    }

    #[must_use]
    pub const fn hour_down(self) -> Self {
        Self {
            hour: hour_down(self.hour),
            minute: self.minute,
        }
    }

    /// Advance the minute only; `HH:59` becomes `HH:00` (the hour does not carry).
    #[must_use]
    pub const fn minute_up(self) -> Self {
        Self {
            hour: self.hour,
            minute: minute_up(self.minute),
        }
    }

    /// Retreat the minute only; `HH:00` becomes `HH:59`.
    #[must_use]
    pub const fn minute_down(self) -> Self {
        Self {
            hour: self.hour,
            minute: minute_down(self.minute),
        }
    }

    /// Shift this time (read in the source zone) `offset_hours` west. Minutes are unchanged.
    #[must_use]
    pub const fn to_local(self, offset_hours: u8) -> Self {
        Self {
            hour: local_hour(self.hour, offset_hours),
            minute: self.minute,
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

// ============================================================================
// Wrap-around arithmetic
// ============================================================================

#[must_use]
#[expect(clippy::arithmetic_side_effects, reason = "Bounded by the comparison")]
pub const fn hour_up(hour: u8) -> u8 {
    if hour >= HOURS_PER_DAY - 1 { 0 } else { hour + 1 }
}

#[must_use]
#[expect(clippy::arithmetic_side_effects, reason = "Bounded by the comparison")]
pub const fn hour_down(hour: u8) -> u8 {
    if hour == 0 || hour >= HOURS_PER_DAY {
        HOURS_PER_DAY - 1
    } else {
        hour - 1
    }
}

#[must_use]
#[expect(clippy::arithmetic_side_effects, reason = "Bounded by the comparison")]
pub const fn minute_up(minute: u8) -> u8 {
    if minute >= MINUTES_PER_HOUR - 1 {
        0
    } else {
        minute + 1
    }
}

#[must_use]
#[expect(clippy::arithmetic_side_effects, reason = "Bounded by the comparison")]
pub const fn minute_down(minute: u8) -> u8 {
    if minute == 0 || minute >= MINUTES_PER_HOUR {
        MINUTES_PER_HOUR - 1
    } else {
        minute - 1
    }
}

/// Convert a source-zone hour to local time, `offset_hours` west of the source.
///
/// `(h >= offset) ? h - offset : h + (24 - offset)`. Inputs are reduced mod 24 first,
/// so the result is always a valid hour.
#[must_use]
#[expect(
    clippy::arithmetic_side_effects,
    clippy::integer_division_remainder_used,
    reason = "Operands are reduced mod 24 before subtracting"
)]
pub const fn local_hour(source_hour: u8, offset_hours: u8) -> u8 {
    let hour = source_hour % HOURS_PER_DAY;
    let offset = offset_hours % HOURS_PER_DAY;
    if hour >= offset {
        hour - offset
    } else {
        hour + (HOURS_PER_DAY - offset)
    }
}
