//! The alarm-set / clock-adjust state machine owned by the display controller.

use crate::button_event::ButtonEvent;
use crate::clock_time::ClockTime;

/// Whether the alarm-match check is active.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmArm {
    #[default]
    Disarmed,
    Armed,
}

/// Interaction mode, derived from [`AlarmArm`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Alarm disarmed; the adjustment buttons move the alarm time.
    Adjusting,
    /// Alarm armed; only the alarm toggle does anything.
    Viewing,
}

impl From<AlarmArm> for Mode {
    fn from(arm: AlarmArm) -> Self {
        match arm {
            AlarmArm::Disarmed => Self::Adjusting,
            AlarmArm::Armed => Self::Viewing,
        }
    }
}

/// The user-selected alarm time and its arm state.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmSetting {
    pub time: ClockTime,
    pub arm: AlarmArm,
}

impl AlarmSetting {
    /// `00:00`, disarmed.
    pub const POWER_ON: Self = Self {
        time: ClockTime::MIDNIGHT,
        arm: AlarmArm::Disarmed,
    };

    #[must_use]
    pub fn mode(self) -> Mode {
        self.arm.into()
    }

    #[must_use]
    pub fn is_armed(self) -> bool {
        self.arm == AlarmArm::Armed
    }

    /// The setting after one button event.
    #[must_use]
    pub fn apply(self, event: ButtonEvent) -> Self {
        match (self.mode(), event) {
            (_, ButtonEvent::None) => self,
            (Mode::Adjusting, ButtonEvent::HourUp) => self.with_time(self.time.hour_up()),
            (Mode::Adjusting, ButtonEvent::HourDown) => self.with_time(self.time.hour_down()),
            (Mode::Adjusting, ButtonEvent::MinuteUp) => self.with_time(self.time.minute_up()),
            (Mode::Adjusting, ButtonEvent::MinuteDown) => {
                self.with_time(self.time.minute_down())
            }
            (Mode::Adjusting, ButtonEvent::AlarmToggle) => Self {
                time: self.time,
                arm: AlarmArm::Armed,
            },
            (Mode::Viewing, ButtonEvent::AlarmToggle) => Self {
                time: self.time,
                arm: AlarmArm::Disarmed,
            },
            (Mode::Viewing, _) => self,
        }
    }

    const fn with_time(self, time: ClockTime) -> Self {
        Self {
            time,
            arm: self.arm,
        }
    }

    /// `"Alarm:"` when armed, `"Select:"` otherwise.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self.mode() {
            Mode::Viewing => "Alarm:",
            Mode::Adjusting => "Select:",
        }
    }
}
