//! Button lines and the single classified event a debounce pass produces.

use core::ops::{BitAnd, BitOr};

/// One of the five physical input lines.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonLine {
    HourUp,
    HourDown,
    MinuteUp,
    MinuteDown,
    AlarmToggle,
}

impl ButtonLine {
    /// Classification order: when several lines qualify, the first one here wins.
    pub const PRIORITY: [Self; 5] = [
        Self::HourUp,
        Self::HourDown,
        Self::MinuteUp,
        Self::MinuteDown,
        Self::AlarmToggle,
    ];

    /// Bit for this line. Bit `n` is the line wired to the `n`th button input.
    #[must_use]
    pub const fn mask(self) -> LineMask {
        LineMask(match self {
            Self::HourUp => 1 << 4,
            Self::HourDown => 1 << 3,
            Self::MinuteUp => 1 << 2,
            Self::MinuteDown => 1 << 1,
            Self::AlarmToggle => 1 << 0,
        })
    }

    /// The event this line produces once debounced.
    #[must_use]
    pub const fn event(self) -> ButtonEvent {
        match self {
            Self::HourUp => ButtonEvent::HourUp,
            Self::HourDown => ButtonEvent::HourDown,
            Self::MinuteUp => ButtonEvent::MinuteUp,
            Self::MinuteDown => ButtonEvent::MinuteDown,
            Self::AlarmToggle => ButtonEvent::AlarmToggle,
        }
    }
}

/// A set of input lines, used for pending edges, asserted levels and enabled lines.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineMask(u8);

impl LineMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0b1_1111);
    /// The four clock-adjustment lines.
    pub const ADJUST: Self = Self(0b1_1110);
    pub const ALARM_TOGGLE: Self = Self(0b0_0001);

    /// Only the five button bits of `bits` are kept.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, line: ButtonLine) -> bool {
        self.0 & line.mask().0 != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    #[must_use]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl BitOr for LineMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitAnd for LineMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.intersection(rhs)
    }
}

impl From<ButtonLine> for LineMask {
    fn from(line: ButtonLine) -> Self {
        line.mask()
    }
}

/// The single live button event. Produced by the debouncer, consumed once by the display.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    #[default]
    None,
    HourUp,
    HourDown,
    MinuteUp,
    MinuteDown,
    AlarmToggle,
}

impl ButtonEvent {
    /// Pick the first line in [`ButtonLine::PRIORITY`] that both raised an edge (`pending`)
    /// and still reads asserted after the debounce delay. [`ButtonEvent::None`] if no line does.
    #[must_use]
    pub fn classify(pending: LineMask, asserted: LineMask) -> Self {
        let qualifying = pending & asserted;
        ButtonLine::PRIORITY
            .into_iter()
            .find(|line| qualifying.contains(*line))
            .map_or(Self::None, ButtonLine::event)
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}
