//! State shared between the debouncer, the synchronizer, the display controller and the
//! alarm sounder.
//!
//! Every field lives behind one critical-section mutex, and every mutation is a method here,
//! so no caller masks interrupts on its own. Writers per field:
//!
//! | field          | writer                                   | readers                  |
//! |----------------|------------------------------------------|--------------------------|
//! | current time   | synchronizer                             | display, synchronizer    |
//! | alarm setting  | display                                  | synchronizer             |
//! | ringing        | synchronizer sets, debouncer clears      | sounder, display         |
//! | button event   | debouncer writes, display takes          |                          |
//! | line masks     | debouncer masks, display releases, synchronizer locks out adjust lines | debouncer |

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::alarm_setting::AlarmSetting;
use crate::button_event::{ButtonEvent, ButtonLine, LineMask};
use crate::clock_time::ClockTime;

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, Debug)]
struct Inner {
    /// `None` until the first successful synchronization.
    current: Option<ClockTime>,
    setting: AlarmSetting,
    ringing: bool,
    event: ButtonEvent,
    /// Lines whose edges start a debounce pass.
    enabled: LineMask,
    /// Latched edges since the display last released the lines.
    pending: LineMask,
    /// Lines that were enabled when the running debounce pass started.
    debouncing: Option<LineMask>,
}

/// A consistent copy of everything the display renders.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    pub current: Option<ClockTime>,
    pub setting: AlarmSetting,
    pub ringing: bool,
    pub event: ButtonEvent,
    pub enabled: LineMask,
}

/// Process-wide alarm clock state. Create one in a `static` with [`SharedState::new`].
pub struct SharedState {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Inner>>,
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedState {
    /// Power-on state: time unset, alarm `00:00` disarmed, silent, all lines enabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                current: None,
                setting: AlarmSetting::POWER_ON,
                ringing: false,
                event: ButtonEvent::None,
                enabled: LineMask::ALL,
                pending: LineMask::NONE,
                debouncing: None,
            })),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    // ------------------------------------------------------------------------
    // Readers
    // ------------------------------------------------------------------------

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.with(|inner| Snapshot {
            current: inner.current,
            setting: inner.setting,
            ringing: inner.ringing,
            event: inner.event,
            enabled: inner.enabled,
        })
    }

    #[must_use]
    pub fn current_time(&self) -> Option<ClockTime> {
        self.with(|inner| inner.current)
    }

    #[must_use]
    pub fn alarm_setting(&self) -> AlarmSetting {
        self.with(|inner| inner.setting)
    }

    #[must_use]
    pub fn is_ringing(&self) -> bool {
        self.with(|inner| inner.ringing)
    }

    #[must_use]
    pub fn pending_event(&self) -> ButtonEvent {
        self.with(|inner| inner.event)
    }

    #[must_use]
    pub fn enabled_lines(&self) -> LineMask {
        self.with(|inner| inner.enabled)
    }

    #[must_use]
    pub fn pending_lines(&self) -> LineMask {
        self.with(|inner| inner.pending)
    }

    // ------------------------------------------------------------------------
    // Clock synchronizer
    // ------------------------------------------------------------------------

    /// Store a freshly synchronized local time. Returns `true` if it differs from the
    /// stored time or no time was stored yet.
    pub fn store_time(&self, now: ClockTime) -> bool {
        self.with(|inner| {
            if inner.current == Some(now) {
                false
            } else {
                inner.current = Some(now);
                true
            }
        })
    }

    /// Start ringing if the alarm is armed and the stored time equals the alarm time
    /// (hour and minute). Firing also disables the four adjustment lines.
    pub fn trigger_if_due(&self) -> bool {
        self.with(|inner| {
            let due = inner.setting.is_armed() && inner.current == Some(inner.setting.time);
            if due {
                inner.ringing = true;
                inner.enabled = inner.enabled.without(LineMask::ADJUST);
            }
            due
        })
    }

    // ------------------------------------------------------------------------
    // Input debouncer
    // ------------------------------------------------------------------------

    /// Latch an edge on `line`. Returns `true` if the line is enabled, i.e. the edge should
    /// start a debounce pass.
    pub fn record_edge(&self, line: ButtonLine) -> bool {
        self.with(|inner| {
            inner.pending = inner.pending | line.mask();
            inner.enabled.contains(line)
        })
    }

    /// Mask edge detection on all five lines for the duration of a debounce pass.
    pub fn begin_debounce(&self) {
        self.with(|inner| {
            if inner.debouncing.is_none() {
                inner.debouncing = Some(inner.enabled);
            }
            inner.enabled = LineMask::NONE;
        });
    }

    /// Classify the latched edges against the lines still `asserted`, post the result and
    /// end the debounce pass. An [`ButtonEvent::AlarmToggle`] also clears ringing, in the
    /// same critical section. Lines stay masked until the display releases them.
    pub fn finish_debounce(&self, asserted: LineMask) -> ButtonEvent {
        self.with(|inner| {
            let eligible = inner.debouncing.take().unwrap_or(LineMask::NONE);
            let event = ButtonEvent::classify(inner.pending & eligible, asserted);
            if !event.is_none() {
                inner.event = event;
            }
            if event == ButtonEvent::AlarmToggle {
                inner.ringing = false;
            }
            event
        })
    }

    // ------------------------------------------------------------------------
    // Display controller
    // ------------------------------------------------------------------------

    /// Consume the pending event (resetting it to `None`) and apply it to the alarm setting.
    /// Returns the consumed event and a snapshot taken after applying it.
    pub fn apply_pending_event(&self) -> (ButtonEvent, Snapshot) {
        self.with(|inner| {
            let event = core::mem::take(&mut inner.event);
            inner.setting = inner.setting.apply(event);
            let snapshot = Snapshot {
                current: inner.current,
                setting: inner.setting,
                ringing: inner.ringing,
                event: inner.event,
                enabled: inner.enabled,
            };
            (event, snapshot)
        })
    }

    /// Acknowledge the latched edges and re-enable edge detection: all five lines, or only
    /// the alarm toggle while ringing. A running debounce pass keeps its mask; its own
    /// wake brings the display back to release the lines afterwards.
    pub fn release_lines(&self) -> LineMask {
        self.with(|inner| {
            if inner.debouncing.is_none() {
                inner.pending = LineMask::NONE;
                inner.enabled = if inner.ringing {
                    LineMask::ALARM_TOGGLE
                } else {
                    LineMask::ALL
                };
            }
            inner.enabled
        })
    }
}
