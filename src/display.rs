//! The display controller: renders the clock and owns the alarm-setting state machine.
//!
//! The controller is parked until woken by the debouncer (a button event is pending) or the
//! synchronizer (the time changed). Wakes collapse, so every activation applies whatever
//! event is pending and renders the latest time, whatever woke it.
//!
//! Each activation, in order:
//! 1. take the pending [`ButtonEvent`] (resetting it to `None`) and apply it to the
//!    [`AlarmSetting`],
//! 2. present a [`Frame`] to the [`DisplaySink`],
//! 3. release the button lines (acknowledge latched edges, re-enable detection).
//!
//! The lines stay masked from the debounce pass through step 3, so no second edge can
//! overwrite the event while it is being applied.

#![allow(clippy::future_not_send, reason = "single-threaded")]

use core::convert::Infallible;
use core::fmt::Write as _;

use heapless::String;

use crate::alarm_setting::{AlarmSetting, Mode};
use crate::button_event::ButtonEvent;
use crate::clock_time::ClockTime;
use crate::shared_constants::{BOOT_BANNER, LCD_COLUMNS, ZONE_LABEL};
use crate::shared_state::SharedState;
use crate::wake::Wake;
use crate::{Error, Result};

// ============================================================================
// Types
// ============================================================================

/// One display line, at most [`LCD_COLUMNS`] characters.
pub type Line = String<LCD_COLUMNS>;

/// Accepts two lines of text and shows them.
pub trait DisplaySink {
    async fn present(&mut self, frame: &Frame);
}

/// The two lines shown on the display.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    top: Line,
    bottom: Line,
}

impl Frame {
    /// # Errors
    ///
    /// [`Error::LineTooLong`] if either line exceeds [`LCD_COLUMNS`].
    pub fn new(top: &str, bottom: &str) -> Result<Self> {
        let mut frame = Self::default();
        frame.top.push_str(top).map_err(|()| Error::LineTooLong)?;
        frame.bottom.push_str(bottom).map_err(|()| Error::LineTooLong)?;
        Ok(frame)
    }

    /// Shown until the first successful synchronization.
    ///
    /// # Errors
    ///
    /// [`Error::LineTooLong`] if the banner does not fit.
    pub fn banner() -> Result<Self> {
        Self::new(BOOT_BANNER, "")
    }

    /// `Now: HH:MM PST` over `Select: HH:MM` (disarmed) or `Alarm: HH:MM` (armed).
    ///
    /// # Errors
    ///
    /// [`Error::FormatError`] if a line overflows.
    pub fn status(now: ClockTime, setting: AlarmSetting) -> Result<Self> {
        let mut frame = Self::default();
        write!(frame.top, "Now: {now} {ZONE_LABEL}")?;
        write!(frame.bottom, "{} {}", setting.label(), setting.time)?;
        Ok(frame)
    }

    #[must_use]
    pub fn top(&self) -> &str {
        &self.top
    }

    #[must_use]
    pub fn bottom(&self) -> &str {
        &self.bottom
    }
}

// ============================================================================
// DisplayController
// ============================================================================

/// Handle to the display controller's shared state and wake. See the module docs.
#[derive(Clone, Copy)]
pub struct DisplayController<'a> {
    shared: &'a SharedState,
    wake: &'a Wake,
}

impl<'a> DisplayController<'a> {
    #[must_use]
    pub const fn new(shared: &'a SharedState, wake: &'a Wake) -> Self {
        Self { shared, wake }
    }

    /// Present the boot banner.
    ///
    /// # Errors
    ///
    /// See [`Frame::banner`].
    pub async fn show_banner(&self, sink: &mut impl DisplaySink) -> Result<Frame> {
        let frame = Frame::banner()?;
        sink.present(&frame).await;
        Ok(frame)
    }

    /// Park until the synchronizer has stored a time. Wakes that arrive earlier (button
    /// presses) are consumed without rendering; their events stay pending.
    pub async fn wait_for_first_sync(&self) -> ClockTime {
        loop {
            if let Some(now) = self.shared.current_time() {
                info!("First time sync {}", now);
                return now;
            }
            self.wake.parked().await;
        }
    }

    /// One activation: apply the pending event, render, release the lines.
    ///
    /// Returns the presented frame, or `None` if no time has been stored yet.
    ///
    /// # Errors
    ///
    /// See [`Frame::status`]. The lines are released even on error.
    pub async fn refresh(&self, sink: &mut impl DisplaySink) -> Result<Option<Frame>> {
        let (event, snapshot) = self.shared.apply_pending_event();
        if event != ButtonEvent::None {
            log_transition(event, snapshot.setting);
        }

        let rendered = match snapshot.current {
            Some(now) => Frame::status(now, snapshot.setting).map(Some),
            None => Ok(None),
        };
        if let Ok(Some(frame)) = &rendered {
            sink.present(frame).await;
        }

        let enabled = self.shared.release_lines();
        trace!("Lines released {:?}", enabled);
        rendered
    }

    /// Banner, wait for the first time, then refresh on every wake.
    ///
    /// # Errors
    ///
    /// Only if a frame cannot be rendered.
    pub async fn run(&self, sink: &mut impl DisplaySink) -> Result<Infallible> {
        self.show_banner(sink).await?;
        self.wait_for_first_sync().await;
        // The refresh below covers whatever the first sync woke us for.
        self.wake.clear();
        loop {
            self.refresh(sink).await?;
            self.wake.parked().await;
        }
    }
}

fn log_transition(event: ButtonEvent, setting: AlarmSetting) {
    match (event, setting.mode()) {
        (ButtonEvent::AlarmToggle, Mode::Viewing) => info!("Alarm armed for {}", setting.time),
        (ButtonEvent::AlarmToggle, Mode::Adjusting) => info!("Alarm disarmed"),
        (_, Mode::Adjusting) => debug!("Alarm time {} after {:?}", setting.time, event),
        (_, Mode::Viewing) => debug!("{:?} ignored while armed", event),
    }
}
