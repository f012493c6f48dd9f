//! Turns raw rising edges on the five button lines into one classified [`ButtonEvent`].

#![allow(clippy::future_not_send, reason = "single-threaded")]

use core::convert::Infallible;

use embedded_hal_async::delay::DelayNs;

use crate::button_event::{ButtonEvent, ButtonLine, LineMask};
use crate::shared_constants::DEBOUNCE_DELAY;
use crate::shared_state::SharedState;
use crate::wake::Wake;

/// Reads the current level of the five button lines.
pub trait LineLevels {
    /// Lines that currently read asserted (pressed).
    fn asserted(&mut self) -> LineMask;
}

/// The five button lines: their levels and their rising edges.
pub trait ButtonInputs: LineLevels {
    /// Wait for the next rising edge on any line.
    async fn next_rising_edge(&mut self) -> ButtonLine;
}

/// Debounces button edges and hands the result to the display controller.
///
/// Each pass masks all lines, waits [`DEBOUNCE_DELAY`], then classifies the latched edges
/// that are still asserted. The debouncer never re-enables the lines; the display
/// controller does that once it has consumed the event.
#[derive(Clone, Copy)]
pub struct InputDebouncer<'a> {
    shared: &'a SharedState,
    display_wake: &'a Wake,
    debounce_ms: u32,
}

impl<'a> InputDebouncer<'a> {
    #[must_use]
    pub fn new(shared: &'a SharedState, display_wake: &'a Wake) -> Self {
        Self {
            shared,
            display_wake,
            debounce_ms: u32::try_from(DEBOUNCE_DELAY.as_millis()).unwrap_or(u32::MAX),
        }
    }

    /// Override the debounce window.
    #[must_use]
    pub const fn with_debounce_ms(mut self, debounce_ms: u32) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// Handle one rising edge on `line`. Edges on disabled lines are latched but start no
    /// pass and return `None`.
    pub async fn handle_edge(
        &self,
        line: ButtonLine,
        levels: &mut impl LineLevels,
        delay: &mut impl DelayNs,
    ) -> Option<ButtonEvent> {
        if self.shared.record_edge(line) {
            Some(self.debounce(levels, delay).await)
        } else {
            trace!("Edge on disabled line {:?}", line);
            None
        }
    }

    /// One debounce pass. Always ends by waking the display controller, even when the
    /// pass classifies nothing, so the lines get released.
    pub async fn debounce(
        &self,
        levels: &mut impl LineLevels,
        delay: &mut impl DelayNs,
    ) -> ButtonEvent {
        self.shared.begin_debounce();
        delay.delay_ms(self.debounce_ms).await;
        let asserted = levels.asserted();
        let event = self.shared.finish_debounce(asserted);
        match event {
            ButtonEvent::None => debug!("Debounce found no asserted line"),
            ButtonEvent::AlarmToggle => info!("Alarm toggle pressed, ringing cleared"),
            _ => debug!("Button event {:?}", event),
        }
        self.display_wake.wake();
        event
    }

    /// Debounce edges from `inputs` forever.
    pub async fn run(
        &self,
        inputs: &mut impl ButtonInputs,
        delay: &mut impl DelayNs,
    ) -> Infallible {
        info!("Input debouncer started");
        loop {
            let line = inputs.next_rising_edge().await;
            let _ = self.handle_edge(line, inputs, delay).await;
        }
    }
}
