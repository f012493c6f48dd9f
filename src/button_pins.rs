//! The five button inputs as an edge source for the debouncer.

use embassy_futures::select::{Either5, select5};
use embassy_rp::gpio::Input;

use crate::button_event::{ButtonLine, LineMask};
use crate::debouncer::{ButtonInputs, LineLevels};

/// Pulled-down button inputs; a pressed button reads high.
pub struct ButtonPins {
    /// Ordered as [`ButtonLine::PRIORITY`].
    inputs: [Input<'static>; 5],
}

impl ButtonPins {
    #[must_use]
    pub const fn new(inputs: [Input<'static>; 5]) -> Self {
        Self { inputs }
    }
}

impl LineLevels for ButtonPins {
    fn asserted(&mut self) -> LineMask {
        ButtonLine::PRIORITY
            .into_iter()
            .zip(self.inputs.iter())
            .filter(|(_, input)| input.is_high())
            .fold(LineMask::NONE, |mask, (line, _)| mask | line.mask())
    }
}

impl ButtonInputs for ButtonPins {
    async fn next_rising_edge(&mut self) -> ButtonLine {
        let [hour_up, hour_down, minute_up, minute_down, alarm_toggle] = &mut self.inputs;
        match select5(
            hour_up.wait_for_rising_edge(),
            hour_down.wait_for_rising_edge(),
            minute_up.wait_for_rising_edge(),
            minute_down.wait_for_rising_edge(),
            alarm_toggle.wait_for_rising_edge(),
        )
        .await
        {
            Either5::First(()) => ButtonLine::HourUp,
            Either5::Second(()) => ButtonLine::HourDown,
            Either5::Third(()) => ButtonLine::MinuteUp,
            Either5::Fourth(()) => ButtonLine::MinuteDown,
            Either5::Fifth(()) => ButtonLine::AlarmToggle,
        }
    }
}
