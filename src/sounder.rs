//! The alarm sounder: parked until the alarm fires, then beeps until disarmed.

#![allow(clippy::future_not_send, reason = "single-threaded")]

use core::convert::Infallible;

use embedded_hal_async::delay::DelayNs;

use crate::shared_constants::TONE_CADENCE;
use crate::shared_state::SharedState;
use crate::wake::Wake;

/// Turns the alarm tone on and off.
pub trait AudioSink {
    fn set_tone(&mut self, on: bool);
}

/// Drives an [`AudioSink`] while the shared ringing flag is set.
///
/// There is no timeout: only the alarm toggle button (through the debouncer) clears
/// ringing. The flag is checked once per on/off cycle, so the tone stops within one cycle
/// of the press and always ends off.
#[derive(Clone, Copy)]
pub struct AlarmSounder<'a> {
    shared: &'a SharedState,
    wake: &'a Wake,
    cadence_ms: u32,
}

impl<'a> AlarmSounder<'a> {
    #[must_use]
    pub fn new(shared: &'a SharedState, wake: &'a Wake) -> Self {
        Self {
            shared,
            wake,
            cadence_ms: u32::try_from(TONE_CADENCE.as_millis()).unwrap_or(u32::MAX),
        }
    }

    /// Override the on (and off) hold time.
    #[must_use]
    pub const fn with_cadence_ms(mut self, cadence_ms: u32) -> Self {
        self.cadence_ms = cadence_ms;
        self
    }

    /// Beep until ringing is cleared. Returns the number of on/off cycles.
    pub async fn sound_until_disarmed(
        &self,
        audio: &mut impl AudioSink,
        delay: &mut impl DelayNs,
    ) -> u32 {
        let mut cycles = 0_u32;
        while self.shared.is_ringing() {
            audio.set_tone(true);
            delay.delay_ms(self.cadence_ms).await;
            audio.set_tone(false);
            delay.delay_ms(self.cadence_ms).await;
            cycles = cycles.saturating_add(1);
        }
        cycles
    }

    /// Park until woken, then sound. A wake that finds ringing already cleared is a no-op.
    pub async fn wait_and_sound(
        &self,
        audio: &mut impl AudioSink,
        delay: &mut impl DelayNs,
    ) -> u32 {
        self.wake.parked().await;
        let cycles = self.sound_until_disarmed(audio, delay).await;
        if cycles > 0 {
            info!("Alarm silenced after {} cycles", cycles);
        }
        cycles
    }

    pub async fn run(&self, audio: &mut impl AudioSink, delay: &mut impl DelayNs) -> Infallible {
        audio.set_tone(false);
        info!("Alarm sounder started");
        loop {
            let _ = self.wait_and_sound(audio, delay).await;
        }
    }
}
