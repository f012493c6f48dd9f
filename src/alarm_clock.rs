//! A device abstraction that wires the four alarm clock tasks to their shared state.
//!
//! [`AlarmClockStatic`] holds the shared state and the two wakes. Every task gets a handle
//! from it that reaches exactly what that task may touch: the debouncer and synchronizer
//! can wake the display (and the synchronizer the sounder), nothing else.
//!
//! # Example
//!
//! ```ignore
//! # #![no_std]
//! # #![no_main]
//! # use panic_probe as _;
//! use embassy_executor::Spawner;
//! use net_alarm_clock::alarm_clock::{AlarmClock, AlarmClockStatic};
//! use net_alarm_clock::{ButtonPins, Buzzer, CharLcd, Hardware};
//!
//! async fn run(spawner: Spawner) -> net_alarm_clock::Result<()> {
//!     let hardware = Hardware::default();
//!     static ALARM_CLOCK_STATIC: AlarmClockStatic = AlarmClock::new_static();
//!     let alarm_clock = AlarmClock::new(
//!         &ALARM_CLOCK_STATIC,
//!         ButtonPins::new(hardware.buttons),
//!         CharLcd::new(hardware.i2c),
//!         Buzzer::new(hardware.buzzer, net_alarm_clock::TONE_FREQUENCY_HZ),
//!         spawner,
//!     )?;
//!     # let _ = alarm_clock;
//!     Ok(())
//! }
//! ```

#![allow(clippy::future_not_send, reason = "single-threaded")]

use crate::debouncer::InputDebouncer;
use crate::display::DisplayController;
use crate::shared_state::SharedState;
use crate::sounder::AlarmSounder;
use crate::time_sync::TimeSync;
use crate::wake::Wake;

// ============================================================================
// Types
// ============================================================================

/// Resources needed to construct an [`AlarmClock`].
pub struct AlarmClockStatic {
    shared: SharedState,
    display_wake: Wake,
    sounder_wake: Wake,
}

impl AlarmClockStatic {
    #[must_use]
    pub const fn shared(&self) -> &SharedState {
        &self.shared
    }

    /// Whether the display controller has a wake outstanding.
    #[must_use]
    pub fn display_woken(&self) -> bool {
        self.display_wake.is_pending()
    }

    /// Whether the alarm sounder has a wake outstanding.
    #[must_use]
    pub fn sounder_woken(&self) -> bool {
        self.sounder_wake.is_pending()
    }

    #[must_use]
    pub fn debouncer(&self) -> InputDebouncer<'_> {
        InputDebouncer::new(&self.shared, &self.display_wake)
    }

    #[must_use]
    pub fn time_sync(&self) -> TimeSync<'_> {
        TimeSync::new(&self.shared, &self.display_wake, &self.sounder_wake)
    }

    #[must_use]
    pub const fn display_controller(&self) -> DisplayController<'_> {
        DisplayController::new(&self.shared, &self.display_wake)
    }

    #[must_use]
    pub fn sounder(&self) -> AlarmSounder<'_> {
        AlarmSounder::new(&self.shared, &self.sounder_wake)
    }
}

/// A network alarm clock: buttons, display, buzzer and a clock source, each on its own task.
pub struct AlarmClock {
    #[cfg_attr(
        not(any(feature = "pico1", feature = "pico2")),
        expect(dead_code, reason = "read by the board tasks")
    )]
    statics: &'static AlarmClockStatic,
}

impl AlarmClock {
    /// Create [`AlarmClock`] resources. See the module docs for usage.
    #[must_use]
    pub const fn new_static() -> AlarmClockStatic {
        AlarmClockStatic {
            shared: SharedState::new(),
            display_wake: Wake::new(),
            sounder_wake: Wake::new(),
        }
    }
}

// ============================================================================
// Board tasks
// ============================================================================

#[cfg(any(feature = "pico1", feature = "pico2"))]
mod board {
    use embassy_executor::Spawner;
    use embassy_time::Delay;

    use super::{AlarmClock, AlarmClockStatic};
    use crate::button_pins::ButtonPins;
    use crate::buzzer::Buzzer;
    use crate::char_lcd::CharLcd;
    use crate::shared_state::SharedState;
    #[cfg(feature = "wifi")]
    use crate::time_sync::NetworkClock;
    use crate::{Error, Result};

    impl AlarmClock {
        /// Spawn the debouncer, display controller and sounder tasks.
        ///
        /// The display shows the boot banner until [`AlarmClock::start_time_sync`] delivers
        /// the first time.
        ///
        /// # Errors
        ///
        /// [`Error::TaskSpawn`] if a task is already running.
        pub fn new(
            statics: &'static AlarmClockStatic,
            buttons: ButtonPins,
            lcd: CharLcd,
            buzzer: Buzzer<'static>,
            spawner: Spawner,
        ) -> Result<Self> {
            let token = sounder_loop(statics, buzzer).map_err(Error::TaskSpawn)?;
            spawner.spawn(token);
            let token = display_loop(statics, lcd).map_err(Error::TaskSpawn)?;
            spawner.spawn(token);
            let token = debouncer_loop(statics, buttons).map_err(Error::TaskSpawn)?;
            spawner.spawn(token);
            Ok(Self { statics })
        }

        #[must_use]
        pub const fn shared(&self) -> &'static SharedState {
            &self.statics.shared
        }
    }

    #[embassy_executor::task]
    async fn debouncer_loop(statics: &'static AlarmClockStatic, mut buttons: ButtonPins) -> ! {
        match statics.debouncer().run(&mut buttons, &mut Delay).await {}
    }

    #[embassy_executor::task]
    async fn display_loop(statics: &'static AlarmClockStatic, mut lcd: CharLcd) -> ! {
        lcd.init().await;
        let err = statics
            .display_controller()
            .run(&mut lcd)
            .await
            .unwrap_err();
        core::panic!("{err}");
    }

    #[embassy_executor::task]
    async fn sounder_loop(statics: &'static AlarmClockStatic, mut buzzer: Buzzer<'static>) -> ! {
        match statics.sounder().run(&mut buzzer, &mut Delay).await {}
    }

    #[cfg(feature = "wifi")]
    impl AlarmClock {
        /// Spawn the clock synchronizer on `source`.
        ///
        /// # Errors
        ///
        /// [`Error::TaskSpawn`] if it is already running.
        pub fn start_time_sync(&self, source: NetworkClock, spawner: Spawner) -> Result<()> {
            let token = time_sync_loop(self.statics, source).map_err(Error::TaskSpawn)?;
            spawner.spawn(token);
            Ok(())
        }
    }

    #[cfg(feature = "wifi")]
    #[embassy_executor::task]
    async fn time_sync_loop(statics: &'static AlarmClockStatic, mut source: NetworkClock) -> ! {
        match statics.time_sync().run(&mut source, &mut Delay).await {}
    }
}
