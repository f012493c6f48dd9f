//! Pin assignment for the alarm clock board (Pico W / Pico 2 W).
//!
//! | function              | pin                      |
//! |-----------------------|--------------------------|
//! | Hour-Up button        | GPIO 14                  |
//! | Hour-Down button      | GPIO 13                  |
//! | Minute-Up button      | GPIO 12                  |
//! | Minute-Down button    | GPIO 11                  |
//! | Alarm-Toggle button   | GPIO 10                  |
//! | Buzzer (PWM 7B)       | GPIO 15                  |
//! | LCD I2C0 SDA / SCL    | GPIO 4 / GPIO 5          |
//!
//! Buttons connect the pin to 3V3 and rely on the internal pull-down.

use embassy_rp::gpio::{self, Pull};
use embassy_rp::i2c::{self, Config as I2cConfig};
use embassy_rp::peripherals::I2C0;
use embassy_rp::pwm::{self, Pwm};

#[cfg(feature = "wifi")]
use crate::wifi::WifiPins;

pub struct Hardware {
    /// Ordered as [`ButtonLine::PRIORITY`](crate::button_event::ButtonLine::PRIORITY).
    pub buttons: [gpio::Input<'static>; 5],
    pub buzzer: Pwm<'static>,
    pub i2c: i2c::I2c<'static, I2C0, i2c::Blocking>,
    #[cfg(feature = "wifi")]
    pub wifi: WifiPins,
}

impl Default for Hardware {
    fn default() -> Self {
        let peripherals: embassy_rp::Peripherals =
            embassy_rp::init(embassy_rp::config::Config::default());

        let buttons = [
            gpio::Input::new(peripherals.PIN_14, Pull::Down),
            gpio::Input::new(peripherals.PIN_13, Pull::Down),
            gpio::Input::new(peripherals.PIN_12, Pull::Down),
            gpio::Input::new(peripherals.PIN_11, Pull::Down),
            gpio::Input::new(peripherals.PIN_10, Pull::Down),
        ];

        let buzzer = Pwm::new_output_b(
            peripherals.PWM_SLICE7,
            peripherals.PIN_15,
            pwm::Config::default(),
        );

        let i2c = i2c::I2c::new_blocking(
            peripherals.I2C0,
            peripherals.PIN_5,
            peripherals.PIN_4,
            I2cConfig::default(),
        );

        Self {
            buttons,
            buzzer,
            i2c,
            #[cfg(feature = "wifi")]
            wifi: WifiPins {
                pin_23: peripherals.PIN_23,
                pin_25: peripherals.PIN_25,
                pio0: peripherals.PIO0,
                pin_24: peripherals.PIN_24,
                pin_29: peripherals.PIN_29,
                dma_ch0: peripherals.DMA_CH0,
            },
        }
    }
}
