//! HD44780-compatible 16x2 character LCD behind a PCF8574 I2C backpack, as a display sink.

use embassy_rp::i2c::{self, Instance as I2cInstance};
use embassy_rp::peripherals::I2C0;
use embassy_time::Timer;

use crate::display::{DisplaySink, Frame};
use crate::shared_constants::LCD_COLUMNS;

// PCF8574 pin mapping: P0=RS, P1=RW, P2=E, P3=Backlight, P4-P7=Data
const LCD_BACKLIGHT: u8 = 0x08;
const LCD_ENABLE: u8 = 0x04;
const LCD_RS: u8 = 0x01;

/// Most PCF8574 backpacks; some use 0x3F.
pub const DEFAULT_ADDRESS: u8 = 0x27;

/// Character LCD on I2C0. Call [`CharLcd::init`] once before presenting.
pub struct CharLcd<T: I2cInstance + 'static = I2C0> {
    i2c: i2c::I2c<'static, T, i2c::Blocking>,
    address: u8,
}

impl<T: I2cInstance + 'static> CharLcd<T> {
    #[must_use]
    pub const fn new(i2c: i2c::I2c<'static, T, i2c::Blocking>) -> Self {
        Self::new_with_address(i2c, DEFAULT_ADDRESS)
    }

    #[must_use]
    pub const fn new_with_address(i2c: i2c::I2c<'static, T, i2c::Blocking>, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Power-on sequence: 4-bit mode, two lines, display on, cleared.
    pub async fn init(&mut self) {
        Timer::after_millis(50).await;

        self.write_nibble(0x03, false).await;
        Timer::after_millis(5).await;
        self.write_nibble(0x03, false).await;
        Timer::after_micros(150).await;
        self.write_nibble(0x03, false).await;
        self.write_nibble(0x02, false).await;

        // Function set: 4-bit, 2 lines, 5x8 font
        self.write_byte(0x28, false).await;
        // Display control: display on, cursor off, blink off
        self.write_byte(0x0C, false).await;
        self.clear().await;
        // Entry mode: increment cursor, no shift
        self.write_byte(0x06, false).await;
        info!("LCD initialized at address {}", self.address);
    }

    pub async fn clear(&mut self) {
        self.write_byte(0x01, false).await;
        Timer::after_millis(2).await;
    }

    #[expect(clippy::arithmetic_side_effects, reason = "Row/col values are small")]
    async fn set_cursor(&mut self, row: u8, col: u8) {
        let address = match row {
            0 => col,
            _ => 0x40 + col,
        };
        self.write_byte(0x80 | address, false).await;
    }

    /// Write `text` at the start of `row`, blank-padded to the full width so the previous
    /// contents are overwritten without a clear (no flicker).
    async fn print_line(&mut self, row: u8, text: &str) {
        self.set_cursor(row, 0).await;
        let padding = core::iter::repeat(b' ');
        for byte in text.bytes().chain(padding).take(LCD_COLUMNS) {
            self.write_byte(byte, true).await;
        }
    }

    #[expect(clippy::arithmetic_side_effects, reason = "Bit operations")]
    async fn write_nibble(&mut self, nibble: u8, rs: bool) {
        let rs_bit = if rs { LCD_RS } else { 0 };
        let data = (nibble << 4) | LCD_BACKLIGHT | rs_bit;

        // A missing backpack must not stop the clock, so bus errors are dropped.
        let _ = self.i2c.blocking_write(self.address, &[data | LCD_ENABLE]);
        Timer::after_micros(1).await;
        let _ = self.i2c.blocking_write(self.address, &[data]);
        Timer::after_micros(50).await;
    }

    async fn write_byte(&mut self, byte: u8, rs: bool) {
        self.write_nibble((byte >> 4) & 0x0F, rs).await;
        self.write_nibble(byte & 0x0F, rs).await;
    }
}

impl<T: I2cInstance + 'static> DisplaySink for CharLcd<T> {
    async fn present(&mut self, frame: &Frame) {
        self.print_line(0, frame.top()).await;
        self.print_line(1, frame.bottom()).await;
    }
}
