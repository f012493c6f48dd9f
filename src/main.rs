//! Network alarm clock firmware for a Pico W.
//!
//! Shows "Connecting..." until the first time arrives over WiFi, then the current time
//! (PST) and the alarm setting. Build with `cargo xtask uf2`.
#![no_std]
#![no_main]
#![allow(clippy::future_not_send, reason = "Single-threaded")]

use core::convert::Infallible;

use defmt::info;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_time::Timer;
use net_alarm_clock::wifi::{WIFI_PASS, WIFI_SSID, Wifi, WifiStatic};
use net_alarm_clock::{
    AlarmClock, AlarmClockStatic, ButtonPins, Buzzer, CharLcd, Hardware, HttpDateSource,
    NetworkClock, NtpSource, ONE_DAY, ONE_SECOND, Result, TONE_FREQUENCY_HZ,
};
use panic_probe as _;

#[embassy_executor::main]
pub async fn main(spawner: Spawner) -> ! {
    // If it returns, something went wrong.
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

#[expect(clippy::items_after_statements, reason = "Keeps related code together")]
async fn inner_main(spawner: Spawner) -> Result<Infallible> {
    let hardware = Hardware::default();

    static ALARM_CLOCK_STATIC: AlarmClockStatic = AlarmClock::new_static();
    let alarm_clock = AlarmClock::new(
        &ALARM_CLOCK_STATIC,
        ButtonPins::new(hardware.buttons),
        CharLcd::new(hardware.i2c),
        Buzzer::new(hardware.buzzer, TONE_FREQUENCY_HZ),
        spawner,
    )?;

    static WIFI_STATIC: WifiStatic = Wifi::new_static();
    let mut wifi = Wifi::new(&WIFI_STATIC, hardware.wifi, spawner).await?;

    // The synchronizer skips cycles until DHCP completes.
    let stack = wifi.stack();
    let source = NetworkClock::new(HttpDateSource::new(stack), NtpSource::new(stack));
    alarm_clock.start_time_sync(source, spawner)?;

    while let Err(err) = wifi.join(WIFI_SSID, WIFI_PASS).await {
        info!("{}, retrying", defmt::Display2Format(&err));
        Timer::after(ONE_SECOND).await;
    }
    wifi.wait_config_up().await;
    info!("WiFi client ready");

    loop {
        Timer::after(ONE_DAY).await;
    }
}
