//! WiFi client bring-up for the Pico W's CYW43 radio.
//!
//! [`Wifi::new`] powers the radio, spawns the radio and network runner tasks, and returns at
//! once with a DHCP-configured [`Stack`] that is not yet up. [`Wifi::join`] then associates
//! with the access point; the clock source checks `is_config_up()` before every query, so the
//! clock keeps running (stale) while the network is down.

#![allow(clippy::future_not_send, reason = "single-threaded")]

use cyw43::JoinOptions;
use cyw43_pio::{DEFAULT_CLOCK_DIVIDER, PioSpi};
use embassy_executor::Spawner;
use embassy_net::{Config, Stack, StackResources};
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{DMA_CH0, PIN_23, PIN_24, PIN_25, PIN_29, PIO0};
use embassy_rp::pio::{InterruptHandler, Pio};
use embassy_rp::{Peri, bind_interrupts};
use static_cell::StaticCell;

use crate::{Error, Result};

/// Credentials baked in at build time (see `build.rs`).
pub const WIFI_SSID: &str = env!("WIFI_SSID");
pub const WIFI_PASS: &str = env!("WIFI_PASS");

/// The pins and peripherals wired to the CYW43 on the Pico W.
pub struct WifiPins {
    /// Power
    pub pin_23: Peri<'static, PIN_23>,
    /// Chip select
    pub pin_25: Peri<'static, PIN_25>,
    pub pio0: Peri<'static, PIO0>,
    /// Clock
    pub pin_24: Peri<'static, PIN_24>,
    /// Data
    pub pin_29: Peri<'static, PIN_29>,
    pub dma_ch0: Peri<'static, DMA_CH0>,
}

/// Resources needed by [`Wifi`].
pub struct WifiStatic {
    state: StaticCell<cyw43::State>,
    resources: StaticCell<StackResources<5>>,
}

/// A joined-or-joining WiFi client.
pub struct Wifi {
    control: cyw43::Control<'static>,
    stack: Stack<'static>,
}

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => InterruptHandler<PIO0>;
});

impl Wifi {
    #[must_use]
    pub const fn new_static() -> WifiStatic {
        WifiStatic {
            state: StaticCell::new(),
            resources: StaticCell::new(),
        }
    }

    /// Power up the radio and start the network stack (DHCP client).
    ///
    /// # Errors
    ///
    /// [`Error::TaskSpawn`] if the runner tasks are already running.
    pub async fn new(
        wifi_static: &'static WifiStatic,
        pins: WifiPins,
        spawner: Spawner,
    ) -> Result<Self> {
        info!("WiFi device initializing in client mode");

        let fw = cyw43_firmware::CYW43_43439A0;
        let clm = cyw43_firmware::CYW43_43439A0_CLM;

        let pwr = Output::new(pins.pin_23, Level::Low);
        let cs = Output::new(pins.pin_25, Level::High);
        let mut pio = Pio::new(pins.pio0, Irqs);
        let spi = PioSpi::new(
            &mut pio.common,
            pio.sm0,
            DEFAULT_CLOCK_DIVIDER,
            pio.irq0,
            cs,
            pins.pin_24,
            pins.pin_29,
            pins.dma_ch0,
        );

        let state = wifi_static.state.init(cyw43::State::new());
        let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw).await;
        let token = wifi_task(runner).map_err(Error::TaskSpawn)?;
        spawner.spawn(token);

        control.init(clm).await;
        control
            .set_power_management(cyw43::PowerManagementMode::PowerSave)
            .await;

        let config = Config::dhcpv4(embassy_net::DhcpConfig::default());
        let seed = 0x7c8f_3a2e_9d14_6b5a;
        let (stack, runner) = embassy_net::new(
            net_device,
            config,
            wifi_static.resources.init(StackResources::<5>::new()),
            seed,
        );
        let token = net_task(runner).map_err(Error::TaskSpawn)?;
        spawner.spawn(token);

        Ok(Self { control, stack })
    }

    /// The network stack; copy it into clock sources.
    #[must_use]
    pub const fn stack(&self) -> Stack<'static> {
        self.stack
    }

    /// One association attempt.
    ///
    /// # Errors
    ///
    /// [`Error::WifiJoin`] with the radio's status code.
    pub async fn join(&mut self, ssid: &str, password: &str) -> Result<()> {
        info!("Connecting to WiFi: {}", ssid);
        self.control
            .join(ssid, JoinOptions::new(password.as_bytes()))
            .await
            .map_err(|err| Error::WifiJoin(err.status))
    }

    /// Wait for DHCP after a successful [`Wifi::join`].
    pub async fn wait_config_up(&self) {
        self.stack.wait_config_up().await;
        if let Some(config) = self.stack.config_v4() {
            info!("IP Address: {}", config.address);
        }
    }
}

// ============================================================================
// WiFi Tasks
// ============================================================================

#[embassy_executor::task]
async fn wifi_task(
    runner: cyw43::Runner<'static, Output<'static>, PioSpi<'static, PIO0, 0, DMA_CH0>>,
) -> ! {
    runner.run().await
}

#[embassy_executor::task]
async fn net_task(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}
