//! Periodic synchronization of the current time from a remote clock source, plus the
//! alarm-match check that follows every update.
//!
//! See [`TimeSync`] for the cycle and [`ClockSource`] for what a source must provide.
//! On the board with the `wifi` feature, `HttpDateSource` and `NtpSource` query the network,
//! combined through [`FallbackSource`].

#![allow(clippy::future_not_send, reason = "single-threaded")]

use core::convert::Infallible;

use embedded_hal_async::delay::DelayNs;

use crate::clock_time::ClockTime;
use crate::error::QueryError;
use crate::shared_constants::{SOURCE_OFFSET_HOURS, SYNC_PERIOD};
use crate::shared_state::SharedState;
use crate::wake::Wake;

// ============================================================================
// Types
// ============================================================================

/// A remote peer that reports the current time of day in its own zone.
pub trait ClockSource {
    /// Whether a query can be attempted this cycle (network configured).
    fn is_reachable(&self) -> bool;

    /// Ask for the current hour and minute (source zone).
    async fn query(&mut self) -> Result<ClockTime, QueryError>;
}

/// What one synchronization cycle did.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncOutcome {
    /// No network; the query was not attempted.
    Unreachable,
    /// The query failed or returned nothing usable.
    NoUpdate,
    /// The local time matched the stored time.
    Unchanged,
    /// The stored time changed and the display was woken.
    Updated(ClockTime),
    /// As `Updated`, and the alarm started ringing.
    AlarmTriggered(ClockTime),
}

// ============================================================================
// TimeSync
// ============================================================================

/// Keeps the shared current time in step with a [`ClockSource`].
///
/// Every period (default [`SYNC_PERIOD`]), if the source is reachable:
/// query it, convert the answer to local time, and if it differs from the stored time
/// store it, wake the display once, then check the alarm. A matching armed alarm starts
/// ringing, locks out the adjustment buttons and wakes the sounder.
///
/// Failures are skipped silently until the next period; a stale clock is the only symptom.
#[derive(Clone, Copy)]
pub struct TimeSync<'a> {
    shared: &'a SharedState,
    display_wake: &'a Wake,
    sounder_wake: &'a Wake,
    offset_hours: u8,
    period_ms: u32,
}

impl<'a> TimeSync<'a> {
    #[must_use]
    pub fn new(shared: &'a SharedState, display_wake: &'a Wake, sounder_wake: &'a Wake) -> Self {
        Self {
            shared,
            display_wake,
            sounder_wake,
            offset_hours: SOURCE_OFFSET_HOURS,
            period_ms: u32::try_from(SYNC_PERIOD.as_millis()).unwrap_or(u32::MAX),
        }
    }

    /// Hours the local zone lies west of the source zone.
    #[must_use]
    pub const fn with_offset_hours(mut self, offset_hours: u8) -> Self {
        self.offset_hours = offset_hours;
        self
    }

    #[must_use]
    pub const fn with_period_ms(mut self, period_ms: u32) -> Self {
        self.period_ms = period_ms;
        self
    }

    /// Store a time reported by the source (source zone) and run the alarm check.
    pub fn apply_source_time(&self, source_time: ClockTime) -> SyncOutcome {
        let now = source_time.to_local(self.offset_hours);
        if !self.shared.store_time(now) {
            trace!("Time unchanged at {}", now);
            return SyncOutcome::Unchanged;
        }
        info!("Time updated to {}", now);
        self.display_wake.wake();

        if self.shared.trigger_if_due() {
            info!("Alarm due at {}, ringing", now);
            self.sounder_wake.wake();
            SyncOutcome::AlarmTriggered(now)
        } else {
            SyncOutcome::Updated(now)
        }
    }

    /// One synchronization cycle.
    pub async fn sync_once(&self, source: &mut impl ClockSource) -> SyncOutcome {
        if !source.is_reachable() {
            trace!("Clock source unreachable, skipping cycle");
            return SyncOutcome::Unreachable;
        }
        match source.query().await {
            Ok(source_time) => self.apply_source_time(source_time),
            Err(err) => {
                debug!("Clock source query failed: {:?}", err);
                SyncOutcome::NoUpdate
            }
        }
    }

    /// Synchronize every period forever.
    pub async fn run(
        &self,
        source: &mut impl ClockSource,
        delay: &mut impl DelayNs,
    ) -> Infallible {
        info!("Time sync started, offset {} hours", self.offset_hours);
        loop {
            let _ = self.sync_once(source).await;
            delay.delay_ms(self.period_ms).await;
        }
    }
}

// ============================================================================
// FallbackSource
// ============================================================================

/// Queries `primary`, and `secondary` when the primary is unreachable or fails.
pub struct FallbackSource<P, S> {
    primary: P,
    secondary: S,
}

impl<P: ClockSource, S: ClockSource> FallbackSource<P, S> {
    #[must_use]
    pub const fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

impl<P: ClockSource, S: ClockSource> ClockSource for FallbackSource<P, S> {
    fn is_reachable(&self) -> bool {
        self.primary.is_reachable() || self.secondary.is_reachable()
    }

    async fn query(&mut self) -> Result<ClockTime, QueryError> {
        if self.primary.is_reachable() {
            match self.primary.query().await {
                Ok(time) => return Ok(time),
                Err(err) => debug!("Primary clock source failed: {:?}", err),
            }
        }
        if self.secondary.is_reachable() {
            self.secondary.query().await
        } else {
            Err(QueryError::Unreachable)
        }
    }
}

// ============================================================================
// Network clock sources
// ============================================================================

#[cfg(all(feature = "wifi", any(feature = "pico1", feature = "pico2")))]
mod wifi_impl {
    use embassy_net::tcp::TcpSocket;
    use embassy_net::{IpAddress, Stack, dns, udp};
    use embassy_time::with_timeout;
    use embedded_io_async::Write as _;

    use super::ClockSource;
    use crate::clock_time::ClockTime;
    use crate::error::QueryError;
    use crate::http_date;
    use crate::shared_constants::{
        NTP_PORT, NTP_SERVER_HOST, QUERY_TIMEOUT, TIME_SERVER_HOST, TIME_SERVER_PORT,
    };
    use crate::unix_seconds::UnixSeconds;

    async fn resolve(stack: Stack<'static>, host: &str) -> Result<IpAddress, QueryError> {
        let addrs = stack
            .dns_query(host, dns::DnsQueryType::A)
            .await
            .map_err(|err| {
                warn!("DNS lookup of {} failed: {:?}", host, err);
                QueryError::Dns
            })?;
        addrs.first().copied().ok_or(QueryError::Dns)
    }

    /// Reads the time from the `Date:` header of a web server's response.
    pub struct HttpDateSource {
        stack: Stack<'static>,
    }

    impl HttpDateSource {
        #[must_use]
        pub const fn new(stack: Stack<'static>) -> Self {
            Self { stack }
        }

        async fn fetch(&self) -> Result<ClockTime, QueryError> {
            let addr = resolve(self.stack, TIME_SERVER_HOST).await?;

            let mut rx_buffer = [0_u8; 1024];
            let mut tx_buffer = [0_u8; 128];
            let mut socket = TcpSocket::new(self.stack, &mut rx_buffer, &mut tx_buffer);
            socket.set_timeout(Some(QUERY_TIMEOUT));
            socket
                .connect((addr, TIME_SERVER_PORT))
                .await
                .map_err(|err| {
                    debug!("Connect failed: {:?}", err);
                    QueryError::Connect
                })?;

            let mut request: heapless::String<96> = heapless::String::new();
            core::fmt::write(
                &mut request,
                format_args!(
                    "HEAD / HTTP/1.1\r\nHost: {TIME_SERVER_HOST}\r\nConnection: close\r\n\r\n"
                ),
            )
            .map_err(|_| QueryError::Send)?;
            socket
                .write_all(request.as_bytes())
                .await
                .map_err(|_| QueryError::Send)?;

            // The Date field sits in the first few hundred bytes of the header.
            let mut response = [0_u8; 512];
            let mut filled = 0_usize;
            while filled < response.len() {
                let Some(unfilled) = response.get_mut(filled..) else {
                    break;
                };
                let read = socket.read(unfilled).await.map_err(|_| QueryError::Receive)?;
                if read == 0 {
                    break;
                }
                filled = filled.saturating_add(read);
                if let Some(time) = response.get(..filled).and_then(http_date::hour_minute) {
                    socket.abort();
                    return Ok(time);
                }
            }
            socket.abort();
            if filled == 0 {
                Err(QueryError::ShortResponse)
            } else {
                Err(QueryError::Malformed)
            }
        }
    }

    impl ClockSource for HttpDateSource {
        fn is_reachable(&self) -> bool {
            self.stack.is_config_up()
        }

        async fn query(&mut self) -> Result<ClockTime, QueryError> {
            with_timeout(QUERY_TIMEOUT, self.fetch())
                .await
                .map_err(|_| QueryError::Timeout)?
        }
    }

    /// Simple Network Time Protocol (SNTP) source; reports UTC.
    pub struct NtpSource {
        stack: Stack<'static>,
    }

    impl NtpSource {
        #[must_use]
        pub const fn new(stack: Stack<'static>) -> Self {
            Self { stack }
        }

        async fn fetch(&self) -> Result<UnixSeconds, QueryError> {
            let server_addr = resolve(self.stack, NTP_SERVER_HOST).await?;

            let mut rx_meta = [udp::PacketMetadata::EMPTY; 1];
            let mut rx_buffer = [0; 128];
            let mut tx_meta = [udp::PacketMetadata::EMPTY; 1];
            let mut tx_buffer = [0; 128];
            let mut socket = udp::UdpSocket::new(
                self.stack,
                &mut rx_meta,
                &mut rx_buffer,
                &mut tx_meta,
                &mut tx_buffer,
            );
            socket.bind(0).map_err(|err| {
                warn!("Socket bind failed: {:?}", err);
                QueryError::Connect
            })?;

            // 48 bytes, LI=0, VN=3, Mode=3 (client)
            let mut ntp_request = [0_u8; 48];
            if let Some(first) = ntp_request.first_mut() {
                *first = 0x1B;
            }
            socket
                .send_to(&ntp_request, (server_addr, NTP_PORT))
                .await
                .map_err(|_| QueryError::Send)?;

            let mut response = [0_u8; 48];
            let (len, _from) = socket
                .recv_from(&mut response)
                .await
                .map_err(|_| QueryError::Receive)?;
            if len < response.len() {
                return Err(QueryError::ShortResponse);
            }

            // Transmit timestamp, bytes 40..44, big-endian seconds since 1900
            let seconds: [u8; 4] = response
                .get(40..44)
                .and_then(|bytes| bytes.try_into().ok())
                .ok_or(QueryError::ShortResponse)?;
            UnixSeconds::from_ntp_seconds(u32::from_be_bytes(seconds)).ok_or(QueryError::Malformed)
        }
    }

    impl ClockSource for NtpSource {
        fn is_reachable(&self) -> bool {
            self.stack.is_config_up()
        }

        async fn query(&mut self) -> Result<ClockTime, QueryError> {
            let unix_seconds = with_timeout(QUERY_TIMEOUT, self.fetch())
                .await
                .map_err(|_| QueryError::Timeout)??;
            trace!("NTP time {}", unix_seconds.as_i64());
            unix_seconds.utc_clock_time().ok_or(QueryError::Malformed)
        }
    }
}

#[cfg(all(feature = "wifi", any(feature = "pico1", feature = "pico2")))]
pub use wifi_impl::{HttpDateSource, NtpSource};

/// The board's clock source: the `Date:` header of a web server, NTP when that fails.
#[cfg(all(feature = "wifi", any(feature = "pico1", feature = "pico2")))]
pub type NetworkClock = FallbackSource<HttpDateSource, NtpSource>;
