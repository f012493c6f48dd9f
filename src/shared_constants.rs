use embassy_time::Duration;

pub const ONE_SECOND: Duration = Duration::from_secs(1);
pub const ONE_DAY: Duration = Duration::from_secs(60 * 60 * 24);

/// Edge detection stays masked this long before the lines are sampled.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(100);
/// Period of the clock-source query loop.
pub const SYNC_PERIOD: Duration = Duration::from_millis(500);
/// On time and off time of the alarm tone.
pub const TONE_CADENCE: Duration = Duration::from_millis(500);
/// How long one clock-source query may take before the cycle is skipped.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Hours the local zone is behind the clock source (UTC to PST).
pub const SOURCE_OFFSET_HOURS: u8 = 8;
pub const ZONE_LABEL: &str = "PST";

pub const LCD_COLUMNS: usize = 16;
pub const BOOT_BANNER: &str = "Connecting...";

pub const TONE_FREQUENCY_HZ: u32 = 1_000;

/// Web server whose `Date:` response header supplies the time.
pub const TIME_SERVER_HOST: &str = "www.google.com";
pub const TIME_SERVER_PORT: u16 = 80;
pub const NTP_SERVER_HOST: &str = "pool.ntp.org";
pub const NTP_PORT: u16 = 123;
