//! Unix timestamp type for network time sources

use time::{OffsetDateTime, UtcOffset};

use crate::clock_time::ClockTime;

/// Units-safe wrapper for Unix timestamps (seconds since 1970-01-01 00:00:00 UTC)
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnixSeconds(pub i64);

impl UnixSeconds {
    /// Get the underlying i64 value
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }

    /// Convert NTP seconds (since 1900-01-01) to Unix seconds (since 1970-01-01)
    #[must_use]
    pub const fn from_ntp_seconds(ntp: u32) -> Option<Self> {
        // 1900→1970: 70 years including 17 leap days
        const NTP_TO_UNIX_SECONDS: i64 = 2_208_988_800;
        #[expect(clippy::arithmetic_side_effects, reason = "u32 minus constant fits in i64")]
        let seconds = (ntp as i64) - NTP_TO_UNIX_SECONDS;
        // Reject pre-1970
        if seconds >= 0 { Some(Self(seconds)) } else { None }
    }

    /// Convert to OffsetDateTime with the given timezone offset
    #[must_use]
    pub fn to_offset_datetime(self, offset: UtcOffset) -> Option<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp(self.as_i64())
            .ok()
            .map(|dt| dt.to_offset(offset))
    }

    /// UTC hour and minute of this instant.
    #[must_use]
    pub fn utc_clock_time(self) -> Option<ClockTime> {
        let dt = self.to_offset_datetime(UtcOffset::UTC)?;
        ClockTime::new(dt.hour(), dt.minute())
    }
}
