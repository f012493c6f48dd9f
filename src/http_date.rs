//! Minimal extraction of hour and minute from an HTTP `Date:` response header.
//!
//! Only the fixed-position IMF-fixdate form is understood:
//!
//! ```text
//! Date: Sun, 06 Nov 1994 08:49:37 GMT
//! ^                      ^  ^
//! 0                      23 26
//! ```

use crate::clock_time::ClockTime;

const FIELD: &[u8] = b"Date:";
const HOUR_OFFSET: usize = 23;
const MINUTE_OFFSET: usize = 26;
/// Bytes needed from the `D` of `Date:` through the end of `GMT`.
const MIN_FIELD_LEN: usize = 35;

/// Hour and minute (UTC) from the first `Date:` field in `header`.
///
/// Returns `None` when there is no such field, it is truncated, or the digits do not form a
/// valid time.
#[must_use]
pub fn hour_minute(header: &[u8]) -> Option<ClockTime> {
    let start = header
        .windows(FIELD.len())
        .position(|window| window == FIELD)?;
    let field = header.get(start..)?;
    if field.len() < MIN_FIELD_LEN {
        return None;
    }
    let hour = two_digits(field.get(HOUR_OFFSET..HOUR_OFFSET.checked_add(2)?)?)?;
    let minute = two_digits(field.get(MINUTE_OFFSET..MINUTE_OFFSET.checked_add(2)?)?)?;
    ClockTime::new(hour, minute)
}

#[expect(clippy::arithmetic_side_effects, reason = "Two decimal digits fit in u8")]
fn two_digits(digits: &[u8]) -> Option<u8> {
    match *digits {
        [tens @ b'0'..=b'9', ones @ b'0'..=b'9'] => Some((tens - b'0') * 10 + (ones - b'0')),
        _ => None,
    }
}
