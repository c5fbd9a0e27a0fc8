//! IMAP internal date formatting.

use chrono::{DateTime, FixedOffset, Local};

/// Formats an IMAP `date-time` (without the surrounding quotes), e.g.
/// `16-Oct-2026 09:30:00 +0200`.
#[must_use]
pub fn internal_date(date: &DateTime<FixedOffset>) -> String {
    date.format("%d-%b-%Y %H:%M:%S %z").to_string()
}

/// Returns the current local time with its UTC offset, suitable for APPEND.
#[must_use]
pub fn now() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}
