// Post timestamps, e.g. "Mon Jan 02 15:04:05 +0000 2006".

use chrono::{DateTime, FixedOffset};

/// strftime pattern of the `date` field: weekday, month, day, time, offset, year.
pub const POST_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Parse a post `date` into a timezone-aware timestamp.
pub fn parse_post_date(raw: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_str(raw.trim(), POST_DATE_FORMAT)
}
