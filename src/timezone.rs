//! Resolves the reference timezone used to display and filter dates.

use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// The current UTC offset of the canonical timezone `canonical_timezone`,
/// e.g. "Asia/Bangkok", or `None` if the name is not known.
///
/// The offset in effect now is applied to every date on the page. In zones
/// with daylight saving time, timestamps from the other side of a transition
/// are shown an hour off and may fall into the neighbouring day or month.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}
