//! Report timestamp formatting.

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

const REPORT_STAMP: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3] [offset_hour sign:mandatory][offset_minute]"
);

/// Wall-clock stamp attached to every normalized report, in the host's
/// local offset when determinable, UTC otherwise.
pub fn report_stamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(&REPORT_STAMP).unwrap_or_default()
}
