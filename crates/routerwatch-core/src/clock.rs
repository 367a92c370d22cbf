use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

const SHORT_FORMAT: &[FormatItem<'static>] =
    format_description!("[day]-[month repr:short] [hour]:[minute]");

/// Local wall-clock time, or UTC when the local offset cannot be determined.
pub fn now_local() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Renders a timestamp as `DD-Mon HH:MM`.
pub fn format_short(value: OffsetDateTime) -> String {
    value
        .format(SHORT_FORMAT)
        .unwrap_or_else(|_| value.to_string())
}
