//! Calendar dates on the wire are `YYYY-MM-DD`.
use time::{
    format_description::{well_known::Rfc3339, BorrowedFormatItem},
    macros::format_description,
    Date, OffsetDateTime,
};

pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

time::serde::format_description!(pub(crate) ymd, Date, "[year]-[month]-[day]");

/// Parses a `YYYY-MM-DD` date.
///
/// An RFC 3339 timestamp is accepted too and truncated to its calendar date,
/// since some clients send midnight UTC timestamps for date fields.
pub fn parse_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    Date::parse(raw, DATE_FORMAT)
        .ok()
        .or_else(|| OffsetDateTime::parse(raw, &Rfc3339).ok().map(|dt| dt.date()))
}

/// Resolves an optional request date: blank or absent means today (UTC).
pub fn date_or_today(raw: Option<&str>) -> Result<Date, time::error::Parse> {
    match raw.map(str::trim) {
        None | Some("") => Ok(OffsetDateTime::now_utc().date()),
        Some(s) => Date::parse(s, DATE_FORMAT),
    }
}
