pub use time::Date;
use time::{macros::format_description, Month, UtcOffset};

pub type StaticDateFormat<'a> =
    &'static [time::format_description::BorrowedFormatItem<'a>];

/// Dotted numeric dates ("28.02.2024"), as used for depot price dates.
pub const DOTTED_DATE_FORMAT: StaticDateFormat =
    format_description!("[day].[month].[year]");

pub fn parse_dotted_date(date_str: &str) -> Result<Date, time::error::Parse> {
    Date::parse(date_str, DOTTED_DATE_FORMAT)
}

pub fn to_dotted_string(d: &Date) -> String {
    d.format(DOTTED_DATE_FORMAT).unwrap_or_else(|_| d.to_string())
}

/// Resolves a German or Italian month name (full or abbreviated, optional
/// trailing period) case-insensitively.
pub fn month_from_name(name: &str) -> Option<Month> {
    let m = name.trim().trim_end_matches('.').to_lowercase();
    let m = m.as_str();
    if m.starts_with("jan") || m.starts_with("gen") {
        Some(Month::January)
    } else if m.starts_with("feb") {
        Some(Month::February)
    } else if m.starts_with("mär") || m.starts_with("mrz")
        || m.starts_with("maerz") || m.starts_with("mar")
    {
        Some(Month::March)
    } else if m.starts_with("apr") {
        Some(Month::April)
    } else if m.starts_with("mai") || m.starts_with("mag") {
        Some(Month::May)
    } else if m.starts_with("jun") || m.starts_with("giu") {
        Some(Month::June)
    } else if m.starts_with("jul") || m.starts_with("lug") {
        Some(Month::July)
    } else if m.starts_with("aug") || m.starts_with("ago") {
        Some(Month::August)
    } else if m.starts_with("sep") || m.starts_with("set") {
        Some(Month::September)
    } else if m.starts_with("okt") || m.starts_with("ott") {
        Some(Month::October)
    } else if m.starts_with("nov") {
        Some(Month::November)
    } else if m.starts_with("dez") || m.starts_with("dic") {
        Some(Month::December)
    } else {
        None
    }
}

/// Parses statement dates of the form "<day> <month-name>[.] <year>",
/// like "04 März 2021" or "12 Sett. 2023".
/// Returns None on any structural mismatch; callers must treat None as
/// "unparseable", not as an error.
pub fn parse_statement_date(text: &str) -> Option<Date> {
    let mut parts = text.split_whitespace();
    let day: u8 = parts.next()?.parse().ok()?;
    let month = month_from_name(parts.next()?)?;
    let year: i32 = parts.next()?.parse().ok()?;
    Date::from_calendar_date(year, month, day).ok()
}

// A (possibly unsafe, but commonly used) way to get the current system
// UtcOffset of the local timezone. UtcOffset::current_local_offset is
// gated as unsafe on Linux, while chrono's Local::now is not, so we go
// through chrono here.
pub fn local_utc_offset() -> Result<UtcOffset, time::error::ComponentRange> {
    let now = chrono::offset::Local::now();
    let offset = now.offset();
    UtcOffset::from_whole_seconds(-offset.utc_minus_local())
}
