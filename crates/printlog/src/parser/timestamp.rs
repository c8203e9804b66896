use chrono::{Datelike, Local, NaiveDateTime};

/// Bracketed spooler timestamp layout, e.g. `01/Jan/2025:10:00:00`.
pub const LOG_TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S";

/// Parses the bracketed timestamp token, ignoring brackets and any zone
/// suffix. Falls back to the current local time when unparsable.
pub fn parse_timestamp(token: &str) -> NaiveDateTime {
    let now = Local::now().naive_local();
    parse_timestamp_at(token, now)
}

pub(crate) fn parse_timestamp_at(token: &str, now: NaiveDateTime) -> NaiveDateTime {
    let text = token.trim_start_matches('[');
    let text = text
        .split(|c: char| c == ']' || c.is_whitespace())
        .next()
        .unwrap_or_default();

    match NaiveDateTime::parse_from_str(text, LOG_TIMESTAMP_FORMAT) {
        Ok(ts) => repair_year(ts, now.year()),
        Err(e) => {
            log::debug!("Unparsable timestamp '{}' ({}), using current time", text, e);
            now
        }
    }
}

// Two-digit years come through as 0025 or as 1900 depending on the writer.
fn repair_year(ts: NaiveDateTime, current_year: i32) -> NaiveDateTime {
    if ts.year() == 1900 || ts.year() < 100 {
        ts.with_year(current_year).unwrap_or(ts)
    } else {
        ts
    }
}
