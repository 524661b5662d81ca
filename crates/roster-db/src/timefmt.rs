//! Timestamps are stored as RFC 3339 TEXT; parsing also tolerates the
//! `datetime('now')` format SQLite writes into column defaults.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

pub(crate) fn now() -> String {
    fmt(Utc::now())
}

pub(crate) fn fmt(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn fmt_opt(t: Option<DateTime<Utc>>) -> Option<String> {
    t.map(fmt)
}

pub(crate) fn parse(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    for pattern in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, pattern) {
            return Some(t.and_utc());
        }
    }
    None
}

pub(crate) fn parse_opt(s: Option<String>) -> Option<DateTime<Utc>> {
    s.as_deref().and_then(parse)
}
