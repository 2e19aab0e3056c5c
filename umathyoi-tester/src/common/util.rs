use chrono::{SecondsFormat, Utc};

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Split `key:value`; the value is `None` when there is no separator.
pub fn split_pair(token: &str) -> (&str, Option<&str>) {
    match token.split_once(':') {
        Some((key, value)) => (key.trim(), Some(value.trim())),
        None => (token.trim(), None),
    }
}

/// RFC 3339 timestamp stamped on written reports.
pub fn report_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
