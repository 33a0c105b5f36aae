//! Typed reads over parsed query parameters.
//!
//! None of these readers fail. An absent key and an unparsable value produce
//! the same fallback, so callers cannot tell the two apart.

use std::collections::BTreeMap;

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Query parameters keyed by name, each holding every value in URI order.
pub type QueryParams = BTreeMap<String, Vec<String>>;

/// Accepted textual time formats for [`get_time`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLayout {
    /// `yyyy-mm-dd`, interpreted as midnight UTC.
    Date,
    /// Full RFC 3339 timestamp.
    Rfc3339,
}

impl TimeLayout {
    pub fn parse(self, value: &str) -> Option<OffsetDateTime> {
        match self {
            Self::Date => Date::parse(value, format_description!("[year]-[month]-[day]"))
                .ok()
                .map(|date| date.midnight().assume_utc()),
            Self::Rfc3339 => OffsetDateTime::parse(value, &Rfc3339).ok(),
        }
    }
}

/// First value for `key`, or `""`.
pub fn get_string<'a>(params: &'a QueryParams, key: &str) -> &'a str {
    params
        .get(key)
        .and_then(|values| values.first())
        .map_or("", String::as_str)
}

/// Every non-empty value for `key`, in order.
pub fn get_string_array(params: &QueryParams, key: &str) -> Vec<String> {
    params
        .get(key)
        .map(|values| {
            values
                .iter()
                .filter(|value| !value.is_empty())
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// First value for `key` as an integer, or `0`.
pub fn get_int(params: &QueryParams, key: &str) -> i64 {
    get_string(params, key).parse().unwrap_or(0)
}

/// First value for `key` parsed with `layout`, or `None`.
pub fn get_time(params: &QueryParams, key: &str, layout: TimeLayout) -> Option<OffsetDateTime> {
    let value = get_string(params, key);
    if value.is_empty() {
        return None;
    }
    layout.parse(value)
}
