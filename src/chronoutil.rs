use {
    crate::constants::{ISO8601_COMPACT_FORMAT, ISO8601_UTC_LENGTH},
    chrono::{DateTime, NaiveDateTime, Utc},
    lazy_static::lazy_static,
    regex::Regex,
};

lazy_static! {
    /// Compact ISO 8601 timestamp format used by `x-amz-date`: `YYYYMMDDTHHMMSSZ`.
    ///
    /// chrono alone accepts variable-width fields for `%Y`, so the shape is checked first.
    static ref ISO_8601_COMPACT_REGEX: Regex = Regex::new(
        r"(?x)^
        \d{4}
        (?:0[1-9]|1[0-2])
        (?:0[1-9]|[12][0-9]|3[01])
        T
        (?:[01][0-9]|2[0-3])
        [0-5][0-9]
        [0-5][0-9]
        Z$").unwrap();
}

/// Parse a timestamp in the compact `YYYYMMDDTHHMMSSZ` form. Returns `None` if the value is not in exactly that
/// form or names an impossible date (e.g. February 30).
pub(crate) fn parse_amz_date(s: &str) -> Option<DateTime<Utc>> {
    if s.len() != ISO8601_UTC_LENGTH || !ISO_8601_COMPACT_REGEX.is_match(s) {
        return None;
    }

    let naive = NaiveDateTime::parse_from_str(s, ISO8601_COMPACT_FORMAT).ok()?;
    Some(DateTime::from_naive_utc_and_offset(naive, Utc))
}
