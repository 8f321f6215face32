use std::fmt;

use chrono::{NaiveDate, NaiveTime};

/// Heading date text that matched neither accepted format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateError {
    text: String,
}

impl DateError {
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unparseable date heading: {:?}", self.text)
    }
}

impl std::error::Error for DateError {}

/// Resolve a date heading (assumed UTC) to midnight-UTC seconds. Accepts the
/// long month-name form ("January 5, 2010") and falls back to the ISO form
/// ("2010-01-05").
pub fn resolve(text: &str) -> Result<i64, DateError> {
    let text = text.trim();
    let date = NaiveDate::parse_from_str(text, "%B %d, %Y")
        .or_else(|_| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
        .map_err(|_| DateError {
            text: text.to_string(),
        })?;
    Ok(date.and_time(NaiveTime::MIN).and_utc().timestamp())
}
