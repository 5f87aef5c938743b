//! Date strings as exchanged with the Buut API and typed into forms.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

pub const API_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
pub const API_DATE_FORMAT: &str = "%Y-%m-%d";
/// Day/month/year as entered in the profile forms (e.g. `19/8/1996`).
pub const FORM_DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date '{value}': {source}")]
pub struct DateError {
    pub value: String,
    pub source: chrono::ParseError,
}

/// Parse an API timestamp. Anything past the seconds (fractions, offsets) is
/// ignored; a bare date is taken as the start of that day.
pub fn parse_api_datetime(value: &str) -> Result<NaiveDateTime, DateError> {
    let trimmed = value.trim();
    let head = trimmed.get(..19).unwrap_or(trimmed);
    NaiveDateTime::parse_from_str(head, API_DATE_TIME_FORMAT)
        .or_else(|e| {
            NaiveDate::parse_from_str(head, API_DATE_FORMAT)
                .map(|d| d.and_time(NaiveTime::MIN))
                .map_err(|_| e)
        })
        .map_err(|source| DateError {
            value: value.to_string(),
            source,
        })
}

pub fn format_api_datetime(value: &NaiveDateTime) -> String {
    value.format(API_DATE_TIME_FORMAT).to_string()
}

pub fn format_api_date(value: NaiveDate) -> String {
    value.format(API_DATE_FORMAT).to_string()
}

/// Parse a date typed into a form, `yyyy-MM-dd` first, then `d/M/yyyy`.
pub fn parse_form_date(value: &str) -> Result<NaiveDate, DateError> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, API_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, FORM_DATE_FORMAT))
        .map_err(|source| DateError {
            value: value.to_string(),
            source,
        })
}
