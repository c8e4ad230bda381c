/*
Embedded State Extraction

Provider pages are rendered client side from a JSON state object assigned to
`window.__INITIAL_STATE__` inside a <script> tag. The next available
appointment lives at `doctor.nextAvailableAppointment.date` as free text that
contains a DD/MM/YY or DD/MM/YYYY date.

Everything here is pure: HTML text in, optional date out.
*/

use crate::error::ExtractError;
use chrono::NaiveDate;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

/// JSON pointer to the appointment field inside the embedded state.
pub const APPOINTMENT_POINTER: &str = "/doctor/nextAvailableAppointment/date";

const STATE_ASSIGNMENT: &str = r"window\.__INITIAL_STATE__\s*=\s*";
const DATE_PATTERN: &str = r"\b(\d{2})/(\d{2})/(\d{4}|\d{2})\b";

/// Returns `Ok(None)` when the page carries state but no published appointment.
pub fn extract_appointment_date(html: &str) -> Result<Option<NaiveDate>, ExtractError> {
    let state = extract_state(html)?;

    match state.pointer(APPOINTMENT_POINTER) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => parse_appointment_date(text).map(Some),
        Some(other) => Err(ExtractError::UnparsableDate(other.to_string())),
    }
}

/// Locate the state assignment in the page's scripts and parse its JSON value.
pub fn extract_state(html: &str) -> Result<Value, ExtractError> {
    let assignment = Regex::new(STATE_ASSIGNMENT).map_err(|e| ExtractError::Pattern(e.to_string()))?;
    let scripts = Selector::parse("script").map_err(|e| ExtractError::Pattern(e.to_string()))?;

    let document = Html::parse_document(html);
    for script in document.select(&scripts) {
        let source: String = script.text().collect();
        if let Some(found) = assignment.find(&source) {
            // Only the first JSON value after `=` belongs to the state; the
            // script may continue with unrelated statements.
            let rest = &source[found.end()..];
            let mut values = serde_json::Deserializer::from_str(rest).into_iter::<Value>();
            return match values.next() {
                Some(value) => Ok(value?),
                None => Err(ExtractError::MissingState),
            };
        }
    }

    Err(ExtractError::MissingState)
}

/// Parse the first DD/MM/YY(YY) occurrence in `text`. Two-digit years are 2000 + YY.
pub fn parse_appointment_date(text: &str) -> Result<NaiveDate, ExtractError> {
    let pattern = Regex::new(DATE_PATTERN).map_err(|e| ExtractError::Pattern(e.to_string()))?;
    let captures = pattern
        .captures(text)
        .ok_or_else(|| ExtractError::UnparsableDate(text.to_string()))?;

    let number = |index: usize| -> Result<u32, ExtractError> {
        captures[index]
            .parse::<u32>()
            .map_err(|_| ExtractError::UnparsableDate(text.to_string()))
    };

    let day = number(1)?;
    let month = number(2)?;
    let year_digits = &captures[3];
    let year = number(3)? as i32;
    let year = if year_digits.len() == 2 { 2000 + year } else { year };

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ExtractError::UnparsableDate(text.to_string()))
}
