//! Shared date-extraction cascade.
//!
//! One utility serves both the aggregator (purchase date stamped onto every
//! product) and the orchestrator's top-level metadata, so the two call sites
//! cannot drift apart.

use chrono::NaiveDate;

use super::patterns::{DATE_MDY_DASH, DATE_MDY_SLASH, DATE_YMD, LABELED_DATE};

/// Outcome of the cascade over one receipt's raw text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedDate {
    /// First textual match, kept even when it failed to parse.
    pub raw: Option<String>,

    /// Value of the first pattern that matched AND parsed to a valid
    /// calendar date.
    pub date: Option<NaiveDate>,
}

/// Apply the ordered date patterns: labeled "date:" prefix, then MM/DD/YYYY,
/// then MM-DD-YYYY, then YYYY-MM-DD. A pattern that matches but does not
/// parse (e.g. "Date: not-a-date", or a dash match with an impossible month)
/// records the raw text and falls through to the next pattern.
pub fn extract_date(text: &str) -> ExtractedDate {
    let mut result = ExtractedDate::default();

    if let Some(caps) = LABELED_DATE.captures(text) {
        let captured = caps[1].trim().to_string();
        result.raw = Some(captured.clone());
        if let Some(date) = parse_flexible(&captured) {
            result.date = Some(date);
            return result;
        }
    }

    if let Some(caps) = DATE_MDY_SLASH.captures(text) {
        if result.raw.is_none() {
            result.raw = Some(caps[0].to_string());
        }
        if let Some(date) = from_mdy(&caps[1], &caps[2], &caps[3]) {
            result.date = Some(date);
            return result;
        }
    }

    if let Some(caps) = DATE_MDY_DASH.captures(text) {
        if result.raw.is_none() {
            result.raw = Some(caps[0].to_string());
        }
        if let Some(date) = from_mdy(&caps[1], &caps[2], &caps[3]) {
            result.date = Some(date);
            return result;
        }
    }

    if let Some(caps) = DATE_YMD.captures(text) {
        if result.raw.is_none() {
            result.raw = Some(caps[0].to_string());
        }
        let year: i32 = caps[1].parse().unwrap_or(0);
        let month: u32 = caps[2].parse().unwrap_or(0);
        let day: u32 = caps[3].parse().unwrap_or(0);
        result.date = NaiveDate::from_ymd_opt(year, month, day);
    }

    result
}

/// Parse the free text captured after a "date:" label. Numeric formats are
/// re-tried inside the capture, plus the long month-name forms a receipt
/// printer may emit ("March 15, 2024").
fn parse_flexible(text: &str) -> Option<NaiveDate> {
    if let Some(caps) = DATE_MDY_SLASH.captures(text) {
        if let Some(date) = from_mdy(&caps[1], &caps[2], &caps[3]) {
            return Some(date);
        }
    }
    if let Some(caps) = DATE_MDY_DASH.captures(text) {
        if let Some(date) = from_mdy(&caps[1], &caps[2], &caps[3]) {
            return Some(date);
        }
    }
    if let Some(caps) = DATE_YMD.captures(text) {
        let year: i32 = caps[1].parse().unwrap_or(0);
        let month: u32 = caps[2].parse().unwrap_or(0);
        let day: u32 = caps[3].parse().unwrap_or(0);
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    let trimmed = text.trim();
    for format in ["%B %d, %Y", "%b %d, %Y", "%B %d %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    None
}

fn from_mdy(month: &str, day: &str, year: &str) -> Option<NaiveDate> {
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    let year: i32 = expand_year(year.parse().ok()?);
    NaiveDate::from_ymd_opt(year, month, day)
}

fn expand_year(year: i32) -> i32 {
    if year < 100 {
        // Two-digit year: assume 2000s for 00-50, 1900s for 51-99.
        if year <= 50 { 2000 + year } else { 1900 + year }
    } else {
        year
    }
}
