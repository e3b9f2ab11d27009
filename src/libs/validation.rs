//! Input checks shared by the services.
//!
//! Each helper returns a `Validation` error carrying the offending field and
//! a field-specific code. None of them touch storage.

use crate::libs::clock;
use crate::libs::error::{AppError, AppResult};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

pub const MAX_TITLE_LEN: usize = 200;

/// Trims `value` and rejects it when empty.
pub fn required(value: &str, field: &'static str, code: &'static str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(field, code, format!("Field '{}' is required", field)));
    }
    Ok(trimmed.to_string())
}

pub fn max_len(value: &str, max: usize, field: &'static str, code: &'static str) -> AppResult<()> {
    if value.chars().count() > max {
        return Err(AppError::validation(
            field,
            code,
            format!("Field '{}' must be at most {} characters", field, max),
        ));
    }
    Ok(())
}

/// Accepts `#rgb` and `#rrggbb` hex colors.
pub fn color(value: &str) -> AppResult<String> {
    let value = value.trim();
    let hex = value.strip_prefix('#').unwrap_or("");
    let valid = (hex.len() == 6 || hex.len() == 3) && hex.chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(AppError::validation(
            "color",
            "INVALID_COLOR",
            format!("Color '{}' is not a hex color like #3498db", value),
        ));
    }
    Ok(value.to_lowercase())
}

pub fn date(value: &str, field: &'static str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation(field, "INVALID_DATE", format!("Field '{}' must be a date in YYYY-MM-DD format", field)))
}

pub fn optional_date(value: Option<&str>, field: &'static str) -> AppResult<Option<NaiveDate>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => date(v, field).map(Some),
    }
}

/// Parses local `YYYY-MM-DD HH:MM[:SS]` (space or `T` separated) or a full
/// RFC 3339 timestamp. Timestamps with an offset are converted to local time;
/// fractional seconds are dropped.
pub fn datetime(value: &str, field: &'static str) -> AppResult<NaiveDateTime> {
    const FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"];
    let value = value.trim();
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.with_timezone(&Local).naive_local())
        })
        .map(clock::truncate)
        .ok_or_else(|| {
            AppError::validation(
                field,
                "INVALID_DATE",
                format!("Field '{}' must be a timestamp in YYYY-MM-DD HH:MM:SS format", field),
            )
        })
}

pub fn date_range(start: NaiveDate, end: NaiveDate, field: &'static str) -> AppResult<()> {
    if end < start {
        return Err(AppError::validation(
            field,
            "INVALID_DATE_RANGE",
            format!("End date {} is before start date {}", end, start),
        ));
    }
    Ok(())
}

pub fn time_range(start: NaiveDateTime, end: NaiveDateTime) -> AppResult<()> {
    if end < start {
        return Err(AppError::validation(
            "endTime",
            "INVALID_DATE_RANGE",
            format!("End time {} is before start time {}", end, start),
        ));
    }
    Ok(())
}

/// 1..=5 scale used by focus levels and moods.
pub fn scale(value: Option<i32>, field: &'static str, code: &'static str) -> AppResult<Option<i32>> {
    match value {
        Some(v) if !(1..=5).contains(&v) => Err(AppError::validation(
            field,
            code,
            format!("Field '{}' must be between 1 and 5, got {}", field, v),
        )),
        other => Ok(other),
    }
}
