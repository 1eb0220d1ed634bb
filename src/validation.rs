use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::FieldErrors;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("regex compiles"));
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9 ()\-.]{7,20}$").expect("regex compiles"));
static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("regex compiles"));

/// Collects field errors for one form submission.
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn required(&mut self, field: &str, value: &str, label: &str) -> bool {
        if value.trim().is_empty() {
            self.error(field, format!("{label} is required"));
            false
        } else {
            true
        }
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if self.required(field, value, "Email") && !is_valid_email(value) {
            self.error(field, "Email is invalid");
        }
    }

    pub fn phone(&mut self, field: &str, value: &str) {
        if self.required(field, value, "Phone") && !PHONE_RE.is_match(value.trim()) {
            self.error(field, "Phone number is invalid");
        }
    }

    /// Parses a strictly positive whole number.
    pub fn positive_int(&mut self, field: &str, raw: &str, label: &str) -> Option<u32> {
        if !self.required(field, raw, label) {
            return None;
        }
        match raw.trim().parse::<u32>() {
            Ok(n) if n > 0 => Some(n),
            _ => {
                self.error(field, format!("{label} must be a positive number"));
                None
            }
        }
    }

    pub fn non_negative_amount(&mut self, field: &str, raw: &str, label: &str) -> Option<f64> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Some(0.0);
        }
        match raw.parse::<f64>() {
            Ok(n) if n.is_finite() && n >= 0.0 => Some(n),
            _ => {
                self.error(field, format!("{label} must be zero or more"));
                None
            }
        }
    }

    pub fn date(&mut self, field: &str, raw: &str, label: &str) -> Option<NaiveDate> {
        match parse_date(raw) {
            Ok(date) => Some(date),
            Err(msg) => {
                self.error(field, format!("{label} {msg}"));
                None
            }
        }
    }

    pub fn optional_date(&mut self, field: &str, raw: &str, label: &str) -> Option<NaiveDate> {
        if raw.trim().is_empty() {
            None
        } else {
            self.date(field, raw, label)
        }
    }

    pub fn hex_color(&mut self, field: &str, value: &str) {
        if !HEX_COLOR_RE.is_match(value.trim()) {
            self.error(field, "Colour must look like #1976d2");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    pub fn into_errors(self) -> FieldErrors {
        self.errors
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("is required");
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| "must be a date (YYYY-MM-DD)")
}

pub fn parse_time(raw: &str) -> Result<NaiveTime, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("is required");
    }
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S%.f"))
        .map_err(|_| "must be a time (HH:MM)")
}

/// Builds a UTC timestamp from separately edited date and time fields.
pub fn compose_datetime(date: &str, time: &str) -> Result<DateTime<Utc>, &'static str> {
    let date = parse_date(date)?;
    let time = parse_time(time)?;
    Ok(NaiveDateTime::new(date, time).and_utc())
}

/// Splits a timestamp back into `YYYY-MM-DD` and `HH:MM` for editing. Seconds and
/// fractions are kept when present so an untouched field recomposes exactly.
pub fn split_datetime(value: DateTime<Utc>) -> (String, String) {
    let time_format = if value.second() == 0 && value.nanosecond() == 0 {
        "%H:%M"
    } else {
        "%H:%M:%S%.f"
    };
    (
        value.format("%Y-%m-%d").to_string(),
        value.format(time_format).to_string(),
    )
}
