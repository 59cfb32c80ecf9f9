// Field-level validation for request payloads.
//
// HTML forms post blanks as "" and numbers as either JSON numbers or strings,
// so scalar inputs arrive loosely typed and are normalized here.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::ApiError;

/// Accumulates per-field messages so every problem is reported in one response
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: HashMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Blank or whitespace-only text becomes `None`
    pub fn optional_text(&mut self, value: Option<String>) -> Option<String> {
        value.filter(|s| !s.trim().is_empty())
    }

    pub fn required_text(&mut self, field: &str, value: Option<String>) -> String {
        match self.optional_text(value) {
            Some(s) => s,
            None => {
                self.add(field, "This field is required");
                String::new()
            }
        }
    }

    /// Accepts `YYYY-MM-DD`, or an ISO datetime truncated to its date
    pub fn optional_date(&mut self, field: &str, value: Option<String>) -> Option<NaiveDate> {
        let raw = self.optional_text(value)?;
        let raw = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(date);
        }
        if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
            return Some(dt.date_naive());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(dt.date());
        }
        self.add(field, format!("Invalid date '{}', expected YYYY-MM-DD", raw));
        None
    }

    pub fn optional_int(&mut self, field: &str, value: Option<Value>) -> Option<i32> {
        match value {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => match n.as_i64().and_then(|i| i32::try_from(i).ok()) {
                Some(i) => Some(i),
                None => {
                    self.add(field, format!("Expected an integer, got {}", n));
                    None
                }
            },
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(Value::String(s)) => match s.trim().parse::<i32>() {
                Ok(i) => Some(i),
                Err(_) => {
                    self.add(field, format!("Expected an integer, got '{}'", s));
                    None
                }
            },
            Some(other) => {
                self.add(field, format!("Expected an integer, got {}", other));
                None
            }
        }
    }

    pub fn required_int(&mut self, field: &str, value: Option<Value>) -> i32 {
        match self.optional_int(field, value) {
            Some(i) => i,
            None => {
                // Keeps the parse message if optional_int already recorded one
                self.add(field, "This field is required");
                0
            }
        }
    }

    /// Required integer that must be zero or greater
    pub fn required_count(&mut self, field: &str, value: Option<Value>) -> i32 {
        let count = self.required_int(field, value);
        if count < 0 {
            self.add(field, "Must be non-negative");
        }
        count
    }

    pub fn required_decimal(&mut self, field: &str, value: Option<Value>) -> Decimal {
        let parsed = match value {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(Value::Number(n)) => Some(parse_decimal(&n.to_string())),
            Some(Value::String(s)) => Some(parse_decimal(s.trim())),
            Some(_) => Some(None),
        };
        match parsed {
            None => {
                self.add(field, "This field is required");
                Decimal::ZERO
            }
            Some(None) => {
                self.add(field, "Expected a number");
                Decimal::ZERO
            }
            Some(Some(d)) => d,
        }
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error("Validation failed", Some(self.errors)))
        }
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw).or_else(|_| Decimal::from_scientific(raw)).ok()
}

/// Parse an optional integer query parameter, treating blanks as absent
pub fn optional_query_int(field: &str, raw: Option<&str>) -> Result<Option<i64>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(|_| {
            ApiError::field_error(field, format!("Expected an integer, got '{}'", s))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_text_is_absent() {
        let mut errors = FieldErrors::new();
        assert_eq!(errors.optional_text(Some("  ".into())), None);
        assert_eq!(errors.required_text("lastName", Some("".into())), "");
        assert!(errors.contains("lastName"));
    }

    #[test]
    fn dates_accept_plain_and_iso_forms() {
        let mut errors = FieldErrors::new();
        let expected = NaiveDate::from_ymd_opt(1992, 5, 1);
        assert_eq!(errors.optional_date("hireDate", Some("1992-05-01".into())), expected);
        assert_eq!(errors.optional_date("hireDate", Some("1992-05-01T00:00:00".into())), expected);
        assert_eq!(errors.optional_date("hireDate", Some("1992-05-01T00:00:00Z".into())), expected);
        assert!(errors.is_empty());
        assert_eq!(errors.optional_date("birthDate", Some("05/01/1992".into())), None);
        assert!(errors.contains("birthDate"));
    }

    #[test]
    fn integers_accept_numbers_and_numeric_strings() {
        let mut errors = FieldErrors::new();
        assert_eq!(errors.optional_int("reportsTo", Some(json!(2))), Some(2));
        assert_eq!(errors.optional_int("reportsTo", Some(json!("5"))), Some(5));
        assert_eq!(errors.optional_int("reportsTo", Some(json!(""))), None);
        assert!(errors.is_empty());
        assert_eq!(errors.optional_int("reportsTo", Some(json!(1.5))), None);
        assert!(errors.contains("reportsTo"));
    }

    #[test]
    fn counts_must_be_non_negative() {
        let mut errors = FieldErrors::new();
        errors.required_count("unitsInStock", Some(json!(-1)));
        errors.required_count("unitsOnOrder", None);
        assert!(errors.contains("unitsInStock"));
        assert!(errors.contains("unitsOnOrder"));
    }

    #[test]
    fn decimals_parse_from_numbers_and_strings() {
        let mut errors = FieldErrors::new();
        assert_eq!(errors.required_decimal("unitPrice", Some(json!(18))), Decimal::from(18));
        assert_eq!(errors.required_decimal("unitPrice", Some(json!("19.5"))), Decimal::new(195, 1));
        assert!(errors.is_empty());
        errors.required_decimal("unitPrice", Some(json!("cheap")));
        assert!(errors.contains("unitPrice"));
    }

    #[test]
    fn query_ints_reject_garbage() {
        assert_eq!(optional_query_int("categoryId", Some("")).unwrap(), None);
        assert_eq!(optional_query_int("categoryId", Some("7")).unwrap(), Some(7));
        assert!(optional_query_int("categoryId", Some("seven")).is_err());
    }
}
