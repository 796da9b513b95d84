//! Field-level validation for employee compensation rows.
//!
//! Each recognized column has a typed constructor that normalizes the raw
//! string and returns either the clean value or a [`FieldViolation`].
//! [`validate_row`] runs every constructor independently so a single row can
//! report several problems at once.
//!
//! # Rules
//!
//! | Field(s)                                   | Rule                                        |
//! |--------------------------------------------|---------------------------------------------|
//! | employeeCode, firstName, lastName, department, role, currency | trimmed, non-empty |
//! | gender                                     | lower-cased, one of male/female/other/unspecified |
//! | basePay, bonus                             | whitespace and `,` stripped, finite, >= 0; blank is 0 |
//! | fte                                        | finite number in `[0, 1]`; blank is rejected |
//! | hireDate                                   | `YYYY-MM-DD` shape (no calendar check)      |
//!
//! # Example
//!
//! ```rust,ignore
//! use paygap::validation::{validate_row, RawRow};
//!
//! let mut row = RawRow::default();
//! row.insert("gender", "robot");
//! let violations = validate_row(&row).unwrap_err();
//! assert!(violations.iter().any(|v| v.field == "gender"));
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::models::{EmployeeRecord, Gender, ParseError};

/// Column names recognized in uploaded files, in validation order.
pub const RECOGNIZED_FIELDS: [&str; 11] = [
    "employeeCode",
    "firstName",
    "lastName",
    "gender",
    "department",
    "role",
    "basePay",
    "bonus",
    "currency",
    "fte",
    "hireDate",
];

static HIRE_DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid hire date regex"));

/// A single field that failed its rule.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// Attach the violation to a CSV row.
    pub fn into_parse_error(self, row: usize) -> ParseError {
        ParseError::new(row, self.message).with_field(self.field)
    }
}

pub type FieldResult<T> = Result<T, FieldViolation>;

/// Raw string values of one CSV row, keyed by recognized column name.
///
/// Missing columns read as the empty string.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    values: HashMap<String, String>,
}

impl RawRow {
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::default();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

// =============================================================================
// Field Constructors
// =============================================================================

/// Trimmed, non-empty text.
pub fn required_text(field: &'static str, raw: &str) -> FieldResult<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(FieldViolation::new(field, format!("{} is required", field)));
    }
    Ok(value.to_string())
}

pub fn parse_gender(raw: &str) -> FieldResult<Gender> {
    let normalized = raw.trim().to_lowercase();
    Gender::from_normalized(&normalized).ok_or_else(|| FieldViolation::new("gender", "Invalid gender"))
}

/// Monetary amount such as `"60,000"` or `" 1 250.5 "`.
///
/// A blank amount counts as zero.
pub fn parse_amount(field: &'static str, raw: &str) -> FieldResult<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    if cleaned.is_empty() {
        return Ok(0.0);
    }

    let value: f64 = cleaned
        .parse()
        .map_err(|_| FieldViolation::new(field, format!("{} must be a number", field)))?;
    if !value.is_finite() {
        return Err(FieldViolation::new(field, format!("{} must be a finite number", field)));
    }
    if value < 0.0 {
        return Err(FieldViolation::new(field, format!("{} must be non-negative", field)));
    }
    Ok(value)
}

pub fn parse_fte(raw: &str) -> FieldResult<f64> {
    let value = raw
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| (0.0..=1.0).contains(v));
    value.ok_or_else(|| FieldViolation::new("fte", "fte must be a number between 0 and 1"))
}

pub fn parse_hire_date(raw: &str) -> FieldResult<String> {
    let value = raw.trim();
    if !HIRE_DATE_PATTERN.is_match(value) {
        return Err(FieldViolation::new("hireDate", "hireDate must use the YYYY-MM-DD format"));
    }
    Ok(value.to_string())
}

// =============================================================================
// Row Validation
// =============================================================================

/// Validate every recognized field of a row.
///
/// Returns the record, or all violations in [`RECOGNIZED_FIELDS`] order.
pub fn validate_row(row: &RawRow) -> Result<EmployeeRecord, Vec<FieldViolation>> {
    let mut violations = Vec::new();

    let employee_code = required_text("employeeCode", row.get("employeeCode"));
    let first_name = required_text("firstName", row.get("firstName"));
    let last_name = required_text("lastName", row.get("lastName"));
    let gender = parse_gender(row.get("gender"));
    let department = required_text("department", row.get("department"));
    let role = required_text("role", row.get("role"));
    let base_pay = parse_amount("basePay", row.get("basePay"));
    let bonus = parse_amount("bonus", row.get("bonus"));
    let currency = required_text("currency", row.get("currency"));
    let fte = parse_fte(row.get("fte"));
    let hire_date = parse_hire_date(row.get("hireDate"));

    let employee_code = collect(employee_code, &mut violations);
    let first_name = collect(first_name, &mut violations);
    let last_name = collect(last_name, &mut violations);
    let gender = collect(gender, &mut violations);
    let department = collect(department, &mut violations);
    let role = collect(role, &mut violations);
    let base_pay = collect(base_pay, &mut violations);
    let bonus = collect(bonus, &mut violations);
    let currency = collect(currency, &mut violations);
    let fte = collect(fte, &mut violations);
    let hire_date = collect(hire_date, &mut violations);

    match (
        employee_code,
        first_name,
        last_name,
        gender,
        department,
        role,
        base_pay,
        bonus,
        currency,
        fte,
        hire_date,
    ) {
        (
            Some(employee_code),
            Some(first_name),
            Some(last_name),
            Some(gender),
            Some(department),
            Some(role),
            Some(base_pay),
            Some(bonus),
            Some(currency),
            Some(fte),
            Some(hire_date),
        ) if violations.is_empty() => Ok(EmployeeRecord {
            employee_code,
            first_name,
            last_name,
            gender,
            department,
            role,
            base_pay,
            bonus,
            currency,
            fte,
            hire_date,
        }),
        _ => Err(violations),
    }
}

fn collect<T>(result: FieldResult<T>, violations: &mut Vec<FieldViolation>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(violation) => {
            violations.push(violation);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn valid_row() -> RawRow {
        [
            ("employeeCode", " E-001 "),
            ("firstName", "Ada"),
            ("lastName", "Lovelace"),
            ("gender", " Female "),
            ("department", "Engineering"),
            ("role", "Engineer"),
            ("basePay", "60,000"),
            ("bonus", "1 500.50"),
            ("currency", "EUR"),
            ("fte", "0.8"),
            ("hireDate", "2021-03-15"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_valid_row_is_normalized() {
        let record = validate_row(&valid_row()).unwrap();
        assert_eq!(record.employee_code, "E-001");
        assert_eq!(record.gender, Gender::Female);
        assert_eq!(record.base_pay, 60000.0);
        assert_eq!(record.bonus, 1500.5);
        assert_eq!(record.fte, 0.8);
        assert_eq!(record.hire_date, "2021-03-15");
    }

    #[test]
    fn test_invalid_gender() {
        let mut row = valid_row();
        row.insert("gender", "invalid");
        let violations = validate_row(&row).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "gender");
        assert_eq!(violations[0].message, "Invalid gender");
    }

    #[test]
    fn test_blank_amounts_are_zero_but_blank_fte_is_rejected() {
        let mut row = valid_row();
        row.insert("basePay", "  ");
        row.insert("bonus", "");
        let record = validate_row(&row).unwrap();
        assert_eq!(record.base_pay, 0.0);
        assert_eq!(record.bonus, 0.0);

        row.insert("fte", " ");
        let violations = validate_row(&row).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "fte");
    }

    #[test]
    fn test_all_violations_reported_in_order() {
        let violations = validate_row(&RawRow::default()).unwrap_err();
        let fields: Vec<_> = violations.iter().map(|v| v.field).collect();
        // blank amounts are zero, so basePay and bonus pass
        assert_eq!(
            fields,
            vec![
                "employeeCode",
                "firstName",
                "lastName",
                "gender",
                "department",
                "role",
                "currency",
                "fte",
                "hireDate",
            ]
        );
    }

    #[test]
    fn test_amount_rules() {
        assert_eq!(parse_amount("basePay", " 1,234,567.5 ").unwrap(), 1234567.5);
        assert_eq!(parse_amount("bonus", "").unwrap(), 0.0);
        assert!(parse_amount("basePay", "abc").is_err());
        assert!(parse_amount("basePay", "inf").is_err());
        assert!(parse_amount("basePay", "NaN").is_err());
        let negative = parse_amount("bonus", "-10").unwrap_err();
        assert!(negative.message.contains("non-negative"));
    }

    #[test]
    fn test_fte_bounds() {
        assert_eq!(parse_fte("0").unwrap(), 0.0);
        assert_eq!(parse_fte(" 1 ").unwrap(), 1.0);
        assert!(parse_fte("1.01").is_err());
        assert!(parse_fte("-0.1").is_err());
        assert!(parse_fte("").is_err());
        assert!(parse_fte("NaN").is_err());
    }

    #[test]
    fn test_hire_date_shape_only() {
        assert_eq!(parse_hire_date(" 2024-13-40 ").unwrap(), "2024-13-40");
        assert!(parse_hire_date("2024-1-05").is_err());
        assert!(parse_hire_date("15/03/2021").is_err());
        assert!(parse_hire_date("2021-03-15T00:00").is_err());
    }

    #[test]
    fn test_gender_is_case_insensitive() {
        assert_eq!(parse_gender("MALE").unwrap(), Gender::Male);
        assert_eq!(parse_gender(" Unspecified").unwrap(), Gender::Unspecified);
        assert!(parse_gender("").is_err());
    }

    #[test]
    fn test_violation_into_parse_error() {
        let err = parse_gender("x").unwrap_err().into_parse_error(5);
        assert_eq!(err.row, 5);
        assert_eq!(err.field.as_deref(), Some("gender"));
    }

    proptest! {
        #[test]
        fn prop_amounts_round_trip(value in 0.0f64..1.0e12) {
            let parsed = parse_amount("basePay", &value.to_string()).unwrap();
            prop_assert_eq!(parsed, value);
        }

        #[test]
        fn prop_fte_round_trip(value in 0.0f64..=1.0) {
            let parsed = parse_fte(&value.to_string()).unwrap();
            prop_assert_eq!(parsed, value);
        }
    }
}
