//! Domain models for the pay-gap analytics pipeline.
//!
//! This module contains the core data structures used throughout the pipeline:
//!
//! - [`EmployeeRecord`] - One validated compensation row
//! - [`Gender`] - Normalized gender values accepted in uploads
//! - [`ParseError`] - Row-level problem reported back to the uploader
//! - [`PayGapItem`] - Gender-segmented pay statistics for one group
//! - [`GroupDimension`] - Role or department grouping key
//! - [`ComplianceScore`] / [`RiskArea`] - Compliance outputs over role groups

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Gender
// =============================================================================

/// Gender as recorded in the compensation file.
///
/// Only `Male` and `Female` take part in gap statistics; the other two
/// values are valid input but excluded from both gender subsets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
    Unspecified,
}

impl Gender {
    /// Parse an already lower-cased, trimmed value.
    pub fn from_normalized(value: &str) -> Option<Self> {
        match value {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            "unspecified" => Some(Gender::Unspecified),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
            Gender::Unspecified => "unspecified",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Employee Record
// =============================================================================

/// A fully validated employee compensation record.
///
/// Records are only produced by [`crate::validation::validate_row`]; a row
/// that fails any field check never becomes a record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub department: String,
    pub role: String,
    /// Annual base pay, non-negative.
    pub base_pay: f64,
    /// Annual bonus, non-negative.
    pub bonus: f64,
    pub currency: String,
    /// Full-time equivalent in `[0, 1]`.
    pub fte: f64,
    /// Hire date as `YYYY-MM-DD` (shape-checked only).
    pub hire_date: String,
}

impl EmployeeRecord {
    /// Total compensation used for gap statistics.
    pub fn total_pay(&self) -> f64 {
        self.base_pay + self.bonus
    }

    /// Value of the grouping key for the given dimension.
    pub fn group_key(&self, dimension: GroupDimension) -> &str {
        match dimension {
            GroupDimension::Role => &self.role,
            GroupDimension::Department => &self.department,
        }
    }
}

// =============================================================================
// Parse Errors
// =============================================================================

/// A problem found while reading an uploaded CSV file.
///
/// `row` is 1-based and counts the header as row 1, so the first data row
/// is row 2. Rows count CSV records, not physical lines: blank lines are
/// skipped without taking a number and a multi-line quoted field stays one
/// row. Structural (tokenizer) errors carry no `field`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParseError {
    pub row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl ParseError {
    pub fn new(row: usize, message: impl Into<String>) -> Self {
        Self {
            row,
            field: None,
            message: message.into(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// True for errors raised by the tokenizer rather than a field check.
    pub fn is_structural(&self) -> bool {
        self.field.is_none()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "Row {}, field '{}': {}", self.row, field, self.message),
            None => write!(f, "Row {}: {}", self.row, self.message),
        }
    }
}

/// Records and errors extracted from one CSV document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub records: Vec<EmployeeRecord>,
    pub errors: Vec<ParseError>,
}

// =============================================================================
// Aggregation Results
// =============================================================================

/// Field used to partition records before computing gap statistics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GroupDimension {
    Role,
    Department,
}

impl GroupDimension {
    /// Column name used for the group key in exports and API payloads.
    pub fn key_column(&self) -> &'static str {
        match self {
            GroupDimension::Role => "roleName",
            GroupDimension::Department => "departmentName",
        }
    }
}

/// Gender-segmented pay statistics for a single role or department.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PayGapItem {
    /// Role or department name.
    pub group: String,
    pub male_avg: f64,
    pub female_avg: f64,
    /// `(male_avg - female_avg) / male_avg * 100`, or 0 without a male average.
    pub gap_percent: f64,
    pub count_male: usize,
    pub count_female: usize,
}

impl PayGapItem {
    pub fn abs_gap(&self) -> f64 {
        self.gap_percent.abs()
    }
}

/// Share of role groups whose absolute gap is under the compliance threshold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ComplianceScore {
    pub score: f64,
}

/// A role group whose gap meets or exceeds the compliance threshold.
pub type RiskArea = PayGapItem;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_round_trip_names() {
        for gender in [Gender::Male, Gender::Female, Gender::Other, Gender::Unspecified] {
            assert_eq!(Gender::from_normalized(gender.as_str()), Some(gender));
        }
        assert_eq!(Gender::from_normalized("Male"), None);
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new(4, "Invalid gender").with_field("gender");
        assert_eq!(err.to_string(), "Row 4, field 'gender': Invalid gender");
        assert!(!err.is_structural());

        let structural = ParseError::new(7, "Unequal field count");
        assert_eq!(structural.to_string(), "Row 7: Unequal field count");
        assert!(structural.is_structural());
    }

    #[test]
    fn test_parse_error_omits_missing_field() {
        let json = serde_json::to_value(ParseError::new(2, "bad")).unwrap();
        assert!(json.get("field").is_none());
        assert_eq!(json["row"], 2);
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = EmployeeRecord {
            employee_code: "E1".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            gender: Gender::Female,
            department: "R&D".into(),
            role: "Engineer".into(),
            base_pay: 100.0,
            bonus: 5.0,
            currency: "EUR".into(),
            fte: 1.0,
            hire_date: "2020-01-01".into(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["employeeCode"], "E1");
        assert_eq!(json["gender"], "female");
        assert_eq!(json["hireDate"], "2020-01-01");
        assert_eq!(record.total_pay(), 105.0);
        assert_eq!(record.group_key(GroupDimension::Department), "R&D");
    }
}
