//! REST API types for client integration.
//!
//! Gap items are rendered with their dimension-specific key
//! (`roleName` / `departmentName`) so clients can use them directly.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::analytics::AnalyticsReport;
use crate::models::{GroupDimension, ParseError, PayGapItem};

/// Response sent after a CSV upload has been analyzed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    /// Unique job identifier
    pub job_id: String,

    /// "ready" when every row was valid, "warning" otherwise
    pub status: String,

    /// Pay gaps by role, largest first
    pub role_gaps: Vec<Value>,

    /// Pay gaps by department, largest first
    pub department_gaps: Vec<Value>,

    /// Role compliance, `{ "score": .. }`
    pub compliance: Value,

    /// Worst non-compliant roles
    pub risk_areas: Vec<Value>,

    /// Row-level problems for the uploader to fix
    pub errors: Vec<ParseError>,

    pub metadata: ResponseMetadata,
}

/// Metadata about the analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub file_name: Option<String>,
    pub valid_records: usize,
    pub error_count: usize,
    pub generated_at: String,
}

impl AnalyzeResponse {
    pub fn from_report(report: AnalyticsReport, file_name: Option<String>) -> Self {
        let status = if report.errors.is_empty() { "ready" } else { "warning" };

        AnalyzeResponse {
            job_id: Uuid::new_v4().to_string(),
            status: status.to_string(),
            role_gaps: gap_values(GroupDimension::Role, &report.role_gaps),
            department_gaps: gap_values(GroupDimension::Department, &report.department_gaps),
            compliance: json!({ "score": report.compliance.score }),
            risk_areas: gap_values(GroupDimension::Role, &report.risk_areas),
            metadata: ResponseMetadata {
                file_name,
                valid_records: report.records.len(),
                error_count: report.errors.len(),
                generated_at: report.generated_at.to_rfc3339(),
            },
            errors: report.errors,
        }
    }
}

/// Render gap items with the key column for their dimension.
pub fn gap_values(dimension: GroupDimension, items: &[PayGapItem]) -> Vec<Value> {
    items
        .iter()
        .map(|item| {
            json!({
                dimension.key_column(): item.group,
                "maleAvg": item.male_avg,
                "femaleAvg": item.female_avg,
                "gapPercent": item.gap_percent,
                "countMale": item.count_male,
                "countFemale": item.count_female,
            })
        })
        .collect()
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
        "roleGaps": [],
        "departmentGaps": [],
        "riskAreas": [],
        "errors": [],
    })
}
