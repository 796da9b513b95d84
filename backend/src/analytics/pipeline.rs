//! High-level pipeline API: CSV in, analytics report out.
//!
//! Combines all steps: parsing, aggregation by role and department,
//! compliance scoring and risk ranking.
//!
//! # Example
//!
//! ```rust,ignore
//! use paygap::analytics::{analyze_file, AnalysisOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let report = analyze_file("employees.csv", &AnalysisOptions::default())?;
//!     println!("Compliance: {:.2}%", report.compliance.score);
//!     Ok(())
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::aggregator::{pay_gap_by, DEFAULT_MIN_GROUP_SIZE};
use super::compliance::{
    compliance_score_with, risk_areas_with, DEFAULT_GAP_THRESHOLD, DEFAULT_MAX_RISK_AREAS,
};
use crate::api::logs::{log_info, log_success, log_warning};
use crate::error::{ExportResult, PipelineResult};
use crate::export::build_analytics_csv;
use crate::models::{
    ComplianceScore, EmployeeRecord, GroupDimension, ParseError, ParseOutcome, PayGapItem, RiskArea,
};
use crate::parser::{parse_bytes_auto, parse_employees_with, parse_file_auto, ParseOptions, ParseResult};

/// Thresholds and limits for one analysis run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisOptions {
    /// Absolute gap percent at which a role becomes a risk
    pub gap_threshold: f64,

    /// Maximum number of risk areas reported
    pub max_risk_areas: usize,

    /// Minimum male + female headcount for a group to be reported
    pub min_group_size: usize,

    /// Field errors kept per CSV row
    pub max_errors_per_row: usize,

    /// Structural CSV errors kept per file
    pub max_structural_errors: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        let parse = ParseOptions::default();
        Self {
            gap_threshold: DEFAULT_GAP_THRESHOLD,
            max_risk_areas: DEFAULT_MAX_RISK_AREAS,
            min_group_size: DEFAULT_MIN_GROUP_SIZE,
            max_errors_per_row: parse.max_errors_per_row,
            max_structural_errors: parse.max_structural_errors,
        }
    }
}

impl AnalysisOptions {
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            max_errors_per_row: self.max_errors_per_row,
            max_structural_errors: self.max_structural_errors,
        }
    }
}

/// Everything derived from one uploaded file
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    /// Valid records
    pub records: Vec<EmployeeRecord>,

    /// Row and structural errors
    pub errors: Vec<ParseError>,

    /// Pay gaps by role, largest first
    pub role_gaps: Vec<PayGapItem>,

    /// Pay gaps by department, largest first
    pub department_gaps: Vec<PayGapItem>,

    /// Compliance over role gaps
    pub compliance: ComplianceScore,

    /// Worst non-compliant roles
    pub risk_areas: Vec<RiskArea>,

    pub generated_at: DateTime<Utc>,
}

impl AnalyticsReport {
    /// Render the report as the downloadable analytics CSV.
    pub fn to_csv(&self) -> ExportResult<String> {
        build_analytics_csv(&self.role_gaps, &self.department_gaps, self.compliance.score)
    }
}

/// Analyze already-validated records.
pub fn analyze_outcome(outcome: ParseOutcome, options: &AnalysisOptions) -> AnalyticsReport {
    let ParseOutcome { records, errors } = outcome;

    let role_gaps = pay_gap_by(&records, GroupDimension::Role, options.min_group_size);
    let department_gaps = pay_gap_by(&records, GroupDimension::Department, options.min_group_size);
    let compliance = compliance_score_with(&role_gaps, options.gap_threshold);
    let risk_areas = risk_areas_with(&role_gaps, options.gap_threshold, options.max_risk_areas);

    AnalyticsReport {
        records,
        errors,
        role_gaps,
        department_gaps,
        compliance,
        risk_areas,
        generated_at: Utc::now(),
    }
}

/// Analyze CSV text.
pub fn analyze_text(text: &str, options: &AnalysisOptions) -> AnalyticsReport {
    let outcome = parse_employees_with(text, &options.parse_options());
    let report = analyze_outcome(outcome, options);
    log_report(&report);
    report
}

/// Analyze CSV bytes with encoding auto-detection.
pub fn analyze_bytes(bytes: &[u8], options: &AnalysisOptions) -> AnalyticsReport {
    let parsed = parse_bytes_auto(bytes, &options.parse_options());
    log_parse(&parsed);
    let report = analyze_outcome(parsed.outcome, options);
    log_report(&report);
    report
}

/// Analyze a CSV file with encoding auto-detection.
pub fn analyze_file<P: AsRef<Path>>(path: P, options: &AnalysisOptions) -> PipelineResult<AnalyticsReport> {
    log_info(format!("📖 Reading {}", path.as_ref().display()));
    let parsed = parse_file_auto(path, &options.parse_options())?;
    log_parse(&parsed);
    let report = analyze_outcome(parsed.outcome, options);
    log_report(&report);
    Ok(report)
}

fn log_parse(parsed: &ParseResult) {
    log_success(format!("Detected encoding: {}", parsed.encoding));
    log_info(format!("📋 CSV has {} columns: {}", parsed.headers.len(), parsed.headers.join(", ")));
}

fn log_report(report: &AnalyticsReport) {
    log_success(format!("{} valid records", report.records.len()));
    if !report.errors.is_empty() {
        log_warning(format!("{} row errors", report.errors.len()));
    }
    log_info(format!(
        "📊 {} role groups, {} department groups",
        report.role_gaps.len(),
        report.department_gaps.len()
    ));
    log_success(format!("Compliance score: {:.2}%", report.compliance.score));
    if !report.risk_areas.is_empty() {
        log_warning(format!("{} risk areas", report.risk_areas.len()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
employeeCode,firstName,lastName,gender,department,role,basePay,bonus,currency,fte,hireDate
E1,Alan,Turing,male,R&D,Engineer,60000,0,EUR,1,2019-01-01
E2,Ada,Lovelace,female,R&D,Engineer,50000,0,EUR,1,2020-01-01
E3,Bob,Smith,male,Sales,Rep,40000,2000,EUR,1,2018-06-01
E4,Eve,Jones,female,Sales,Rep,41000,1000,EUR,1,2021-02-01
E5,Max,Solo,male,Sales,Manager,90000,0,EUR,1,2015-01-01
E6,Bad,Row,robot,Sales,Rep,1,0,EUR,1,2021-02-01
";

    #[test]
    fn test_default_options() {
        let opts = AnalysisOptions::default();
        assert_eq!(opts.gap_threshold, 5.0);
        assert_eq!(opts.max_risk_areas, 5);
        assert_eq!(opts.min_group_size, 2);
        assert_eq!(opts.max_errors_per_row, 3);
        assert_eq!(opts.max_structural_errors, 10);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let opts: AnalysisOptions = serde_json::from_str(r#"{"gapThreshold": 2.5}"#).unwrap();
        assert_eq!(opts.gap_threshold, 2.5);
        assert_eq!(opts.max_risk_areas, 5);
    }

    #[test]
    fn test_analyze_text() {
        let report = analyze_text(SAMPLE, &AnalysisOptions::default());

        assert_eq!(report.records.len(), 5);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].row, 7);

        let roles: Vec<_> = report.role_gaps.iter().map(|g| g.group.as_str()).collect();
        assert_eq!(roles, vec!["Engineer", "Rep"]);
        assert_eq!(report.compliance.score, 50.0);
        assert_eq!(report.risk_areas.len(), 1);
        assert_eq!(report.risk_areas[0].group, "Engineer");

        // Sales: male (40000+2000, 90000+0) avg 66000, female 42000
        let sales = report.department_gaps.iter().find(|g| g.group == "Sales").unwrap();
        assert_eq!(sales.count_male, 2);
        assert_eq!(sales.male_avg, 66000.0);
    }

    #[test]
    fn test_report_to_csv() {
        let report = analyze_text(SAMPLE, &AnalysisOptions::default());
        let csv = report.to_csv().unwrap();

        assert!(csv.starts_with("Compliance Score\nscore\n50.00\n"));
        assert!(csv.contains("Engineer,60000.00,50000.00,16.67,1,1"));
    }

    #[test]
    fn test_custom_threshold() {
        let options = AnalysisOptions {
            gap_threshold: 20.0,
            ..AnalysisOptions::default()
        };
        let report = analyze_text(SAMPLE, &options);
        assert_eq!(report.compliance.score, 100.0);
        assert!(report.risk_areas.is_empty());
    }
}
