//! # Paygap - employee compensation validation and gender pay-gap analytics
//!
//! Paygap reads compensation CSV files, validates every row into a strict
//! employee record, and computes pay gaps by role and department, a
//! compliance score and the highest-risk roles.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌───────────┐   ┌────────────┐   ┌────────────┐   ┌───────────┐
//! │ CSV text  │──▶│  Parser   │──▶│ Aggregator │──▶│ Compliance │──▶│ Exporter  │
//! │ (upload)  │   │+Validator │   │ role/dept  │   │ score+risk │   │ CSV text  │
//! └───────────┘   └───────────┘   └────────────┘   └────────────┘   └───────────┘
//!                  records + errors
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use paygap::{analyze_text, AnalysisOptions};
//!
//! let report = analyze_text(&csv, &AnalysisOptions::default());
//! println!("Compliance: {:.2}%", report.compliance.score);
//! let download = report.to_csv()?;
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types for I/O and export failures
//! - [`models`] - Domain models (EmployeeRecord, ParseError, PayGapItem)
//! - [`validation`] - Per-field validation of raw rows
//! - [`parser`] - CSV parsing with encoding auto-detection
//! - [`analytics`] - Aggregation, compliance and pipeline
//! - [`export`] - Analytics CSV export
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Ingestion
pub mod parser;
pub mod validation;

// Analytics
pub mod analytics;
pub mod export;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    CsvError, CsvResult, ExportError, ExportResult, PipelineError, PipelineResult, ServerError,
    ServerResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    ComplianceScore, EmployeeRecord, Gender, GroupDimension, ParseError, ParseOutcome, PayGapItem,
    RiskArea,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{validate_row, FieldViolation, RawRow, RECOGNIZED_FIELDS};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_content, detect_encoding, parse_bytes_auto, parse_employees, parse_employees_with,
    parse_file_auto, ParseOptions, ParseResult,
};

// =============================================================================
// Re-exports - Analytics
// =============================================================================

pub use analytics::{
    analyze_bytes, analyze_file, analyze_outcome, analyze_text, compliance_score, pay_gap_by,
    pay_gap_by_department, pay_gap_by_role, risk_areas, AnalysisOptions, AnalyticsReport,
};

// =============================================================================
// Re-exports - Export
// =============================================================================

pub use export::{build_analytics_csv, EXPORT_FILE_NAME, EXPORT_MIME_TYPE};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, AnalyzeResponse, ResponseMetadata};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server};
}
