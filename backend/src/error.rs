//! Error types for the pay-gap analytics pipeline.
//!
//! Malformed *data* never surfaces here: bad rows are reported as
//! [`crate::models::ParseError`] values next to the valid records. These
//! types cover failures of the surrounding machinery:
//!
//! - [`CsvError`] - Reading an input file
//! - [`ExportError`] - Writing the analytics CSV
//! - [`PipelineError`] - Top-level orchestration errors
//! - [`ServerError`] - HTTP layer errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// CSV Input Errors
// =============================================================================

/// Errors while reading a CSV source.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while serializing analytics to CSV.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV writer failure.
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// Writer buffer could not be recovered.
    #[error("CSV buffer error: {0}")]
    Buffer(String),

    /// Output was not valid UTF-8.
    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// Returned by the file-based entry points in [`crate::analytics::pipeline`]
/// and by the CLI commands, which also write JSON and CSV output.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV input error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Export error.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Failed to bind or serve.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV input operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // CsvError -> PipelineError
        let csv_err = CsvError::EmptyFile;
        let pipeline_err: PipelineError = csv_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        // ExportError -> PipelineError
        let export_err = ExportError::Buffer("flush failed".into());
        let pipeline_err: PipelineError = export_err.into();
        assert!(matches!(pipeline_err, PipelineError::Export(_)));
        assert!(pipeline_err.to_string().starts_with("Export error"));
    }

    #[test]
    fn test_output_errors_propagate_with_question_mark() {
        fn write_json(path: &std::path::Path) -> PipelineResult<()> {
            let value: serde_json::Value = serde_json::from_str("{not json")?;
            std::fs::write(path, value.to_string())?;
            Ok(())
        }

        let dir = tempfile::tempdir().unwrap();
        let err = write_json(&dir.path().join("out.json")).unwrap_err();
        assert!(matches!(err, PipelineError::Json(_)));

        let err: PipelineError =
            std::fs::write(dir.path().join("missing").join("out.json"), "x")
                .unwrap_err()
                .into();
        assert!(matches!(err, PipelineError::Io(_)));
        assert!(err.to_string().starts_with("IO error"));
    }

    #[test]
    fn test_bad_request_format() {
        let err = ServerError::BadRequest("No file provided".into());
        assert_eq!(err.to_string(), "Invalid request: No file provided");
    }
}
