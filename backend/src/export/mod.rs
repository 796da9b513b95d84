//! Serialize analytics results into a downloadable CSV document.
//!
//! The document holds three sections separated by a blank line:
//!
//! ```text
//! Compliance Score
//! score
//! 75.00
//!
//! Pay Gap By Role
//! roleName,maleAvg,femaleAvg,gapPercent,countMale,countFemale
//! Engineer,60000.00,50000.00,16.67,1,1
//!
//! Pay Gap By Department
//! departmentName,maleAvg,femaleAvg,gapPercent,countMale,countFemale
//! ...
//! ```
//!
//! Values containing a comma, double quote or newline are quoted by the
//! CSV writer. No I/O happens here.

use crate::error::{ExportError, ExportResult};
use crate::models::{GroupDimension, PayGapItem};

/// File name offered for the download.
pub const EXPORT_FILE_NAME: &str = "pay-gap-analytics.csv";

/// MIME type of the exported document.
pub const EXPORT_MIME_TYPE: &str = "text/csv";

pub const COMPLIANCE_SECTION: &str = "Compliance Score";
pub const ROLE_SECTION: &str = "Pay Gap By Role";
pub const DEPARTMENT_SECTION: &str = "Pay Gap By Department";

const GAP_COLUMNS: [&str; 5] = ["maleAvg", "femaleAvg", "gapPercent", "countMale", "countFemale"];

/// Build the analytics CSV from role gaps, department gaps and a score.
pub fn build_analytics_csv(
    role_gaps: &[PayGapItem],
    department_gaps: &[PayGapItem],
    compliance_score: f64,
) -> ExportResult<String> {
    let sections = [
        compliance_section(compliance_score)?,
        gap_section(ROLE_SECTION, GroupDimension::Role, role_gaps)?,
        gap_section(DEPARTMENT_SECTION, GroupDimension::Department, department_gaps)?,
    ];

    Ok(sections.join("\n"))
}

fn compliance_section(score: f64) -> ExportResult<String> {
    write_section(|writer| {
        writer.write_record([COMPLIANCE_SECTION])?;
        writer.write_record(["score"])?;
        writer.write_record([format_number(score)])?;
        Ok(())
    })
}

fn gap_section(title: &str, dimension: GroupDimension, items: &[PayGapItem]) -> ExportResult<String> {
    write_section(|writer| {
        writer.write_record([title])?;

        let mut header = vec![dimension.key_column()];
        header.extend(GAP_COLUMNS);
        writer.write_record(&header)?;

        for item in items {
            writer.write_record([
                item.group.clone(),
                format_number(item.male_avg),
                format_number(item.female_avg),
                format_number(item.gap_percent),
                item.count_male.to_string(),
                item.count_female.to_string(),
            ])?;
        }
        Ok(())
    })
}

fn write_section<F>(body: F) -> ExportResult<String>
where
    F: FnOnce(&mut csv::Writer<Vec<u8>>) -> Result<(), csv::Error>,
{
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    body(&mut writer)?;

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

fn format_number(value: f64) -> String {
    format!("{:.2}", value)
}
