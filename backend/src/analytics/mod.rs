//! Analytics module.
//!
//! This module turns validated records into pay-gap statistics:
//! - Aggregator: gender-segmented averages per role or department
//! - Compliance: score and risk ranking over role gaps
//! - Pipeline: parse + aggregate + score in one call

pub mod aggregator;
pub mod compliance;
pub mod pipeline;

pub use aggregator::{pay_gap_by, pay_gap_by_department, pay_gap_by_role};
pub use compliance::{compliance_score, compliance_score_with, risk_areas, risk_areas_with};
pub use pipeline::*;
