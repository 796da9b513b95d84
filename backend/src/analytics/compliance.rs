//! Compliance score and risk ranking over role-level pay gaps.
//!
//! Both functions take the role output of the aggregator; department gaps
//! are informational only and never feed the score.

use super::aggregator::sort_by_abs_gap;
use crate::models::{ComplianceScore, PayGapItem, RiskArea};

/// Absolute gap (in percent) at which a role stops being compliant.
pub const DEFAULT_GAP_THRESHOLD: f64 = 5.0;

/// Maximum number of risk areas returned.
pub const DEFAULT_MAX_RISK_AREAS: usize = 5;

pub fn compliance_score(role_gaps: &[PayGapItem]) -> ComplianceScore {
    compliance_score_with(role_gaps, DEFAULT_GAP_THRESHOLD)
}

/// Percentage of roles whose absolute gap is strictly below `threshold`.
///
/// An empty list scores 0.
pub fn compliance_score_with(role_gaps: &[PayGapItem], threshold: f64) -> ComplianceScore {
    if role_gaps.is_empty() {
        return ComplianceScore { score: 0.0 };
    }

    let compliant = role_gaps
        .iter()
        .filter(|item| item.abs_gap() < threshold)
        .count();

    ComplianceScore {
        score: compliant as f64 / role_gaps.len() as f64 * 100.0,
    }
}

pub fn risk_areas(role_gaps: &[PayGapItem]) -> Vec<RiskArea> {
    risk_areas_with(role_gaps, DEFAULT_GAP_THRESHOLD, DEFAULT_MAX_RISK_AREAS)
}

/// Roles at or above `threshold`, worst first, at most `limit` entries.
pub fn risk_areas_with(role_gaps: &[PayGapItem], threshold: f64, limit: usize) -> Vec<RiskArea> {
    let mut risks: Vec<RiskArea> = role_gaps
        .iter()
        .filter(|item| item.abs_gap() >= threshold)
        .cloned()
        .collect();

    sort_by_abs_gap(&mut risks);
    risks.truncate(limit);
    risks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(group: &str, gap_percent: f64) -> PayGapItem {
        PayGapItem {
            group: group.into(),
            male_avg: 100.0,
            female_avg: 100.0 - gap_percent,
            gap_percent,
            count_male: 1,
            count_female: 1,
        }
    }

    #[test]
    fn test_empty_score_is_zero() {
        assert_eq!(compliance_score(&[]).score, 0.0);
    }

    #[test]
    fn test_all_compliant_scores_hundred() {
        let gaps = vec![item("A", 4.99), item("B", -3.0), item("C", 0.0)];
        assert_eq!(compliance_score(&gaps).score, 100.0);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let gaps = vec![item("A", 5.0), item("B", 1.0), item("C", -5.0), item("D", 2.0)];
        assert_eq!(compliance_score(&gaps).score, 50.0);
    }

    #[test]
    fn test_risk_areas_filtered_sorted_and_capped() {
        let gaps = vec![
            item("A", 6.0),
            item("B", -30.0),
            item("C", 1.0),
            item("D", 12.0),
            item("E", 5.0),
            item("F", -8.0),
            item("G", 20.0),
            item("H", 7.0),
        ];

        let risks = risk_areas(&gaps);
        let groups: Vec<_> = risks.iter().map(|r| r.group.as_str()).collect();
        assert_eq!(groups, vec!["B", "G", "D", "F", "H"]);
        assert!(risks
            .windows(2)
            .all(|pair| pair[0].abs_gap() >= pair[1].abs_gap()));
    }

    #[test]
    fn test_no_risk_when_compliant() {
        assert!(risk_areas(&[item("A", 4.0)]).is_empty());
    }

    #[test]
    fn test_custom_threshold_and_limit() {
        let gaps = vec![item("A", 3.0), item("B", 9.0), item("C", 4.0)];
        assert!((compliance_score_with(&gaps, 3.5).score - 100.0 / 3.0).abs() < 1e-9);

        let risks = risk_areas_with(&gaps, 3.0, 2);
        let groups: Vec<_> = risks.iter().map(|r| r.group.as_str()).collect();
        assert_eq!(groups, vec!["B", "C"]);
    }
}
