//! Group employee records by role or department and compute pay gaps.
//!
//! # Architecture
//!
//! ```text
//! Records (flat)                      →  PayGapItem per group
//! ┌───────────────────────────────┐     ┌──────────────────────────────┐
//! │ role: Eng, male,   60 000     │     │ Eng: male 60 000             │
//! │ role: Eng, female, 50 000     │  →  │      female 50 000, gap 16.7%│
//! │ role: Ops, male,   40 000     │     ├──────────────────────────────┤
//! └───────────────────────────────┘     │ Ops: dropped (1 member)      │
//!                                       └──────────────────────────────┘
//! ```
//!
//! Groups are kept in first-seen order before sorting so that equal gaps
//! keep a deterministic order.

use std::collections::HashMap;

use crate::models::{EmployeeRecord, Gender, GroupDimension, PayGapItem};

/// Key used when a record has no value for the grouping field.
pub const UNKNOWN_GROUP: &str = "Unknown";

/// Smallest male + female headcount for a group to be reported.
pub const DEFAULT_MIN_GROUP_SIZE: usize = 2;

/// Pay gaps per role, largest absolute gap first.
pub fn pay_gap_by_role(records: &[EmployeeRecord]) -> Vec<PayGapItem> {
    pay_gap_by(records, GroupDimension::Role, DEFAULT_MIN_GROUP_SIZE)
}

/// Pay gaps per department, largest absolute gap first.
pub fn pay_gap_by_department(records: &[EmployeeRecord]) -> Vec<PayGapItem> {
    pay_gap_by(records, GroupDimension::Department, DEFAULT_MIN_GROUP_SIZE)
}

/// Pay gaps for any dimension.
///
/// Groups with fewer than `min_group_size` male and female members together
/// are left out.
pub fn pay_gap_by(
    records: &[EmployeeRecord],
    dimension: GroupDimension,
    min_group_size: usize,
) -> Vec<PayGapItem> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<GroupBuilder> = Vec::new();

    for record in records {
        let key = match record.group_key(dimension).trim() {
            "" => UNKNOWN_GROUP,
            key => key,
        };
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(GroupBuilder::new(key));
            groups.len() - 1
        });
        groups[slot].add(record);
    }

    let mut items: Vec<PayGapItem> = groups
        .into_iter()
        .filter(|g| g.male.count + g.female.count >= min_group_size)
        .map(GroupBuilder::build)
        .collect();

    sort_by_abs_gap(&mut items);
    items
}

/// Stable sort by descending absolute gap.
pub(crate) fn sort_by_abs_gap(items: &mut [PayGapItem]) {
    items.sort_by(|a, b| b.abs_gap().total_cmp(&a.abs_gap()));
}

/// Gap of the female average relative to the male average, in percent.
pub fn gap_percent(male_avg: f64, female_avg: f64) -> f64 {
    if male_avg == 0.0 || !male_avg.is_finite() {
        return 0.0;
    }
    (male_avg - female_avg) / male_avg * 100.0
}

#[derive(Debug, Default)]
struct PayTotals {
    sum: f64,
    count: usize,
}

impl PayTotals {
    fn add(&mut self, amount: f64) {
        self.sum += amount;
        self.count += 1;
    }

    fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Accumulates one group's totals while scanning.
struct GroupBuilder {
    key: String,
    male: PayTotals,
    female: PayTotals,
    members: usize,
}

impl GroupBuilder {
    fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            male: PayTotals::default(),
            female: PayTotals::default(),
            members: 0,
        }
    }

    fn add(&mut self, record: &EmployeeRecord) {
        self.members += 1;
        match record.gender {
            Gender::Male => self.male.add(record.total_pay()),
            Gender::Female => self.female.add(record.total_pay()),
            Gender::Other | Gender::Unspecified => {}
        }
    }

    fn build(self) -> PayGapItem {
        let male_avg = self.male.average();
        let female_avg = self.female.average();

        PayGapItem {
            group: self.key,
            male_avg,
            female_avg,
            gap_percent: gap_percent(male_avg, female_avg),
            count_male: self.male.count,
            count_female: self.female.count,
        }
    }
}
