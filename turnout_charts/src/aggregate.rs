use log::debug;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::categories::CategoryMetadata;
use crate::config::*;
use crate::table::VoterTable;

/// The count of one group, and its share of the primary group when requested.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct GroupCount {
    pub primary: String,
    pub secondary: Option<String>,
    pub count: u64,
    pub percent: Option<f64>,
}

/// Counts per value (or pair of values), ordered by the configured category orders.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct AggregationResult {
    pub primary: Field,
    pub secondary: Option<Field>,
    pub rows: Vec<GroupCount>,
}

impl AggregationResult {
    pub fn total(&self) -> u64 {
        self.rows.iter().map(|r| r.count).sum()
    }

    /// The primary values, in display order and without duplicates.
    pub fn primary_values(&self) -> Vec<String> {
        let mut res: Vec<String> = Vec::new();
        for r in self.rows.iter() {
            if !res.contains(&r.primary) {
                res.push(r.primary.clone());
            }
        }
        res
    }

    /// The secondary values in display order.
    pub fn secondary_values(&self, meta: &CategoryMetadata) -> Vec<String> {
        let mut res: Vec<String> = self
            .rows
            .iter()
            .filter_map(|r| r.secondary.clone())
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect();
        if let Some(f) = self.secondary {
            meta.sort_values(f, &mut res);
        }
        res
    }

    pub fn get(&self, primary: &str, secondary: Option<&str>) -> Option<&GroupCount> {
        self.rows
            .iter()
            .find(|r| r.primary == primary && r.secondary.as_deref() == secondary)
    }
}

/// Rounds to 2 decimal places.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Counts the rows per distinct value of `field`, optionally restricted to one year.
///
/// ```
/// use turnout_charts::*;
///
/// let table = VoterTable::from_records(vec![
///     VoterRecord::new(2020).with(Field::Party, "Rep"),
///     VoterRecord::new(2020).with(Field::Party, "Dem"),
///     VoterRecord::new(2020).with(Field::Party, "Rep"),
///     VoterRecord::new(2016).with(Field::Party, "Rep"),
/// ]);
/// let agg = count_single(&table, Some(2020), Field::Party)?;
/// assert_eq!(agg.primary_values(), vec!["Dem", "Rep"]);
/// assert_eq!(agg.total(), 3);
/// # Ok::<(), ChartError>(())
/// ```
pub fn count_single(
    table: &VoterTable,
    year: Option<u16>,
    field: Field,
) -> Result<AggregationResult, ChartError> {
    table.require(field)?;
    let mut counts: HashMap<String, u64> = HashMap::new();
    for r in table.rows(year) {
        if let Some(v) = r.value(field) {
            *counts.entry(v.into_owned()).or_insert(0) += 1;
        }
    }
    let meta = CategoryMetadata::resolve(&[field]);
    let mut keys: Vec<String> = counts.keys().cloned().collect();
    meta.sort_values(field, &mut keys);
    let rows: Vec<GroupCount> = keys
        .into_iter()
        .map(|k| GroupCount {
            count: counts.get(&k).cloned().unwrap_or(0),
            primary: k,
            secondary: None,
            percent: None,
        })
        .collect();
    debug!(
        "count_single: field: {} year: {:?} groups: {}",
        field,
        year,
        rows.len()
    );
    Ok(AggregationResult {
        primary: field,
        secondary: None,
        rows,
    })
}

/// Counts the rows per (primary, secondary) pair.
///
/// When `with_percent` is set, each row also carries
/// `100 * count / (rows sharing the primary value)`, rounded to 2 decimals.
/// Rows missing either value are not counted.
pub fn count_pair(
    table: &VoterTable,
    year: Option<u16>,
    primary: Field,
    secondary: Field,
    with_percent: bool,
) -> Result<AggregationResult, ChartError> {
    table.require(primary)?;
    table.require(secondary)?;
    let mut counts: HashMap<(String, String), u64> = HashMap::new();
    let mut primary_totals: HashMap<String, u64> = HashMap::new();
    for r in table.rows(year) {
        if let (Some(p), Some(s)) = (r.value(primary), r.value(secondary)) {
            let p = p.into_owned();
            *primary_totals.entry(p.clone()).or_insert(0) += 1;
            *counts.entry((p, s.into_owned())).or_insert(0) += 1;
        }
    }

    let meta = CategoryMetadata::resolve(&[primary, secondary]);
    let mut primaries: Vec<String> = primary_totals.keys().cloned().collect();
    meta.sort_values(primary, &mut primaries);
    let mut secondaries: Vec<String> = counts
        .keys()
        .map(|(_, s)| s.clone())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect();
    meta.sort_values(secondary, &mut secondaries);

    let mut rows: Vec<GroupCount> = Vec::new();
    for p in primaries.iter() {
        let total = primary_totals.get(p).cloned().unwrap_or(0);
        for s in secondaries.iter() {
            if let Some(count) = counts.get(&(p.clone(), s.clone())) {
                let percent = if with_percent && total > 0 {
                    Some(round2(100.0 * (*count as f64) / (total as f64)))
                } else {
                    None
                };
                rows.push(GroupCount {
                    primary: p.clone(),
                    secondary: Some(s.clone()),
                    count: *count,
                    percent,
                });
            }
        }
    }
    debug!(
        "count_pair: {} x {} year: {:?} groups: {}",
        primary,
        secondary,
        year,
        rows.len()
    );
    Ok(AggregationResult {
        primary,
        secondary: Some(secondary),
        rows,
    })
}
