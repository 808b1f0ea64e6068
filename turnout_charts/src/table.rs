use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::*;

/// An immutable handle over the loaded voter records.
///
/// Cloning the handle does not copy the records.
#[derive(Debug, Clone)]
pub struct VoterTable {
    records: Arc<Vec<VoterRecord>>,
    columns: BTreeSet<Field>,
}

impl VoterTable {
    /// Wraps records read from a source that provided the given columns.
    pub fn new(records: Vec<VoterRecord>, columns: &[Field]) -> VoterTable {
        let mut cols: BTreeSet<Field> = columns.iter().cloned().collect();
        cols.insert(Field::Year);
        VoterTable {
            records: Arc::new(records),
            columns: cols,
        }
    }

    /// Wraps records, considering every column that has at least one value as present.
    pub fn from_records(records: Vec<VoterRecord>) -> VoterTable {
        let columns: Vec<Field> = Field::ALL
            .iter()
            .filter(|f| records.iter().any(|r| r.value(**f).is_some()))
            .cloned()
            .collect();
        VoterTable::new(records, &columns)
    }

    pub fn records(&self) -> &[VoterRecord] {
        self.records.as_slice()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = Field> + '_ {
        self.columns.iter().cloned()
    }

    pub fn has_column(&self, field: Field) -> bool {
        self.columns.contains(&field)
    }

    /// Fails with a lookup error when the column is not part of this table.
    pub fn require(&self, field: Field) -> Result<(), ChartError> {
        if self.has_column(field) {
            Ok(())
        } else {
            Err(ChartError::MissingColumn { field })
        }
    }

    /// The distinct election years, in increasing order.
    pub fn years(&self) -> Vec<u16> {
        let years: BTreeSet<u16> = self.records.iter().map(|r| r.year).collect();
        years.into_iter().collect()
    }

    /// The records, restricted to one election year if provided.
    pub fn rows(&self, year: Option<u16>) -> impl Iterator<Item = &VoterRecord> + '_ {
        self.records
            .iter()
            .filter(move |r| year.map(|y| r.year == y).unwrap_or(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_is_always_a_column() {
        let t = VoterTable::new(vec![], &[Field::Party]);
        assert!(t.has_column(Field::Year));
        assert!(t.has_column(Field::Party));
        assert_eq!(
            t.require(Field::City),
            Err(ChartError::MissingColumn { field: Field::City })
        );
    }

    #[test]
    fn rows_filter_on_year() {
        let t = VoterTable::from_records(vec![
            VoterRecord::new(2020),
            VoterRecord::new(2012),
            VoterRecord::new(2020),
        ]);
        assert_eq!(t.years(), vec![2012, 2020]);
        assert_eq!(t.rows(Some(2020)).count(), 2);
        assert_eq!(t.rows(None).count(), 3);
        assert_eq!(t.rows(Some(2016)).count(), 0);
    }

    #[test]
    fn from_records_detects_columns() {
        let t = VoterTable::from_records(vec![
            VoterRecord::new(2020).with(Field::Gender, "F"),
            VoterRecord::new(2020),
        ]);
        assert!(t.has_column(Field::Gender));
        assert!(!t.has_column(Field::Race));
    }
}
