// Mapping of the columns of a voter file to the voter records.

use crate::dashboard::*;
use snafu::ensure;
use turnout_charts::derive::{normalize_codes, Derivation, RawAttributes, RAW_COLUMNS};

const REGISTRATION_DATE: &str = "registr_dt";

#[derive(Eq, PartialEq, Debug, Clone)]
enum Column {
    Field(Field),
    Raw(String),
    RegistrationDate,
    Ignored,
}

/// The interpretation of each column of a file, built from its header row.
#[derive(Debug, Clone)]
pub struct HeaderMap {
    path: String,
    columns: Vec<Column>,
    derivation: Derivation,
}

impl HeaderMap {
    pub fn new<S: AsRef<str>>(path: &str, header: &[S]) -> DashResult<HeaderMap> {
        let names: Vec<&str> = header.iter().map(|h| h.as_ref().trim()).collect();
        if !names.contains(&Field::Year.column_name()) {
            return MissingColumnSnafu {
                path,
                column: Field::Year.column_name(),
            }
            .fail();
        }
        let columns: Vec<Column> = names
            .iter()
            .map(|name| {
                if let Ok(f) = name.parse::<Field>() {
                    Column::Field(f)
                } else if RAW_COLUMNS.contains(name) {
                    Column::Raw(name.to_string())
                } else if *name == REGISTRATION_DATE {
                    Column::RegistrationDate
                } else {
                    Column::Ignored
                }
            })
            .collect();
        let ignored: Vec<&&str> = names
            .iter()
            .zip(columns.iter())
            .filter(|(_, c)| **c == Column::Ignored)
            .map(|(n, _)| n)
            .collect();
        if !ignored.is_empty() {
            debug!("HeaderMap::new: {}: ignoring columns {:?}", path, ignored);
        }
        Ok(HeaderMap {
            path: path.to_string(),
            derivation: Derivation::plan(&names),
            columns,
        })
    }

    /// The fields present in the file, directly or derived from raw columns.
    pub fn fields(&self) -> Vec<Field> {
        let mut res: Vec<Field> = self
            .columns
            .iter()
            .filter_map(|c| match c {
                Column::Field(f) => Some(*f),
                _ => None,
            })
            .collect();
        res.extend(self.derivation.fields().iter().cloned());
        res
    }

    /// Builds the record of one row. `lineno` is the line in the file, starting at 1.
    pub fn read_row<I, S>(&self, cells: I, lineno: usize) -> DashResult<VoterRecord>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let cells: Vec<S> = cells.into_iter().collect();
        ensure!(
            cells.len() >= self.columns.len(),
            TruncatedRowSnafu {
                path: self.path.as_str(),
                lineno,
                found: cells.len(),
                expected: self.columns.len(),
            }
        );
        let mut record = VoterRecord::default();
        let mut raw = RawAttributes::default();
        for (column, cell) in self.columns.iter().zip(cells.iter()) {
            let cell: &str = cell.as_ref();
            match column {
                Column::Field(f) => {
                    record.set(*f, cell).context(MalformedCellSnafu {
                        path: self.path.as_str(),
                        lineno,
                    })?;
                }
                Column::Raw(name) => {
                    raw.set(name, cell).context(MalformedCellSnafu {
                        path: self.path.as_str(),
                        lineno,
                    })?;
                }
                Column::RegistrationDate if !cell.trim().is_empty() => {
                    let d = parse_registration_date(cell).context(MalformedCellSnafu {
                        path: self.path.as_str(),
                        lineno,
                    })?;
                    record.registration_date = Some(d);
                }
                Column::RegistrationDate | Column::Ignored => {}
            }
        }
        self.derivation.apply(&raw, &mut record);
        normalize_codes(&mut record);
        Ok(record)
    }
}

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn header_requires_year() {
        let res = HeaderMap::new("f.csv", &["party_grp", "gender_code"]);
        assert!(matches!(res, Err(DashError::MissingColumn { .. })));
    }

    #[test]
    fn rows_fill_known_and_derived_columns() {
        let h = HeaderMap::new(
            "f.csv",
            &["year", "party_cd", "registr_dt", "vote_bin", "ncid"],
        )
        .unwrap();
        assert_eq!(h.fields(), vec![Field::Year, Field::Voted, Field::Party]);
        let r = h
            .read_row(vec!["2016", "DEM", "2001-05-09", "Y", "AB123"], 2)
            .unwrap();
        assert_eq!(r.year, 2016);
        assert_eq!(r.party_grp.as_deref(), Some("Dem"));
        assert_eq!(r.vote_bin.as_deref(), Some("Y"));
        assert_eq!(r.registration_date.map(|d| d.year()), Some(2001));
    }

    #[test]
    fn malformed_year_is_reported_with_its_line() {
        let h = HeaderMap::new("f.csv", &["year"]).unwrap();
        match h.read_row(vec!["twenty"], 7) {
            Err(DashError::MalformedCell { lineno, path, .. }) => {
                assert_eq!(lineno, 7);
                assert_eq!(path, "f.csv");
            }
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn short_row_is_rejected() {
        let h = HeaderMap::new("f.csv", &["party_grp", "year"]).unwrap();
        match h.read_row(vec!["Dem"], 4) {
            Err(DashError::TruncatedRow {
                lineno,
                found,
                expected,
                ..
            }) => {
                assert_eq!(lineno, 4);
                assert_eq!(found, 1);
                assert_eq!(expected, 2);
            }
            x => panic!("unexpected result {:?}", x),
        }
        // Extra trailing cells are fine.
        let r = h.read_row(vec!["Rep", "2020", ""], 5).unwrap();
        assert_eq!(r.year, 2020);
    }

    #[test]
    fn impossible_registration_date_is_malformed() {
        let h = HeaderMap::new("f.csv", &["year", "registr_dt"]).unwrap();
        assert!(matches!(
            h.read_row(vec!["2020", "2021-02-31"], 2),
            Err(DashError::MalformedCell { lineno: 2, .. })
        ));
    }

    #[test]
    fn file_names() {
        assert_eq!(simplify_file_name("/a/b/votes.csv.gz"), "votes.csv.gz");
    }
}
