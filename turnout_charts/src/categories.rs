use log::debug;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::config::*;
use crate::table::VoterTable;

/// The static styling of one categorical field.
///
/// `values` lists the categories in display order along with their colors.
#[derive(Debug, Clone, Copy)]
pub struct CategoryStyle {
    pub field: Field,
    pub label: &'static str,
    pub values: &'static [(&'static str, &'static str)],
}

/// Color of the bars of continuous fields, which are not split by value.
pub const CONTINUOUS_COLOR: &str = "dodgerblue";

/// Number of bins for histograms of continuous fields.
pub const CONTINUOUS_BINS: u32 = 50;

const CATEGORY_TABLE: &[CategoryStyle] = &[
    CategoryStyle {
        field: Field::VoteMethod4,
        label: "Voting Method",
        values: &[
            ("Early", "navy"),
            ("No Vote", "goldenrod"),
            ("Election Day", "teal"),
            ("Other", "aqua"),
        ],
    },
    CategoryStyle {
        field: Field::VoteMethod5,
        label: "Voting Method",
        values: &[
            ("Early", "navy"),
            ("No Vote", "goldenrod"),
            ("Election Day", "teal"),
            ("Mail", "blue"),
            ("Other", "aqua"),
        ],
    },
    CategoryStyle {
        field: Field::Voted,
        label: "Voted (Y/N)",
        values: &[("Y", "blue"), ("N", "goldenrod")],
    },
    CategoryStyle {
        field: Field::PrimaryVoted,
        label: "Voted in Primary",
        values: &[("Y", "blue"), ("N", "goldenrod")],
    },
    CategoryStyle {
        field: Field::Generation,
        label: "Generation",
        values: &[
            ("GenZ", "coral"),
            ("Millennial", "gold"),
            ("GenX", "mediumspringgreen"),
            ("Boomer", "dodgerblue"),
            ("Greatest-Silent", "orchid"),
        ],
    },
    CategoryStyle {
        field: Field::Party,
        label: "Party",
        values: &[("Dem", "blue"), ("Rep", "red"), ("Other", "gold")],
    },
    CategoryStyle {
        field: Field::Gender,
        label: "Gender",
        values: &[("F", "deeppink"), ("M", "deepskyblue"), ("U", "lawngreen")],
    },
    CategoryStyle {
        field: Field::Race,
        label: "Race",
        values: &[
            ("White", "forestgreen"),
            ("Black", "firebrick"),
            ("Undesig.", "mediumslateblue"),
            ("Other", "fuchsia"),
        ],
    },
    CategoryStyle {
        field: Field::BirthRegion,
        label: "Birth Region",
        values: &[
            ("South", "#AB63FA"),
            ("Missing", "#FFA15A"),
            ("Northeast", "#19D3F3"),
            ("Midwest", "#FF6692"),
            ("Other", "#B6E880"),
            ("West", "#FF97FF"),
        ],
    },
    CategoryStyle {
        field: Field::DriversLicense,
        label: "Drivers License",
        values: &[("Y", "green"), ("N", "crimson")],
    },
    CategoryStyle {
        field: Field::City,
        label: "City",
        values: &[
            ("Monroe", "#FD3216"),
            ("Waxhaw", "#00FE35"),
            ("Indian Trail", "#6A76FC"),
            ("Matthews", "#0DF9FF"),
            ("Other", "#F6F926"),
        ],
    },
    CategoryStyle {
        field: Field::RegistrationStatus,
        label: "Registration Status",
        values: &[
            ("Active", "seagreen"),
            ("Inactive", "slategray"),
            ("Temp", "darkorange"),
        ],
    },
    CategoryStyle {
        field: Field::Year,
        label: "Election Year",
        values: &[
            ("2012", "darkviolet"),
            ("2016", "limegreen"),
            ("2020", "orangered"),
        ],
    },
    // Age is labelled but never colored by value.
    CategoryStyle {
        field: Field::Age,
        label: "Age",
        values: &[],
    },
];

pub fn category_style(field: Field) -> Option<&'static CategoryStyle> {
    CATEGORY_TABLE.iter().find(|s| s.field == field)
}

/// The field actually used when `field` drives the color of a chart or the slices of a pie.
///
/// The continuous age is replaced by its generation group. Categorical fields are
/// returned unchanged, so applying this twice gives the same result as applying it once.
pub fn color_field(field: Field) -> Field {
    match field {
        Field::Age => Field::Generation,
        f => f,
    }
}

/// Labels, colors and orders resolved for the fields of one chart.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize)]
pub struct CategoryMetadata {
    pub labels: BTreeMap<Field, String>,
    pub colors: BTreeMap<Field, BTreeMap<String, String>>,
    pub orders: BTreeMap<Field, Vec<String>>,
}

impl CategoryMetadata {
    /// Resolves the metadata of all the given fields. Fields without configuration are left out.
    pub fn resolve(fields: &[Field]) -> CategoryMetadata {
        let mut res = CategoryMetadata::default();
        for f in fields {
            if let Some(style) = category_style(*f) {
                res.labels.insert(*f, style.label.to_string());
                if !style.values.is_empty() {
                    res.colors.insert(
                        *f,
                        style.values
                            .iter()
                            .map(|(v, c)| (v.to_string(), c.to_string()))
                            .collect(),
                    );
                    res.orders.insert(
                        *f,
                        style.values.iter().map(|(v, _)| v.to_string()).collect(),
                    );
                }
            } else {
                debug!("CategoryMetadata::resolve: no configuration for {}", f);
            }
        }
        res
    }

    pub fn label(&self, field: Field) -> Result<&str, ChartError> {
        self.labels
            .get(&field)
            .map(|s| s.as_str())
            .ok_or(ChartError::MissingLabel { field })
    }

    pub fn color(&self, field: Field, value: &str) -> Option<&str> {
        self.colors
            .get(&field)
            .and_then(|m| m.get(value))
            .map(|s| s.as_str())
    }

    pub fn order(&self, field: Field) -> &[String] {
        self.orders
            .get(&field)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Sorts values by the configured order. Values outside of the configuration
    /// come last, numerically when both parse as numbers.
    pub fn sort_values(&self, field: Field, values: &mut [String]) {
        let positions: HashMap<&str, usize> = self
            .order(field)
            .iter()
            .enumerate()
            .map(|(idx, v)| (v.as_str(), idx))
            .collect();
        values.sort_by(|a, b| {
            match (positions.get(a.as_str()), positions.get(b.as_str())) {
                (Some(x), Some(y)) => x.cmp(y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => compare_unconfigured(a, b),
            }
        });
    }
}

fn compare_unconfigured(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

/// A category value found in the data that has no configured color.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct UnstyledCategory {
    pub field: Field,
    pub value: String,
    pub count: u64,
}

/// Lists the values of the given fields that would be drawn without an assigned color.
///
/// Continuous fields and fields without any color configuration are not checked.
pub fn check_completeness(table: &VoterTable, fields: &[Field]) -> Vec<UnstyledCategory> {
    let meta = CategoryMetadata::resolve(fields);
    let mut res: Vec<UnstyledCategory> = Vec::new();
    for field in fields {
        if field.is_continuous() || !meta.colors.contains_key(field) || !table.has_column(*field)
        {
            continue;
        }
        let mut missing: BTreeMap<String, u64> = BTreeMap::new();
        for r in table.records() {
            if let Some(v) = r.value(*field) {
                if meta.color(*field, &v).is_none() {
                    *missing.entry(v.into_owned()).or_insert(0) += 1;
                }
            }
        }
        for (value, count) in missing {
            res.push(UnstyledCategory {
                field: *field,
                value,
                count,
            });
        }
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_has_a_label() {
        let meta = CategoryMetadata::resolve(&Field::ALL);
        for f in Field::ALL.iter() {
            assert!(meta.label(*f).is_ok(), "missing label for {}", f);
        }
    }

    #[test]
    fn orders_and_colors_cover_the_same_values() {
        for style in CATEGORY_TABLE {
            let meta = CategoryMetadata::resolve(&[style.field]);
            for v in meta.order(style.field) {
                assert!(meta.color(style.field, v).is_some());
            }
            assert_eq!(
                meta.order(style.field).len(),
                meta.colors.get(&style.field).map(|m| m.len()).unwrap_or(0)
            );
        }
    }

    #[test]
    fn age_redirect_is_idempotent() {
        let from_age = CategoryMetadata::resolve(&[color_field(Field::Age)]);
        let direct = CategoryMetadata::resolve(&[color_field(Field::Generation)]);
        assert_eq!(from_age, direct);
        assert_eq!(color_field(color_field(Field::Age)), Field::Generation);
        assert_eq!(color_field(Field::Party), Field::Party);
    }

    #[test]
    fn sort_values_follows_configuration() {
        let meta = CategoryMetadata::resolve(&[Field::VoteMethod4, Field::Age]);
        let mut values: Vec<String> = ["Other", "Provisional", "Early", "No Vote", "Election Day"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        meta.sort_values(Field::VoteMethod4, &mut values);
        assert_eq!(
            values,
            vec!["Early", "No Vote", "Election Day", "Other", "Provisional"]
        );

        let mut ages: Vec<String> = ["100", "18", "9"].iter().map(|s| s.to_string()).collect();
        meta.sort_values(Field::Age, &mut ages);
        assert_eq!(ages, vec!["9", "18", "100"]);
    }

    #[test]
    fn missing_label_is_an_error() {
        let meta = CategoryMetadata::resolve(&[Field::Party]);
        assert_eq!(
            meta.label(Field::City),
            Err(ChartError::MissingLabel { field: Field::City })
        );
    }

    #[test]
    fn completeness_reports_unstyled_values() {
        let table = VoterTable::from_records(vec![
            VoterRecord::new(2020).with(Field::Party, "Dem"),
            VoterRecord::new(2020).with(Field::Party, "Lib"),
            VoterRecord::new(2016).with(Field::Party, "Lib"),
            VoterRecord::new(2016).with(Field::Age, "40"),
        ]);
        let gaps = check_completeness(&table, &[Field::Party, Field::Age, Field::Year]);
        assert_eq!(
            gaps,
            vec![UnstyledCategory {
                field: Field::Party,
                value: "Lib".to_string(),
                count: 2
            }]
        );
    }
}
