// ********* Input data structures ***********

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;

/// The columns of the voter table that can be charted.
///
/// The serialized form of each variant is the column name used in the data files.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "year")]
    Year,
    #[serde(rename = "vote_method_4")]
    VoteMethod4,
    #[serde(rename = "vote_method_5")]
    VoteMethod5,
    #[serde(rename = "vote_bin")]
    Voted,
    #[serde(rename = "pri_vote_bin")]
    PrimaryVoted,
    #[serde(rename = "birth_age_adj")]
    Age,
    #[serde(rename = "gen_grp")]
    Generation,
    #[serde(rename = "party_grp")]
    Party,
    #[serde(rename = "gender_code")]
    Gender,
    #[serde(rename = "race_grp")]
    Race,
    #[serde(rename = "birth_reg_other")]
    BirthRegion,
    #[serde(rename = "drivers_lic")]
    DriversLicense,
    #[serde(rename = "city_grp")]
    City,
    #[serde(rename = "voter_status_desc")]
    RegistrationStatus,
}

impl Field {
    pub const ALL: [Field; 14] = [
        Field::Year,
        Field::VoteMethod4,
        Field::VoteMethod5,
        Field::Voted,
        Field::PrimaryVoted,
        Field::Age,
        Field::Generation,
        Field::Party,
        Field::Gender,
        Field::Race,
        Field::BirthRegion,
        Field::DriversLicense,
        Field::City,
        Field::RegistrationStatus,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            Field::Year => "year",
            Field::VoteMethod4 => "vote_method_4",
            Field::VoteMethod5 => "vote_method_5",
            Field::Voted => "vote_bin",
            Field::PrimaryVoted => "pri_vote_bin",
            Field::Age => "birth_age_adj",
            Field::Generation => "gen_grp",
            Field::Party => "party_grp",
            Field::Gender => "gender_code",
            Field::Race => "race_grp",
            Field::BirthRegion => "birth_reg_other",
            Field::DriversLicense => "drivers_lic",
            Field::City => "city_grp",
            Field::RegistrationStatus => "voter_status_desc",
        }
    }

    /// Continuous fields cannot be colored by unique value.
    pub fn is_continuous(&self) -> bool {
        matches!(self, Field::Age)
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

impl FromStr for Field {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Field, ChartError> {
        Field::ALL
            .iter()
            .find(|f| f.column_name() == s)
            .cloned()
            .ok_or_else(|| ChartError::UnknownField {
                name: s.to_string(),
            })
    }
}

/// Parses a registration date, as found in the `registr_dt` column.
///
/// Accepts `YYYY-MM-DD`, optionally followed by a time of day which is dropped.
pub fn parse_registration_date(s: &str) -> Result<NaiveDate, ChartError> {
    let date_part = s
        .trim()
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or("");
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| ChartError::InvalidValue {
        field: "registr_dt".to_string(),
        value: s.to_string(),
    })
}

/// One registered voter observed in one general election.
///
/// Categorical attributes are kept as the labels found in the data file
/// (`Early`, `Dem`, `Y`, ...). Missing values are `None` and are skipped by
/// all aggregations.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct VoterRecord {
    pub year: u16,
    pub vote_method_4: Option<String>,
    pub vote_method_5: Option<String>,
    pub vote_bin: Option<String>,
    pub pri_vote_bin: Option<String>,
    pub age: Option<u32>,
    pub gen_grp: Option<String>,
    pub party_grp: Option<String>,
    pub gender_code: Option<String>,
    pub race_grp: Option<String>,
    pub birth_reg_other: Option<String>,
    pub drivers_lic: Option<String>,
    pub city_grp: Option<String>,
    pub voter_status_desc: Option<String>,
    pub registration_date: Option<NaiveDate>,
}

impl VoterRecord {
    pub fn new(year: u16) -> VoterRecord {
        VoterRecord {
            year,
            ..Default::default()
        }
    }

    /// Sets a field from its textual representation. Empty strings clear the value.
    pub fn set(&mut self, field: Field, value: &str) -> Result<(), ChartError> {
        let v = value.trim();
        let text = if v.is_empty() {
            None
        } else {
            Some(v.to_string())
        };
        match field {
            Field::Year => {
                self.year = parse_integer(v).ok_or_else(|| ChartError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                })?;
            }
            Field::Age => {
                self.age = match text {
                    None => None,
                    Some(_) => {
                        Some(parse_integer(v).ok_or_else(|| ChartError::InvalidValue {
                            field: field.to_string(),
                            value: value.to_string(),
                        })?)
                    }
                }
            }
            Field::VoteMethod4 => self.vote_method_4 = text,
            Field::VoteMethod5 => self.vote_method_5 = text,
            Field::Voted => self.vote_bin = text,
            Field::PrimaryVoted => self.pri_vote_bin = text,
            Field::Generation => self.gen_grp = text,
            Field::Party => self.party_grp = text,
            Field::Gender => self.gender_code = text,
            Field::Race => self.race_grp = text,
            Field::BirthRegion => self.birth_reg_other = text,
            Field::DriversLicense => self.drivers_lic = text,
            Field::City => self.city_grp = text,
            Field::RegistrationStatus => self.voter_status_desc = text,
        }
        Ok(())
    }

    /// Builder-style variant of `set`, mostly useful to write tables by hand.
    ///
    /// ```
    /// use turnout_charts::{Field, VoterRecord};
    ///
    /// let r = VoterRecord::new(2020)
    ///     .with(Field::Party, "Dem")
    ///     .with(Field::Age, "34");
    /// assert_eq!(r.value(Field::Party).as_deref(), Some("Dem"));
    /// assert_eq!(r.age, Some(34));
    /// ```
    pub fn with(mut self, field: Field, value: &str) -> VoterRecord {
        if let Err(e) = self.set(field, value) {
            log::warn!("VoterRecord::with: ignoring value: {}", e);
        }
        self
    }

    /// The categorical value of a field for this record.
    pub fn value(&self, field: Field) -> Option<Cow<'_, str>> {
        fn borrowed(s: &Option<String>) -> Option<Cow<'_, str>> {
            s.as_deref().map(Cow::Borrowed)
        }
        match field {
            Field::Year => Some(Cow::Owned(self.year.to_string())),
            Field::Age => self.age.map(|a| Cow::Owned(a.to_string())),
            Field::VoteMethod4 => borrowed(&self.vote_method_4),
            Field::VoteMethod5 => borrowed(&self.vote_method_5),
            Field::Voted => borrowed(&self.vote_bin),
            Field::PrimaryVoted => borrowed(&self.pri_vote_bin),
            Field::Generation => borrowed(&self.gen_grp),
            Field::Party => borrowed(&self.party_grp),
            Field::Gender => borrowed(&self.gender_code),
            Field::Race => borrowed(&self.race_grp),
            Field::BirthRegion => borrowed(&self.birth_reg_other),
            Field::DriversLicense => borrowed(&self.drivers_lic),
            Field::City => borrowed(&self.city_grp),
            Field::RegistrationStatus => borrowed(&self.voter_status_desc),
        }
    }
}

// Spreadsheets tend to hand back integers as "2020.0".
fn parse_integer<T: FromStr>(s: &str) -> Option<T> {
    let trimmed = s.strip_suffix(".0").unwrap_or(s);
    trimmed.parse::<T>().ok()
}

// ********* Chart options **********

/// Whether bars represent raw counts or a percentage of their group.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    #[default]
    Count,
    Percent,
}

impl Normalization {
    pub fn y_axis_title(&self) -> &'static str {
        match self {
            Normalization::Count => "Number of Registered Voters",
            Normalization::Percent => "Percent of Registered Voters",
        }
    }
}

/// How the bars of different colors are arranged within a category.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BarMode {
    #[default]
    Group,
    Stack,
    Overlay,
    Relative,
}

impl BarMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BarMode::Group => "group",
            BarMode::Stack => "stack",
            BarMode::Overlay => "overlay",
            BarMode::Relative => "relative",
        }
    }
}

// ******** Errors *********

/// Errors that prevent a chart from being produced.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ChartError {
    /// The name does not correspond to any known column.
    UnknownField { name: String },
    /// The column is not part of the loaded table.
    MissingColumn { field: Field },
    /// No display label is configured for this field.
    MissingLabel { field: Field },
    /// The value could not be parsed for this column.
    InvalidValue { field: String, value: String },
    /// The combination of fields is not offered by the field menu.
    InvalidFieldPair { first: Field, second: Field },
}

impl Error for ChartError {}

impl Display for ChartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartError::UnknownField { name } => write!(f, "unknown field {:?}", name),
            ChartError::MissingColumn { field } => {
                write!(f, "column {} is not present in the voter table", field)
            }
            ChartError::MissingLabel { field } => {
                write!(f, "no display label configured for {}", field)
            }
            ChartError::InvalidValue { field, value } => {
                write!(f, "invalid value {:?} for column {}", value, field)
            }
            ChartError::InvalidFieldPair { first, second } => {
                write!(f, "{} cannot be broken down by {}", first, second)
            }
        }
    }
}
