//! Grouping of the raw registration attributes into the charted categories.
//!
//! Voter files usually carry the grouped columns already. When a grouped
//! column is missing from a file but its raw source column is present, the
//! grouped values are computed while loading with the functions below.

use log::debug;

use crate::config::*;

/// Source columns of the grouped fields.
pub const RAW_COLUMNS: [&str; 5] = [
    "birth_year",
    "birth_state",
    "party_cd",
    "race_code",
    "res_city_desc",
];

const TERRITORIES: [&str; 6] = ["AS", "GU", "MP", "PR", "VI", "OC"];
const NORTHEAST: [&str; 9] = ["CT", "ME", "MA", "NH", "RI", "VT", "NJ", "NY", "PA"];
const SOUTH: [&str; 17] = [
    "DE", "FL", "GA", "MD", "NC", "SC", "VA", "DC", "WV", "AL", "KY", "MS", "TN", "AR", "LA",
    "OK", "TX",
];
const MIDWEST: [&str; 12] = [
    "IL", "IN", "MI", "OH", "WI", "IA", "KS", "MN", "MO", "NE", "ND", "SD",
];
const WEST: [&str; 13] = [
    "AZ", "CO", "ID", "MT", "NV", "NM", "UT", "WY", "AK", "CA", "HI", "OR", "WA",
];

const CITIES: [&str; 4] = ["MONROE", "WAXHAW", "INDIAN TRAIL", "MATTHEWS"];

pub const MISSING: &str = "Missing";

pub fn generation(birth_year: Option<i32>) -> &'static str {
    match birth_year {
        None => MISSING,
        Some(y) if y < 1946 => "Greatest-Silent",
        Some(y) if y < 1965 => "Boomer",
        Some(y) if y < 1981 => "GenX",
        Some(y) if y < 1997 => "Millennial",
        Some(_) => "GenZ",
    }
}

/// U.S. Census region of a state code. Territories and abroad are grouped as `Other`.
pub fn birth_region(state: Option<&str>) -> &'static str {
    let state = match state {
        Some(s) => s.trim(),
        None => return MISSING,
    };
    if TERRITORIES.contains(&state) {
        "Other"
    } else if NORTHEAST.contains(&state) {
        "Northeast"
    } else if SOUTH.contains(&state) {
        "South"
    } else if MIDWEST.contains(&state) {
        "Midwest"
    } else if WEST.contains(&state) {
        "West"
    } else {
        MISSING
    }
}

pub fn party_group(party_cd: Option<&str>) -> String {
    match party_cd.map(|s| s.trim()) {
        Some(p @ ("REP" | "DEM")) => title_case(p),
        _ => "Other".to_string(),
    }
}

pub fn race_group(race_code: Option<&str>) -> &'static str {
    match race_code.map(|s| s.trim()) {
        Some("W") => "White",
        Some("B") => "Black",
        Some("U") => "Undesig.",
        _ => "Other",
    }
}

pub fn city_group(city: Option<&str>) -> String {
    match city.map(|s| s.trim()) {
        None | Some("") => MISSING.to_string(),
        Some(c) if CITIES.contains(&c) => title_case(c),
        Some(_) => "Other".to_string(),
    }
}

/// `Y` when the voter holds a drivers license, `N` otherwise.
pub fn license_code(value: &str) -> &'static str {
    match value.trim() {
        "Y" | "License" => "Y",
        _ => "N",
    }
}

pub fn status_group(status: &str) -> String {
    match status.trim() {
        "TEMPORARY" => "Temp".to_string(),
        s => title_case(s),
    }
}

/// Capitalizes the first letter of every word and lowercases the others.
pub fn title_case(s: &str) -> String {
    let mut res = String::with_capacity(s.len());
    let mut at_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_start {
                res.extend(c.to_uppercase());
            } else {
                res.extend(c.to_lowercase());
            }
            at_start = false;
        } else {
            res.push(c);
            at_start = true;
        }
    }
    res
}

/// The raw attributes of one row that feed the grouped fields.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RawAttributes {
    pub birth_year: Option<i32>,
    pub birth_state: Option<String>,
    pub party_cd: Option<String>,
    pub race_code: Option<String>,
    pub res_city_desc: Option<String>,
}

impl RawAttributes {
    /// Records the value of a raw column. Returns false if the column is not a raw column.
    pub fn set(&mut self, column: &str, value: &str) -> Result<bool, ChartError> {
        let v = value.trim();
        let text = if v.is_empty() {
            None
        } else {
            Some(v.to_string())
        };
        match column {
            "birth_year" => {
                self.birth_year = match text {
                    None => None,
                    Some(t) => Some(
                        t.strip_suffix(".0")
                            .unwrap_or(&t)
                            .parse::<i32>()
                            .map_err(|_| ChartError::InvalidValue {
                                field: column.to_string(),
                                value: value.to_string(),
                            })?,
                    ),
                };
            }
            "birth_state" => self.birth_state = text,
            "party_cd" => self.party_cd = text,
            "race_code" => self.race_code = text,
            "res_city_desc" => self.res_city_desc = text,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// The grouped fields to compute for a file, given its header.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Derivation {
    fields: Vec<Field>,
}

impl Derivation {
    /// Plans the derivation of every grouped field whose column is absent
    /// from the header while its source column is present.
    pub fn plan<S: AsRef<str>>(header: &[S]) -> Derivation {
        let has = |name: &str| header.iter().any(|h| h.as_ref().trim() == name);
        let candidates: [(Field, &str); 6] = [
            (Field::Age, "birth_year"),
            (Field::Generation, "birth_year"),
            (Field::BirthRegion, "birth_state"),
            (Field::Party, "party_cd"),
            (Field::Race, "race_code"),
            (Field::City, "res_city_desc"),
        ];
        let fields: Vec<Field> = candidates
            .iter()
            .filter(|(f, raw)| !has(f.column_name()) && has(raw))
            .map(|(f, _)| *f)
            .collect();
        if !fields.is_empty() {
            debug!("Derivation::plan: deriving {:?}", fields);
        }
        Derivation { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Fills the planned fields of the record from its raw attributes.
    pub fn apply(&self, raw: &RawAttributes, record: &mut VoterRecord) {
        for f in self.fields.iter() {
            match f {
                Field::Age => {
                    record.age = raw
                        .birth_year
                        .and_then(|y| u32::try_from(i32::from(record.year) - y).ok());
                }
                Field::Generation => {
                    record.gen_grp = Some(generation(raw.birth_year).to_string());
                }
                Field::BirthRegion => {
                    record.birth_reg_other =
                        Some(birth_region(raw.birth_state.as_deref()).to_string());
                }
                Field::Party => record.party_grp = Some(party_group(raw.party_cd.as_deref())),
                Field::Race => {
                    record.race_grp = Some(race_group(raw.race_code.as_deref()).to_string())
                }
                Field::City => record.city_grp = Some(city_group(raw.res_city_desc.as_deref())),
                _ => {}
            }
        }
    }
}

/// Brings the license and status columns to the codes used by the charts.
pub fn normalize_codes(record: &mut VoterRecord) {
    if let Some(l) = record.drivers_lic.as_deref() {
        record.drivers_lic = Some(license_code(l).to_string());
    }
    if let Some(s) = record.voter_status_desc.as_deref() {
        record.voter_status_desc = Some(status_group(s));
    }
}
