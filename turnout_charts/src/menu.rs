use std::collections::BTreeSet;

use crate::categories::CategoryMetadata;
use crate::config::*;
use crate::table::VoterTable;

/// Fields that can be charted on their own.
pub const SINGLE_FIELDS: [Field; 12] = [
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
];

/// Fields that can be broken down by another field.
pub const PAIR_FIELDS: [Field; 11] = [
    Field::VoteMethod4,
    Field::VoteMethod5,
    Field::Voted,
    Field::PrimaryVoted,
    Field::Generation,
    Field::Party,
    Field::Gender,
    Field::Race,
    Field::BirthRegion,
    Field::DriversLicense,
    Field::City,
];

/// Fields describing how (or whether) the voter voted in the general election.
pub const VOTING_FIELDS: [Field; 3] = [Field::VoteMethod4, Field::VoteMethod5, Field::Voted];

/// Fields describing the voter. A voting field can only be broken down by one of these.
pub const NON_VOTING_FIELDS: [Field; 8] = [
    Field::PrimaryVoted,
    Field::Generation,
    Field::Party,
    Field::Gender,
    Field::Race,
    Field::BirthRegion,
    Field::DriversLicense,
    Field::City,
];

/// The label shown when choosing a field.
pub fn menu_label(field: Field) -> &'static str {
    match field {
        Field::VoteMethod4 => "Voting Method (4 categories)",
        Field::VoteMethod5 => "Voting Method (5 categories)",
        Field::Voted => "Voted (Y/N)",
        Field::PrimaryVoted => "Voted in Primary (Y/N)",
        Field::Age => "Age",
        Field::Generation => "Generation",
        Field::Party => "Political Party",
        Field::Gender => "Gender",
        Field::Race => "Race",
        Field::BirthRegion => "Birth Region",
        Field::DriversLicense => "Drivers License (Y/N)",
        Field::City => "City",
        Field::Year => "Election Year",
        Field::RegistrationStatus => "Registration Status",
    }
}

/// The label shown when choosing a category. Codes without a longer name are returned as is.
pub fn display_name(category: &str) -> &str {
    match category {
        "Rep" => "Republican",
        "Dem" => "Democrat",
        "Y" => "Yes",
        "N" => "No",
        "Boomer" => "Baby Boomer",
        "GenX" => "Generation X",
        "GenZ" => "Gen Z",
        "M" => "Male",
        "F" => "Female",
        "U" | "Undesig." => "Undesignated",
        other => other,
    }
}

/// The choices for the second field once the first one is picked.
pub fn second_field_options(first: Field) -> &'static [Field] {
    if VOTING_FIELDS.contains(&first) {
        &NON_VOTING_FIELDS
    } else {
        &PAIR_FIELDS
    }
}

pub fn validate_single(field: Field) -> Result<(), ChartError> {
    if SINGLE_FIELDS.contains(&field) {
        Ok(())
    } else {
        Err(ChartError::UnknownField {
            name: field.to_string(),
        })
    }
}

/// Checks that `first` broken down by `second` is offered by the menu.
///
/// ```
/// use turnout_charts::*;
///
/// assert!(validate_pair(Field::Party, Field::VoteMethod4).is_ok());
/// assert!(validate_pair(Field::VoteMethod4, Field::Voted).is_err());
/// ```
pub fn validate_pair(first: Field, second: Field) -> Result<(), ChartError> {
    if PAIR_FIELDS.contains(&first) && second_field_options(first).contains(&second) {
        Ok(())
    } else {
        Err(ChartError::InvalidFieldPair { first, second })
    }
}

/// The distinct values of a field, for one year or all of them, in display order.
pub fn category_options(
    table: &VoterTable,
    field: Field,
    year: Option<u16>,
) -> Result<Vec<String>, ChartError> {
    table.require(field)?;
    let values: BTreeSet<String> = table
        .rows(year)
        .filter_map(|r| r.value(field).map(|v| v.into_owned()))
        .collect();
    let mut res: Vec<String> = values.into_iter().collect();
    CategoryMetadata::resolve(&[field]).sort_values(field, &mut res);
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voting_fields_are_broken_down_by_voter_fields() {
        for first in VOTING_FIELDS.iter() {
            for second in VOTING_FIELDS.iter() {
                assert!(validate_pair(*first, *second).is_err());
            }
            assert!(validate_pair(*first, Field::Party).is_ok());
        }
        assert!(validate_pair(Field::Party, Field::Voted).is_ok());
        assert!(validate_pair(Field::Party, Field::Party).is_ok());
    }

    #[test]
    fn age_is_only_a_single_field() {
        assert!(validate_single(Field::Age).is_ok());
        assert!(validate_single(Field::Year).is_err());
        assert_eq!(
            validate_pair(Field::Age, Field::Party),
            Err(ChartError::InvalidFieldPair {
                first: Field::Age,
                second: Field::Party
            })
        );
        assert!(validate_pair(Field::Party, Field::Age).is_err());
    }

    #[test]
    fn labels() {
        assert_eq!(menu_label(Field::Party), "Political Party");
        assert_eq!(display_name("Undesig."), "Undesignated");
        assert_eq!(display_name("Early"), "Early");
    }

    #[test]
    fn options_follow_display_order() {
        let table = VoterTable::from_records(vec![
            VoterRecord::new(2020).with(Field::Race, "Other"),
            VoterRecord::new(2020).with(Field::Race, "White"),
            VoterRecord::new(2020).with(Field::Race, "Other"),
            VoterRecord::new(2016).with(Field::Race, "Black"),
        ]);
        assert_eq!(
            category_options(&table, Field::Race, Some(2020)).unwrap(),
            vec!["White", "Other"]
        );
        assert_eq!(
            category_options(&table, Field::Race, None).unwrap(),
            vec!["White", "Black", "Other"]
        );
        assert!(category_options(&table, Field::City, None).is_err());
    }
}
