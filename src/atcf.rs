use crate::{basin::Basin, errors::ShipsDataErr};
use std::{fmt::Display, str::FromStr};

/// New type wrapper for an ATCF storm identifier, e.g. `AL052019`.
///
/// Always upper case, always from one of the supported basins.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtcfId {
    id: String,
    basin: Basin,
}

impl AtcfId {
    /// Build an id from its parts. The number must fit in 2 digits and the year in 4.
    pub fn new(basin: Basin, number: u8, year: u16) -> Result<Self, ShipsDataErr> {
        let id = format!("{}{:02}{:04}", basin, number, year);

        if number > 99 || year > 9999 {
            return Err(ShipsDataErr::InvalidAtcfId(id));
        }

        Ok(AtcfId { id, basin })
    }

    /// The basin the storm was tracked in.
    pub fn basin(&self) -> Basin {
        self.basin
    }

    /// The storm number within the basin and season. Digits are validated on construction.
    pub fn number(&self) -> u8 {
        self.id[2..4].parse().unwrap_or(0)
    }

    /// The season the storm belongs to.
    pub fn year(&self) -> u16 {
        self.id[4..].parse().unwrap_or(0)
    }

    /// View as a string slice.
    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl FromStr for AtcfId {
    type Err = ShipsDataErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_uppercase();

        if id.len() != 8 || !id.is_ascii() {
            return Err(ShipsDataErr::InvalidAtcfId(s.to_owned()));
        }

        let (basin, digits) = id.split_at(2);
        if !basin.chars().all(|c| c.is_ascii_alphabetic())
            || !digits.chars().all(|c| c.is_ascii_digit())
        {
            return Err(ShipsDataErr::InvalidAtcfId(s.to_owned()));
        }

        let basin = Basin::parse(basin)?;

        Ok(AtcfId { id, basin })
    }
}

impl Display for AtcfId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        write!(formatter, "{}", self.id)
    }
}

impl AsRef<str> for AtcfId {
    fn as_ref(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod unit {
    use super::*;

    #[test]
    fn test_parse_parts() {
        let id = AtcfId::from_str("al052019").unwrap();
        assert_eq!(id.as_str(), "AL052019");
        assert_eq!(id.basin(), Basin::AL);
        assert_eq!(id.number(), 5);
        assert_eq!(id.year(), 2019);

        assert_eq!(AtcfId::new(Basin::CP, 1, 1992).unwrap().to_string(), "CP011992");

        let id = AtcfId::new(Basin::EP, 99, 987).unwrap();
        assert_eq!(id.as_str(), "EP990987");
        assert_eq!(id.number(), 99);
        assert_eq!(id.year(), 987);
    }

    #[test]
    fn test_new_rejects_out_of_range_parts() {
        for (number, year) in &[(100, 2019), (5, 10000), (255, 65535)] {
            match AtcfId::new(Basin::AL, *number, *year) {
                Err(ShipsDataErr::InvalidAtcfId(_)) => {}
                other => panic!("{} {} should be invalid, got {:?}", number, year, other),
            }
        }
    }

    #[test]
    fn test_malformed_ids() {
        for bad in &["AL05201", "AL0520199", "A1052019", "ALXX2019", "", "ÅL052019"] {
            match AtcfId::from_str(bad) {
                Err(ShipsDataErr::InvalidAtcfId(_)) => {}
                other => panic!("{} should be invalid, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_unsupported_basin_ids() {
        match AtcfId::from_str("WP282019") {
            Err(ShipsDataErr::UnsupportedBasin(_)) => {}
            other => panic!("WP should not be supported, got {:?}", other),
        }
    }
}
