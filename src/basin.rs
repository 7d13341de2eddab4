//! Ocean basins kept in the archive.

use crate::errors::ShipsDataErr;
use std::str::FromStr;
use strum_macros::{AsRefStr, EnumIter, EnumString};

/// Basins with storms that have an ATCF id and are kept in the archive.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, EnumString, AsRefStr, EnumIter)]
pub enum Basin {
    /// North Atlantic
    AL,
    /// East Pacific
    EP,
    /// Central Pacific
    CP,
}

impl std::fmt::Display for Basin {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl Basin {
    /// Parse a basin code, ignoring case.
    pub fn parse(code: &str) -> Result<Self, ShipsDataErr> {
        Basin::from_str(&code.trim().to_uppercase())
            .map_err(|_| ShipsDataErr::UnsupportedBasin(code.to_owned()))
    }

    /// A longer, human readable name.
    pub fn long_name(self) -> &'static str {
        match self {
            Basin::AL => "North Atlantic",
            Basin::EP => "East Pacific",
            Basin::CP => "Central Pacific",
        }
    }

    /// Name of the raw developmental data file as distributed by CIRA.
    pub fn raw_file_name(self) -> &'static str {
        match self {
            Basin::AL => "lsdiaga_1982_2019_sat_ts.dat",
            Basin::EP => "lsdiage_1982_2019_sat_ts.dat",
            Basin::CP => "lsdiagc_1982_2019_sat_ts.dat",
        }
    }
}

/*--------------------------------------------------------------------------------------------------
                                          Unit Tests
--------------------------------------------------------------------------------------------------*/
#[cfg(test)]
mod unit {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_parse_ignores_case() {
        assert_eq!(Basin::parse("al").unwrap(), Basin::AL);
        assert_eq!(Basin::parse(" Ep ").unwrap(), Basin::EP);
        assert_eq!(Basin::parse("CP").unwrap(), Basin::CP);
    }

    #[test]
    fn test_unsupported_basins() {
        for code in &["WP", "IO", "SH", ""] {
            match Basin::parse(code) {
                Err(ShipsDataErr::UnsupportedBasin(_)) => {}
                other => panic!("Expected an unsupported basin, got {:?}", other),
            }
        }
    }

    #[test]
    fn round_trip_strings_for_basins() {
        for basin in Basin::iter() {
            assert_eq!(Basin::parse(&basin.to_string()).unwrap(), basin);
        }
    }

    #[test]
    fn test_raw_file_names_are_distinct() {
        let names: Vec<&str> = Basin::iter().map(Basin::raw_file_name).collect();
        assert_eq!(names.len(), 3);
        assert!(names.iter().all(|nm| nm.starts_with("lsdiag")));
        assert_ne!(names[0], names[1]);
        assert_ne!(names[1], names[2]);
    }
}
