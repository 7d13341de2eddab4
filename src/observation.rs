//! A single storm at a single synoptic time, as parsed from the raw text.

use crate::{atcf::AtcfId, diag::Diag};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// The analysis (hour 0) values for one storm at one time.
///
/// Values are raw, unconverted integers as found in the text. A `None` value is missing, either
/// because the file marked it missing or because the parameter line was absent.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    /// The storm.
    pub atcf_id: AtcfId,
    /// Synoptic time of the analysis.
    pub time: NaiveDateTime,
    values: BTreeMap<Diag, Option<i32>>,
}

impl Observation {
    /// Create an observation with all values missing.
    pub fn new(atcf_id: AtcfId, time: NaiveDateTime) -> Self {
        Observation {
            atcf_id,
            time,
            values: BTreeMap::new(),
        }
    }

    /// Get the raw value of a parameter, `None` if it is missing.
    pub fn raw_value(&self, diag: Diag) -> Option<i32> {
        self.values.get(&diag).copied().flatten()
    }

    /// Set the raw value of a parameter.
    pub fn set_raw_value(&mut self, diag: Diag, value: Option<i32>) {
        self.values.insert(diag, value);
    }

    /// Whether a line for this parameter was found, even if the value is missing.
    pub fn has_line(&self, diag: Diag) -> bool {
        self.values.contains_key(&diag)
    }

    /// Iterate over the parameters that had a line in the block.
    pub fn iter(&self) -> impl Iterator<Item = (Diag, Option<i32>)> + '_ {
        self.values.iter().map(|(d, v)| (*d, *v))
    }
}
