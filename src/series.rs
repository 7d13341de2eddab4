//! Diagnostics for a storm as handed out by the archive, converted to output units.

use crate::{atcf::AtcfId, diag::Diag, errors::ShipsDataErr};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// Name of the synthetic key holding the observation times.
pub const TIME_KEY: &str = "TIME";

/// All the observations of a storm, in time order.
///
/// Every series is the same length as `times()`. A `None` value is missing.
#[derive(Clone, Debug, PartialEq)]
pub struct StormTimeSeries {
    atcf_id: AtcfId,
    times: Vec<NaiveDateTime>,
    values: BTreeMap<Diag, Vec<Option<f64>>>,
}

impl StormTimeSeries {
    pub(crate) fn new(atcf_id: AtcfId) -> Self {
        StormTimeSeries {
            atcf_id,
            times: vec![],
            values: BTreeMap::new(),
        }
    }

    pub(crate) fn push(&mut self, snapshot: StormSnapshot) {
        debug_assert_eq!(snapshot.atcf_id, self.atcf_id);
        let len = self.times.len();

        for (diag, val) in snapshot.values {
            self.values
                .entry(diag)
                .or_insert_with(|| vec![None; len])
                .push(val);
        }
        self.times.push(snapshot.time);

        // Keep all series aligned with the times.
        for series in self.values.values_mut() {
            series.resize(len + 1, None);
        }
    }

    /// The storm.
    pub fn atcf_id(&self) -> &AtcfId {
        &self.atcf_id
    }

    /// Times of the observations, strictly increasing.
    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// True if there are no observations.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// The values of a parameter through time. All missing if the parameter was never observed.
    pub fn series(&self, diag: Diag) -> Vec<Option<f64>> {
        self.values
            .get(&diag)
            .cloned()
            .unwrap_or_else(|| vec![None; self.times.len()])
    }

    /// Look up a series by its parameter code. The times are under `TIME_KEY` and are not a
    /// parameter, use `times()` for those.
    pub fn series_by_name(&self, name: &str) -> Result<Vec<Option<f64>>, ShipsDataErr> {
        Diag::from_name(name).map(|diag| self.series(diag))
    }

    /// Iterate over the parameters with at least one line in the archive.
    pub fn iter(&self) -> impl Iterator<Item = (Diag, &[Option<f64>])> + '_ {
        self.values.iter().map(|(d, v)| (*d, v.as_slice()))
    }

    /// The observation at a given index.
    pub fn snapshot(&self, index: usize) -> Option<StormSnapshot> {
        let time = *self.times.get(index)?;
        let values = self
            .values
            .iter()
            .map(|(diag, series)| (*diag, series[index]))
            .collect();

        Some(StormSnapshot {
            atcf_id: self.atcf_id.clone(),
            time,
            values,
        })
    }
}

impl From<StormSnapshot> for StormTimeSeries {
    fn from(snapshot: StormSnapshot) -> Self {
        let mut series = StormTimeSeries::new(snapshot.atcf_id.clone());
        series.push(snapshot);
        series
    }
}

/// The diagnostics for a storm at a single time.
#[derive(Clone, Debug, PartialEq)]
pub struct StormSnapshot {
    /// The storm.
    pub atcf_id: AtcfId,
    /// Time of the observation.
    pub time: NaiveDateTime,
    pub(crate) values: BTreeMap<Diag, Option<f64>>,
}

impl StormSnapshot {
    /// Get a value, `None` if it is missing.
    pub fn get(&self, diag: Diag) -> Option<f64> {
        self.values.get(&diag).copied().flatten()
    }

    /// Look up a value by its parameter code.
    pub fn get_by_name(&self, name: &str) -> Result<Option<f64>, ShipsDataErr> {
        Diag::from_name(name).map(|diag| self.get(diag))
    }

    /// Iterate over the parameters with a line in the archive.
    pub fn iter(&self) -> impl Iterator<Item = (Diag, Option<f64>)> + '_ {
        self.values.iter().map(|(d, v)| (*d, *v))
    }
}

#[cfg(test)]
mod unit {
    use super::*;
    use crate::basin::Basin;
    use chrono::NaiveDate;

    fn snapshot(hour: u32, vals: &[(Diag, Option<f64>)]) -> StormSnapshot {
        StormSnapshot {
            atcf_id: AtcfId::new(Basin::AL, 5, 2019).unwrap(),
            time: NaiveDate::from_ymd_opt(2019, 8, 24)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            values: vals.iter().cloned().collect(),
        }
    }

    #[test]
    fn test_series_stay_aligned() {
        let mut ts = StormTimeSeries::new(AtcfId::new(Basin::AL, 5, 2019).unwrap());
        assert!(ts.is_empty());

        ts.push(snapshot(6, &[(Diag::VMAX, Some(25.0))]));
        ts.push(snapshot(12, &[(Diag::VMAX, Some(30.0)), (Diag::SHRD, Some(1.5))]));
        ts.push(snapshot(18, &[(Diag::SHRD, None)]));

        assert_eq!(ts.len(), 3);
        assert_eq!(ts.series(Diag::VMAX), vec![Some(25.0), Some(30.0), None]);
        assert_eq!(ts.series(Diag::SHRD), vec![None, Some(1.5), None]);
        assert_eq!(ts.series(Diag::MSLP), vec![None, None, None]);
        assert!(ts.iter().all(|(_, series)| series.len() == 3));
    }

    #[test]
    fn test_lookup_by_name() {
        let mut ts = StormTimeSeries::new(AtcfId::new(Basin::AL, 5, 2019).unwrap());
        ts.push(snapshot(6, &[(Diag::VMAX, Some(25.0))]));

        assert_eq!(ts.series_by_name("vmax").unwrap(), vec![Some(25.0)]);
        match ts.series_by_name(TIME_KEY) {
            Err(ShipsDataErr::UnknownParameter(name)) => assert_eq!(name, "TIME"),
            other => panic!("TIME is not a parameter, got {:?}", other),
        }

        let snap = ts.snapshot(0).unwrap();
        assert_eq!(snap.get_by_name("VMAX").unwrap(), Some(25.0));
        assert!(snap.get_by_name("BOGUS").is_err());
        assert!(ts.snapshot(1).is_none());
    }

    #[test]
    fn test_snapshot_matches_pushed() {
        let mut ts = StormTimeSeries::new(AtcfId::new(Basin::AL, 5, 2019).unwrap());
        let first = snapshot(6, &[(Diag::VMAX, Some(25.0)), (Diag::LAT, None)]);
        ts.push(first.clone());

        assert_eq!(ts.snapshot(0), Some(first.clone()));
        assert_eq!(StormTimeSeries::from(first), ts);
    }
}
