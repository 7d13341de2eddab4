use std::str::FromStr;

use chrono::NaiveDateTime;
use strum::IntoEnumIterator;

use super::Archive;

use crate::{
    atcf::AtcfId,
    basin::Basin,
    diag::Diag,
    errors::ShipsDataErr,
    series::{StormSnapshot, StormTimeSeries},
};

impl Archive {
    /// Retrieve all the observations of a storm in time order, converted to output units.
    pub fn get_storm_obs(&self, atcf_id: &str) -> Result<StormTimeSeries, ShipsDataErr> {
        let atcf_id = AtcfId::from_str(atcf_id)?;

        let mut stmt = self.db_conn.prepare(&format!(
            "SELECT {} FROM {} WHERE ATCF_ID = ?1 ORDER BY TIME",
            Self::select_columns(),
            Archive::TABLE
        ))?;

        let mut series = StormTimeSeries::new(atcf_id.clone());
        for snapshot in stmt.query_and_then(&[atcf_id.as_str()], |row| {
            Self::parse_row_to_snapshot(&atcf_id, row)
        })? {
            series.push(snapshot?);
        }

        if series.is_empty() {
            return Err(ShipsDataErr::NotFound {
                atcf_id: atcf_id.to_string(),
                time: None,
            });
        }

        Ok(series)
    }

    /// Retrieve the observation of a storm at a single time, converted to output units.
    pub fn get_storm_obs_at(
        &self,
        atcf_id: &str,
        time: NaiveDateTime,
    ) -> Result<StormSnapshot, ShipsDataErr> {
        let atcf_id = AtcfId::from_str(atcf_id)?;
        let time_str = time.format(Archive::TIME_FORMAT).to_string();

        let res = self.db_conn.query_row_and_then(
            &format!(
                "SELECT {} FROM {} WHERE ATCF_ID = ?1 AND TIME = ?2",
                Self::select_columns(),
                Archive::TABLE
            ),
            &[atcf_id.as_str(), time_str.as_str()],
            |row| Self::parse_row_to_snapshot(&atcf_id, row),
        );

        match res {
            Err(ShipsDataErr::Database(rusqlite::Error::QueryReturnedNoRows)) => {
                Err(ShipsDataErr::NotFound {
                    atcf_id: atcf_id.to_string(),
                    time: Some(time),
                })
            }
            res => res,
        }
    }

    /// Get a list of the storms in the archive, optionally only those from one basin.
    pub fn storm_ids(&self, basin: Option<Basin>) -> Result<Vec<AtcfId>, ShipsDataErr> {
        let prefix = basin.map(|b| b.to_string()).unwrap_or_default();

        let mut stmt = self.db_conn.prepare(&format!(
            "SELECT DISTINCT ATCF_ID FROM {} WHERE ATCF_ID LIKE ?1 || '%' ORDER BY ATCF_ID",
            Archive::TABLE
        ))?;

        let vals: Result<Vec<AtcfId>, ShipsDataErr> = stmt
            .query_map(&[&prefix], |row| row.get::<_, String>(0))?
            .map(|res| res.map_err(ShipsDataErr::Database))
            .map(|res| res.and_then(|id| AtcfId::from_str(&id)))
            .collect();

        vals
    }

    /// Get the times a storm was observed, in order.
    pub fn storm_times(&self, atcf_id: &str) -> Result<Vec<NaiveDateTime>, ShipsDataErr> {
        let atcf_id = AtcfId::from_str(atcf_id)?;

        let mut stmt = self.db_conn.prepare(&format!(
            "SELECT TIME FROM {} WHERE ATCF_ID = ?1 ORDER BY TIME",
            Archive::TABLE
        ))?;

        let vals: Result<Vec<NaiveDateTime>, ShipsDataErr> = stmt
            .query_map(&[atcf_id.as_str()], |row| row.get::<_, String>(0))?
            .map(|res| res.map_err(ShipsDataErr::Database))
            .map(|res| res.and_then(|time| Self::parse_time(&time)))
            .collect();

        vals
    }

    /// The number of observations in the archive.
    pub fn count(&self) -> Result<usize, ShipsDataErr> {
        let num_records: i64 = self.db_conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", Archive::TABLE),
            rusqlite::NO_PARAMS,
            |row| row.get(0),
        )?;

        Ok(num_records as usize)
    }

    fn select_columns() -> String {
        Self::column_names()
            .iter()
            .map(|name| format!("\"{}\"", name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn parse_time(time: &str) -> Result<NaiveDateTime, ShipsDataErr> {
        NaiveDateTime::parse_from_str(time, Archive::TIME_FORMAT)
            .map_err(|_| ShipsDataErr::InvalidSchema)
    }

    // Conversions happen here, the stored values are never modified.
    fn parse_row_to_snapshot(
        atcf_id: &AtcfId,
        row: &rusqlite::Row,
    ) -> Result<StormSnapshot, ShipsDataErr> {
        let time: String = row.get(1)?;
        let time = Self::parse_time(&time)?;

        let mut values = std::collections::BTreeMap::new();
        for (i, diag) in Diag::iter().enumerate() {
            let raw: Option<i64> = row.get(i + 2)?;
            let val = raw.and_then(|raw| diag.descriptor().convert(raw));
            values.insert(diag, val);
        }

        Ok(StormSnapshot {
            atcf_id: atcf_id.clone(),
            time,
            values,
        })
    }
}
