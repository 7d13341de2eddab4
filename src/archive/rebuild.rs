//! Rebuilding the diagnostics table from the raw text files.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use log::{info, warn};
use rusqlite::{ToSql, TransactionBehavior};
use strum::IntoEnumIterator;

use super::Archive;

use crate::{
    atcf::AtcfId,
    basin::Basin,
    diag::Diag,
    errors::ShipsDataErr,
    observation::Observation,
    parser::{self, ParseSummary},
};

/// What happened to a basin during a rebuild.
#[derive(Debug)]
pub struct BasinReport {
    /// The basin.
    pub basin: Basin,
    /// The parse summary if the basin made it into the archive, otherwise why it didn't.
    pub outcome: Result<ParseSummary, ShipsDataErr>,
}

/// What happened during a rebuild.
#[derive(Debug)]
pub struct RebuildSummary {
    /// One report per basin.
    pub basins: Vec<BasinReport>,
    /// Rows written to the diagnostics table.
    pub rows: usize,
}

impl RebuildSummary {
    /// Basins that made it into the archive.
    pub fn succeeded(&self) -> Vec<Basin> {
        self.basins
            .iter()
            .filter(|rpt| rpt.outcome.is_ok())
            .map(|rpt| rpt.basin)
            .collect()
    }

    /// Basins left out of the archive, and why.
    pub fn failed(&self) -> Vec<(Basin, &ShipsDataErr)> {
        self.basins
            .iter()
            .filter_map(|rpt| rpt.outcome.as_ref().err().map(|err| (rpt.basin, err)))
            .collect()
    }

    /// Parse counts summed over the basins that made it into the archive.
    pub fn totals(&self) -> ParseSummary {
        let mut totals = ParseSummary::default();
        for summary in self.basins.iter().filter_map(|rpt| rpt.outcome.as_ref().ok()) {
            totals.merge(summary);
        }
        totals
    }
}

impl Archive {
    /// Parse the raw text files of all the basins and replace the diagnostics table with them.
    ///
    /// A basin without usable data is left out and reported in the summary. If no basin has any
    /// data, or the database cannot be written, the archive is left as it was.
    pub fn parse_and_save_to_db(&mut self) -> Result<RebuildSummary, ShipsDataErr> {
        let mut reports = vec![];
        let mut observations = vec![];
        let mut seen: HashSet<(AtcfId, NaiveDateTime)> = HashSet::new();

        for basin in Basin::iter() {
            let path = self.raw_file(basin);

            let outcome = match parser::parse_file(basin, &path) {
                Ok(parsed) => {
                    let mut summary = parsed.summary;

                    for ob in parsed.observations {
                        if seen.insert((ob.atcf_id.clone(), ob.time)) {
                            observations.push(ob);
                        } else {
                            warn!("{} at {} is in more than one file.", ob.atcf_id, ob.time);
                            summary.parsed -= 1;
                            summary.duplicates += 1;
                        }
                    }

                    Ok(summary)
                }
                Err(err @ ShipsDataErr::BasinUnavailable(..)) => {
                    warn!("{}", err);
                    Err(err)
                }
                Err(err) => return Err(err),
            };

            reports.push(BasinReport { basin, outcome });
        }

        if observations.is_empty() {
            return Err(ShipsDataErr::NoData);
        }

        let rows = self.rebuild(&observations)?;

        Ok(RebuildSummary {
            basins: reports,
            rows,
        })
    }

    /// Replace the contents of the diagnostics table with these observations.
    ///
    /// All or nothing, if anything fails the previous contents are kept. Each storm and time
    /// may only appear once.
    pub fn rebuild(&mut self, observations: &[Observation]) -> Result<usize, ShipsDataErr> {
        info!("Rebuilding {} with {} rows.", Archive::TABLE, observations.len());

        let tx = self
            .db_conn
            .transaction_with_behavior(TransactionBehavior::Exclusive)?;

        tx.execute_batch(&format!("DROP TABLE IF EXISTS {};", Archive::TABLE))?;
        tx.execute_batch(&Self::create_table_sql(false))?;

        {
            let columns = Self::column_names();
            let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();

            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} VALUES ({})",
                Archive::TABLE,
                placeholders.join(", ")
            ))?;

            for ob in observations {
                let atcf_id = ob.atcf_id.as_str();
                let time = ob.time.format(Archive::TIME_FORMAT).to_string();
                let values: Vec<Option<i32>> = Diag::iter().map(|diag| ob.raw_value(diag)).collect();

                let mut params: Vec<&dyn ToSql> = Vec::with_capacity(columns.len());
                params.push(&atcf_id);
                params.push(&time);
                params.extend(values.iter().map(|val| val as &dyn ToSql));

                stmt.execute(&params)?;
            }
        }

        tx.commit()?;

        info!("Finished rebuilding {}.", Archive::TABLE);
        Ok(observations.len())
    }
}
