//! An archive of SHIPS diagnostics.

use crate::basin::Basin;
use std::{collections::BTreeMap, path::PathBuf};

/// The archive.
///
/// Owns the connection to the database and knows where to find the raw text files. Rebuilding
/// requires exclusive (`&mut`) access, queries only need a shared reference.
#[derive(Debug)]
pub struct Archive {
    root: PathBuf,                        // The root directory.
    db_conn: rusqlite::Connection,        // An sqlite connection.
    raw_files: BTreeMap<Basin, PathBuf>, // Overrides for the raw file locations.
}

mod query;
mod rebuild;
mod root;

pub use rebuild::{BasinReport, RebuildSummary};
pub use root::default_root;

impl Archive {
    /// Name of the diagnostics table.
    pub const TABLE: &'static str = "diagnostics";
    /// Format of the TIME column.
    pub const TIME_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";
}
