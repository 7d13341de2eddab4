use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use strum::IntoEnumIterator;

use super::Archive;

use crate::{basin::Basin, diag::Diag, errors::ShipsDataErr};

/// The default location of the archive, `${HOME}/ships`.
pub fn default_root() -> Result<PathBuf, ShipsDataErr> {
    dirs::home_dir()
        .map(|hd| hd.join("ships"))
        .ok_or(ShipsDataErr::LogicError("unable to find the home directory"))
}

impl Archive {
    const RAW_DIR: &'static str = "raw";
    const DB_FILE: &'static str = "ships.db";

    /// Initialize a new archive.
    pub fn create(root: &dyn AsRef<Path>) -> Result<Self, ShipsDataErr> {
        let raw_root = root.as_ref().join(Archive::RAW_DIR);
        let db_file = root.as_ref().join(Archive::DB_FILE);
        let root = root.as_ref().to_path_buf();

        std::fs::create_dir_all(&raw_root)?; // The folder to keep the raw text files.

        // Create and set up the archive
        let db_conn = rusqlite::Connection::open_with_flags(
            db_file,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE | rusqlite::OpenFlags::SQLITE_OPEN_CREATE,
        )?;

        db_conn.execute_batch(&Self::create_table_sql(true))?;
        Self::validate_db_structure(&db_conn)?;

        Ok(Archive {
            root,
            db_conn,
            raw_files: BTreeMap::new(),
        })
    }

    /// Open an existing archive.
    pub fn connect(root: &dyn AsRef<Path>) -> Result<Self, ShipsDataErr> {
        let db_file = root.as_ref().join(Archive::DB_FILE);
        let root = root.as_ref().to_path_buf();

        // Create and set up the archive
        let db_conn = rusqlite::Connection::open_with_flags(
            db_file,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE,
        )?;

        Self::validate_db_structure(&db_conn)?;

        Ok(Archive {
            root,
            db_conn,
            raw_files: BTreeMap::new(),
        })
    }

    /// Retrieve a path to the root. Allows caller to store files in the archive.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the directory the raw text files are expected in.
    pub fn raw_root(&self) -> PathBuf {
        self.root.join(Archive::RAW_DIR)
    }

    /// Where the raw text file for a basin is read from during a rebuild.
    pub fn raw_file(&self, basin: Basin) -> PathBuf {
        self.raw_files
            .get(&basin)
            .cloned()
            .unwrap_or_else(|| self.raw_root().join(basin.raw_file_name()))
    }

    /// Read the raw text file for a basin from somewhere other than the raw directory.
    pub fn set_raw_file(&mut self, basin: Basin, path: PathBuf) {
        self.raw_files.insert(basin, path);
    }

    /// Direct access to the database for queries this crate does not provide.
    pub fn connection(&self) -> &rusqlite::Connection {
        &self.db_conn
    }

    /// SQL to create the diagnostics table, one integer column per parameter.
    pub(crate) fn create_table_sql(if_not_exists: bool) -> String {
        let columns: Vec<String> = Diag::iter()
            .map(|diag| format!("\"{}\" INTEGER", diag.name()))
            .collect();

        format!(
            "CREATE TABLE {} {} (
                ATCF_ID TEXT NOT NULL,
                TIME TEXT NOT NULL,
                {},
                PRIMARY KEY (ATCF_ID, TIME)
            );",
            if if_not_exists { "IF NOT EXISTS" } else { "" },
            Archive::TABLE,
            columns.join(",\n                ")
        )
    }

    /// Names of the columns in the order they are in the table.
    pub(crate) fn column_names() -> Vec<&'static str> {
        let mut names = vec!["ATCF_ID", "TIME"];
        names.extend(Diag::iter().map(Diag::name));
        names
    }

    /// Validate the database structure is correct.
    fn validate_db_structure(db_conn: &rusqlite::Connection) -> Result<(), ShipsDataErr> {
        let mut stmt = db_conn.prepare(&format!("PRAGMA table_info(\"{}\")", Archive::TABLE))?;

        let columns: Result<Vec<String>, ShipsDataErr> = stmt
            .query_map(rusqlite::NO_PARAMS, |row| row.get::<_, String>(1))?
            .map(|res| res.map_err(ShipsDataErr::Database))
            .collect();

        if columns? != Self::column_names() {
            return Err(ShipsDataErr::InvalidSchema);
        }

        Ok(())
    }
}
