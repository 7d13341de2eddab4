//! Module for errors.
use crate::basin::Basin;
use chrono::NaiveDateTime;
use std::{error::Error, fmt::Display};

/// Error from the archive interface.
#[derive(Debug)]
pub enum ShipsDataErr {
    // Inherited errors from std
    /// Error forwarded from std
    IO(::std::io::Error),

    // Other forwarded errors
    /// Database error
    Database(::rusqlite::Error),
    /// General error with a message
    GeneralError(String),

    // My own errors from this crate
    /// No observation in the archive for this storm (and time, if one was requested).
    NotFound {
        /// The storm that was requested.
        atcf_id: String,
        /// The time that was requested, if any.
        time: Option<NaiveDateTime>,
    },
    /// The database structure is wrong.
    InvalidSchema,
    /// Not a known diagnostic parameter code.
    UnknownParameter(String),
    /// Not a well formed ATCF storm identifier.
    InvalidAtcfId(String),
    /// The basin is not one of those kept in the archive.
    UnsupportedBasin(String),
    /// A basin produced no observations, so it was left out of the rebuild.
    BasinUnavailable(Basin, String),
    /// Not enough data to complete the task.
    NoData,
    /// There was an internal logic error.
    LogicError(&'static str),
}

impl Display for ShipsDataErr {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        use crate::errors::ShipsDataErr::*;

        match self {
            IO(err) => write!(f, "std lib io error: {}", err),

            Database(err) => write!(f, "database error: {}", err),
            GeneralError(msg) => write!(f, "general error forwarded: {}", msg),

            NotFound {
                atcf_id,
                time: Some(time),
            } => write!(f, "no observation for {} at {}", atcf_id, time),
            NotFound {
                atcf_id,
                time: None,
            } => write!(f, "no observations for {}", atcf_id),
            InvalidSchema => write!(f, "invalid diagnostics table format"),
            UnknownParameter(name) => write!(f, "unknown diagnostic parameter: {}", name),
            InvalidAtcfId(id) => write!(f, "invalid atcf id: {}", id),
            UnsupportedBasin(basin) => write!(f, "unsupported basin: {}", basin),
            BasinUnavailable(basin, reason) => {
                write!(f, "data unavailable for basin {}: {}", basin, reason)
            }
            NoData => write!(f, "not enough data to complete task"),
            LogicError(msg) => write!(f, "internal logic error: {}", msg),
        }
    }
}

impl Error for ShipsDataErr {}

impl From<::std::io::Error> for ShipsDataErr {
    fn from(err: ::std::io::Error) -> ShipsDataErr {
        ShipsDataErr::IO(err)
    }
}

impl From<::rusqlite::Error> for ShipsDataErr {
    fn from(err: ::rusqlite::Error) -> ShipsDataErr {
        ShipsDataErr::Database(err)
    }
}
