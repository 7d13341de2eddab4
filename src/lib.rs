#![deny(missing_docs)]
//! Package to manage and interface with an archive of SHIPS tropical cyclone diagnostics.
//!
//! The raw CIRA developmental data files for the Atlantic, eastern Pacific, and central Pacific
//! basins are parsed into an sqlite database, one row per storm per synoptic time. Queries hand
//! back a storm's diagnostics as time series converted to output units.

//
// Public API
//
pub use archive::{default_root, Archive, BasinReport, RebuildSummary};
pub use atcf::AtcfId;
pub use basin::Basin;
pub use diag::{get_diag_names, validate_diag_names, Conversion, Diag, ParameterDescriptor, MISSING};
pub use errors::ShipsDataErr;
pub use observation::Observation;
pub use parser::{ParseSummary, ParsedBasin};
pub use series::{StormSnapshot, StormTimeSeries, TIME_KEY};

pub mod parser;

//
// Implementation only
//
mod archive;
mod atcf;
mod basin;
mod diag;
mod errors;
mod observation;
mod series;
