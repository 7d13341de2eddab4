//! Diagnostics collected while parsing a raw file.

use std::{collections::BTreeSet, fmt::Display};

/// Why a block was skipped.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlockErrorKind {
    /// The HEAD line could not be understood.
    BadHeader(String),
    /// No TIME line in the block.
    MissingTimeLine,
    /// The TIME line has no analysis (hour 0) column.
    NoAnalysisColumn,
    /// A parameter line does not have the same number of values as the TIME line.
    FieldCount { name: String, expected: usize },
    /// A value could not be parsed as an integer.
    BadValue { name: String, field: String },
    /// The block had no known parameters.
    NoParameters,
    /// A line that is not inside any block.
    StrayLine,
}

impl Display for BlockErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        use BlockErrorKind::*;

        match self {
            BadHeader(msg) => write!(f, "bad header: {}", msg),
            MissingTimeLine => write!(f, "missing TIME line"),
            NoAnalysisColumn => write!(f, "no hour 0 column"),
            FieldCount { name, expected } => {
                write!(f, "{} does not have {} values", name, expected)
            }
            BadValue { name, field } => write!(f, "bad value for {}: '{}'", name, field),
            NoParameters => write!(f, "no known parameters"),
            StrayLine => write!(f, "line outside of a storm block"),
        }
    }
}

/// A block that was skipped while parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockError {
    /// Line number (starting at 1) where the problem was found.
    pub line: usize,
    /// What went wrong.
    pub kind: BlockErrorKind,
}

impl Display for BlockError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

/// Counts of what happened to each block of a file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseSummary {
    /// Number of blocks found.
    pub blocks: usize,
    /// Blocks turned into observations.
    pub parsed: usize,
    /// Blocks for storms outside the supported basins.
    pub excluded: usize,
    /// Blocks for a storm and time that was already parsed.
    pub duplicates: usize,
    /// Blocks (or lines) that were skipped.
    pub errors: Vec<BlockError>,
    /// Parameter names found in the file that are not kept in the archive.
    pub unknown: BTreeSet<String>,
}

impl ParseSummary {
    /// Add the counts from another summary.
    pub fn merge(&mut self, other: &ParseSummary) {
        self.blocks += other.blocks;
        self.parsed += other.parsed;
        self.excluded += other.excluded;
        self.duplicates += other.duplicates;
        self.errors.extend(other.errors.iter().cloned());
        self.unknown.extend(other.unknown.iter().cloned());
    }
}

impl Display for ParseSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        write!(
            f,
            "{} blocks, {} parsed, {} excluded, {} duplicates, {} errors",
            self.blocks,
            self.parsed,
            self.excluded,
            self.duplicates,
            self.errors.len()
        )?;

        if !self.unknown.is_empty() {
            let names: Vec<&str> = self.unknown.iter().map(String::as_str).collect();
            write!(f, ", unknown parameters: {}", names.join(" "))?;
        }

        Ok(())
    }
}
