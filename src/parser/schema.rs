//! Layout of the lines inside a storm block.

use super::summary::BlockErrorKind;
use crate::diag::MISSING;

/// Fixed width layout of a parameter line.
///
/// A line is `fields` right aligned integer columns, each `field_width` characters wide, followed
/// by the parameter name. Some lines carry an extra integer after the name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineSchema {
    field_width: usize,
    fields: usize,
}

impl LineSchema {
    /// Width of a value column in the CIRA lsdiag files.
    pub const FIELD_WIDTH: usize = 5;

    /// A schema for lines with `fields` values of the standard width.
    pub fn new(fields: usize) -> Self {
        Self::with_width(fields, Self::FIELD_WIDTH)
    }

    /// A schema with a non-standard field width.
    pub fn with_width(fields: usize, field_width: usize) -> Self {
        LineSchema {
            field_width,
            fields,
        }
    }

    /// Number of value columns.
    pub fn fields(&self) -> usize {
        self.fields
    }

    /// Get the name of a line, this works for any line in a block including the header.
    pub fn name(line: &str) -> Option<&str> {
        let mut tokens = line.split_whitespace().rev();
        let last = tokens.next()?;

        if last.chars().all(|c| c.is_ascii_digit()) {
            tokens.next()
        } else {
            Some(last)
        }
    }

    /// Decode all the values on a line. Missing values are `None`.
    pub fn values(&self, line: &str) -> Result<Vec<Option<i32>>, BlockErrorKind> {
        let name = Self::name(line).unwrap_or_default();
        let value_chars = self.fields * self.field_width;

        let field_count = || BlockErrorKind::FieldCount {
            name: name.to_owned(),
            expected: self.fields,
        };

        if !line.is_ascii() || line.len() < value_chars {
            return Err(field_count());
        }

        // Whatever follows the value columns must start with the name, otherwise there are too
        // many (or too few and wider) values on the line.
        let (value_part, rest) = line.split_at(value_chars);
        if rest.split_whitespace().next() != Some(name) {
            return Err(field_count());
        }

        (0..self.fields)
            .map(|i| &value_part[i * self.field_width..(i + 1) * self.field_width])
            .map(|field| {
                let field = field.trim();
                match field.parse::<i32>() {
                    Ok(MISSING) => Ok(None),
                    Ok(val) => Ok(Some(val)),
                    Err(_) => Err(BlockErrorKind::BadValue {
                        name: name.to_owned(),
                        field: field.to_owned(),
                    }),
                }
            })
            .collect()
    }

    /// Decode a line and keep only the value in column `index`.
    pub fn value_at(&self, line: &str, index: usize) -> Result<Option<i32>, BlockErrorKind> {
        let mut values = self.values(line)?;
        if index >= values.len() {
            return Err(BlockErrorKind::NoAnalysisColumn);
        }

        Ok(values.swap_remove(index))
    }
}
