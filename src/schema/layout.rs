//! Header resolution
//!
//! Maps each [`SourceColumn`] to its position in the input header. Header
//! columns that are not source columns (the unnamed row index every dump
//! starts with, for one) are never selected and so are dropped.

use super::types::SourceColumn;
use crate::error::{Error, Result};

const BOM: char = '\u{feff}';

/// Positions of the source columns within an input row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLayout {
    positions: [usize; SourceColumn::ALL.len()],
    width: usize,
}

impl SourceLayout {
    /// Resolve column positions from header cells
    ///
    /// Cells are compared after trimming whitespace and a leading byte
    /// order mark. The first matching cell wins.
    pub fn from_header<'a, I>(header: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let cells: Vec<&str> = header
            .into_iter()
            .map(|cell| cell.trim_start_matches(BOM).trim())
            .collect();

        let mut positions = [0usize; SourceColumn::ALL.len()];
        for column in SourceColumn::ALL {
            positions[column.slot()] = cells
                .iter()
                .position(|cell| *cell == column.header())
                .ok_or_else(|| Error::missing_column(column.header()))?;
        }

        Ok(Self {
            positions,
            width: cells.len(),
        })
    }

    /// Position of a source column in an input row
    pub fn position(&self, column: SourceColumn) -> usize {
        self.positions[column.slot()]
    }

    /// Number of fields a well-formed row has
    pub fn width(&self) -> usize {
        self.width
    }
}
