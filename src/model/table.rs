//! Table types.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A rectangular table of text cells with an optional header row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    /// Header row (rendered bold)
    pub headers: Option<Vec<String>>,

    /// Data rows
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    /// Build a table, rejecting payloads that are not rectangular.
    ///
    /// At least one row (header or data) is required and every row must
    /// have the same, non-zero number of columns.
    pub fn new<R, C>(rows: R, headers: Option<Vec<String>>) -> Result<Self>
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: ToString,
    {
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(|cell| cell.to_string()).collect())
            .collect();

        let table = Self { headers, rows };
        table.validate()?;
        Ok(table)
    }

    /// Check the table is non-empty and rectangular.
    pub fn validate(&self) -> Result<()> {
        let width = match self.all_rows().next() {
            Some(first) => first.len(),
            None => return Err(Error::invalid("table has no rows")),
        };
        if width == 0 {
            return Err(Error::invalid("table has no columns"));
        }
        for (i, row) in self.all_rows().enumerate() {
            if row.len() != width {
                return Err(Error::invalid(format!(
                    "table row {} has {} cells, expected {}",
                    i,
                    row.len(),
                    width
                )));
            }
        }
        Ok(())
    }

    /// Header row (if any) followed by the data rows.
    pub fn all_rows(&self) -> impl Iterator<Item = &Vec<String>> {
        self.headers.iter().chain(self.rows.iter())
    }

    /// Total number of rows including the header.
    pub fn row_count(&self) -> usize {
        self.rows.len() + usize::from(self.headers.is_some())
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.all_rows().next().map(Vec::len).unwrap_or(0)
    }
}
