//! Workbook, worksheet and cell types.

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Largest row index supported by the xlsx format.
pub const MAX_ROW: u32 = 1_048_576;
/// Largest column index supported by the xlsx format.
pub const MAX_COLUMN: u32 = 16_384;
/// Longest allowed worksheet name.
pub const MAX_SHEET_NAME_LEN: usize = 31;

const INVALID_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

/// Staged content of a workbook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkbookContent {
    /// Worksheets in the order they were added
    pub sheets: Vec<Worksheet>,

    /// Index of the sheet shown when the file is opened
    pub active: usize,
}

impl WorkbookContent {
    /// Create an empty workbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a worksheet and return it for editing.
    pub fn add_worksheet(&mut self, name: &str) -> Result<&mut Worksheet> {
        validate_sheet_name(name)?;
        if self.position(name).is_some() {
            return Err(Error::invalid(format!(
                "worksheet '{}' already exists",
                name
            )));
        }
        self.sheets.push(Worksheet::new(name));
        let last = self.sheets.len() - 1;
        Ok(&mut self.sheets[last])
    }

    /// Get a worksheet by name (case-insensitive).
    pub fn worksheet(&self, name: &str) -> Option<&Worksheet> {
        self.position(name).map(|i| &self.sheets[i])
    }

    /// Get a mutable worksheet by name (case-insensitive).
    pub fn worksheet_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        self.position(name).map(move |i| &mut self.sheets[i])
    }

    /// Make the named sheet the active one.
    pub fn set_active(&mut self, name: &str) -> Result<()> {
        self.active = self
            .position(name)
            .ok_or_else(|| Error::invalid(format!("no worksheet named '{}'", name)))?;
        Ok(())
    }

    /// Names of all worksheets in order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        let wanted = name.to_lowercase();
        self.sheets.iter().position(|s| s.name.to_lowercase() == wanted)
    }
}

/// A single worksheet with a sparse cell grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worksheet {
    /// Sheet name
    pub name: String,

    /// Cells keyed by 1-based (row, column)
    #[serde(with = "cell_entries")]
    pub cells: BTreeMap<(u32, u32), CellValue>,

    /// Column widths in character units, keyed by 1-based column
    pub column_widths: BTreeMap<u32, f64>,
}

impl Worksheet {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cells: BTreeMap::new(),
            column_widths: BTreeMap::new(),
        }
    }

    /// Set a cell by 1-based row and column.
    pub fn cell(&mut self, row: u32, column: u32, value: impl Into<CellValue>) -> Result<&mut Self> {
        check_position(row, column)?;
        let value = value.into();
        check_value(row, column, &value)?;
        self.store(row, column, value);
        Ok(self)
    }

    /// Insert an already validated value.
    fn store(&mut self, row: u32, column: u32, value: CellValue) {
        log::debug!("{}: set ({}, {})", self.name, row, column);
        if value == CellValue::Empty {
            self.cells.remove(&(row, column));
        } else {
            self.cells.insert((row, column), value);
        }
    }

    /// Set a cell by A1-style reference (e.g. `"B12"`).
    pub fn set_cell(&mut self, reference: &str, value: impl Into<CellValue>) -> Result<&mut Self> {
        let (row, column) = parse_cell_reference(reference)?;
        self.cell(row, column, value)
    }

    /// Get a cell by 1-based row and column.
    pub fn get(&self, row: u32, column: u32) -> Option<&CellValue> {
        self.cells.get(&(row, column))
    }

    /// Get a cell by A1-style reference.
    pub fn get_cell(&self, reference: &str) -> Result<Option<&CellValue>> {
        let (row, column) = parse_cell_reference(reference)?;
        Ok(self.get(row, column))
    }

    /// Set a column width in character units (`0 < width <= 255`).
    pub fn set_column_width(&mut self, column: u32, width: f64) -> Result<&mut Self> {
        check_position(1, column)?;
        if !(width > 0.0 && width <= 255.0) {
            return Err(Error::invalid(format!(
                "column width {} outside (0, 255]",
                width
            )));
        }
        self.column_widths.insert(column, width);
        Ok(self)
    }

    /// Write a block of rows starting at the given 1-based position.
    ///
    /// Rows may differ in length. Nothing is written if any cell would fall
    /// outside the sheet or holds an invalid value.
    pub fn add_table<R, C>(&mut self, data: R, start_row: u32, start_column: u32) -> Result<&mut Self>
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<CellValue>,
    {
        check_position(start_row, start_column)?;
        let mut staged = Vec::new();
        for (i, row) in data.into_iter().enumerate() {
            for (j, value) in row.into_iter().enumerate() {
                let r = offset(start_row, i)?;
                let c = offset(start_column, j)?;
                check_position(r, c)?;
                let value = value.into();
                check_value(r, c, &value)?;
                staged.push(((r, c), value));
            }
        }
        for ((r, c), value) in staged {
            self.store(r, c, value);
        }
        Ok(self)
    }

    /// Number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Largest used (row, column), or `None` for an empty sheet.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        let max_row = self.cells.keys().map(|(r, _)| *r).max()?;
        let max_col = self.cells.keys().map(|(_, c)| *c).max()?;
        Some((max_row, max_col))
    }

    /// Cells grouped by row, both in ascending order.
    pub fn rows(&self) -> Vec<(u32, Vec<(u32, &CellValue)>)> {
        let mut rows: Vec<(u32, Vec<(u32, &CellValue)>)> = Vec::new();
        for (&(r, c), value) in &self.cells {
            match rows.last_mut() {
                Some((row, cells)) if *row == r => cells.push((c, value)),
                _ => rows.push((r, vec![(c, value)])),
            }
        }
        rows
    }
}

/// Value stored in a worksheet cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    /// Formula without the leading `=`
    Formula(String),
    Empty,
}

impl CellValue {
    /// Literal text, never interpreted as a formula.
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// Display form of the value.
    pub fn display(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::Formula(f) => format!("={}", f),
            CellValue::Empty => String::new(),
        }
    }
}

/// Strings starting with `=` become formulas, as spreadsheet applications
/// treat typed input.
impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        match s.strip_prefix('=') {
            Some(formula) if !formula.is_empty() => CellValue::Formula(formula.to_string()),
            _ => CellValue::Text(s.to_string()),
        }
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::from(s.as_str())
    }
}

impl From<&String> for CellValue {
    fn from(s: &String) -> Self {
        CellValue::from(s.as_str())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<f32> for CellValue {
    fn from(n: f32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

impl From<u32> for CellValue {
    fn from(n: u32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

/// Check a worksheet name against the xlsx naming rules.
pub fn validate_sheet_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::invalid("worksheet name is empty"));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(Error::invalid(format!(
            "worksheet name '{}' longer than {} characters",
            name, MAX_SHEET_NAME_LEN
        )));
    }
    if let Some(c) = name.chars().find(|c| INVALID_SHEET_CHARS.contains(c)) {
        return Err(Error::invalid(format!(
            "worksheet name '{}' contains '{}'",
            name, c
        )));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(Error::invalid(format!(
            "worksheet name '{}' starts or ends with an apostrophe",
            name
        )));
    }
    Ok(())
}

/// Parse an A1-style reference into 1-based (row, column).
///
/// Absolute markers (`$B$12`) are accepted and ignored.
pub fn parse_cell_reference(reference: &str) -> Result<(u32, u32)> {
    static CELL_REF: OnceLock<Regex> = OnceLock::new();
    let re = CELL_REF
        .get_or_init(|| Regex::new(r"^\$?([A-Za-z]{1,3})\$?([0-9]{1,7})$").expect("valid pattern"));

    let caps = re
        .captures(reference.trim())
        .ok_or_else(|| Error::InvalidCellReference(reference.to_string()))?;

    let column = caps[1]
        .chars()
        .fold(0u32, |acc, ch| acc * 26 + (ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1));
    let row: u32 = caps[2]
        .parse()
        .map_err(|_| Error::InvalidCellReference(reference.to_string()))?;

    check_position(row, column).map_err(|_| Error::InvalidCellReference(reference.to_string()))?;
    Ok((row, column))
}

/// Column letters for a 1-based column index (1 → `A`, 27 → `AA`).
pub fn column_letter(mut column: u32) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        column = (column - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// A1-style reference for a 1-based position.
pub fn cell_reference(row: u32, column: u32) -> String {
    format!("{}{}", column_letter(column), row)
}

fn check_position(row: u32, column: u32) -> Result<()> {
    if row == 0 || row > MAX_ROW {
        return Err(Error::invalid(format!("row {} outside 1..={}", row, MAX_ROW)));
    }
    if column == 0 || column > MAX_COLUMN {
        return Err(Error::invalid(format!(
            "column {} outside 1..={}",
            column, MAX_COLUMN
        )));
    }
    Ok(())
}

fn check_value(row: u32, column: u32, value: &CellValue) -> Result<()> {
    match value {
        CellValue::Number(n) if !n.is_finite() => Err(Error::invalid(format!(
            "cell ({}, {}) number {} is not finite",
            row, column, n
        ))),
        _ => Ok(()),
    }
}

/// Cells travel as a list of `{row, column, value}` entries, since JSON
/// object keys must be strings.
mod cell_entries {
    use super::{check_position, check_value, CellValue};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    #[derive(Serialize, Deserialize)]
    struct Entry<V> {
        row: u32,
        column: u32,
        value: V,
    }

    pub(super) fn serialize<S: Serializer>(
        cells: &BTreeMap<(u32, u32), CellValue>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(
            cells
                .iter()
                .map(|(&(row, column), value)| Entry { row, column, value }),
        )
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<(u32, u32), CellValue>, D::Error> {
        let entries = Vec::<Entry<CellValue>>::deserialize(deserializer)?;
        let mut cells = BTreeMap::new();
        for Entry { row, column, value } in entries {
            check_position(row, column)
                .and_then(|_| check_value(row, column, &value))
                .map_err(D::Error::custom)?;
            if value != CellValue::Empty {
                cells.insert((row, column), value);
            }
        }
        Ok(cells)
    }
}

fn offset(start: u32, delta: usize) -> Result<u32> {
    u32::try_from(delta)
        .ok()
        .and_then(|d| start.checked_add(d))
        .ok_or_else(|| Error::invalid("table does not fit in the worksheet"))
}
