//! SpreadsheetML (.xlsx) backend backed by `rust_xlsxwriter`.

use rust_xlsxwriter::{Formula, Workbook, XlsxError};

use super::{Backend, BackendKind, ExcelBackend};
use crate::error::{Error, Result};
use crate::model::{CellValue, WorkbookContent, Worksheet};

/// Sheet written when a workbook is saved without any worksheets.
const DEFAULT_SHEET: &str = "Sheet1";

/// Writes workbooks through the `rust_xlsxwriter` object model.
#[derive(Debug, Clone, Default)]
pub struct XlsxBackend {
    _private: (),
}

impl XlsxBackend {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Backend for XlsxBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Real
    }

    fn name(&self) -> &str {
        "xlsx"
    }
}

impl ExcelBackend for XlsxBackend {
    fn render_workbook(&self, content: &WorkbookContent) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();

        if content.sheets.is_empty() {
            workbook.add_worksheet().set_name(DEFAULT_SHEET).map_err(xlsx_error)?;
        }
        for (i, sheet) in content.sheets.iter().enumerate() {
            let target = workbook.add_worksheet();
            write_sheet(target, sheet).map_err(xlsx_error)?;
            if i == content.active {
                target.set_active(true);
            }
        }

        let bytes = workbook.save_to_buffer().map_err(xlsx_error)?;
        log::debug!("xlsx: rendered {} worksheets", content.sheets.len());
        Ok(bytes)
    }
}

fn write_sheet(
    target: &mut rust_xlsxwriter::Worksheet,
    sheet: &Worksheet,
) -> std::result::Result<(), XlsxError> {
    target.set_name(&sheet.name)?;

    for (&column, &width) in &sheet.column_widths {
        target.set_column_width(col_index(column)?, width)?;
    }

    for (&(row, column), value) in &sheet.cells {
        // model positions are 1-based, the writer's are 0-based
        let (r, c) = (row - 1, col_index(column)?);
        match value {
            CellValue::Text(s) => {
                target.write_string(r, c, s)?;
            }
            CellValue::Number(n) => {
                target.write_number(r, c, *n)?;
            }
            CellValue::Bool(b) => {
                target.write_boolean(r, c, *b)?;
            }
            CellValue::Formula(f) => {
                target.write_formula(r, c, Formula::new(f))?;
            }
            CellValue::Empty => {}
        }
    }
    Ok(())
}

fn col_index(column: u32) -> std::result::Result<u16, XlsxError> {
    column
        .checked_sub(1)
        .and_then(|c| u16::try_from(c).ok())
        .ok_or(XlsxError::RowColumnLimitError)
}

fn xlsx_error(err: XlsxError) -> Error {
    Error::Backend(format!("xlsx writing failed: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
    use std::io::{Cursor, Read};

    fn open(bytes: Vec<u8>) -> Xlsx<Cursor<Vec<u8>>> {
        open_workbook_from_rs(Cursor::new(bytes)).unwrap()
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut out = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut out)
            .unwrap();
        out
    }

    fn number(value: Option<&Data>) -> f64 {
        match value {
            Some(Data::Float(f)) => *f,
            Some(Data::Int(i)) => *i as f64,
            other => panic!("expected a number, got {other:?}"),
        }
    }

    #[test]
    fn test_render_cells() {
        let mut wb = WorkbookContent::new();
        wb.add_worksheet("Data")
            .unwrap()
            .cell(1, 1, "Name & Age")
            .unwrap()
            .cell(1, 2, 28)
            .unwrap()
            .cell(2, 1, true)
            .unwrap()
            .cell(2, 2, "=B1*2")
            .unwrap();

        let mut book = open(XlsxBackend::new().render_workbook(&wb).unwrap());
        let range = book.worksheet_range("Data").unwrap();
        assert_eq!(
            range.get_value((0, 0)),
            Some(&Data::String("Name & Age".to_string()))
        );
        assert_eq!(number(range.get_value((0, 1))), 28.0);
        assert_eq!(range.get_value((1, 0)), Some(&Data::Bool(true)));

        let formulas = book.worksheet_formula("Data").unwrap();
        assert_eq!(formulas.get_value((1, 1)).map(String::as_str), Some("B1*2"));
    }

    #[test]
    fn test_sheet_order_and_names() {
        let mut wb = WorkbookContent::new();
        wb.add_worksheet("Summary").unwrap();
        wb.add_worksheet("Raw <data>").unwrap();

        let book = open(XlsxBackend::new().render_workbook(&wb).unwrap());
        assert_eq!(book.sheet_names(), vec!["Summary", "Raw <data>"]);
    }

    #[test]
    fn test_empty_workbook_gets_default_sheet() {
        let book = open(
            XlsxBackend::new()
                .render_workbook(&WorkbookContent::new())
                .unwrap(),
        );
        assert_eq!(book.sheet_names(), vec!["Sheet1"]);
    }

    #[test]
    fn test_active_sheet() {
        let mut wb = WorkbookContent::new();
        wb.add_worksheet("One").unwrap();
        wb.add_worksheet("Two").unwrap();
        wb.set_active("Two").unwrap();

        let bytes = XlsxBackend::new().render_workbook(&wb).unwrap();
        assert!(read_part(&bytes, "xl/workbook.xml").contains(r#"activeTab="1""#));
    }

    #[test]
    fn test_column_widths() {
        let mut wb = WorkbookContent::new();
        wb.add_worksheet("S")
            .unwrap()
            .set_column_width(3, 18.5)
            .unwrap();
        let bytes = XlsxBackend::new().render_workbook(&wb).unwrap();
        let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains(r#"<col min="3" max="3""#));
        assert!(sheet.contains(r#"customWidth="1""#));
    }

    #[test]
    fn test_col_index() {
        assert_eq!(col_index(1).unwrap(), 0);
        assert_eq!(col_index(16_384).unwrap(), 16_383);
        assert!(col_index(0).is_err());
    }
}
