//! Content model staged by document handles.
//!
//! Both real and dummy backends receive the same model, so argument
//! validation happens here, at the call site, and never at save time.

mod document;
mod presentation;
mod table;
mod workbook;

pub use document::{Alignment, Block, DocumentContent, MAX_HEADING_LEVEL};
pub use presentation::{PresentationContent, Rect, Slide, SlideLayout, TextBox};
pub use table::TableData;
pub use workbook::{
    cell_reference, column_letter, parse_cell_reference, validate_sheet_name, CellValue,
    WorkbookContent, Worksheet, MAX_COLUMN, MAX_ROW, MAX_SHEET_NAME_LEN,
};
