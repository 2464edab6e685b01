//! WordprocessingML (.docx) backend backed by `docx-rs`.

use std::io::Cursor;

use docx_rs::{
    AlignmentType, BreakType, Docx, Paragraph, Run, Style, StyleType, Table, TableCell, TableRow,
};

use super::{Backend, BackendKind, WordBackend};
use crate::error::{Error, Result};
use crate::model::{Alignment, Block, DocumentContent, TableData, MAX_HEADING_LEVEL};

/// Writes documents through the `docx-rs` object model.
#[derive(Debug, Clone, Default)]
pub struct DocxBackend {
    _private: (),
}

impl DocxBackend {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Backend for DocxBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Real
    }

    fn name(&self) -> &str {
        "docx"
    }
}

impl WordBackend for DocxBackend {
    fn render_document(&self, content: &DocumentContent) -> Result<Vec<u8>> {
        let mut docx = heading_styles(Docx::new());

        for block in &content.blocks {
            docx = match block {
                Block::Heading { text, level } => docx.add_paragraph(
                    Paragraph::new()
                        .add_run(Run::new().add_text(text.as_str()))
                        .style(&heading_style_id(*level)),
                ),
                Block::Paragraph { text, alignment } => docx.add_paragraph(
                    Paragraph::new()
                        .add_run(Run::new().add_text(text.as_str()))
                        .align(alignment_type(*alignment)),
                ),
                Block::Table(table) => docx.add_table(build_table(table)),
                Block::PageBreak => {
                    docx.add_paragraph(Paragraph::new().add_run(Run::new().add_break(BreakType::Page)))
                }
            };
        }

        let mut buf = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buf)
            .map_err(|e| Error::Backend(format!("docx packing failed: {}", e)))?;

        log::debug!("docx: rendered {} blocks", content.len());
        Ok(buf.into_inner())
    }
}

fn heading_style_id(level: u8) -> String {
    format!("Heading{}", level)
}

/// Register `Heading1`..`Heading9` so Word shows them as real headings.
fn heading_styles(mut docx: Docx) -> Docx {
    for level in 1..=MAX_HEADING_LEVEL {
        // half-points: 16pt for level 1 down to 11pt
        let size = 34usize.saturating_sub(usize::from(level) * 2).max(22);
        docx = docx.add_style(
            Style::new(heading_style_id(level), StyleType::Paragraph)
                .name(format!("heading {}", level))
                .size(size)
                .bold(),
        );
    }
    docx
}

fn alignment_type(alignment: Alignment) -> AlignmentType {
    match alignment {
        Alignment::Left => AlignmentType::Left,
        Alignment::Center => AlignmentType::Center,
        Alignment::Right => AlignmentType::Right,
        Alignment::Justify => AlignmentType::Both,
    }
}

fn build_table(table: &TableData) -> Table {
    let mut rows = Vec::with_capacity(table.row_count());
    if let Some(headers) = &table.headers {
        rows.push(build_row(headers, true));
    }
    for row in &table.rows {
        rows.push(build_row(row, false));
    }
    Table::new(rows)
}

fn build_row(cells: &[String], bold: bool) -> TableRow {
    TableRow::new(
        cells
            .iter()
            .map(|text| {
                let mut run = Run::new().add_text(text.as_str());
                if bold {
                    run = run.bold();
                }
                TableCell::new().add_paragraph(Paragraph::new().add_run(run))
            })
            .collect(),
    )
}
