//! Document handles.
//!
//! A handle owns the staged content of one document and the backend it was
//! created with. The method surface does not depend on the backend: every
//! argument is validated by the content model before anything is staged,
//! and only [`save`](WordDocument::save) touches the backend.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::backend::{BackendKind, ExcelBackend, PowerPointBackend, WordBackend};
use crate::error::{Error, Result};
use crate::model::{
    Alignment, DocumentContent, PresentationContent, Slide, SlideLayout, TableData, TextBox,
    WorkbookContent, Worksheet,
};

/// Write rendered bytes to `path`, creating parent directories.
///
/// Existing files are overwritten. Any failure is reported as
/// [`Error::Persistence`] for the target path.
fn persist(path: &Path, bytes: &[u8]) -> Result<()> {
    let fail = |source| Error::Persistence {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(fail)?;
    }
    let mut file = File::create(path).map_err(fail)?;
    file.write_all(bytes).map_err(fail)?;
    file.flush().map_err(fail)?;

    log::debug!("saved {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// A Word document being built.
pub struct WordDocument {
    content: DocumentContent,
    backend: Arc<dyn WordBackend>,
}

impl WordDocument {
    pub(crate) fn new(backend: Arc<dyn WordBackend>) -> Self {
        Self {
            content: DocumentContent::new(),
            backend,
        }
    }

    /// Append a heading. `level` must be between 1 and 9.
    pub fn add_heading(&mut self, text: impl Into<String>, level: u8) -> Result<&mut Self> {
        self.content.push_heading(text, level)?;
        Ok(self)
    }

    /// Append a left-aligned paragraph.
    pub fn add_paragraph(&mut self, text: impl Into<String>) -> &mut Self {
        self.content.push_paragraph(text, Alignment::Left);
        self
    }

    /// Append a paragraph with the given alignment.
    pub fn add_paragraph_aligned(
        &mut self,
        text: impl Into<String>,
        alignment: Alignment,
    ) -> &mut Self {
        self.content.push_paragraph(text, alignment);
        self
    }

    /// Append a table. Rows must all have the header's width.
    pub fn add_table<R, C>(&mut self, rows: R, headers: Option<Vec<String>>) -> Result<&mut Self>
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: ToString,
    {
        let table = TableData::new(rows, headers)?;
        self.content.push_table(table);
        Ok(self)
    }

    /// Append a page break.
    pub fn add_page_break(&mut self) -> &mut Self {
        self.content.push_page_break();
        self
    }

    /// Staged content.
    pub fn content(&self) -> &DocumentContent {
        &self.content
    }

    /// Backend kind this document saves with.
    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Render the staged content and write it to `path`.
    ///
    /// The handle stays usable; a later save writes the full content again.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.backend.render_document(&self.content)?;
        persist(path.as_ref(), &bytes)
    }
}

/// An Excel workbook being built.
pub struct Workbook {
    content: WorkbookContent,
    backend: Arc<dyn ExcelBackend>,
}

impl Workbook {
    pub(crate) fn new(backend: Arc<dyn ExcelBackend>) -> Self {
        Self {
            content: WorkbookContent::new(),
            backend,
        }
    }

    /// Append a worksheet and return it for filling.
    pub fn add_worksheet(&mut self, name: &str) -> Result<&mut Worksheet> {
        self.content.add_worksheet(name)
    }

    pub fn worksheet(&self, name: &str) -> Option<&Worksheet> {
        self.content.worksheet(name)
    }

    pub fn worksheet_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        self.content.worksheet_mut(name)
    }

    /// Make `name` the sheet shown when the file is opened.
    pub fn set_active(&mut self, name: &str) -> Result<&mut Self> {
        self.content.set_active(name)?;
        Ok(self)
    }

    /// Worksheet names in add order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.content.sheet_names()
    }

    /// Staged content.
    pub fn content(&self) -> &WorkbookContent {
        &self.content
    }

    /// Backend kind this workbook saves with.
    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Render the staged content and write it to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.backend.render_workbook(&self.content)?;
        persist(path.as_ref(), &bytes)
    }
}

/// A PowerPoint presentation being built.
pub struct Presentation {
    content: PresentationContent,
    backend: Arc<dyn PowerPointBackend>,
}

impl Presentation {
    pub(crate) fn new(backend: Arc<dyn PowerPointBackend>) -> Self {
        Self {
            content: PresentationContent::new(),
            backend,
        }
    }

    /// Append a slide and return it for filling.
    pub fn add_slide(&mut self, layout: SlideLayout) -> &mut Slide {
        self.content.add_slide(layout)
    }

    /// Append a slide by layout name. Unknown names use `title_and_content`.
    pub fn add_slide_named(&mut self, layout: &str) -> &mut Slide {
        self.content.add_slide(SlideLayout::from_name(layout))
    }

    /// Place a free text box on an existing slide.
    pub fn add_text(&mut self, slide_index: usize, text_box: TextBox) -> Result<&mut Self> {
        self.content.slide_mut(slide_index)?.add_text_box(text_box)?;
        Ok(self)
    }

    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.content.slide(index)
    }

    pub fn slide_count(&self) -> usize {
        self.content.slide_count()
    }

    /// Staged content.
    pub fn content(&self) -> &PresentationContent {
        &self.content
    }

    /// Backend kind this presentation saves with.
    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Render the staged content and write it to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.backend.render_presentation(&self.content)?;
        persist(path.as_ref(), &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DummyBackend, PLACEHOLDER};
    use tempfile::tempdir;

    fn dummy() -> Arc<DummyBackend> {
        Arc::new(DummyBackend::new())
    }

    #[test]
    fn test_word_validation_independent_of_backend() {
        let mut doc = WordDocument::new(dummy());
        assert!(doc.add_heading("too deep", 10).is_err());
        assert!(doc.add_table(vec![vec!["a"], vec!["b", "c"]], None).is_err());
        doc.add_heading("Title", 1).unwrap().add_paragraph("text");
        assert_eq!(doc.content().len(), 2);
        assert_eq!(doc.backend_kind(), BackendKind::Dummy);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("out.docx");

        WordDocument::new(dummy()).save(&path).unwrap();
        assert_eq!(fs::read(&path).unwrap(), PLACEHOLDER.to_vec());
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        fs::write(&path, vec![b'x'; 4096]).unwrap();

        Workbook::new(dummy()).save(&path).unwrap();
        assert_eq!(fs::read(&path).unwrap().len(), PLACEHOLDER.len());
    }

    #[test]
    fn test_save_into_file_as_directory_fails() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"file").unwrap();

        let err = Presentation::new(dummy())
            .save(blocker.join("out.pptx"))
            .unwrap_err();
        match err {
            Error::Persistence { path, .. } => assert!(path.ends_with("out.pptx")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_presentation_add_text_bounds() {
        let mut pres = Presentation::new(dummy());
        assert!(pres.add_text(0, TextBox::new("nowhere")).is_err());

        pres.add_slide_named("Title Only").set_title("Hello");
        pres.add_text(0, TextBox::new("note").with_font_size(18)).unwrap();
        assert_eq!(pres.slide_count(), 1);
        assert_eq!(pres.slide(0).unwrap().layout, SlideLayout::TitleOnly);
        assert_eq!(pres.slide(0).unwrap().text_boxes.len(), 1);
    }

    #[test]
    fn test_workbook_sheets() {
        let mut wb = Workbook::new(dummy());
        wb.add_worksheet("Data").unwrap().set_cell("B2", 3.5).unwrap();
        wb.add_worksheet("Summary").unwrap();
        assert!(wb.add_worksheet("data").is_err());
        wb.set_active("Summary").unwrap();

        assert_eq!(wb.sheet_names(), vec!["Data", "Summary"]);
        assert_eq!(wb.content().active, 1);
        assert_eq!(wb.worksheet("Data").unwrap().cell_count(), 1);
    }
}
