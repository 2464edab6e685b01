//! Placeholder backend used when a real backend is unavailable.

use super::{Backend, BackendKind, ExcelBackend, PowerPointBackend, WordBackend};
use crate::error::Result;
use crate::model::{DocumentContent, PresentationContent, WorkbookContent};

/// Bytes written by every dummy save, whatever the family or content.
///
/// Not a ZIP container, so Office readers reject it instead of opening an
/// empty document.
pub const PLACEHOLDER: &[u8; 22] = b"OFFICEKIT-PLACEHOLDER\n";

/// Backend that accepts all content and saves [`PLACEHOLDER`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DummyBackend;

impl DummyBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Backend for DummyBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Dummy
    }

    fn name(&self) -> &str {
        "dummy"
    }
}

impl WordBackend for DummyBackend {
    fn render_document(&self, content: &DocumentContent) -> Result<Vec<u8>> {
        log::debug!("dummy document: discarding {} blocks", content.len());
        Ok(PLACEHOLDER.to_vec())
    }
}

impl ExcelBackend for DummyBackend {
    fn render_workbook(&self, content: &WorkbookContent) -> Result<Vec<u8>> {
        log::debug!("dummy workbook: discarding {} sheets", content.sheets.len());
        Ok(PLACEHOLDER.to_vec())
    }
}

impl PowerPointBackend for DummyBackend {
    fn render_presentation(&self, content: &PresentationContent) -> Result<Vec<u8>> {
        log::debug!(
            "dummy presentation: discarding {} slides",
            content.slide_count()
        );
        Ok(PLACEHOLDER.to_vec())
    }
}
