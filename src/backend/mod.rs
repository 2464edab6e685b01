//! Document backend abstraction layer.
//!
//! Each document family has a trait that turns staged content into the
//! bytes of a saved file. Every family has two implementations: a real one
//! backed by a document library (compiled in through a Cargo feature) and
//! the [`DummyBackend`], which writes a fixed placeholder instead.

mod dummy;

#[cfg(feature = "word")]
mod docx;
#[cfg(feature = "powerpoint")]
mod ooxml;
#[cfg(feature = "powerpoint")]
mod pptx;
#[cfg(feature = "excel")]
mod xlsx;

pub use dummy::{DummyBackend, PLACEHOLDER};

#[cfg(feature = "word")]
pub use docx::DocxBackend;
#[cfg(feature = "powerpoint")]
pub use pptx::PptxBackend;
#[cfg(feature = "excel")]
pub use xlsx::XlsxBackend;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{DocumentContent, PresentationContent, WorkbookContent};

/// Document families handled by the facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Word,
    Excel,
    PowerPoint,
}

impl Family {
    /// All families, in resolution order.
    pub const ALL: [Family; 3] = [Family::Word, Family::Excel, Family::PowerPoint];

    /// Lowercase family name.
    pub fn name(self) -> &'static str {
        match self {
            Family::Word => "word",
            Family::Excel => "excel",
            Family::PowerPoint => "powerpoint",
        }
    }

    /// File extension of the real output, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Family::Word => "docx",
            Family::Excel => "xlsx",
            Family::PowerPoint => "pptx",
        }
    }

    /// Whether the real backend for this family was compiled in.
    pub fn is_compiled(self) -> bool {
        match self {
            Family::Word => cfg!(feature = "word"),
            Family::Excel => cfg!(feature = "excel"),
            Family::PowerPoint => cfg!(feature = "powerpoint"),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Family {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "word" | "docx" => Ok(Family::Word),
            "excel" | "xlsx" => Ok(Family::Excel),
            "powerpoint" | "ppt" | "pptx" => Ok(Family::PowerPoint),
            other => Err(Error::UnknownFamily(other.to_string())),
        }
    }
}

/// Which kind of backend is serving a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Library-backed, writes conformant packages
    Real,
    /// Writes the fixed placeholder
    Dummy,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Real => f.write_str("real"),
            BackendKind::Dummy => f.write_str("dummy"),
        }
    }
}

/// Behaviour shared by all backends.
pub trait Backend: Send + Sync {
    /// Real or dummy.
    fn kind(&self) -> BackendKind;

    /// Short backend name, for diagnostics.
    fn name(&self) -> &str;
}

/// Renders Word documents.
pub trait WordBackend: Backend {
    /// Produce the bytes of the saved `.docx` file.
    fn render_document(&self, content: &DocumentContent) -> Result<Vec<u8>>;
}

/// Renders Excel workbooks.
pub trait ExcelBackend: Backend {
    /// Produce the bytes of the saved `.xlsx` file.
    fn render_workbook(&self, content: &WorkbookContent) -> Result<Vec<u8>>;
}

/// Renders PowerPoint presentations.
pub trait PowerPointBackend: Backend {
    /// Produce the bytes of the saved `.pptx` file.
    fn render_presentation(&self, content: &PresentationContent) -> Result<Vec<u8>>;
}

/// Acquire the real Word backend, if compiled in.
pub fn real_word() -> Result<Arc<dyn WordBackend>> {
    #[cfg(feature = "word")]
    {
        Ok(Arc::new(DocxBackend::new()))
    }
    #[cfg(not(feature = "word"))]
    {
        Err(not_compiled(Family::Word))
    }
}

/// Acquire the real Excel backend, if compiled in.
pub fn real_excel() -> Result<Arc<dyn ExcelBackend>> {
    #[cfg(feature = "excel")]
    {
        Ok(Arc::new(XlsxBackend::new()))
    }
    #[cfg(not(feature = "excel"))]
    {
        Err(not_compiled(Family::Excel))
    }
}

/// Acquire the real PowerPoint backend, if compiled in.
pub fn real_powerpoint() -> Result<Arc<dyn PowerPointBackend>> {
    #[cfg(feature = "powerpoint")]
    {
        Ok(Arc::new(PptxBackend::new()))
    }
    #[cfg(not(feature = "powerpoint"))]
    {
        Err(not_compiled(Family::PowerPoint))
    }
}

#[cfg(not(all(feature = "word", feature = "excel", feature = "powerpoint")))]
fn not_compiled(family: Family) -> Error {
    Error::CapabilityUnavailable {
        family,
        reason: format!("built without the `{}` feature", family.name()),
    }
}
