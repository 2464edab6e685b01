//! # officekit
//!
//! Create Word, Excel and PowerPoint files through one facade.
//!
//! Each document family is backed by a real document backend when it is
//! compiled in (Cargo features `word`, `excel`, `powerpoint`) and not
//! disabled by configuration. Otherwise the family degrades to a dummy
//! backend with the same API, which writes a small fixed placeholder on
//! save. Resolution happens once per [`Office`] and reports every degraded
//! family exactly once.
//!
//! ## Quick Start
//!
//! ```no_run
//! use officekit::Office;
//!
//! fn main() -> officekit::Result<()> {
//!     let office = Office::new();
//!
//!     let mut doc = office.word().create_document();
//!     doc.add_heading("Quarterly Report", 1)?
//!         .add_paragraph("Revenue grew in every region.");
//!     doc.save("report.docx")?;
//!
//!     let mut wb = office.excel().create_workbook();
//!     wb.add_worksheet("Sales")?
//!         .set_cell("A1", "Region")?
//!         .set_cell("B1", 1250.5)?;
//!     wb.save("sales.xlsx")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Graceful degradation**: missing backends fall back to placeholders
//! - **Uniform API**: identical handle methods for real and dummy backends
//! - **Call-site validation**: invalid content fails before anything is staged
//! - **Configurable**: `OFFICEKIT_DUMMY` or a JSON file forces dummy mode

pub mod backend;
pub mod detect;
pub mod error;
pub mod handle;
pub mod model;
pub mod resolve;

// Re-export commonly used types
pub use backend::{BackendKind, Family, PLACEHOLDER};
pub use detect::{detect_output_from_bytes, detect_output_from_path, is_placeholder, OutputKind};
pub use error::{Error, Result};
pub use handle::{Presentation, Workbook, WordDocument};
pub use model::{
    Alignment, Block, CellValue, DocumentContent, PresentationContent, Rect, Slide, SlideLayout,
    TableData, TextBox, WorkbookContent, Worksheet,
};
pub use resolve::{
    BackendRegistry, Capabilities, DiagnosticSink, FallbackNotice, LogSink, Resolution,
    ResolveOptions, Resolver,
};

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use backend::{ExcelBackend, PowerPointBackend, WordBackend};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Entry point bound to one resolution of the document backends.
///
/// # Example
///
/// ```no_run
/// use officekit::{Family, Office, ResolveOptions};
///
/// let office = Office::with_options(ResolveOptions::new().disable(Family::Excel));
/// assert!(!office.capabilities().excel);
/// ```
#[derive(Debug, Clone)]
pub struct Office {
    resolution: Resolution,
}

impl Office {
    /// Resolve backends using `OFFICEKIT_DUMMY`, reporting to the log.
    pub fn new() -> Self {
        Self::with_options(ResolveOptions::from_env())
    }

    /// Resolve backends with explicit options, reporting to the log.
    pub fn with_options(options: ResolveOptions) -> Self {
        Self::from_resolution(Resolver::new(options).resolve())
    }

    /// Wrap an existing resolution.
    pub fn from_resolution(resolution: Resolution) -> Self {
        Self { resolution }
    }

    /// Process-wide facade, resolved on first use.
    pub fn global() -> &'static Office {
        static GLOBAL: OnceLock<Office> = OnceLock::new();
        GLOBAL.get_or_init(Office::new)
    }

    /// Word document factory.
    pub fn word(&self) -> WordProcessor {
        WordProcessor {
            backend: self.resolution.registry.word.clone(),
        }
    }

    /// Excel workbook factory.
    pub fn excel(&self) -> ExcelProcessor {
        ExcelProcessor {
            backend: self.resolution.registry.excel.clone(),
        }
    }

    /// PowerPoint presentation factory.
    pub fn powerpoint(&self) -> PowerPointProcessor {
        PowerPointProcessor {
            backend: self.resolution.registry.powerpoint.clone(),
        }
    }

    /// Capability flags fixed at resolution.
    pub fn capabilities(&self) -> Capabilities {
        self.resolution.capabilities
    }

    /// Backend kind serving a family.
    pub fn backend_kind(&self, family: Family) -> BackendKind {
        self.resolution.kind(family)
    }

    /// Fallback notices produced when this facade was resolved.
    pub fn notices(&self) -> &[FallbackNotice] {
        &self.resolution.notices
    }

    /// Summary of the library version and per-family backends.
    pub fn info(&self) -> OfficeInfo {
        let modules = Family::ALL
            .into_iter()
            .map(|family| {
                let backend = self.backend_kind(family);
                let info = ModuleInfo {
                    backend,
                    available: backend == BackendKind::Real,
                    compiled: family.is_compiled(),
                };
                (family, info)
            })
            .collect();

        OfficeInfo {
            version: VERSION.to_string(),
            modules,
        }
    }
}

impl Default for Office {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates Word documents bound to the resolved backend.
#[derive(Clone)]
pub struct WordProcessor {
    backend: Arc<dyn WordBackend>,
}

impl WordProcessor {
    pub fn create_document(&self) -> WordDocument {
        WordDocument::new(self.backend.clone())
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }
}

/// Creates Excel workbooks bound to the resolved backend.
#[derive(Clone)]
pub struct ExcelProcessor {
    backend: Arc<dyn ExcelBackend>,
}

impl ExcelProcessor {
    pub fn create_workbook(&self) -> Workbook {
        Workbook::new(self.backend.clone())
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }
}

/// Creates PowerPoint presentations bound to the resolved backend.
#[derive(Clone)]
pub struct PowerPointProcessor {
    backend: Arc<dyn PowerPointBackend>,
}

impl PowerPointProcessor {
    pub fn create_presentation(&self) -> Presentation {
        Presentation::new(self.backend.clone())
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }
}

/// Library and backend summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeInfo {
    /// Library version
    pub version: String,
    /// Backend per family
    pub modules: BTreeMap<Family, ModuleInfo>,
}

/// Backend state of one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    /// Backend serving the family
    pub backend: BackendKind,
    /// Whether saves produce real documents
    pub available: bool,
    /// Whether the real backend was compiled in
    pub compiled: bool,
}

/// Create a Word document with one paragraph per non-empty line.
///
/// Uses the process-wide [`Office::global`] facade.
///
/// # Example
///
/// ```no_run
/// officekit::quick_create_document("notes.docx", "first line\nsecond line").unwrap();
/// ```
pub fn quick_create_document<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let mut doc = Office::global().word().create_document();
    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        doc.add_paragraph(line);
    }
    doc.save(path)
}

/// Create a workbook whose `Sheet1` holds `rows`, starting at `A1`.
///
/// Uses the process-wide [`Office::global`] facade.
///
/// # Example
///
/// ```no_run
/// officekit::quick_create_spreadsheet(
///     "people.xlsx",
///     vec![vec!["Name", "City"], vec!["Ada", "London"]],
/// )
/// .unwrap();
/// ```
pub fn quick_create_spreadsheet<P, R, C>(path: P, rows: R) -> Result<()>
where
    P: AsRef<Path>,
    R: IntoIterator<Item = C>,
    C: IntoIterator,
    C::Item: Into<CellValue>,
{
    let mut wb = Office::global().excel().create_workbook();
    wb.add_worksheet("Sheet1")?.add_table(rows, 1, 1)?;
    wb.save(path)
}
