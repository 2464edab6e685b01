//! Output format detection.

use crate::backend::PLACEHOLDER;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Kind of file produced by a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// ZIP-based Office Open XML package written by a real backend
    Container,
    /// Fixed marker written by the dummy backend
    Placeholder,
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputKind::Container => write!(f, "office package"),
            OutputKind::Placeholder => write!(f, "placeholder"),
        }
    }
}

/// ZIP local file header magic: PK\x03\x04
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Detect the output kind of a saved file.
///
/// # Example
/// ```no_run
/// use officekit::detect::{detect_output_from_path, OutputKind};
///
/// let kind = detect_output_from_path("report.docx").unwrap();
/// if kind == OutputKind::Placeholder {
///     println!("saved without a real backend");
/// }
/// ```
pub fn detect_output_from_path<P: AsRef<Path>>(path: P) -> Result<OutputKind> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = Vec::with_capacity(PLACEHOLDER.len());
    reader
        .by_ref()
        .take(PLACEHOLDER.len() as u64 + 1)
        .read_to_end(&mut header)?;
    detect_output_from_bytes(&header)
}

/// Detect the output kind from the leading bytes of a file.
///
/// A placeholder must match exactly; trailing bytes mean the file is
/// something else.
///
/// # Returns
/// * `Ok(OutputKind)` for an OOXML container or the placeholder
/// * `Err(Error::UnknownFormat)` otherwise
pub fn detect_output_from_bytes(data: &[u8]) -> Result<OutputKind> {
    if data.starts_with(ZIP_MAGIC) {
        return Ok(OutputKind::Container);
    }
    if data == PLACEHOLDER.as_slice() {
        return Ok(OutputKind::Placeholder);
    }
    Err(Error::UnknownFormat)
}

/// Check if a saved file is the dummy placeholder.
pub fn is_placeholder<P: AsRef<Path>>(path: P) -> bool {
    matches!(detect_output_from_path(path), Ok(OutputKind::Placeholder))
}
