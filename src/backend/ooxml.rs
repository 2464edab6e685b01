//! Office Open XML package writer for the PresentationML backend.

use std::borrow::Cow;
use std::io::{Cursor, Write};

use chrono::Utc;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;

pub(crate) const XML_HEADER: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

pub(crate) const NS_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const NS_PACKAGE_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_EXTENDED: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";

const APPLICATION: &str = "officekit";

/// In-memory ZIP package being assembled part by part.
pub(crate) struct Package {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl Package {
    pub(crate) fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
        }
    }

    /// Add one part.
    pub(crate) fn add(&mut self, name: &str, content: &str) -> Result<()> {
        self.zip.start_file(name, self.options)?;
        self.zip.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Add the content types, package relationships and document properties.
    ///
    /// `main_part` is the package-relative path of the main document part.
    pub(crate) fn add_boilerplate(&mut self, overrides: &[(String, &str)], main_part: &str) -> Result<()> {
        self.add("[Content_Types].xml", &content_types(overrides))?;
        self.add("_rels/.rels", &root_relationships(main_part))?;
        self.add("docProps/core.xml", &core_properties())?;
        self.add("docProps/app.xml", &app_properties())?;
        Ok(())
    }

    pub(crate) fn finish(self) -> Result<Vec<u8>> {
        let cursor = self.zip.finish()?;
        Ok(cursor.into_inner())
    }
}

/// Escape text for element content or attribute values.
///
/// Characters that XML 1.0 cannot carry at all are dropped.
pub(crate) fn escape(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        quick_xml::escape::escape(text)
    } else {
        let cleaned: String = text.chars().filter(|c| is_xml_char(*c)).collect();
        Cow::Owned(quick_xml::escape::escape(cleaned.as_str()).into_owned())
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

/// Relationship list for a part's `.rels` file: `(id, type, target)`.
pub(crate) fn relationships(rels: &[(String, &str, String)]) -> String {
    let mut xml = String::new();
    xml.push_str(XML_HEADER);
    xml.push_str(&format!(r#"<Relationships xmlns="{}">"#, NS_PACKAGE_RELS));
    for (id, rel_type, target) in rels {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            id,
            rel_type,
            escape(target)
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn content_types(overrides: &[(String, &str)]) -> String {
    let mut xml = String::new();
    xml.push_str(XML_HEADER);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    for (part, content_type) in overrides {
        xml.push_str(&format!(
            r#"<Override PartName="{}" ContentType="{}"/>"#,
            part, content_type
        ));
    }
    xml.push_str(r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#);
    xml.push_str(r#"<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#);
    xml.push_str("</Types>");
    xml
}

fn root_relationships(main_part: &str) -> String {
    relationships(&[
        ("rId1".to_string(), REL_OFFICE_DOCUMENT, main_part.to_string()),
        ("rId2".to_string(), REL_CORE, "docProps/core.xml".to_string()),
        ("rId3".to_string(), REL_EXTENDED, "docProps/app.xml".to_string()),
    ])
}

fn core_properties() -> String {
    let now = Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    format!(
        concat!(
            "{header}",
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            "<dc:creator>{app}</dc:creator>",
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">{now}</dcterms:created>"#,
            r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{now}</dcterms:modified>"#,
            "</cp:coreProperties>"
        ),
        header = XML_HEADER,
        app = APPLICATION,
        now = now
    )
}

fn app_properties() -> String {
    format!(
        r#"{}<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>{}</Application></Properties>"#,
        XML_HEADER, APPLICATION
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_escape() {
        assert_eq!(escape("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("bell\u{7}ring"), "bellring");
    }

    #[test]
    fn test_package_roundtrip() {
        let mut package = Package::new();
        package
            .add_boilerplate(
                &[("/main.xml".to_string(), "application/xml")],
                "main.xml",
            )
            .unwrap();
        package.add("main.xml", "<root/>").unwrap();
        let bytes = package.finish().unwrap();
        assert!(bytes.starts_with(b"PK\x03\x04"));

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut types = String::new();
        archive
            .by_name("[Content_Types].xml")
            .unwrap()
            .read_to_string(&mut types)
            .unwrap();
        assert!(types.contains(r#"PartName="/main.xml""#));
        assert!(archive.by_name("docProps/core.xml").is_ok());
    }

    #[test]
    fn test_relationships() {
        let xml = relationships(&[("rId1".to_string(), "t", "a&b.xml".to_string())]);
        assert!(xml.contains(r#"Target="a&amp;b.xml""#));
    }
}
