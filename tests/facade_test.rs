//! Integration tests for document handles saved through the facade.

use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use officekit::{
    detect_output_from_bytes, detect_output_from_path, Alignment, BackendKind, CellValue, Family, Office, OutputKind,
    ResolveOptions, SlideLayout, TextBox, PLACEHOLDER,
};
use quick_xml::events::Event;
use tempfile::tempdir;

fn real_office() -> Office {
    Office::with_options(ResolveOptions::new())
}

fn dummy_office() -> Office {
    Office::with_options(ResolveOptions::new().all_dummy())
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

fn fill_document(office: &Office) -> officekit::WordDocument {
    let mut doc = office.word().create_document();
    doc.add_heading("Annual Report", 1)
        .unwrap()
        .add_paragraph("first paragraph")
        .add_paragraph_aligned("centered paragraph", Alignment::Center);
    doc.add_table(
        vec![vec!["Laptop", "10"], vec!["Mouse", "25"]],
        Some(vec!["Product".to_string(), "Qty".to_string()]),
    )
    .unwrap()
    .add_page_break()
    .add_paragraph("after the break");
    doc
}

#[test]
fn test_same_calls_succeed_on_both_backends() {
    let dir = tempdir().unwrap();
    for (label, office) in [("real", real_office()), ("dummy", dummy_office())] {
        let doc = fill_document(&office);
        assert_eq!(doc.content().len(), 6);
        doc.save(dir.path().join(format!("{label}.docx"))).unwrap();

        let mut pres = office.powerpoint().create_presentation();
        pres.add_slide(SlideLayout::Title).set_title("Hello");
        pres.add_text(0, TextBox::new("note")).unwrap();
        pres.save(dir.path().join(format!("{label}.pptx"))).unwrap();
    }
}

#[test]
fn test_invalid_content_rejected_on_both_backends() {
    for office in [real_office(), dummy_office()] {
        let mut doc = office.word().create_document();
        assert!(doc.add_heading("bad", 0).is_err());
        assert!(doc
            .add_table(vec![vec!["a", "b"]], Some(vec!["only".to_string()]))
            .is_err());
        assert!(doc.content().is_empty());

        let mut wb = office.excel().create_workbook();
        assert!(wb.add_worksheet("bad/name").is_err());
        let sheet = wb.add_worksheet("ok").unwrap();
        assert!(sheet.set_cell("not a ref", 1).is_err());
        assert!(sheet.cell(0, 1, 1).is_err());
        assert!(sheet.cell(1_048_577, 1, 1).is_err());
    }
}

/// Save an empty handle of each family and return the file bytes.
fn save_empty(office: &Office, family: Family, dir: &Path) -> Vec<u8> {
    let path = dir.join(format!("{}-empty.{}", family, family.extension()));
    match family {
        Family::Word => office.word().create_document().save(&path).unwrap(),
        Family::Excel => office.excel().create_workbook().save(&path).unwrap(),
        Family::PowerPoint => office
            .powerpoint()
            .create_presentation()
            .save(&path)
            .unwrap(),
    }
    fs::read(&path).unwrap()
}

/// Parse every XML part of a package until EOF, failing on malformed markup.
fn assert_parts_well_formed(bytes: &[u8]) {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut parsed = 0;
    for i in 0..archive.len() {
        let mut part = archive.by_index(i).unwrap();
        let name = part.name().to_string();
        if !(name.ends_with(".xml") || name.ends_with(".rels")) {
            continue;
        }
        let mut xml = String::new();
        part.read_to_string(&mut xml).unwrap();

        let mut reader = quick_xml::Reader::from_str(&xml);
        loop {
            match reader.read_event() {
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => panic!("{name} is not well-formed: {e}"),
            }
        }
        parsed += 1;
    }
    assert!(parsed > 0, "package holds no XML parts");
}

#[test]
fn test_dummy_output_is_fixed_and_smaller() {
    let dir = tempdir().unwrap();
    let dummy = dummy_office();
    let real = real_office();

    for family in Family::ALL {
        let dummy_bytes = save_empty(&dummy, family, dir.path());
        assert_eq!(dummy_bytes, PLACEHOLDER.to_vec(), "{family}");

        if real.backend_kind(family) != BackendKind::Real {
            continue;
        }
        let real_bytes = save_empty(&real, family, dir.path());
        assert!(dummy_bytes.len() < real_bytes.len(), "{family}");
        assert_eq!(
            detect_output_from_bytes(&real_bytes).unwrap(),
            OutputKind::Container
        );
    }

    let dummy_path = dir.path().join("dummy.docx");
    fill_document(&dummy).save(&dummy_path).unwrap();
    assert_eq!(fs::read(&dummy_path).unwrap(), PLACEHOLDER.to_vec());
    assert_eq!(
        detect_output_from_path(&dummy_path).unwrap(),
        OutputKind::Placeholder
    );
}

#[test]
fn test_real_packages_are_well_formed_xml() {
    let office = real_office();
    let dir = tempdir().unwrap();

    if office.backend_kind(Family::Word) == BackendKind::Real {
        let path = dir.path().join("full.docx");
        fill_document(&office).save(&path).unwrap();
        assert_parts_well_formed(&fs::read(&path).unwrap());
    }

    if office.backend_kind(Family::Excel) == BackendKind::Real {
        let path = dir.path().join("full.xlsx");
        let mut wb = office.excel().create_workbook();
        wb.add_worksheet("R&D <2024>")
            .unwrap()
            .set_cell("A1", "Tom & \"Jerry\"")
            .unwrap()
            .set_cell("B1", 3.5)
            .unwrap()
            .set_cell("C1", "=B1*2")
            .unwrap();
        wb.save(&path).unwrap();
        assert_parts_well_formed(&fs::read(&path).unwrap());
    }

    if office.backend_kind(Family::PowerPoint) == BackendKind::Real {
        let path = dir.path().join("full.pptx");
        let mut pres = office.powerpoint().create_presentation();
        pres.add_slide(SlideLayout::TitleAndContent)
            .set_title("Q&A <live>")
            .add_body("first\nsecond");
        pres.add_text(0, TextBox::new("a < b")).unwrap();
        pres.save(&path).unwrap();
        assert_parts_well_formed(&fs::read(&path).unwrap());
    }
}

#[test]
fn test_word_output_preserves_order() {
    let office = real_office();
    if office.backend_kind(Family::Word) != BackendKind::Real {
        return;
    }
    let dir = tempdir().unwrap();
    let path = dir.path().join("ordered.docx");
    fill_document(&office).save(&path).unwrap();

    let xml = read_part(&fs::read(&path).unwrap(), "word/document.xml");
    let order = [
        "Annual Report",
        "first paragraph",
        "centered paragraph",
        "Product",
        "Mouse",
        "after the break",
    ];
    let positions: Vec<usize> = order.iter().map(|s| xml.find(s).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
}

#[test]
fn test_excel_output_contents() {
    let office = real_office();
    if office.backend_kind(Family::Excel) != BackendKind::Real {
        return;
    }
    let dir = tempdir().unwrap();
    let path = dir.path().join("reports").join("sales.xlsx");

    let mut wb = office.excel().create_workbook();
    wb.add_worksheet("Sales")
        .unwrap()
        .add_table(
            vec![
                vec![CellValue::from("Region"), CellValue::from("Total")],
                vec![CellValue::from("North"), CellValue::from(1250.5)],
            ],
            1,
            1,
        )
        .unwrap()
        .set_cell("B3", "=SUM(B2:B2)")
        .unwrap();
    wb.add_worksheet("Notes").unwrap();
    wb.set_active("Notes").unwrap();
    wb.save(&path).unwrap();

    let bytes = fs::read(&path).unwrap();
    let workbook = read_part(&bytes, "xl/workbook.xml");
    assert!(workbook.contains(r#"activeTab="1""#));

    let mut book: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
    assert_eq!(book.sheet_names(), vec!["Sales", "Notes"]);

    let range = book.worksheet_range("Sales").unwrap();
    assert_eq!(
        range.get_value((0, 0)),
        Some(&Data::String("Region".to_string()))
    );
    assert_eq!(
        range.get_value((1, 0)),
        Some(&Data::String("North".to_string()))
    );
    assert_eq!(range.get_value((1, 1)), Some(&Data::Float(1250.5)));

    let formulas = book.worksheet_formula("Sales").unwrap();
    assert_eq!(
        formulas.get_value((2, 1)).map(String::as_str),
        Some("SUM(B2:B2)")
    );
}

#[test]
fn test_powerpoint_output_slides() {
    let office = real_office();
    if office.backend_kind(Family::PowerPoint) != BackendKind::Real {
        return;
    }
    let dir = tempdir().unwrap();
    let path = dir.path().join("deck.pptx");

    let mut pres = office.powerpoint().create_presentation();
    pres.add_slide(SlideLayout::Title)
        .set_title("Kickoff")
        .add_body("Q3 planning");
    pres.add_slide_named("two_content").set_title("Agenda");
    pres.add_text(1, TextBox::new("Side note").with_font_size(14))
        .unwrap();
    pres.save(&path).unwrap();

    let bytes = fs::read(&path).unwrap();
    let first = read_part(&bytes, "ppt/slides/slide1.xml");
    let second = read_part(&bytes, "ppt/slides/slide2.xml");
    assert!(first.contains("Kickoff"));
    assert!(first.contains("Q3 planning"));
    assert!(second.contains("Agenda"));
    assert!(second.contains("Side note"));
    assert!(second.contains(r#"sz="1400""#));
}

#[test]
fn test_save_twice_independent() {
    let dir = tempdir().unwrap();
    for office in [real_office(), dummy_office()] {
        let first = dir.path().join("first.docx");
        let second = dir.path().join("second.docx");

        let mut doc = office.word().create_document();
        doc.add_paragraph("one");
        doc.save(&first).unwrap();
        let first_bytes = fs::read(&first).unwrap();

        doc.add_paragraph("two");
        doc.save(&second).unwrap();

        assert_eq!(fs::read(&first).unwrap(), first_bytes);
        assert!(second.exists());
        assert_eq!(doc.content().len(), 2);
    }
}

#[test]
fn test_save_failure_is_persistence_error() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("not_a_dir");
    fs::write(&blocker, b"x").unwrap();

    let wb = dummy_office().excel().create_workbook();
    let err = wb.save(blocker.join("out.xlsx")).unwrap_err();
    assert!(matches!(err, officekit::Error::Persistence { .. }));
    assert!(err.to_string().contains("out.xlsx"));
}

#[test]
fn test_handles_are_send() {
    fn assert_send<T: Send>(_: &T) {}
    let office = dummy_office();
    assert_send(&office.word().create_document());
    assert_send(&office.excel().create_workbook());
    assert_send(&office.powerpoint().create_presentation());
}

#[test]
fn test_quick_helpers() {
    let dir = tempdir().unwrap();
    let doc_path = dir.path().join("quick").join("notes.docx");
    let xls_path = dir.path().join("quick").join("people.xlsx");

    officekit::quick_create_document(&doc_path, "line one\nline two").unwrap();
    officekit::quick_create_spreadsheet(
        &xls_path,
        vec![vec!["Name", "City"], vec!["Ada", "London"]],
    )
    .unwrap();

    assert!(detect_output_from_path(&doc_path).is_ok());
    assert!(detect_output_from_path(&xls_path).is_ok());
}
