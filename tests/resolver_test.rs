//! Integration tests for backend resolution and fallback notices.

use std::fs;
use std::sync::{Arc, Mutex};

use officekit::{
    BackendKind, Capabilities, DiagnosticSink, FallbackNotice, Family, Office, Resolution,
    ResolveOptions, Resolver, PLACEHOLDER,
};
use tempfile::tempdir;

/// Sink that keeps every notice it receives.
#[derive(Default)]
struct RecordingSink {
    notices: Mutex<Vec<FallbackNotice>>,
}

impl RecordingSink {
    fn families(&self) -> Vec<Family> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.family)
            .collect()
    }
}

impl DiagnosticSink for RecordingSink {
    fn fallback(&self, notice: &FallbackNotice) {
        self.notices.lock().unwrap().push(notice.clone());
    }
}

fn resolve_with(options: ResolveOptions) -> (Office, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let resolution = Resolver::new(options).with_diagnostics(sink.clone()).resolve();
    (Office::from_resolution(resolution), sink)
}

#[test]
fn test_disabled_excel_scenario() {
    let (office, sink) = resolve_with(ResolveOptions::new().disable(Family::Excel));
    assert!(!office.capabilities().excel);

    let dir = tempdir().unwrap();
    let path = dir.path().join("out.xlsx");
    let mut wb = office.excel().create_workbook();
    wb.add_worksheet("Data")
        .unwrap()
        .set_cell("A1", "Name")
        .unwrap()
        .set_cell("B1", "Age")
        .unwrap();
    wb.save(&path).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 22);
    assert_eq!(bytes, PLACEHOLDER.to_vec());

    let excel_notices = sink
        .families()
        .into_iter()
        .filter(|f| *f == Family::Excel)
        .count();
    assert_eq!(excel_notices, 1);
}

#[test]
fn test_notices_not_repeated_per_operation() {
    let (office, sink) = resolve_with(ResolveOptions::new().all_dummy());
    assert_eq!(sink.families(), Family::ALL.to_vec());

    let dir = tempdir().unwrap();
    for i in 0..5 {
        let mut doc = office.word().create_document();
        doc.add_paragraph(format!("document {}", i));
        doc.save(dir.path().join(format!("doc{}.docx", i))).unwrap();
    }

    assert_eq!(sink.families().len(), 3);
    assert_eq!(office.notices().len(), 3);
}

#[test]
fn test_notice_count_matches_degraded_families() {
    let (office, sink) = resolve_with(ResolveOptions::new());
    let degraded = office.capabilities().degraded();
    assert_eq!(sink.families(), degraded);
    for family in Family::ALL {
        assert_eq!(
            office.capabilities().is_real(family),
            family.is_compiled(),
            "{family} resolution should follow compiled features"
        );
    }
}

#[test]
fn test_forced_capabilities() {
    let sink = Arc::new(RecordingSink::default());
    let caps = Capabilities::all_real().with(Family::PowerPoint, false);
    let resolution = Resolution::with_capabilities_and_sink(caps, sink.clone());

    assert_eq!(resolution.kind(Family::PowerPoint), BackendKind::Dummy);
    assert_eq!(
        resolution.registry.powerpoint.kind(),
        BackendKind::Dummy
    );
    assert!(sink.families().contains(&Family::PowerPoint));
}

#[test]
fn test_config_file_options() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("officekit.json");
    fs::write(&path, r#"{ "disabled": ["word", "powerpoint"] }"#).unwrap();

    let options = ResolveOptions::from_file(&path).unwrap();
    let office = Office::with_options(options);
    assert_eq!(office.backend_kind(Family::Word), BackendKind::Dummy);
    assert_eq!(office.backend_kind(Family::PowerPoint), BackendKind::Dummy);
    assert_eq!(
        office.backend_kind(Family::Excel),
        if Family::Excel.is_compiled() {
            BackendKind::Real
        } else {
            BackendKind::Dummy
        }
    );
}

#[test]
fn test_missing_config_file() {
    let dir = tempdir().unwrap();
    let result = ResolveOptions::from_file(dir.path().join("missing.json"));
    assert!(matches!(result, Err(officekit::Error::Config(_))));
}
