//! Async facade: entry points A and B from a tokio runtime

use rfpdf::fallback::RasterPaginator;
use rfpdf::{CaptureConfig, ExportConfig, PdfExporter, RenderOrchestrator, StrategyKind};

fn exporter(dir: &std::path::Path) -> PdfExporter {
    let config = ExportConfig {
        output_dir: dir.to_path_buf(),
        capture: CaptureConfig {
            width: 240,
            ..Default::default()
        },
        ..Default::default()
    };
    let orchestrator =
        RenderOrchestrator::with_backends(config.clone(), None, Box::new(RasterPaginator::new(&config)));
    PdfExporter::from_orchestrator(orchestrator)
}

#[tokio::test]
async fn markup_entry_point_saves_default_filename() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let exporter = exporter(dir.path());

    let report = exporter
        .render_markup_to_pdf("<h1>Async</h1><p>hello</p>", None)
        .await
        .expect("export");
    assert_eq!(report.filename, "report.pdf");
    assert_eq!(report.strategy, StrategyKind::Fallback);
    assert!(dir.path().join("report.pdf").exists());
    assert!(exporter.orchestrator().document().is_empty());
}

#[tokio::test]
async fn element_entry_point_reports_capture_failure() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = exporter(dir.path());
    let el = exporter.orchestrator().document().append("<p>soon gone</p>");
    exporter.orchestrator().document().detach(el.id());

    let err = exporter.render_element_to_pdf(&el, Some("x")).await.unwrap_err();
    assert!(matches!(err, rfpdf::Error::CaptureError(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_exports_are_independent() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = exporter(dir.path());

    let a = exporter.render_markup_to_pdf("<p>first</p>", Some("a.pdf"));
    let b = exporter.render_markup_to_pdf("<h2>second</h2><p>longer body text</p>", Some("b.pdf"));
    let (ra, rb) = tokio::join!(a, b);
    let (ra, rb) = (ra.unwrap(), rb.unwrap());

    assert_eq!(ra.filename, "a.pdf");
    assert_eq!(rb.filename, "b.pdf");
    assert_ne!(ra.sha256, rb.sha256);
    assert!(exporter.orchestrator().document().is_empty());
}
