//! Off-screen container lifecycle for the markup entry point

use rfpdf::dom::{Element, Position};
use rfpdf::fallback::RasterPaginator;
use rfpdf::{CaptureConfig, Error, ExportConfig, PdfArtifact, PdfBackend, RenderOrchestrator, Result};
use std::sync::{Arc, Mutex};

fn config(dir: &std::path::Path) -> ExportConfig {
    ExportConfig {
        output_dir: dir.to_path_buf(),
        capture: CaptureConfig {
            width: 240,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Records what the target looked like while it was being converted
struct Inspecting {
    seen: Arc<Mutex<Vec<(bool, Option<Position>)>>>,
    fail: bool,
}

impl PdfBackend for Inspecting {
    fn name(&self) -> &str {
        "inspecting"
    }

    fn convert(&self, target: &Element, filename: &str) -> Result<PdfArtifact> {
        self.seen
            .lock()
            .unwrap()
            .push((target.is_attached(), target.position()));
        if self.fail {
            return Err(Error::AssemblyError("simulated encoder failure".into()));
        }
        Ok(PdfArtifact {
            filename: filename.to_string(),
            bytes: b"%PDF-1.5".to_vec(),
            page_count: 1,
            strategy: rfpdf::StrategyKind::Fallback,
        })
    }
}

#[test]
fn container_is_attached_during_and_removed_after_success() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    let orchestrator = RenderOrchestrator::with_backends(cfg.clone(), None, Box::new(RasterPaginator::new(&cfg)));
    let report = orchestrator
        .render_markup("<h2>Scores</h2><ul><li>one</li><li>two</li></ul>", Some("scores.pdf"))
        .unwrap();
    assert_eq!(report.page_count, 1);
    assert!(dir.path().join("scores.pdf").exists());
    assert_eq!(orchestrator.document().offscreen_count(), 0);
    assert!(orchestrator.document().is_empty());
}

#[test]
fn container_is_removed_after_failure() {
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = RenderOrchestrator::with_backends(
        config(dir.path()),
        None,
        Box::new(Inspecting {
            seen: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }),
    );
    let err = orchestrator.render_markup("<p>doomed</p>", None).unwrap_err();
    assert!(matches!(err, Error::AssemblyError(_)));
    assert!(orchestrator.document().is_empty());
}

#[test]
fn target_is_offscreen_while_converting() {
    let dir = tempfile::tempdir().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let backend = Box::new(Inspecting {
        seen: seen.clone(),
        fail: false,
    });
    let orchestrator = RenderOrchestrator::with_backends(config(dir.path()), None, backend);
    orchestrator.render_markup("<p>a</p>", None).unwrap();
    orchestrator.render_markup("<p>b</p>", None).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|s| *s == (true, Some(Position::OffScreen))));
    // Repeated calls do not accumulate containers
    assert!(orchestrator.document().is_empty());
}

#[test]
fn existing_nodes_are_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    let orchestrator = RenderOrchestrator::with_backends(cfg.clone(), None, Box::new(RasterPaginator::new(&cfg)));
    let page = orchestrator.document().append("<p>the live page</p>");
    orchestrator.render_markup("<p>export</p>", None).unwrap();
    assert!(page.is_attached());
    assert_eq!(orchestrator.document().len(), 1);
}
