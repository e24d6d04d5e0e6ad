//! Headless Chrome primary renderer end to end
#![cfg(feature = "cdp")]

use rfpdf::{ExportConfig, RenderOrchestrator, StrategyKind};

#[test]
#[ignore] // Requires Chrome to be installed
fn chrome_primary_wins_when_available() {
    let dir = tempfile::tempdir().unwrap();
    let config = ExportConfig {
        output_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    let report = RenderOrchestrator::new(config)
        .render_markup("<h1>Printed by Chrome</h1><p>Body</p>", None)
        .expect("export");
    assert_eq!(report.strategy, StrategyKind::Primary);
    assert_eq!(report.filename, "report.pdf");
    assert!(report.page_count >= 1);
}
