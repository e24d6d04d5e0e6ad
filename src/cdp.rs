//! Chrome DevTools Protocol primary renderer
//!
//! Launches headless Chrome for every conversion, loads the element's markup
//! from a `data:` URL and uses Chrome's print-to-PDF, which paginates on its
//! own. The browser is torn down when the call returns.

use crate::dom::Element;
use crate::geometry::{mm_to_inch, PageGeometry};
use crate::pdf::{self, PdfArtifact};
use crate::{Error, ExportConfig, PdfBackend, Result, StrategyKind};
use base64::Engine as Base64Engine;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use std::time::Duration;

/// CDP-based primary renderer (uses the `headless_chrome` crate)
#[derive(Debug, Clone)]
pub struct CdpRenderer {
    geometry: PageGeometry,
    idle_timeout: Duration,
    window_width: u32,
}

impl CdpRenderer {
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            geometry: config.geometry,
            idle_timeout: Duration::from_millis(config.primary_timeout_ms),
            window_width: config.capture.width,
        }
    }

    fn launch(&self) -> Result<Browser> {
        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .idle_browser_timeout(self.idle_timeout)
            .window_size(Some((self.window_width, 1024)))
            .build()
            .map_err(|e| Error::PrimaryUnavailable(format!("Failed to build launch options: {}", e)))?;

        Browser::new(launch_options)
            .map_err(|e| Error::PrimaryUnavailable(format!("Failed to launch browser: {}", e)))
    }

    /// Print options mirroring the page geometry: A4 portrait, margins in
    /// inches, backgrounds on.
    pub fn print_options(&self) -> PrintToPdfOptions {
        let g = &self.geometry;
        PrintToPdfOptions {
            landscape: Some(false),
            display_header_footer: Some(false),
            print_background: Some(true),
            scale: Some(1.0),
            paper_width: Some(mm_to_inch(g.width_mm)),
            paper_height: Some(mm_to_inch(g.height_mm)),
            margin_top: Some(mm_to_inch(g.margins.top)),
            margin_bottom: Some(mm_to_inch(g.margins.bottom)),
            margin_left: Some(mm_to_inch(g.margins.left)),
            margin_right: Some(mm_to_inch(g.margins.right)),
            prefer_css_page_size: Some(false),
            ..Default::default()
        }
    }
}

fn document_url(markup: &str) -> String {
    let page = format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"></head><body>{}</body></html>",
        markup
    );
    let b64 = Base64Engine::encode(&base64::engine::general_purpose::STANDARD, page);
    format!("data:text/html;base64,{}", b64)
}

impl PdfBackend for CdpRenderer {
    fn name(&self) -> &str {
        "cdp"
    }

    fn convert(&self, target: &Element, filename: &str) -> Result<PdfArtifact> {
        let markup = target
            .outer_html()
            .map_err(|e| Error::PrimaryConversion(e.to_string()))?;

        let browser = self.launch()?;
        let tab = browser
            .new_tab()
            .map_err(|e| Error::PrimaryUnavailable(format!("Failed to create tab: {}", e)))?;

        tab.navigate_to(&document_url(&markup))
            .map_err(|e| Error::PrimaryConversion(format!("Navigation failed: {}", e)))?;
        tab.wait_until_navigated()
            .map_err(|e| Error::PrimaryConversion(format!("Wait for navigation failed: {}", e)))?;

        let bytes = tab
            .print_to_pdf(Some(self.print_options()))
            .map_err(|e| Error::PrimaryConversion(format!("Print to PDF failed: {}", e)))?;
        if bytes.is_empty() {
            return Err(Error::PrimaryConversion("Chrome returned an empty PDF".into()));
        }
        let page_count = pdf::page_count(&bytes)
            .map_err(|e| Error::PrimaryConversion(format!("Chrome returned an unreadable PDF: {}", e)))?;

        Ok(PdfArtifact {
            filename: filename.to_string(),
            bytes,
            page_count,
            strategy: StrategyKind::Primary,
        })
    }
}
