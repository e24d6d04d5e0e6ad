//! RFox PDF export
//!
//! Renders a document element, or a raw markup string, to a paginated PDF
//! file without any server round-trip.
//!
//! # Features
//!
//! - **CDP primary** (`cdp` feature): headless Chrome's print-to-PDF, which
//!   paginates on its own
//! - **Raster fallback** (always available): captures the element as one
//!   tall image and places it across A4 pages with consistent margins
//! - **Image fetching** (`fetch` feature, default): remote images referenced
//!   by the markup are included in raster captures
//!
//! The primary is always tried first. Any failure there, including its
//! absence from the build, is logged as a warning and the fallback runs.
//! Fallback failures are returned to the caller.
//!
//! # Example
//!
//! ```no_run
//! use rfpdf::{ExportConfig, RenderOrchestrator};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExportConfig {
//!     output_dir: "out".into(),
//!     ..Default::default()
//! };
//!
//! let exporter = RenderOrchestrator::new(config);
//! let report = exporter.render_markup("<h1>Quarterly report</h1><p>...</p>", None)?;
//! println!("{} pages written to {}", report.page_count, report.path.display());
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use std::path::{Path, PathBuf};

pub mod error;
pub use error::{Error, Result};

pub mod dom;
pub mod geometry;
pub mod paginate;
pub mod pdf;
pub mod rendering;

pub mod fallback;
pub mod orchestrator;

// Headless Chrome primary renderer
#[cfg(feature = "cdp")]
pub mod cdp;

// Async-friendly facade (worker thread per conversion)
pub mod async_api;

pub use async_api::PdfExporter;
pub use dom::{Document, Element, OffscreenContainer};
pub use geometry::{Margins, PageGeometry};
pub use orchestrator::RenderOrchestrator;
pub use pdf::PdfArtifact;

/// Filename used when the caller does not supply one
pub const DEFAULT_FILENAME: &str = "report.pdf";

/// Configuration for PDF export
///
/// The defaults match a printed A4 report: 10mm top/bottom and 12mm
/// left/right margins, raster capture at twice the CSS pixel density, JPEG
/// quality 0.98 for the embedded raster, and `report.pdf` as the filename.
///
/// # Examples
///
/// ```
/// let cfg = rfpdf::ExportConfig::default();
/// assert_eq!(cfg.default_filename, "report.pdf");
/// assert_eq!(cfg.capture.scale, 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Physical page size and margins
    pub geometry: PageGeometry,
    /// Raster capture settings for the fallback
    pub capture: CaptureConfig,
    /// JPEG quality of the embedded raster, in (0, 1]
    pub image_quality: f32,
    /// Filename used when none is given
    pub default_filename: String,
    /// Directory artifacts are saved into
    pub output_dir: PathBuf,
    /// Idle timeout handed to the primary renderer's browser, in milliseconds
    pub primary_timeout_ms: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::default(),
            capture: CaptureConfig::default(),
            image_quality: 0.98,
            default_filename: DEFAULT_FILENAME.to_string(),
            output_dir: PathBuf::from("."),
            primary_timeout_ms: 30000,
        }
    }
}

impl ExportConfig {
    /// Check every value the pipeline relies on before anything runs.
    pub fn validate(&self) -> Result<()> {
        self.geometry.validate()?;
        if !(self.image_quality > 0.0 && self.image_quality <= 1.0) {
            return Err(Error::ConfigError(format!(
                "image quality must be in (0, 1], got {}",
                self.image_quality
            )));
        }
        if !(self.capture.scale.is_finite() && self.capture.scale > 0.0) {
            return Err(Error::ConfigError(format!(
                "capture scale must be > 0, got {}",
                self.capture.scale
            )));
        }
        if self.capture.width == 0 {
            return Err(Error::ConfigError("capture width must be > 0".into()));
        }
        Ok(())
    }
}

/// Raster capture settings
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Layout width in CSS px
    pub width: u32,
    /// Oversampling factor applied when rasterizing
    pub scale: f32,
    /// Load images from origins other than `base_url`
    pub allow_cross_origin: bool,
    /// Base for resolving relative image sources
    pub base_url: Option<String>,
    /// Per-image fetch timeout in milliseconds
    pub fetch_timeout_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            width: 800,
            scale: 2.0,
            allow_cross_origin: true,
            base_url: None,
            fetch_timeout_ms: 10000,
        }
    }
}

/// Which stage of the strategy list produced an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Primary,
    Fallback,
}

/// Outcome of a successful export
#[derive(Debug, Clone, Serialize)]
pub struct RenderReport {
    pub filename: String,
    pub path: PathBuf,
    pub strategy: StrategyKind,
    pub page_count: usize,
    pub bytes: usize,
    pub sha256: String,
}

/// A document-to-PDF conversion strategy
pub trait PdfBackend: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Convert `target` into a PDF artifact named `filename`.
    fn convert(&self, target: &Element, filename: &str) -> Result<PdfArtifact>;
}

/// Resolve the output filename: blank means the default, directories are
/// stripped, and a `.pdf` extension is appended when missing.
pub fn normalize_filename(filename: Option<&str>, default: &str) -> String {
    let name = filename
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .and_then(|n| Path::new(n).file_name())
        .and_then(|n| n.to_str())
        .unwrap_or(default);
    let has_pdf_ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    if has_pdf_ext {
        name.to_string()
    } else {
        format!("{}.pdf", name)
    }
}

/// Render an attached element with the default configuration.
///
/// Saves into the current directory; `None` saves as `report.pdf`.
pub fn render_element_to_pdf(element: &Element, filename: Option<&str>) -> Result<RenderReport> {
    RenderOrchestrator::new(ExportConfig::default())
        .with_document(element.document().clone())
        .render_element(element, filename)
}

/// Render a markup string with the default configuration, through a
/// temporary off-screen container.
pub fn render_markup_to_pdf(html: &str, filename: Option<&str>) -> Result<RenderReport> {
    RenderOrchestrator::new(ExportConfig::default()).render_markup(html, filename)
}
