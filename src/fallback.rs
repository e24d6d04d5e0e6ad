//! Raster fallback: capture, paginate, assemble

use crate::dom::Element;
use crate::geometry::PageGeometry;
use crate::pdf::{self, PdfArtifact};
use crate::rendering::{self, RasterImage};
use crate::{paginate, CaptureConfig, ExportConfig, PdfBackend, Result, StrategyKind};

/// Captures the target as one raster and spreads it over as many pages as
/// its scaled height needs.
///
/// Holds configuration only; every call works on its own raster and
/// placements.
#[derive(Debug, Clone)]
pub struct RasterPaginator {
    geometry: PageGeometry,
    capture: CaptureConfig,
    image_quality: f32,
}

impl RasterPaginator {
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            geometry: config.geometry,
            capture: config.capture.clone(),
            image_quality: config.image_quality,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Paginate an already captured raster.
    pub fn paginate_raster(&self, raster: &RasterImage, filename: &str) -> Result<PdfArtifact> {
        let pagination = paginate::paginate(&self.geometry, raster.width(), raster.height())?;
        let strips = pdf::encode_strips(raster, self.image_quality, pdf::MAX_STRIP_ROWS)?;
        log::debug!("encoded raster as {} jpeg strip(s)", strips.len());
        let bytes = pdf::assemble(&self.geometry, &pagination, strips, raster.width(), raster.height())?;
        Ok(PdfArtifact {
            filename: filename.to_string(),
            bytes,
            page_count: pagination.page_count(),
            strategy: StrategyKind::Fallback,
        })
    }
}

impl PdfBackend for RasterPaginator {
    fn name(&self) -> &str {
        "raster"
    }

    fn convert(&self, target: &Element, filename: &str) -> Result<PdfArtifact> {
        // Geometry problems surface before the capture does any work
        self.geometry.validate()?;
        let raster = rendering::capture(target, &self.capture)?;
        log::debug!("captured raster {}x{}px", raster.width(), raster.height());
        self.paginate_raster(&raster, filename)
    }
}
