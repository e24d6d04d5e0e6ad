//! Raster capture of a document element
//!
//! Capture runs in three steps: block layout of the element's markup at the
//! configured capture width, a paint command list, and rasterization at the
//! oversampling factor.

pub mod images;
pub mod layout;
pub mod paint;
pub mod raster;

use crate::dom::Element;
use crate::{CaptureConfig, Result};
use image::RgbaImage;
use scraper::Html;
use sha2::{Digest, Sha256};

/// A single bitmap snapshot of a captured element
#[derive(Debug, Clone)]
pub struct RasterImage {
    pixels: RgbaImage,
}

impl RasterImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Hex SHA-256 of the raw RGBA buffer, for deterministic comparisons
    pub fn sha256_hex(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.width().to_be_bytes());
        hasher.update(self.height().to_be_bytes());
        hasher.update(self.pixels.as_raw());
        hex::encode(hasher.finalize())
    }
}

/// Capture `element` as one raster image covering its full content height.
///
/// The element must still be attached to its document.
pub fn capture(element: &Element, config: &CaptureConfig) -> Result<RasterImage> {
    let markup = element.outer_html()?;
    let fragment = Html::parse_fragment(&markup);
    let mut images = images::ImageLoader::new(config);
    let layout = layout::layout_fragment(&fragment, config.width, &mut images);
    let commands = paint::paint(&layout);
    log::debug!(
        "capturing {:?}: {}x{} css px, {} paint commands, scale {}",
        element.id(),
        layout.width,
        layout.height,
        commands.len(),
        config.scale
    );
    raster::rasterize(&commands, layout.width, layout.height, config.scale)
}
