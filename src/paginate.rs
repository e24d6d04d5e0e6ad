//! Page placement for a single tall raster
//!
//! The raster is never cropped. It is scaled once to the usable page width and
//! then drawn on every page at a vertical offset that moves up by one usable
//! page height per page, so the page's clip window exposes the next band.

use crate::geometry::PageGeometry;
use crate::{Error, Result};

/// Remaining heights at or below this are treated as fully placed.
const EPSILON_MM: f64 = 1e-6;

/// Where the full scaled image is drawn on one page, in millimeters from the
/// page's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSlice {
    /// Zero-based page index
    pub index: usize,
    pub x_mm: f64,
    /// Top edge of the image; negative once the image is shifted above the page
    pub y_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PageSlice {
    /// The band `[start, end)` of the scaled image, in image millimeters, that
    /// lands inside this page's usable area.
    pub fn visible_band(&self, geometry: &PageGeometry) -> (f64, f64) {
        let start = geometry.margins.top - self.y_mm;
        let end = (start + geometry.usable_height()).min(self.height_mm);
        (start, end)
    }
}

/// Result of paginating one raster
#[derive(Debug, Clone, PartialEq)]
pub struct Pagination {
    pub scaled_height: f64,
    pub usable_height: f64,
    pub slices: Vec<PageSlice>,
}

impl Pagination {
    pub fn page_count(&self) -> usize {
        self.slices.len()
    }
}

/// Height in millimeters of a `width`×`height` pixel raster once scaled to
/// the geometry's usable width.
pub fn scaled_height(geometry: &PageGeometry, width: u32, height: u32) -> f64 {
    height as f64 * (geometry.usable_width() / width as f64)
}

/// Compute one placement per page for a raster of the given pixel size.
///
/// Fails with `ConfigError` for degenerate geometry and with `CaptureError`
/// for an empty raster, before any placement is computed.
pub fn paginate(geometry: &PageGeometry, width: u32, height: u32) -> Result<Pagination> {
    geometry.validate()?;
    if width == 0 || height == 0 {
        return Err(Error::CaptureError(format!(
            "raster has no area ({}x{}px)",
            width, height
        )));
    }

    let usable_width = geometry.usable_width();
    let usable_height = geometry.usable_height();
    let scaled = scaled_height(geometry, width, height);

    let place = |index: usize, y_mm: f64| PageSlice {
        index,
        x_mm: geometry.margins.left,
        y_mm,
        width_mm: usable_width,
        height_mm: scaled,
    };

    let mut slices = Vec::with_capacity((scaled / usable_height).ceil() as usize);
    let mut remaining = scaled;
    let mut cursor = geometry.margins.top;

    slices.push(place(0, cursor));
    remaining -= usable_height;

    while remaining > EPSILON_MM {
        cursor = geometry.margins.top - (scaled - remaining);
        slices.push(place(slices.len(), cursor));
        remaining -= usable_height;
    }

    log::debug!(
        "paginated {}x{}px raster: {:.2}mm over {} page(s)",
        width,
        height,
        scaled,
        slices.len()
    );

    Ok(Pagination {
        scaled_height: scaled,
        usable_height,
        slices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Margins;

    #[test]
    fn tall_raster_needs_three_pages() {
        let g = PageGeometry::default();
        let p = paginate(&g, 1000, 4000).unwrap();
        assert!((p.scaled_height - 744.0).abs() < 1e-9);
        assert_eq!(p.usable_height, 277.0);
        assert_eq!(p.page_count(), 3);
    }

    #[test]
    fn offsets_step_by_one_usable_height() {
        let g = PageGeometry::default();
        let p = paginate(&g, 1000, 4000).unwrap();
        for (k, s) in p.slices.iter().enumerate() {
            assert_eq!(s.index, k);
            assert!((s.y_mm - (10.0 - k as f64 * 277.0)).abs() < 1e-9);
            assert_eq!(s.x_mm, 12.0);
            assert_eq!(s.width_mm, 186.0);
        }
    }

    #[test]
    fn short_raster_fits_one_page() {
        let g = PageGeometry::default();
        let p = paginate(&g, 1000, 100).unwrap();
        assert_eq!(p.page_count(), 1);
        assert_eq!(p.slices[0].y_mm, 10.0);
    }

    #[test]
    fn exact_multiple_does_not_add_blank_page() {
        let g = PageGeometry::a4(Margins::symmetric(10.0, 12.0));
        let px_per_page: f64 = (277.0 / 186.0) * 1000.0;
        let p = paginate(&g, 1000, (px_per_page * 2.0).round() as u32).unwrap();
        assert_eq!(p.page_count(), 2);
    }

    #[test]
    fn empty_raster_is_capture_error() {
        let g = PageGeometry::default();
        assert!(matches!(paginate(&g, 0, 10), Err(Error::CaptureError(_))));
        assert!(matches!(paginate(&g, 10, 0), Err(Error::CaptureError(_))));
    }

    #[test]
    fn degenerate_geometry_is_rejected_before_looping() {
        let g = PageGeometry {
            height_mm: 15.0,
            ..PageGeometry::default()
        };
        assert!(matches!(paginate(&g, 1000, 4000), Err(Error::ConfigError(_))));
    }

    #[test]
    fn visible_band_of_last_page_is_truncated() {
        let g = PageGeometry::default();
        let p = paginate(&g, 1000, 4000).unwrap();
        let (start, end) = p.slices[2].visible_band(&g);
        assert!((start - 554.0).abs() < 1e-9);
        assert!((end - 744.0).abs() < 1e-9);
    }
}
