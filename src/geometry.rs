//! Physical page geometry in millimeters

use crate::{Error, Result};

/// Points per millimeter (1pt = 1/72in, 1in = 25.4mm)
pub const PT_PER_MM: f64 = 72.0 / 25.4;

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Convert millimeters to PDF points
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * PT_PER_MM
}

/// Convert millimeters to inches
pub fn mm_to_inch(mm: f64) -> f64 {
    mm / MM_PER_INCH
}

/// Page margins in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    /// The same margin on all four sides
    pub fn uniform(mm: f64) -> Self {
        Self {
            top: mm,
            right: mm,
            bottom: mm,
            left: mm,
        }
    }

    /// Vertical and horizontal margins, CSS shorthand order
    pub fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::symmetric(10.0, 12.0)
    }
}

/// Fixed physical page size plus margins
///
/// The default is A4 portrait (210×297mm) with 10mm top/bottom and 12mm
/// left/right margins, which leaves a 186×277mm usable area.
///
/// ```
/// let g = rfpdf::PageGeometry::default();
/// assert_eq!(g.usable_width(), 186.0);
/// assert_eq!(g.usable_height(), 277.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f64,
    pub height_mm: f64,
    pub margins: Margins,
}

impl PageGeometry {
    /// A4 portrait with the given margins
    pub fn a4(margins: Margins) -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            margins,
        }
    }

    pub fn usable_width(&self) -> f64 {
        self.width_mm - self.margins.left - self.margins.right
    }

    pub fn usable_height(&self) -> f64 {
        self.height_mm - self.margins.top - self.margins.bottom
    }

    /// Reject geometry that would make pagination meaningless or endless.
    pub fn validate(&self) -> Result<()> {
        let m = &self.margins;
        let sides = [("top", m.top), ("right", m.right), ("bottom", m.bottom), ("left", m.left)];
        for (side, value) in sides {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::ConfigError(format!(
                    "{} margin must be a finite value >= 0, got {}",
                    side, value
                )));
            }
        }
        if !self.width_mm.is_finite() || !self.height_mm.is_finite() {
            return Err(Error::ConfigError("page size must be finite".into()));
        }
        if self.usable_width() <= 0.0 {
            return Err(Error::ConfigError(format!(
                "usable page width is {}mm (page {}mm, margins {}+{}mm)",
                self.usable_width(),
                self.width_mm,
                m.left,
                m.right
            )));
        }
        if self.usable_height() <= 0.0 {
            return Err(Error::ConfigError(format!(
                "usable page height is {}mm (page {}mm, margins {}+{}mm)",
                self.usable_height(),
                self.height_mm,
                m.top,
                m.bottom
            )));
        }
        Ok(())
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4(Margins::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_a4_portrait() {
        let g = PageGeometry::default();
        assert_eq!(g.width_mm, 210.0);
        assert_eq!(g.height_mm, 297.0);
        assert_eq!(g.margins.top, 10.0);
        assert_eq!(g.margins.left, 12.0);
        assert!(g.validate().is_ok());
    }

    #[test]
    fn degenerate_height_is_rejected() {
        let g = PageGeometry {
            height_mm: 20.0,
            ..PageGeometry::default()
        };
        match g.validate() {
            Err(Error::ConfigError(msg)) => assert!(msg.contains("height")),
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn negative_margin_is_rejected() {
        let g = PageGeometry::a4(Margins::uniform(-1.0));
        assert!(matches!(g.validate(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn a4_in_points() {
        let w = mm_to_pt(210.0);
        assert!((w - 595.2756).abs() < 1e-3);
        assert!((mm_to_inch(25.4) - 1.0).abs() < f64::EPSILON);
    }
}
