//! PDF assembly for paginated rasters
//!
//! The captured raster is embedded once, as a stack of JPEG image XObjects
//! (JPEG caps an image at 65535 rows), and drawn on every page through a
//! shared resource dictionary. Each page's MediaBox clips the placement,
//! which is what turns one tall image into pages.

use crate::geometry::{mm_to_pt, PageGeometry};
use crate::paginate::Pagination;
use crate::rendering::RasterImage;
use crate::{Error, Result, StrategyKind};
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document as LoDocument, Object as LoObject, Stream as LoStream};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// A finished PDF, ready to be saved under `filename`
#[derive(Debug, Clone)]
pub struct PdfArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub strategy: StrategyKind,
}

impl PdfArtifact {
    pub fn sha256_hex(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }

    /// Write the artifact into `dir` (created if missing) and return the path.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir).map_err(|e| {
            Error::AssemblyError(format!("cannot create output directory {}: {}", dir.display(), e))
        })?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes)
            .map_err(|e| Error::AssemblyError(format!("cannot write {}: {}", path.display(), e)))?;
        log::debug!("saved {} ({} bytes, {} pages)", path.display(), self.bytes.len(), self.page_count);
        Ok(path)
    }
}

/// Most rows a baseline JPEG can hold
pub const MAX_STRIP_ROWS: u32 = 65535;

/// A horizontal band of the raster, encoded as its own JPEG
#[derive(Debug, Clone)]
pub struct ImageStrip {
    /// First raster row covered by the strip
    pub row: u32,
    pub rows: u32,
    pub jpeg: Vec<u8>,
}

/// Encode the raster as baseline JPEG strips of at most `max_rows` rows
/// each, top to bottom. `quality` is in (0, 1].
pub fn encode_strips(raster: &RasterImage, quality: f32, max_rows: u32) -> Result<Vec<ImageStrip>> {
    if !(quality > 0.0 && quality <= 1.0) {
        return Err(Error::ConfigError(format!("image quality must be in (0, 1], got {}", quality)));
    }
    if max_rows == 0 || max_rows > MAX_STRIP_ROWS {
        return Err(Error::ConfigError(format!(
            "strip height must be in 1..={}, got {}",
            MAX_STRIP_ROWS, max_rows
        )));
    }
    let q = (quality * 100.0).round().clamp(1.0, 100.0) as u8;
    let src = raster.pixels();
    let mut strips = Vec::with_capacity(src.height().div_ceil(max_rows) as usize);
    let mut row = 0;
    while row < src.height() {
        let rows = max_rows.min(src.height() - row);
        // Captures are painted on an opaque background, alpha carries nothing
        let rgb = RgbImage::from_fn(src.width(), rows, |x, y| {
            let p = src.get_pixel(x, row + y);
            Rgb([p[0], p[1], p[2]])
        });
        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, q).encode_image(&rgb)?;
        strips.push(ImageStrip { row, rows, jpeg });
        row += rows;
    }
    Ok(strips)
}

fn real(v: f64) -> LoObject {
    (v as f32).into()
}

fn strip_name(index: usize) -> String {
    format!("Im{}", index)
}

/// Build a PDF with one page per slice. Every page draws the whole
/// `px_width`×`px_height` raster at the slice's placement, as the stack of
/// `strips` that overlap the page.
pub fn assemble(
    geometry: &PageGeometry,
    pagination: &Pagination,
    strips: Vec<ImageStrip>,
    px_width: u32,
    px_height: u32,
) -> Result<Vec<u8>> {
    if px_height == 0 || strips.iter().map(|s| s.rows).sum::<u32>() != px_height {
        return Err(Error::AssemblyError(format!(
            "image strips do not cover the {}px raster",
            px_height
        )));
    }
    let page_w = mm_to_pt(geometry.width_mm);
    let page_h = mm_to_pt(geometry.height_mm);

    let mut doc = LoDocument::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut xobjects = lopdf::Dictionary::new();
    let mut bands = Vec::with_capacity(strips.len());
    for (i, strip) in strips.into_iter().enumerate() {
        let image_id = doc.add_object(
            LoStream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => px_width as i64,
                    "Height" => strip.rows as i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                    "Filter" => "DCTDecode",
                },
                strip.jpeg,
            )
            .with_compression(false),
        );
        xobjects.set(strip_name(i), image_id);
        bands.push((strip.row, strip.rows));
    }
    let resources_id = doc.add_object(dictionary! {
        "XObject" => xobjects,
    });

    let mut kids: Vec<LoObject> = Vec::with_capacity(pagination.slices.len());
    for slice in &pagination.slices {
        let mm_per_row = slice.height_mm / px_height as f64;
        let w = mm_to_pt(slice.width_mm);
        let x = mm_to_pt(slice.x_mm);
        let mut operations = Vec::new();
        for (i, &(row, rows)) in bands.iter().enumerate() {
            let top_mm = slice.y_mm + row as f64 * mm_per_row;
            let height_mm = rows as f64 * mm_per_row;
            if top_mm + height_mm <= 0.0 || top_mm >= geometry.height_mm {
                continue;
            }
            // PDF space grows upward from the bottom edge
            let y = page_h - mm_to_pt(top_mm + height_mm);
            let h = mm_to_pt(height_mm);
            operations.push(Operation::new("q", vec![]));
            operations.push(Operation::new("cm", vec![real(w), real(0.0), real(0.0), real(h), real(x), real(y)]));
            operations.push(Operation::new("Do", vec![LoObject::Name(strip_name(i).into_bytes())]));
            operations.push(Operation::new("Q", vec![]));
        }
        let encoded = Content { operations }
            .encode()
            .map_err(|e| Error::AssemblyError(format!("content stream: {}", e)))?;
        let content_id = doc.add_object(LoStream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![real(0.0), real(0.0), real(page_w), real(page_h)],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        LoObject::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Producer" => LoObject::string_literal(concat!("rfpdf ", env!("CARGO_PKG_VERSION"))),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| Error::AssemblyError(format!("serializing PDF: {}", e)))?;
    Ok(out)
}

/// Number of pages in an encoded PDF
pub fn page_count(bytes: &[u8]) -> Result<usize> {
    let doc = LoDocument::load_mem(bytes)?;
    Ok(doc.get_pages().len())
}
