//! Rasterizer for paint commands (tiny-skia)
//!
//! Text is drawn as solid word runs on the glyph grid rather than shaped
//! glyphs; the output is a visual snapshot, not a text layer.

use crate::rendering::layout::{GLYPH, LINE_GAP};
use crate::rendering::paint::{PaintCommand, TEXT_RGBA};
use crate::rendering::RasterImage;
use crate::{Error, Result};
use image::imageops::FilterType;
use image::RgbaImage;
use tiny_skia::{IntSize, Paint, Pixmap, PixmapPaint, Rect, Transform};

fn solid(rgba: (u8, u8, u8, u8)) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgba.0, rgba.1, rgba.2, rgba.3);
    paint.anti_alias = false;
    paint
}

fn fill(pixmap: &mut Pixmap, x: f32, y: f32, w: f32, h: f32, paint: &Paint<'_>) {
    if let Some(rect) = Rect::from_xywh(x, y, w, h) {
        pixmap.fill_rect(rect, paint, Transform::identity(), None);
    }
}

fn premul_u8(channel: u8, alpha: u8) -> u8 {
    let prod = (channel as u16) * (alpha as u16) + 127;
    ((prod + (prod >> 8)) >> 8) as u8
}

fn to_pixmap(img: &RgbaImage) -> Option<Pixmap> {
    let (w, h) = img.dimensions();
    let mut data = Vec::with_capacity(img.as_raw().len());
    for px in img.as_raw().chunks_exact(4) {
        let a = px[3];
        data.extend_from_slice(&[premul_u8(px[0], a), premul_u8(px[1], a), premul_u8(px[2], a), a]);
    }
    Pixmap::from_vec(data, IntSize::from_wh(w, h)?)
}

fn draw_text(pixmap: &mut Pixmap, x: i32, y: i32, text: &str, scale: u32, s: f32) {
    let paint = solid(TEXT_RGBA);
    let cell = (GLYPH * scale) as f32;
    let advance = ((GLYPH + LINE_GAP) * scale) as f32;
    // Ink occupies the middle of the cell, like x-height
    let ink_top = cell * 0.2;
    let ink_h = cell * 0.65;
    for (row, line) in text.lines().enumerate() {
        let top = y as f32 + row as f32 * advance + ink_top;
        let mut col = 0usize;
        for segment in line.split(' ') {
            let len = segment.chars().count();
            if len > 0 {
                let left = x as f32 + col as f32 * cell;
                let width = len as f32 * cell - cell * 0.25;
                fill(pixmap, left * s, top * s, width * s, ink_h * s, &paint);
            }
            col += len + 1;
        }
    }
}

fn draw_image(pixmap: &mut Pixmap, x: i32, y: i32, width: u32, height: u32, img: &RgbaImage, s: f32) {
    let dw = ((width as f32) * s).round().max(1.0) as u32;
    let dh = ((height as f32) * s).round().max(1.0) as u32;
    let resized;
    let src = if img.dimensions() == (dw, dh) {
        img
    } else {
        resized = image::imageops::resize(img, dw, dh, FilterType::Triangle);
        &resized
    };
    if let Some(pm) = to_pixmap(src) {
        pixmap.draw_pixmap(
            (x as f32 * s).round() as i32,
            (y as f32 * s).round() as i32,
            pm.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }
}

/// Rasterize `commands` onto a white `width`×`height` CSS px canvas at
/// oversampling factor `scale`.
pub fn rasterize(commands: &[PaintCommand], width: u32, height: u32, scale: f32) -> Result<RasterImage> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(Error::ConfigError(format!("capture scale must be > 0, got {}", scale)));
    }
    let dev_w = (width as f32 * scale).ceil() as u32;
    let dev_h = (height as f32 * scale).ceil() as u32;
    let mut pixmap = Pixmap::new(dev_w, dev_h).ok_or_else(|| {
        Error::CaptureError(format!("cannot allocate a {}x{}px raster", dev_w, dev_h))
    })?;
    pixmap.fill(tiny_skia::Color::WHITE);

    for cmd in commands {
        match cmd {
            PaintCommand::SolidRect { x, y, width, height, rgba } => {
                fill(
                    &mut pixmap,
                    *x as f32 * scale,
                    *y as f32 * scale,
                    *width as f32 * scale,
                    *height as f32 * scale,
                    &solid(*rgba),
                );
            }
            PaintCommand::Text { x, y, text, scale: text_scale } => {
                draw_text(&mut pixmap, *x, *y, text, *text_scale, scale);
            }
            PaintCommand::Image { x, y, width, height, image } => {
                draw_image(&mut pixmap, *x, *y, *width, *height, image, scale);
            }
        }
    }

    let mut pixels = RgbaImage::new(dev_w, dev_h);
    for (dst, src) in pixels.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
    }
    Ok(RasterImage::new(pixels))
}
