use criterion::{criterion_group, criterion_main, Criterion};
use rfpdf::fallback::RasterPaginator;
use rfpdf::paginate::paginate;
use rfpdf::rendering::{capture, RasterImage};
use rfpdf::{CaptureConfig, Document, ExportConfig, PageGeometry};

fn bench_paginate(c: &mut Criterion) {
    let g = PageGeometry::default();
    c.bench_function("paginate_1600x40000", |b| {
        b.iter(|| paginate(&g, 1600, 40000).unwrap())
    });
}

fn bench_capture(c: &mut Criterion) {
    let doc = Document::new();
    let body: String = (0..100)
        .map(|i| format!("<h3>Section {}</h3><p>Some body text for section {}.</p>", i, i))
        .collect();
    let el = doc.append(body);
    let cfg = CaptureConfig::default();

    c.bench_function("capture_100_sections", |b| {
        b.iter(|| capture(&el, &cfg).unwrap())
    });
}

fn bench_assemble(c: &mut Criterion) {
    let paginator = RasterPaginator::new(&ExportConfig::default());
    let raster = RasterImage::new(image::RgbaImage::from_pixel(
        1600,
        6000,
        image::Rgba([250, 250, 250, 255]),
    ));

    c.bench_function("paginate_and_assemble_1600x6000", |b| {
        b.iter(|| paginator.paginate_raster(&raster, "bench.pdf").unwrap())
    });
}

criterion_group!(benches, bench_paginate, bench_capture, bench_assemble);
criterion_main!(benches);
