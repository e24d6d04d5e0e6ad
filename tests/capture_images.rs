//! Cross-origin images are part of the raster capture

use rfpdf::rendering::capture;
use rfpdf::{CaptureConfig, Document};
use std::io::Cursor;
use std::sync::Once;
use tiny_http::{Response, Server};

static INIT: Once = Once::new();

fn red_png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(20, 10, image::Rgba([255, 0, 0, 255]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// Start a server that hands out a PNG from a different origin than the page
fn start_image_server() -> String {
    INIT.call_once(|| {
        std::thread::spawn(|| {
            let server = Server::http("127.0.0.1:18093").unwrap();
            let png = red_png();
            for request in server.incoming_requests() {
                let response = if request.url() == "/logo.png" {
                    Response::from_data(png.clone()).with_header(
                        "Content-Type: image/png".parse::<tiny_http::Header>().unwrap(),
                    )
                } else {
                    Response::from_data(b"Not Found".to_vec()).with_status_code(404)
                };
                let _ = request.respond(response);
            }
        });
        // Give the server time to start
        std::thread::sleep(std::time::Duration::from_millis(100));
    });

    "http://127.0.0.1:18093".to_string()
}

fn has_red(raster: &rfpdf::rendering::RasterImage) -> bool {
    raster
        .pixels()
        .pixels()
        .any(|p| p.0[0] > 200 && p.0[1] < 60 && p.0[2] < 60)
}

#[test]
#[cfg(feature = "fetch")]
fn cross_origin_image_is_captured() {
    let base = start_image_server();
    let doc = Document::new();
    let el = doc.append(format!("<p>Logo:</p><img src=\"{}/logo.png\" width=\"40\">", base));
    let cfg = CaptureConfig {
        width: 120,
        base_url: Some("https://app.example.com/report/".into()),
        ..Default::default()
    };
    let raster = capture(&el, &cfg).unwrap();
    assert!(has_red(&raster));
}

#[test]
fn cross_origin_image_is_dropped_when_disallowed() {
    let base = start_image_server();
    let doc = Document::new();
    let el = doc.append(format!("<img src=\"{}/logo.png\">", base));
    let cfg = CaptureConfig {
        width: 120,
        allow_cross_origin: false,
        base_url: Some("https://app.example.com/".into()),
        ..Default::default()
    };
    let raster = capture(&el, &cfg).unwrap();
    assert!(!has_red(&raster));
}

#[test]
fn broken_image_does_not_fail_capture() {
    let base = start_image_server();
    let doc = Document::new();
    let el = doc.append(format!("<p>before</p><img src=\"{}/missing.png\"><p>after</p>", base));
    let raster = capture(&el, &CaptureConfig { width: 120, ..Default::default() }).unwrap();
    assert_eq!(raster.width(), 240);
}
