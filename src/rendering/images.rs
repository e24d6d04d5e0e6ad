//! Image resolution for raster capture
//!
//! Sources are resolved against the capture's base URL. `data:` URIs and
//! `file:` URLs are read directly; `http(s)` URLs are fetched when the
//! `fetch` feature is enabled. Network images from a different origin than
//! the base URL are only loaded when cross-origin capture is allowed.

use crate::CaptureConfig;
use base64::Engine as Base64Engine;
use image::RgbaImage;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

#[cfg(feature = "fetch")]
use std::time::Duration;

/// Per-capture image cache and loader
pub struct ImageLoader {
    base_url: Option<Url>,
    allow_cross_origin: bool,
    #[cfg(feature = "fetch")]
    timeout: Duration,
    #[cfg(feature = "fetch")]
    client: Option<reqwest::blocking::Client>,
    cache: HashMap<String, Option<Arc<RgbaImage>>>,
}

impl ImageLoader {
    pub fn new(config: &CaptureConfig) -> Self {
        let base_url = config.base_url.as_deref().and_then(|b| match Url::parse(b) {
            Ok(u) => Some(u),
            Err(e) => {
                log::warn!("ignoring invalid capture base URL {}: {}", b, e);
                None
            }
        });
        Self {
            base_url,
            allow_cross_origin: config.allow_cross_origin,
            #[cfg(feature = "fetch")]
            timeout: Duration::from_millis(config.fetch_timeout_ms),
            #[cfg(feature = "fetch")]
            client: None,
            cache: HashMap::new(),
        }
    }

    /// Load and decode `src`. Failures are logged and yield `None`; the same
    /// source is only attempted once per capture.
    pub fn load(&mut self, src: &str) -> Option<Arc<RgbaImage>> {
        if let Some(cached) = self.cache.get(src) {
            return cached.clone();
        }
        let loaded = match self.fetch_bytes(src) {
            Ok(bytes) => match decode(&bytes) {
                Ok(img) => Some(Arc::new(img)),
                Err(e) => {
                    log::warn!("skipping image {}: {}", truncate(src), e);
                    None
                }
            },
            Err(e) => {
                log::warn!("skipping image {}: {}", truncate(src), e);
                None
            }
        };
        self.cache.insert(src.to_string(), loaded.clone());
        loaded
    }

    fn fetch_bytes(&mut self, src: &str) -> std::result::Result<Vec<u8>, String> {
        if let Some((_mime, data)) = parse_data_uri(src) {
            return Ok(data);
        }

        let url = match (Url::parse(src), &self.base_url) {
            (Ok(u), _) => u,
            (Err(_), Some(base)) => base.join(src).map_err(|e| e.to_string())?,
            (Err(e), None) => return Err(format!("relative source without base URL ({})", e)),
        };

        match url.scheme() {
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|_| "invalid file URL".to_string())?;
                std::fs::read(&path).map_err(|e| format!("{}: {}", path.display(), e))
            }
            "http" | "https" => {
                let same_origin = self
                    .base_url
                    .as_ref()
                    .map(|b| b.origin() == url.origin())
                    .unwrap_or(false);
                if !same_origin && !self.allow_cross_origin {
                    return Err("cross-origin image and cross-origin capture is disabled".into());
                }
                self.fetch_remote(&url)
            }
            other => Err(format!("unsupported scheme {}", other)),
        }
    }

    #[cfg(feature = "fetch")]
    fn fetch_remote(&mut self, url: &Url) -> std::result::Result<Vec<u8>, String> {
        if self.client.is_none() {
            let client = reqwest::blocking::Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(|e| format!("Failed to build HTTP client: {}", e))?;
            self.client = Some(client);
        }
        let client = self.client.as_ref().ok_or("HTTP client unavailable")?;
        let resp = client
            .get(url.as_str())
            .send()
            .map_err(|e| format!("Failed to fetch {}: {}", url, e))?;
        if !resp.status().is_success() {
            return Err(format!("HTTP {} for {}", resp.status(), url));
        }
        resp.bytes()
            .map(|b| b.to_vec())
            .map_err(|e| format!("Failed to read response body: {}", e))
    }

    #[cfg(not(feature = "fetch"))]
    fn fetch_remote(&mut self, url: &Url) -> std::result::Result<Vec<u8>, String> {
        Err(format!("network fetching is disabled in this build ({})", url))
    }
}

fn decode(data: &[u8]) -> std::result::Result<RgbaImage, image::ImageError> {
    Ok(image::load_from_memory(data)?.to_rgba8())
}

fn truncate(src: &str) -> &str {
    match src.char_indices().nth(64) {
        Some((idx, _)) => &src[..idx],
        None => src,
    }
}

/// Split a `data:` URI into its media type and decoded payload.
pub fn parse_data_uri(uri: &str) -> Option<(String, Vec<u8>)> {
    let rest = uri.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header
        .split(';')
        .next()
        .filter(|v| !v.is_empty())
        .unwrap_or("text/plain")
        .to_string();
    let data = if header.split(';').any(|p| p == "base64") {
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .ok()?
    } else {
        payload.as_bytes().to_vec()
    };
    Some((mime, data))
}
