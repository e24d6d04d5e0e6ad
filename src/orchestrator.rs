//! Ordered primary/fallback strategy evaluation

use crate::dom::{Document, Element};
use crate::fallback::RasterPaginator;
use crate::pdf::PdfArtifact;
use crate::{normalize_filename, Error, ExportConfig, PdfBackend, RenderReport, Result, StrategyKind};

struct Stage {
    kind: StrategyKind,
    backend: Option<Box<dyn PdfBackend>>,
}

/// Runs the strategy list `[primary, fallback]` for each export.
///
/// The primary is attempted first on every call. The fallback runs only when
/// the primary failed or is absent, and its failure is returned as-is. There
/// are no retries. Calls take `&self` and share nothing mutable, so one
/// orchestrator can serve concurrent callers.
pub struct RenderOrchestrator {
    config: ExportConfig,
    document: Document,
    stages: Vec<Stage>,
}

/// The primary compiled into this build, if any
pub fn default_primary(config: &ExportConfig) -> Option<Box<dyn PdfBackend>> {
    #[cfg(feature = "cdp")]
    {
        Some(Box::new(crate::cdp::CdpRenderer::new(config)))
    }

    #[cfg(not(feature = "cdp"))]
    {
        let _ = config;
        None
    }
}

impl RenderOrchestrator {
    /// Orchestrator with the build's default primary and the raster fallback.
    pub fn new(config: ExportConfig) -> Self {
        let primary = default_primary(&config);
        let fallback = Box::new(RasterPaginator::new(&config));
        Self::with_backends(config, primary, fallback)
    }

    /// Orchestrator with explicit strategies. `primary` may be absent.
    pub fn with_backends(
        config: ExportConfig,
        primary: Option<Box<dyn PdfBackend>>,
        fallback: Box<dyn PdfBackend>,
    ) -> Self {
        Self {
            config,
            document: Document::new(),
            stages: vec![
                Stage { kind: StrategyKind::Primary, backend: primary },
                Stage { kind: StrategyKind::Fallback, backend: Some(fallback) },
            ],
        }
    }

    /// Use `document` as the surface that hosts off-screen containers.
    pub fn with_document(mut self, document: Document) -> Self {
        self.document = document;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Produce the artifact for `target` without saving it.
    pub fn convert(&self, target: &Element, filename: Option<&str>) -> Result<PdfArtifact> {
        self.config.validate()?;
        let filename = normalize_filename(filename, &self.config.default_filename);
        let last = self.stages.len().saturating_sub(1);

        for (i, stage) in self.stages.iter().enumerate() {
            let outcome = match &stage.backend {
                Some(backend) => {
                    log::debug!("trying {:?} renderer '{}' for {}", stage.kind, backend.name(), filename);
                    backend.convert(target, &filename)
                }
                None => Err(Error::PrimaryUnavailable(
                    "no primary renderer is available in this build".into(),
                )),
            };

            match outcome {
                Ok(mut artifact) => {
                    artifact.strategy = stage.kind;
                    return Ok(artifact);
                }
                Err(e) if i < last => {
                    log::warn!("{:?} renderer failed, falling back: {}", stage.kind, e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(Error::Other("no render strategy configured".into()))
    }

    /// Render `target` and save it into the configured output directory.
    pub fn render_element(&self, target: &Element, filename: Option<&str>) -> Result<RenderReport> {
        let artifact = self.convert(target, filename)?;
        let path = artifact.save_to(&self.config.output_dir)?;
        log::debug!(
            "{} written by {:?} renderer ({} pages)",
            path.display(),
            artifact.strategy,
            artifact.page_count
        );
        Ok(RenderReport {
            sha256: artifact.sha256_hex(),
            filename: artifact.filename,
            path,
            strategy: artifact.strategy,
            page_count: artifact.page_count,
            bytes: artifact.bytes.len(),
        })
    }

    /// Render a markup string through a temporary off-screen container,
    /// which is removed again whether or not the export succeeds.
    pub fn render_markup(&self, html: &str, filename: Option<&str>) -> Result<RenderReport> {
        let container = self.document.attach_offscreen(html);
        self.render_element(container.element(), filename)
    }
}
