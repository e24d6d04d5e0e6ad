use crate::dom::Element;
use crate::orchestrator::RenderOrchestrator;
use crate::{Error, ExportConfig, RenderReport, Result};
use std::sync::Arc;
use std::thread;
use tokio::sync::oneshot;

/// An async-friendly exporter backed by worker threads.
///
/// Each conversion runs on its own dedicated thread and reports back through
/// a oneshot channel, so async callers suspend while capture and conversion
/// run and the blocking work never lands on the async runtime. The
/// underlying orchestrator is shared; calls do not share any mutable state.
#[derive(Clone)]
pub struct PdfExporter {
    orchestrator: Arc<RenderOrchestrator>,
}

impl PdfExporter {
    /// Create an exporter with the build's default strategies.
    pub fn new(config: Option<ExportConfig>) -> Self {
        Self::from_orchestrator(RenderOrchestrator::new(config.unwrap_or_default()))
    }

    pub fn from_orchestrator(orchestrator: RenderOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }

    pub fn orchestrator(&self) -> &RenderOrchestrator {
        &self.orchestrator
    }

    /// Render an attached element and save it (entry point A).
    pub async fn render_element_to_pdf(
        &self,
        element: &Element,
        filename: Option<&str>,
    ) -> Result<RenderReport> {
        let orchestrator = Arc::clone(&self.orchestrator);
        let element = element.clone();
        let filename = filename.map(|s| s.to_string());
        run_on_worker("render", move || {
            orchestrator.render_element(&element, filename.as_deref())
        })
        .await
    }

    /// Render a markup string through an off-screen container (entry
    /// point B). The container is gone once this resolves, on success or
    /// failure.
    pub async fn render_markup_to_pdf(&self, html: &str, filename: Option<&str>) -> Result<RenderReport> {
        let container = self.orchestrator.document().attach_offscreen(html);
        let res = self.render_element_to_pdf(container.element(), filename).await;
        drop(container);
        res
    }
}

async fn run_on_worker<T, F>(label: &str, job: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    thread::Builder::new()
        .name(format!("rfpdf-{}", label))
        .spawn(move || {
            // Receiver dropped means the caller stopped waiting
            let _ = tx.send(job());
        })
        .map_err(|e| Error::Other(format!("Failed to spawn {} worker: {}", label, e)))?;

    rx.await
        .map_err(|e| Error::Other(format!("{} canceled: {}", label, e)))?
}
