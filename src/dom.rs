//! A minimal rendering surface that owns attached markup nodes
//!
//! `Document` stands in for the live page: elements are attached to it, and
//! capture only works for elements that are still attached. Off-screen
//! containers are attached for the duration of one export and removed by
//! their guard when it goes out of scope.

use crate::{Error, Result};
use std::sync::{Arc, Mutex, MutexGuard};

/// Identifier of a node attached to a `Document`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// Where an attached node sits relative to the visible viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Normal document flow
    InFlow,
    /// Laid out and renderable, but positioned outside the visible viewport
    OffScreen,
}

#[derive(Debug)]
struct NodeEntry {
    id: NodeId,
    markup: String,
    position: Position,
}

#[derive(Debug, Default)]
struct DocumentInner {
    next_id: u64,
    nodes: Vec<NodeEntry>,
}

/// Shared handle to a rendering surface. Cloning yields another handle to the
/// same surface.
#[derive(Debug, Clone, Default)]
pub struct Document {
    inner: Arc<Mutex<DocumentInner>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, DocumentInner> {
        // A panic while holding the lock cannot leave the node list half-edited
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Attach markup to the document flow and return a handle to it.
    pub fn append(&self, markup: impl Into<String>) -> Element {
        self.attach(markup.into(), Position::InFlow)
    }

    /// Attach markup outside the visible viewport. The returned guard detaches
    /// it when dropped.
    pub fn attach_offscreen(&self, markup: impl Into<String>) -> OffscreenContainer {
        let element = self.attach(markup.into(), Position::OffScreen);
        log::debug!("attached off-screen container {:?}", element.id);
        OffscreenContainer { element }
    }

    fn attach(&self, markup: String, position: Position) -> Element {
        let mut inner = self.lock();
        let id = NodeId(inner.next_id);
        inner.next_id += 1;
        inner.nodes.push(NodeEntry { id, markup, position });
        Element {
            document: self.clone(),
            id,
        }
    }

    /// Remove a node. Returns false when it was already detached.
    pub fn detach(&self, id: NodeId) -> bool {
        let mut inner = self.lock();
        let before = inner.nodes.len();
        inner.nodes.retain(|n| n.id != id);
        inner.nodes.len() != before
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.lock().nodes.iter().any(|n| n.id == id)
    }

    /// Number of attached nodes
    pub fn len(&self) -> usize {
        self.lock().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of attached off-screen containers
    pub fn offscreen_count(&self) -> usize {
        self.lock()
            .nodes
            .iter()
            .filter(|n| n.position == Position::OffScreen)
            .count()
    }
}

/// Handle to a node attached to a `Document`
#[derive(Debug, Clone)]
pub struct Element {
    document: Document,
    id: NodeId,
}

impl Element {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn is_attached(&self) -> bool {
        self.document.contains(self.id)
    }

    pub fn position(&self) -> Option<Position> {
        self.document
            .lock()
            .nodes
            .iter()
            .find(|n| n.id == self.id)
            .map(|n| n.position)
    }

    /// Current markup of the element. Fails with `CaptureError` when the
    /// element is no longer attached to its document.
    pub fn outer_html(&self) -> Result<String> {
        self.document
            .lock()
            .nodes
            .iter()
            .find(|n| n.id == self.id)
            .map(|n| n.markup.clone())
            .ok_or_else(|| {
                Error::CaptureError(format!("element {:?} is not attached to a document", self.id))
            })
    }

    /// Replace the element's content.
    pub fn set_inner_html(&self, markup: impl Into<String>) -> Result<()> {
        let mut inner = self.document.lock();
        let node = inner
            .nodes
            .iter_mut()
            .find(|n| n.id == self.id)
            .ok_or_else(|| Error::Other(format!("element {:?} is not attached", self.id)))?;
        node.markup = markup.into();
        Ok(())
    }
}

/// Off-screen container attached for the duration of one export.
///
/// Dropping the guard detaches the container, including on early returns and
/// error paths.
#[derive(Debug)]
pub struct OffscreenContainer {
    element: Element,
}

impl OffscreenContainer {
    pub fn element(&self) -> &Element {
        &self.element
    }
}

impl Drop for OffscreenContainer {
    fn drop(&mut self) {
        if self.element.document.detach(self.element.id) {
            log::debug!("detached off-screen container {:?}", self.element.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_detach() {
        let doc = Document::new();
        let el = doc.append("<p>hi</p>");
        assert!(el.is_attached());
        assert_eq!(el.position(), Some(Position::InFlow));
        assert_eq!(el.outer_html().unwrap(), "<p>hi</p>");
        assert!(doc.detach(el.id()));
        assert!(!doc.detach(el.id()));
        assert!(matches!(el.outer_html(), Err(Error::CaptureError(_))));
    }

    #[test]
    fn offscreen_container_is_removed_on_drop() {
        let doc = Document::new();
        {
            let c = doc.attach_offscreen("<h1>Report</h1>");
            assert_eq!(doc.offscreen_count(), 1);
            assert_eq!(c.element().position(), Some(Position::OffScreen));
        }
        assert_eq!(doc.offscreen_count(), 0);
        assert!(doc.is_empty());
    }

    #[test]
    fn guard_tolerates_manual_detach() {
        let doc = Document::new();
        let c = doc.attach_offscreen("<p>x</p>");
        doc.detach(c.element().id());
        drop(c);
        assert!(doc.is_empty());
    }

    #[test]
    fn set_inner_html_replaces_markup() {
        let doc = Document::new();
        let el = doc.append("");
        el.set_inner_html("<p>later</p>").unwrap();
        assert_eq!(el.outer_html().unwrap(), "<p>later</p>");
    }
}
