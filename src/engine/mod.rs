//! Browser automation seam.
//!
//! The pipeline only needs to query nodes and read their text or attributes.
//! Anything that can do that (a static HTML snapshot, a driven browser) plugs
//! in through these traits.

pub mod html;

pub use html::{HtmlEngine, HtmlNode};

use crate::common::error::Result;

/// A node of the rendered page. Nodes are also query scopes: selectors
/// evaluated on a node only match its descendants.
pub trait NodeHandle: Sized {
    /// All descendants matching `selector`, in document order.
    /// An unmatched or unparseable selector yields an empty list, never an error.
    fn query_all(&self, selector: &str) -> Vec<Self>;

    fn inner_text(&self) -> String;

    fn attribute(&self, name: &str) -> Option<String>;
}

pub trait BrowserEngine {
    type Node<'a>: NodeHandle
    where
        Self: 'a;

    /// Load `url`. Best effort: on timeout the previously loaded DOM stays
    /// available and callers are expected to carry on with it.
    fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<()>;

    /// Root node of the currently loaded page
    fn root(&self) -> Self::Node<'_>;
}
