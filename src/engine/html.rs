use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::{BrowserEngine, NodeHandle};
use crate::common::error::{HarvestError, Result};

/// Engine over a static HTML document, loaded from disk or fetched once over HTTP.
pub struct HtmlEngine {
    document: Html,
    current_url: Option<String>,
}

impl Default for HtmlEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlEngine {
    /// An engine showing an empty page
    pub fn new() -> Self {
        Self {
            document: Html::parse_document(""),
            current_url: None,
        }
    }

    pub fn from_html(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
            current_url: None,
        }
    }

    pub fn current_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    /// Replace the current DOM with a snapshot
    pub fn load_html(&mut self, html: &str) {
        self.document = Html::parse_document(html);
    }

    fn fetch(url: &str, timeout_ms: u64) -> Result<String> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;

        let response = client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text());

        match response {
            Ok(body) => Ok(body),
            Err(e) if e.is_timeout() => Err(HarvestError::NavigationTimeout {
                url: url.to_string(),
                timeout_ms,
            }),
            Err(e) => Err(e.into()),
        }
    }
}

/// `file://` URLs and scheme-less strings are read from disk
fn local_path(url: &str) -> Option<&Path> {
    if let Some(path) = url.strip_prefix("file://") {
        return Some(Path::new(path));
    }
    if url.contains("://") {
        None
    } else {
        Some(Path::new(url))
    }
}

impl BrowserEngine for HtmlEngine {
    type Node<'a> = HtmlNode<'a>;

    #[instrument(skip(self))]
    fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<()> {
        let body = match local_path(url) {
            Some(path) => {
                debug!("Reading HTML snapshot from {}", path.display());
                fs::read_to_string(path)?
            }
            None => Self::fetch(url, timeout_ms)?,
        };

        info!("Loaded {} bytes of HTML", body.len());
        self.document = Html::parse_document(&body);
        self.current_url = Some(url.to_string());
        Ok(())
    }

    fn root(&self) -> HtmlNode<'_> {
        HtmlNode(self.document.root_element())
    }
}

/// Elements that start a new rendered line
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tbody", "td", "tfoot",
    "th", "thead", "tr", "ul",
];

/// Elements whose text is never rendered
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

fn break_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

/// Text as laid out on screen: block elements and `<br>` end a line,
/// script and style bodies are skipped.
fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                if HIDDEN_ELEMENTS.contains(&name) {
                    continue;
                }
                let Some(child_element) = ElementRef::wrap(child) else {
                    continue;
                };
                let block = BLOCK_ELEMENTS.contains(&name);
                if block {
                    break_line(out);
                }
                collect_text(child_element, out);
                if block {
                    break_line(out);
                }
            }
            _ => {}
        }
    }
}

/// An element of an `HtmlEngine` document
#[derive(Debug, Clone, Copy)]
pub struct HtmlNode<'a>(ElementRef<'a>);

impl<'a> HtmlNode<'a> {
    pub fn element(&self) -> ElementRef<'a> {
        self.0
    }
}

impl<'a> NodeHandle for HtmlNode<'a> {
    fn query_all(&self, selector: &str) -> Vec<Self> {
        match Selector::parse(selector) {
            Ok(parsed) => self.0.select(&parsed).map(HtmlNode).collect(),
            Err(e) => {
                warn!("Ignoring unparseable selector '{}': {:?}", selector, e);
                Vec::new()
            }
        }
    }

    fn inner_text(&self) -> String {
        let mut out = String::new();
        collect_text(self.0, &mut out);
        out
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.value().attr(name).map(str::to_string)
    }
}
