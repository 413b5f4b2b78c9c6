use crate::dom::{Document, DomError};
use crate::utils::collapse_lines;
use async_trait::async_trait;
use scraper::{ElementRef, Html, Node, Selector};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Height reported per line of source, so larger snapshots "look" taller
const LINE_HEIGHT_PX: u64 = 20;

/// Elements rendered on their own line
const BLOCK_ELEMENTS: [&str; 24] = [
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "li", "main",
    "p", "section", "tr",
];

/// Elements whose content is never visible
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "template", "noscript"];

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(0);

thread_local! {
    /// Last parsed snapshot on this thread, keyed by document id
    static PARSED: RefCell<Option<(u64, Html)>> = const { RefCell::new(None) };
}

/// Document backed by a fixed HTML snapshot (e.g. a saved page)
///
/// The snapshot never changes, so scrolling is a no-op and the reported
/// height is constant. The parsed tree is not `Send`, so it is cached per
/// thread and rebuilt on a miss; element handles are node positions, which
/// are stable across parses of the same source.
#[derive(Debug, Clone)]
pub struct StaticDocument {
    id: u64,
    source: String,
}

impl StaticDocument {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            id: NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed),
            source: source.into(),
        }
    }

    /// Load a snapshot from disk
    pub fn from_file(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        Ok(Self::new(std::fs::read_to_string(path)?))
    }

    fn with_parsed<R>(&self, f: impl FnOnce(&Html) -> R) -> R {
        PARSED.with(|cell| {
            let mut slot = cell.borrow_mut();
            let cached = match slot.as_ref() {
                Some((id, _)) => *id == self.id,
                None => false,
            };
            if !cached {
                ::log::trace!("Parsing static document {}", self.id);
                *slot = Some((self.id, Html::parse_document(&self.source)));
            }
            match slot.as_ref() {
                Some((_, doc)) => f(doc),
                None => f(&Html::parse_document(&self.source)),
            }
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector, DomError> {
    Selector::parse(selector).map_err(|_| DomError::InvalidSelector(selector.to_string()))
}

/// Position of a node in the parsed tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeIndex(usize);

fn index_of(doc: &Html, element: ElementRef<'_>) -> Option<NodeIndex> {
    doc.tree
        .nodes()
        .position(|node| node.id() == element.id())
        .map(NodeIndex)
}

fn element_at(doc: &Html, index: NodeIndex) -> Option<ElementRef<'_>> {
    doc.tree.nodes().nth(index.0).and_then(ElementRef::wrap)
}

/// Approximates `innerText`: inline markup joins without separators, source
/// whitespace collapses, `<br>` and block elements break lines
fn visible_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_visible_text(element, &mut raw);
    collapse_lines(&raw)
}

fn push_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
            }
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
                    out.push('\n');
                }
                push_visible_text(child_element, out);
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

#[async_trait]
impl Document for StaticDocument {
    type Element = NodeIndex;

    async fn find(&self, selector: &str) -> Result<Option<NodeIndex>, DomError> {
        let selector = parse_selector(selector)?;
        Ok(self.with_parsed(|doc| doc.select(&selector).next().and_then(|e| index_of(doc, e))))
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<NodeIndex>, DomError> {
        let selector = parse_selector(selector)?;
        Ok(self.with_parsed(|doc| {
            // One pass over the tree instead of one scan per match
            let positions: HashMap<_, _> = doc
                .tree
                .nodes()
                .enumerate()
                .map(|(position, node)| (node.id(), position))
                .collect();
            doc.select(&selector)
                .filter_map(|e| positions.get(&e.id()).copied().map(NodeIndex))
                .collect()
        }))
    }

    async fn find_within(
        &self,
        scope: &NodeIndex,
        selector: &str,
    ) -> Result<Option<NodeIndex>, DomError> {
        let selector = parse_selector(selector)?;
        Ok(self.with_parsed(|doc| {
            element_at(doc, *scope)
                .and_then(|scope| scope.select(&selector).next())
                .and_then(|e| index_of(doc, e))
        }))
    }

    async fn inner_text(&self, element: &NodeIndex) -> Result<String, DomError> {
        Ok(self.with_parsed(|doc| {
            element_at(doc, *element)
                .map(visible_text)
                .unwrap_or_default()
        }))
    }

    async fn scroll_height(&self) -> Result<u64, DomError> {
        Ok(self.source.lines().count() as u64 * LINE_HEIGHT_PX)
    }

    async fn scroll_to(&self, y: u64) -> Result<(), DomError> {
        ::log::trace!("Static document ignores scroll to {}", y);
        Ok(())
    }
}
