//! Markup query layer
//!
//! A thin typed wrapper over the `scraper` crate. The crawler only ever asks
//! three things of a rendered page: select elements by pattern, read their
//! text, read an attribute. Keeping those behind [`MarkupQuery`] means the
//! extraction code never touches the parser directly.
//!
//! [`Snapshot`] is not `Send`; parse it, query it and drop it inside
//! synchronous code.

mod patterns;

pub use patterns::{SitePatterns, LISTED_DATE_CLASS};

use crate::MarkupError;
use scraper::{ElementRef, Html, Selector};

/// A compiled element pattern (CSS selector)
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    selector: Selector,
}

impl Pattern {
    /// Compiles a pattern
    pub fn parse(source: &str) -> Result<Self, MarkupError> {
        let selector = Selector::parse(source).map_err(|e| MarkupError::InvalidPattern {
            pattern: source.to_string(),
            message: format!("{:?}", e),
        })?;

        Ok(Self {
            source: source.to_string(),
            selector,
        })
    }

    /// The pattern text this was compiled from
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Query capabilities shared by a whole document and a single element
pub trait MarkupQuery {
    /// All descendants matching `pattern`, in document order
    fn select_all(&self, pattern: &Pattern) -> Vec<Node<'_>>;

    /// The first descendant matching `pattern`
    fn select_first(&self, pattern: &Pattern) -> Option<Node<'_>> {
        self.select_all(pattern).into_iter().next()
    }

    /// Counts descendants matching `pattern`
    fn count(&self, pattern: &Pattern) -> usize {
        self.select_all(pattern).len()
    }

    /// Stripped text of the first match, or an empty string when nothing matches
    fn text_of_first(&self, pattern: &Pattern) -> String {
        self.select_first(pattern)
            .map(|node| node.text())
            .unwrap_or_default()
    }
}

/// A parsed snapshot of a rendered page
pub struct Snapshot {
    html: Html,
}

impl Snapshot {
    /// Parses full page markup
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }
}

impl MarkupQuery for Snapshot {
    fn select_all(&self, pattern: &Pattern) -> Vec<Node<'_>> {
        self.html.select(&pattern.selector).map(Node).collect()
    }
}

/// One element inside a [`Snapshot`]
#[derive(Debug, Clone, Copy)]
pub struct Node<'a>(ElementRef<'a>);

impl<'a> Node<'a> {
    /// Text content with every text fragment trimmed and empty fragments
    /// dropped, concatenated without separators
    pub fn text(&self) -> String {
        self.0
            .text()
            .map(str::trim)
            .filter(|fragment| !fragment.is_empty())
            .collect()
    }

    /// Raw text content, untrimmed
    pub fn raw_text(&self) -> String {
        self.0.text().collect()
    }

    /// Value of the named attribute, if present
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.0.value().attr(name)
    }

    /// Tag name, lowercase
    pub fn name(&self) -> &'a str {
        self.0.value().name()
    }

    /// Whether the element carries `class` in its class list
    pub fn has_class(&self, class: &str) -> bool {
        self.0.value().classes().any(|c| c == class)
    }

    /// The first child that is an element, skipping text and comments
    pub fn first_element_child(&self) -> Option<Node<'a>> {
        self.0.children().find_map(ElementRef::wrap).map(Node)
    }
}

impl<'a> MarkupQuery for Node<'a> {
    fn select_all(&self, pattern: &Pattern) -> Vec<Node<'_>> {
        self.0.select(&pattern.selector).map(Node).collect()
    }
}
