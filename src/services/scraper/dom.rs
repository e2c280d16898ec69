//! Document query primitives
//!
//! Extraction code talks to pages only through [`Document`] and [`Node`]:
//! `select_all`, `select_first`, `attr`, `text` and `find_ancestor`.
//! Invalid selector expressions are logged and behave as "no match".

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use super::normalize::clean_text;

fn compile(expr: &str) -> Option<Selector> {
    match Selector::parse(expr) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!("Invalid selector '{}': {}", expr, e);
            None
        }
    }
}

/// Parsed HTML page
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// Root element, the scope for document-wide queries
    pub fn root(&self) -> Node<'_> {
        Node(self.html.root_element())
    }

    pub fn select_first(&self, expr: &str) -> Option<Node<'_>> {
        self.root().select_first(expr)
    }
}

/// Element inside a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node<'a>(ElementRef<'a>);

impl<'a> Node<'a> {
    /// Descendants matching `expr`, in document order
    pub fn select_all(&self, expr: &str) -> Vec<Node<'a>> {
        match compile(expr) {
            Some(selector) => self.0.select(&selector).map(Node).collect(),
            None => Vec::new(),
        }
    }

    pub fn select_first(&self, expr: &str) -> Option<Node<'a>> {
        let selector = compile(expr)?;
        self.0.select(&selector).next().map(Node)
    }

    /// Raw attribute value
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.0.value().attr(name)
    }

    /// First attribute in `names` with a non-blank value, trimmed
    pub fn first_attr(&self, names: &[&str]) -> Option<String> {
        names
            .iter()
            .filter_map(|name| self.attr(name))
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map(str::to_string)
    }

    /// All descendant text, concatenated as-is
    pub fn text(&self) -> String {
        self.0.text().collect()
    }

    /// Descendant text with whitespace collapsed
    pub fn clean_text(&self) -> String {
        clean_text(&self.text())
    }

    /// Raw inner HTML (used for inline scripts)
    pub fn inner_html(&self) -> String {
        self.0.inner_html()
    }

    /// Closest strict ancestor matching `expr`
    pub fn find_ancestor(&self, expr: &str) -> Option<Node<'a>> {
        let selector = compile(expr)?;
        self.0
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|element| selector.matches(element))
            .map(Node)
    }

    /// Whether this element itself matches `expr`
    pub fn is(&self, expr: &str) -> bool {
        compile(expr)
            .map(|selector| selector.matches(&self.0))
            .unwrap_or(false)
    }

    pub fn tag_name(&self) -> &'a str {
        self.0.value().name()
    }
}
