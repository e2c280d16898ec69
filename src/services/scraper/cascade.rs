//! Selector cascades
//!
//! A [`Cascade`] is the ordered list of selector expressions that locate one
//! field or section across the site's template versions, newest first. The
//! first strategy with at least one match wins; later strategies are never
//! consulted and matches are never merged across strategies. A strategy with
//! zero matches just means "try the next template version".

use tracing::{debug, trace};

use super::dom::Node;

#[derive(Debug, Clone, Copy)]
pub struct Cascade {
    name: &'static str,
    strategies: &'static [&'static str],
}

impl Cascade {
    pub const fn new(name: &'static str, strategies: &'static [&'static str]) -> Self {
        Self { name, strategies }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    #[cfg(test)]
    pub fn strategies(&self) -> &'static [&'static str] {
        self.strategies
    }

    /// First node of the first strategy that matches inside `scope`
    pub fn first_match<'a>(&self, scope: Node<'a>) -> Option<Node<'a>> {
        self.strategies.iter().enumerate().find_map(|(index, expr)| {
            let found = scope.select_first(expr);
            if found.is_some() {
                trace!(cascade = self.name, strategy = index, "matched '{}'", expr);
            }
            found
        })
    }

    /// All nodes of the first strategy that matches inside `scope`
    pub fn first_match_many<'a>(&self, scope: Node<'a>) -> Vec<Node<'a>> {
        for (index, expr) in self.strategies.iter().enumerate() {
            let nodes = scope.select_all(expr);
            if !nodes.is_empty() {
                debug!(
                    cascade = self.name,
                    strategy = index,
                    matches = nodes.len(),
                    "matched '{}'",
                    expr
                );
                return nodes;
            }
        }
        Vec::new()
    }

    /// Cleaned text of the first match, `None` when absent or blank
    pub fn text(&self, scope: Node<'_>) -> Option<String> {
        self.first_match(scope)
            .map(|node| node.clean_text())
            .filter(|text| !text.is_empty())
    }
}
