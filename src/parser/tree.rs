//! Concrete parse tree
//!
//! A [`ParseTree`] node is either a *terminal*, mirroring exactly one consumed
//! token (label = token kind, value = token text, no children), or a
//! *nonterminal* labelled with the grammar rule that produced it (empty value,
//! children in grammar order). Children are owned by value, so dropping the
//! root frees the whole tree.
//!
//! # Rendering
//!
//! [`Display`](fmt::Display) writes one line per node in depth-first pre-order,
//! indenting two spaces per level. Nonterminals render as their label and
//! terminals as `label(value)`:
//!
//! ```text
//! class
//!   keyword(class)
//!   identifier(Main)
//!   symbol({)
//!   symbol(})
//! ```

use crate::parser::lexer::Token;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseTree {
    label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<ParseTree>,
}

impl ParseTree {
    /// Create an empty nonterminal node for a grammar rule.
    pub fn nonterminal(label: &str) -> Self {
        Self {
            label: label.to_string(),
            value: None,
            children: Vec::new(),
        }
    }

    /// Create a leaf mirroring a consumed token.
    pub fn terminal(token: &Token) -> Self {
        Self {
            label: token.kind().as_str().to_string(),
            value: Some(token.text().to_string()),
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, child: ParseTree) {
        self.children.push(child);
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Token text for terminals, empty for nonterminals.
    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }

    pub fn children(&self) -> &[ParseTree] {
        &self.children
    }

    pub fn is_terminal(&self) -> bool {
        self.value.is_some()
    }

    /// Total number of nodes in this subtree, itself included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ParseTree::node_count).sum::<usize>()
    }

    /// Number of nodes carrying each label in this subtree.
    pub fn label_counts(&self) -> FxHashMap<&str, usize> {
        let mut counts = FxHashMap::default();
        self.count_labels(&mut counts);
        counts
    }

    fn count_labels<'a>(&'a self, counts: &mut FxHashMap<&'a str, usize>) {
        *counts.entry(self.label.as_str()).or_insert(0) += 1;
        for child in &self.children {
            child.count_labels(counts);
        }
    }

    /// Leaf values in source order.
    pub fn terminal_values(&self) -> Vec<&str> {
        let mut values = Vec::new();
        self.collect_terminals(&mut values);
        values
    }

    fn collect_terminals<'a>(&'a self, values: &mut Vec<&'a str>) {
        if let Some(value) = &self.value {
            values.push(value);
        }
        for child in &self.children {
            child.collect_terminals(values);
        }
    }

    /// Pretty-printed JSON form of the tree.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match &self.value {
            Some(value) => writeln!(f, "{indent}{}({value})", self.label)?,
            None => writeln!(f, "{indent}{}", self.label)?,
        }
        for child in &self.children {
            child.render(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}
