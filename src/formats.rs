//! Format trait and implementations for different document types.
//!
//! This module defines the `Format` trait which abstracts over different
//! document formats by providing the tree-sitter grammar, the default section
//! selector, and how to read a heading's marker and title from a matched node.

pub mod markdown;

use tree_sitter::Node;

/// Grammar and heading conventions of one document format.
pub trait Format {
    /// Grammar used to parse documents of this format.
    fn language(&self) -> tree_sitter::Language;
    /// Default tree-sitter query selecting section headings.
    fn section_query(&self) -> &str;
    /// Heading marker of a matched node, e.g. `h2`, when it has one.
    fn marker(&self, node: Node<'_>) -> Option<String>;
    /// Display title of a matched node.
    fn title(&self, node: Node<'_>, source: &str) -> String;
}
