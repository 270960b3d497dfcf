//! Markdown format implementation using tree-sitter-md.
//!
//! This module provides the block grammar and heading conventions for markdown
//! documents: ATX headings (`#` syntax) carry their depth in the marker node,
//! setext headings in their underline.

use crate::formats::Format;
use tree_sitter::Node;

/// Heading conventions for markdown documents.
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn language(&self) -> tree_sitter::Language {
        tree_sitter_md::LANGUAGE.into()
    }

    fn section_query(&self) -> &'static str {
        "[(atx_heading) (setext_heading)] @heading"
    }

    fn marker(&self, node: Node<'_>) -> Option<String> {
        let mut cursor = node.walk();
        let marker = node.children(&mut cursor).find_map(|child| {
            let kind = child.kind();
            let depth = kind
                .strip_prefix("atx_h")
                .and_then(|rest| rest.strip_suffix("_marker"))
                .or_else(|| {
                    kind.strip_prefix("setext_h")
                        .and_then(|rest| rest.strip_suffix("_underline"))
                })?;
            Some(format!("h{depth}"))
        });
        marker
    }

    fn title(&self, node: Node<'_>, source: &str) -> String {
        let bytes = source.as_bytes();
        let mut cursor = node.walk();
        let content = node
            .children(&mut cursor)
            .find(|child| matches!(child.kind(), "inline" | "paragraph"));

        let text = content.unwrap_or(node).utf8_text(bytes).unwrap_or_default();

        text.lines()
            .next()
            .unwrap_or_default()
            .trim_start_matches('#')
            .trim()
            .to_string()
    }
}
