//! Document ingest: turn a markdown file into navigable headings.
//!
//! Headings are selected with a tree-sitter query, so the same selector string that drives
//! the tracking service decides what counts as a section. Each heading gets a slug id that
//! is unique within the document, a hierarchy depth (through the configured mapper) and a
//! parent found with a depth stack.

use crate::config::NavConfig;
use crate::error::DocumentError;
use crate::formats::Format;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Parser, Query, QueryCursor};

#[derive(Clone, Debug, PartialEq, Eq)]
/// A heading found in a document.
pub struct Heading {
    /// Heading text without markup.
    pub title: String,
    /// Slug of the title, unique within the document.
    pub id: String,
    /// Hierarchy depth after applying the mapper (1 for `h1` by default).
    pub depth: usize,
    /// Zero-based line of the heading.
    pub line: usize,
    /// Id of the nearest preceding shallower heading.
    pub parent: Option<String>,
}

#[derive(Clone, Debug)]
/// A loaded document and its headings.
pub struct Document {
    /// Where the document was read from.
    pub path: PathBuf,
    /// Full text of the document.
    pub source: String,
    /// Headings in document order.
    pub headings: Vec<Heading>,
}

impl Document {
    /// Reads and parses the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the selector is not a valid query.
    pub fn load(
        path: &Path,
        format: &dyn Format,
        selector: &str,
        nav: &NavConfig,
    ) -> Result<Self, DocumentError> {
        let source = fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_source(path, source, format, selector, nav)
    }

    /// Parses `source` as though it had been read from `path`.
    ///
    /// An empty `selector` falls back to the format's section query.
    ///
    /// # Errors
    ///
    /// Returns an error if the selector is not a valid query for the format.
    pub fn from_source(
        path: &Path,
        source: String,
        format: &dyn Format,
        selector: &str,
        nav: &NavConfig,
    ) -> Result<Self, DocumentError> {
        let selector = if selector.is_empty() {
            format.section_query()
        } else {
            selector
        };
        let headings = extract_headings(&source, format, selector, nav)?;
        Ok(Self {
            path: path.to_path_buf(),
            source,
            headings,
        })
    }

    /// Lines of the document text.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.source.lines()
    }

    #[must_use]
    /// Number of lines in the document.
    pub fn line_count(&self) -> usize {
        self.source.lines().count()
    }

    #[must_use]
    /// The heading with this id.
    pub fn heading(&self, id: &str) -> Option<&Heading> {
        self.headings.iter().find(|h| h.id == id)
    }
}

/// Runs `selector` over `source` and returns the matched headings in document order.
///
/// # Errors
///
/// Returns an error if the grammar fails to load or the selector is not a valid query.
pub fn extract_headings(
    source: &str,
    format: &dyn Format,
    selector: &str,
    nav: &NavConfig,
) -> Result<Vec<Heading>, DocumentError> {
    let mut headings = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut stack: Vec<(usize, String)> = Vec::new();

    for_each_match(source, format, selector, |node| {
        let marker = format.marker(node);
        let depth = marker
            .as_deref()
            .and_then(|m| {
                nav.depth_for(m)
                    .or_else(|| m.strip_prefix('h').and_then(|d| d.parse().ok()))
            })
            .unwrap_or(1);
        let title = format.title(node, source);
        let id = unique_slug(&title, &mut seen);

        while stack.last().is_some_and(|(d, _)| *d >= depth) {
            stack.pop();
        }
        let parent = stack.last().map(|(_, id)| id.clone());
        stack.push((depth, id.clone()));

        headings.push(Heading {
            title,
            id,
            depth,
            line: node.start_position().row,
            parent,
        });
    })?;

    Ok(headings)
}

/// Zero-based lines of the nodes `selector` matches in `source`.
///
/// # Errors
///
/// Returns an error if the grammar fails to load or the selector is not a valid query.
pub fn matched_lines(
    source: &str,
    format: &dyn Format,
    selector: &str,
) -> Result<BTreeSet<usize>, DocumentError> {
    let mut lines = BTreeSet::new();
    for_each_match(source, format, selector, |node| {
        lines.insert(node.start_position().row);
    })?;
    Ok(lines)
}

fn for_each_match(
    source: &str,
    format: &dyn Format,
    selector: &str,
    mut visit: impl FnMut(Node<'_>),
) -> Result<(), DocumentError> {
    let language = format.language();
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| DocumentError::Language(e.to_string()))?;
    let tree = parser.parse(source, None).ok_or(DocumentError::Parse)?;

    let query = Query::new(&language, selector).map_err(|e| DocumentError::Query {
        selector: selector.to_string(),
        message: e.to_string(),
    })?;

    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), source.as_bytes());
    while let Some(m) = matches.next() {
        // One node per match, even when the selector captures several.
        if let Some(capture) = m.captures.first() {
            visit(capture.node);
        }
    }
    Ok(())
}

/// Lowercase, dash-separated form of a title usable as a fragment id.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if (c.is_whitespace() || c == '-' || c == '_') && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "section".to_string()
    } else {
        slug.to_string()
    }
}

fn unique_slug(title: &str, seen: &mut HashSet<String>) -> String {
    let base = slugify(title);
    let mut id = base.clone();
    let mut suffix = 1;
    while !seen.insert(id.clone()) {
        id = format!("{base}-{suffix}");
        suffix += 1;
    }
    id
}

#[cfg(test)]
#[path = "tests/document.rs"]
mod tests;
