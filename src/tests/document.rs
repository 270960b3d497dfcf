use super::{matched_lines, slugify, Document};
use crate::config::NavConfig;
use crate::error::DocumentError;
use crate::formats::markdown::MarkdownFormat;
use crate::formats::Format;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const GUIDE: &str = "# Guide\n\nIntro text.\n\n## Install\n\nSteps.\n\n### From source\n\nBuild it.\n\n## Usage\n\nRun it.\n\n# Appendix\n\nMore.\n";

fn parse(source: &str, nav: &NavConfig) -> Document {
    Document::from_source(
        Path::new("guide.md"),
        source.to_string(),
        &MarkdownFormat,
        "",
        nav,
    )
    .unwrap()
}

#[test]
fn test_headings_in_document_order() {
    let doc = parse(GUIDE, &NavConfig::default());

    let ids: Vec<&str> = doc.headings.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["guide", "install", "from-source", "usage", "appendix"]);

    let titles: Vec<&str> = doc.headings.iter().map(|h| h.title.as_str()).collect();
    assert_eq!(titles[2], "From source");

    assert_eq!(doc.headings[0].line, 0);
    assert_eq!(doc.headings[1].line, 4);
}

#[test]
fn test_parents_follow_heading_depth() {
    let doc = parse(GUIDE, &NavConfig::default());
    let parent = |id: &str| doc.heading(id).unwrap().parent.clone();

    assert_eq!(parent("guide"), None);
    assert_eq!(parent("install").as_deref(), Some("guide"));
    assert_eq!(parent("from-source").as_deref(), Some("install"));
    assert_eq!(parent("usage").as_deref(), Some("guide"));
    assert_eq!(parent("appendix"), None);
}

#[test]
fn test_hierarchy_mapper_flattens_levels() {
    let mut nav = NavConfig::default();
    nav.hierarchy_mapper.insert("h3".to_string(), 2);
    nav.hierarchy_mapper.insert("h2".to_string(), 2);

    let doc = parse(GUIDE, &nav);

    assert_eq!(doc.heading("from-source").unwrap().depth, 2);
    assert_eq!(
        doc.heading("from-source").unwrap().parent.as_deref(),
        Some("guide")
    );
}

#[test]
fn test_duplicate_titles_get_unique_ids() {
    let doc = parse(
        "# Notes\n\n## Notes\n\n## Notes\n\n## Notes 1\n",
        &NavConfig::default(),
    );

    let ids: Vec<&str> = doc.headings.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["notes", "notes-1", "notes-2", "notes-1-1"]);
}

#[test]
fn test_setext_headings_are_sections() {
    let doc = parse("Title\n=====\n\nBody\n\nPart\n----\n", &NavConfig::default());

    let ids: Vec<&str> = doc.headings.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["title", "part"]);
    assert_eq!(doc.heading("part").unwrap().parent.as_deref(), Some("title"));
}

#[test]
fn test_custom_selector_restricts_headings() {
    let nav = NavConfig::default();
    let doc = Document::from_source(
        Path::new("guide.md"),
        GUIDE.to_string(),
        &MarkdownFormat,
        "(atx_heading (atx_h2_marker)) @heading",
        &nav,
    )
    .unwrap();

    let ids: Vec<&str> = doc.headings.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["install", "usage"]);
}

#[test]
fn test_invalid_selector_is_reported() {
    let err = matched_lines(GUIDE, &MarkdownFormat, "(not_a_node) @x").unwrap_err();
    assert!(matches!(err, DocumentError::Query { .. }));
}

#[test]
fn test_matched_lines_for_default_query() {
    let lines = matched_lines(GUIDE, &MarkdownFormat, MarkdownFormat.section_query()).unwrap();
    assert_eq!(lines.into_iter().collect::<Vec<_>>(), vec![0, 4, 8, 12, 16]);
}

#[test]
fn test_load_reads_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{GUIDE}").unwrap();

    let doc = Document::load(file.path(), &MarkdownFormat, "", &NavConfig::default()).unwrap();

    assert_eq!(doc.headings.len(), 5);
    assert_eq!(doc.line_count(), GUIDE.lines().count());
}

#[test]
fn test_load_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = Document::load(
        &dir.path().join("missing.md"),
        &MarkdownFormat,
        "",
        &NavConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, DocumentError::Read { .. }));
}

#[test]
fn test_slugify() {
    assert_eq!(slugify("Getting Started"), "getting-started");
    assert_eq!(slugify("  API: v2 -- notes_"), "api-v2-notes");
    assert_eq!(slugify("???"), "section");
}
