//! Comparison scenarios over real packages

use galley_diff::{ChangeKind, DiffOptions, Differ, HtmlRenderer, Render, TextRenderer};
use galley_ooxml::Document;

fn doc_with(texts: &[&str]) -> Document {
    let mut doc = Document::new();
    for text in texts {
        doc.add_paragraph(*text);
    }
    doc
}

#[test]
fn identity_through_disk() {
    let dir = std::env::temp_dir();
    let path = dir.join(format!("galley-diff-identity-{}.docx", std::process::id()));

    let mut doc = doc_with(&["alpha", "beta", "gamma"]);
    doc.save(&path).unwrap();

    let result = Differ::new(DiffOptions::default())
        .compare(&path, &path)
        .unwrap();

    assert!(result.changes.is_empty());
    assert_eq!(result.stats.total_changes, 0);
    assert_eq!(result.stats.added, 0);
    assert_eq!(result.stats.deleted, 0);
    assert_eq!(result.stats.unchanged, 3);
    assert_eq!(result.old_document, result.new_document);

    std::fs::remove_file(&path).ok();
}

#[test]
fn insertion_and_deletion_mix() {
    let old = doc_with(&["intro", "kept", "obsolete", "end"]);
    let new = doc_with(&["intro", "added line", "kept", "end"]);

    let result =
        Differ::new(DiffOptions::default()).compare_documents(&old, &new, "old", "new");

    let added: Vec<&str> = result
        .changes
        .iter()
        .filter(|c| c.kind == ChangeKind::Added)
        .map(|c| c.new.as_str())
        .collect();
    let deleted: Vec<&str> = result
        .changes
        .iter()
        .filter(|c| c.kind == ChangeKind::Deleted)
        .map(|c| c.old.as_str())
        .collect();

    assert_eq!(added, vec!["added line"]);
    assert_eq!(deleted, vec!["obsolete"]);
    assert_eq!(result.stats.unchanged, 3);
}

#[test]
fn normalization_flags_together() {
    let old = doc_with(&["  HELLO  ", "  WORLD  "]);
    let new = doc_with(&["hello", "world"]);

    let options = DiffOptions {
        ignore_whitespace: true,
        ignore_case: true,
        ..DiffOptions::default()
    };
    let result = Differ::new(options).compare_documents(&old, &new, "old", "new");

    assert!(result.changes.is_empty());
    assert_eq!(result.stats.added, 0);
    assert_eq!(result.stats.deleted, 0);
}

#[test]
fn renderers_consume_real_results() {
    let old = doc_with(&["one", "two"]);
    let new = doc_with(&["one", "three"]);

    let result =
        Differ::new(DiffOptions::default()).compare_documents(&old, &new, "v1.docx", "v2.docx");

    let html = HtmlRenderer::new(true).render(&result);
    assert!(html.contains("v1.docx"));
    assert!(html.contains("two"));
    assert!(html.contains("three"));

    let text = TextRenderer::new(true, false).render(&result);
    assert!(text.contains("[DELETED]"));
    assert!(text.contains("[ADDED]"));
}
