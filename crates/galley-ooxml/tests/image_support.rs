//! Image coherence tests
//!
//! After any sequence of image inserts, every drawing must resolve through
//! exactly one relationship to exactly one media payload with a registered
//! content type, and the id counters must stay ahead of everything in use.

use std::fs;
use std::path::PathBuf;

use galley_ooxml::{Document, ImageOptions};

fn png_fixture(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&[0u8; 32]);
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    path
}

/// Check reference/relationship/payload/content-type coherence
fn assert_image_coherence(doc: &Document) {
    let mut seen = 0;
    for paragraph in doc.paragraphs() {
        for run in &paragraph.runs {
            let Some(drawing) = &run.drawing else {
                continue;
            };
            seen += 1;

            let relationship = doc
                .relationships()
                .get(&drawing.rel_id)
                .unwrap_or_else(|| panic!("missing relationship {}", drawing.rel_id));
            assert!(relationship.is_image());

            let payload_path = format!("word/{}", relationship.target);
            assert!(
                doc.archive().contains(&payload_path),
                "missing payload {payload_path}"
            );

            let extension = relationship
                .target
                .rsplit('.')
                .next()
                .expect("target has extension");
            assert!(
                doc.content_types().has_default(extension),
                "missing content type for {extension}"
            );
        }
    }
    assert_eq!(seen, doc.image_count());
}

#[test]
fn coherence_after_inserts() {
    let dir = tempfile::tempdir().unwrap();
    let a = png_fixture(&dir, "a.png");
    let b = png_fixture(&dir, "b.png");

    let mut doc = Document::new();
    doc.add_paragraph("intro");
    doc.add_image(&a, ImageOptions::default()).unwrap();
    doc.add_image_at(0, &b, ImageOptions::new().width(64).height(64))
        .unwrap();

    assert_eq!(doc.image_count(), 2);
    assert_image_coherence(&doc);

    assert!(doc.next_image_id() > 2);
    let max_rel = doc
        .relationships()
        .iter()
        .filter_map(|(id, _)| id.strip_prefix("rId"))
        .filter_map(|n| n.parse::<u32>().ok())
        .max()
        .unwrap();
    assert!(doc.next_relationship_id() > max_rel);
}

#[test]
fn counters_reinitialize_across_reload() {
    let dir = tempfile::tempdir().unwrap();

    let mut doc = Document::new();
    for name in ["one.png", "two.png", "three.png"] {
        let path = png_fixture(&dir, name);
        doc.add_image(&path, ImageOptions::default()).unwrap();
    }
    let bytes = doc.to_bytes().unwrap();

    // Reload: image counter is drawings + 1, relationship counter is max rIdN + 1
    let mut reloaded = Document::from_bytes(bytes).unwrap();
    assert_eq!(reloaded.image_count(), 3);
    assert_eq!(reloaded.next_image_id(), 4);
    assert_eq!(reloaded.next_relationship_id(), 4);

    // A fourth image continues the sequences
    let path = png_fixture(&dir, "four.png");
    reloaded.add_image(&path, ImageOptions::default()).unwrap();

    assert_eq!(reloaded.image_count(), 4);
    assert_eq!(reloaded.next_image_id(), 5);
    for id in ["rId1", "rId2", "rId3", "rId4"] {
        assert!(
            reloaded.relationships().contains(id),
            "missing relationship {id}"
        );
    }
    assert!(reloaded.content_types().has_default("png"));
    assert_image_coherence(&reloaded);
}

#[test]
fn media_payload_survives_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = png_fixture(&dir, "logo.png");
    let original_bytes = fs::read(&path).unwrap();

    let mut doc = Document::new();
    doc.add_image(&path, ImageOptions::default()).unwrap();
    let package = doc.to_bytes().unwrap();

    let reloaded = Document::from_bytes(package).unwrap();
    assert_eq!(
        reloaded.archive().get("word/media/image1.png"),
        Some(original_bytes.as_slice())
    );
}

#[test]
fn failed_validation_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("broken.png");
    fs::write(&bogus, b"no magic here").unwrap();

    let mut doc = Document::new();
    doc.add_paragraph("untouched");

    assert!(doc.add_image(&bogus, ImageOptions::default()).is_err());
    assert_eq!(doc.paragraph_count(), 1);
    assert_eq!(doc.image_count(), 0);
    assert_eq!(doc.next_image_id(), 1);
    assert_eq!(doc.next_relationship_id(), 1);
    assert!(doc.relationships().is_empty());
}

#[test]
fn mixed_formats_register_each_content_type() {
    let dir = tempfile::tempdir().unwrap();
    let png = png_fixture(&dir, "p.png");
    let gif = dir.path().join("g.gif");
    fs::write(&gif, b"GIF89a\x01\x00\x01\x00\x00\x00").unwrap();
    let bmp = dir.path().join("b.bmp");
    fs::write(&bmp, b"BM\x00\x00\x00\x00\x00\x00").unwrap();

    let mut doc = Document::new();
    doc.add_image(&png, ImageOptions::default()).unwrap();
    doc.add_image(&gif, ImageOptions::default()).unwrap();
    doc.add_image(&bmp, ImageOptions::default()).unwrap();

    assert_eq!(doc.content_types().default_for("png"), Some("image/png"));
    assert_eq!(doc.content_types().default_for("gif"), Some("image/gif"));
    assert_eq!(doc.content_types().default_for("bmp"), Some("image/bmp"));
    assert_image_coherence(&doc);

    assert!(doc.archive().contains("word/media/image1.png"));
    assert!(doc.archive().contains("word/media/image2.gif"));
    assert!(doc.archive().contains("word/media/image3.bmp"));
}
