//! Embedded image support
//!
//! Images are validated by extension and magic number, stored under
//! `word/media/`, and wired into the package through a relationship and a
//! content-type default. All four places must agree: the drawing's
//! relationship id, the relationship target, the media payload, and the
//! extension's MIME entry.
//!
//! OOXML measures drawings in EMUs (English Metric Units):
//! - 914400 EMUs = 1 inch
//! - 9525 EMUs = 1 pixel (at 96 DPI)

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::document::{Block, Document, Paragraph, Run};
use crate::error::{OoxmlError, Result};

/// EMUs per inch (914400)
pub const EMU_PER_INCH: i64 = 914400;

/// EMUs per pixel at 96 DPI (9525)
pub const EMU_PER_PIXEL: i64 = 9525;

/// Extensions accepted by the image subsystem
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "svg", "ico", "tiff", "tif", "heic", "heif",
];

/// An inline image reference inside a run
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    /// Relationship id resolving to the media target (e.g. "rId7")
    pub rel_id: String,
    /// Display name for `wp:docPr`
    pub name: String,
    /// Width in EMUs
    pub width_emu: i64,
    /// Height in EMUs
    pub height_emu: i64,
}

/// Options for image insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageOptions {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            width: 200,
            height: 150,
        }
    }
}

impl ImageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Width in pixels
    pub fn width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Height in pixels
    pub fn height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }
}

/// Convert pixels to EMUs at 96 DPI
pub fn pixels_to_emu(pixels: i64) -> i64 {
    pixels * EMU_PER_PIXEL
}

/// Convert EMUs to pixels at 96 DPI
pub fn emu_to_pixels(emu: i64) -> i64 {
    (emu as f64 / EMU_PER_PIXEL as f64).round() as i64
}

/// The MIME content type for a supported image extension
pub fn content_type_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        "ico" => Some("image/x-icon"),
        "tiff" | "tif" => Some("image/tiff"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

/// Check the leading bytes against the magic number for an extension
fn matches_magic(header: &[u8], ext: &str) -> bool {
    match ext {
        "png" => header.starts_with(&[0x89, 0x50, 0x4E, 0x47]),
        "jpg" | "jpeg" => header.starts_with(&[0xFF, 0xD8, 0xFF]),
        "gif" => header.starts_with(b"GIF87a") || header.starts_with(b"GIF89a"),
        "bmp" => header.starts_with(b"BM"),
        "webp" => header.len() >= 12 && &header[0..4] == b"RIFF" && &header[8..12] == b"WEBP",
        "svg" => {
            let text = String::from_utf8_lossy(header);
            let trimmed = text.trim_start();
            trimmed.starts_with("<?xml") || trimmed.starts_with("<svg")
        }
        "ico" => header.starts_with(&[0x00, 0x00, 0x01, 0x00]),
        "tiff" | "tif" => header.starts_with(b"II") || header.starts_with(b"MM"),
        "heic" | "heif" => header.len() >= 8 && &header[4..8] == b"ftyp",
        _ => false,
    }
}

/// Validate an image file and return its bytes and lowercase extension
fn read_validated_image(path: &Path) -> Result<(Vec<u8>, String)> {
    if !path.exists() {
        return Err(OoxmlError::ImageNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(OoxmlError::UnsupportedImage(ext));
    }

    let bytes = fs::read(path)?;
    let header = &bytes[..bytes.len().min(12)];
    if !matches_magic(header, &ext) {
        return Err(OoxmlError::InvalidImage(ext));
    }

    Ok((bytes, ext))
}

impl Document {
    /// Append an image as a new paragraph at the end of the body
    pub fn add_image<P: AsRef<Path>>(&mut self, path: P, options: ImageOptions) -> Result<()> {
        let index = self.paragraph_count();
        self.add_image_at(index, path, options)
    }

    /// Insert an image as a new paragraph at a paragraph position
    ///
    /// Allocates exactly one image id and one relationship id, stores the
    /// payload under `word/media/`, registers the extension's content type,
    /// and adds the image relationship. The effects are all-or-nothing: the
    /// file is validated before any state changes.
    pub fn add_image_at<P: AsRef<Path>>(
        &mut self,
        index: usize,
        path: P,
        options: ImageOptions,
    ) -> Result<()> {
        let path = path.as_ref();
        let block_index = self.insertion_block_index(index)?;
        let (bytes, ext) = read_validated_image(path)?;

        // One image id and one relationship id per insert, held in locals
        // and reused everywhere the markup references them.
        let image_id = self.next_image_id;
        let filename = format!("image{image_id}.{ext}");
        let rel_id = self.relationships.add_image(format!("media/{filename}"));
        self.next_image_id += 1;

        self.archive.set(format!("word/media/{filename}"), bytes);
        if let Some(content_type) = content_type_for_extension(&ext) {
            self.content_types.register_default(&ext, content_type);
        }

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&filename)
            .to_string();
        let drawing = Drawing {
            rel_id: rel_id.clone(),
            name,
            width_emu: pixels_to_emu(options.width as i64),
            height_emu: pixels_to_emu(options.height as i64),
        };

        let paragraph = Paragraph {
            props: None,
            runs: vec![Run {
                drawing: Some(drawing),
                ..Run::default()
            }],
        };
        self.body.insert(block_index, Block::Paragraph(paragraph));

        debug!(%rel_id, image_id, "image embedded");
        Ok(())
    }

    /// Number of embedded images (drawings) in the document
    pub fn image_count(&self) -> usize {
        self.all_paragraphs()
            .flat_map(|p| p.runs.iter())
            .filter(|r| r.drawing.is_some())
            .count()
    }
}
