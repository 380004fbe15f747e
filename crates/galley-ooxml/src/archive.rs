//! Archive handling for DOCX packages
//!
//! A DOCX file is a ZIP archive of XML parts and media. The archive keeps
//! every entry as raw bytes so parts the model does not interpret survive a
//! load/save cycle unchanged.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;

use tracing::debug;
use zip::read::ZipArchive;
use zip::write::ZipWriter;
use zip::CompressionMethod;

use crate::error::{OoxmlError, Result};

/// Archive path of the main document part
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Archive path of the content-type manifest
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Archive path of the root relationship part
pub const ROOT_RELS_PART: &str = "_rels/.rels";

/// Archive path of the document relationship part
pub const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

/// An unpacked OOXML package
#[derive(Debug, Clone, Default)]
pub struct OoxmlArchive {
    /// All files in the archive, keyed by path
    files: HashMap<String, Vec<u8>>,
}

impl OoxmlArchive {
    /// Create an empty archive
    pub fn new() -> Self {
        Self::default()
    }

    /// Open and unpack a DOCX package
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(file).map_err(|source| OoxmlError::OpenFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::read_entries(&mut archive)
    }

    /// Create from any reader that implements Read + Seek
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        Self::read_entries(&mut archive)
    }

    fn read_entries<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Self> {
        let mut files = HashMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();

            // Skip directories
            if name.ends_with('/') {
                continue;
            }

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            files.insert(name, contents);
        }

        debug!(parts = files.len(), "unpacked archive");
        Ok(Self { files })
    }

    /// Get a file's contents by path
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(|v| v.as_slice())
    }

    /// Get a file's contents as a string
    pub fn get_string(&self, path: &str) -> Option<String> {
        self.files
            .get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Get the main document content (word/document.xml)
    pub fn document_xml(&self) -> Result<&[u8]> {
        self.get(DOCUMENT_PART)
            .ok_or(OoxmlError::DocumentPartNotFound)
    }

    /// Get the document relationships (word/_rels/document.xml.rels)
    pub fn document_rels_xml(&self) -> Option<&[u8]> {
        self.get(DOCUMENT_RELS_PART)
    }

    /// Get the content-type manifest ([Content_Types].xml)
    pub fn content_types_xml(&self) -> Option<&[u8]> {
        self.get(CONTENT_TYPES_PART)
    }

    /// Check if a file exists in the archive
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// List all files in the archive in sorted order
    pub fn part_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.files.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Number of parts stored in the archive
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check whether the archive holds no parts
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Set or update a file's contents
    pub fn set(&mut self, path: impl Into<String>, contents: Vec<u8>) {
        self.files.insert(path.into(), contents);
    }

    /// Set a file's contents from a string
    pub fn set_string(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into().into_bytes());
    }

    /// Remove a file from the archive
    pub fn remove(&mut self, path: &str) -> Option<Vec<u8>> {
        self.files.remove(path)
    }

    /// Write the archive to a file
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| OoxmlError::WriteFailed {
            path: path.display().to_string(),
            source,
        })?;
        self.write_to(file)
    }

    /// Write the archive to any writer
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated);

        // Sort keys for deterministic output
        let mut paths: Vec<_> = self.files.keys().collect();
        paths.sort();

        for path in paths {
            let contents = &self.files[path];
            zip.start_file(path.as_str(), options)?;
            zip.write_all(contents)
                .map_err(|source| OoxmlError::WriteFailed {
                    path: path.clone(),
                    source,
                })?;
        }

        zip.finish()?;
        debug!(parts = self.files.len(), "archive written");
        Ok(())
    }
}
