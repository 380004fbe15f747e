//! Error types for OOXML operations

use thiserror::Error;

/// Errors that can occur during OOXML operations
#[derive(Error, Debug)]
pub enum OoxmlError {
    /// Error reading or writing the ZIP archive
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// The package could not be opened at all
    #[error("open failed: {path}: {source}")]
    OpenFailed {
        path: String,
        source: zip::result::ZipError,
    },

    /// Error reading or writing files
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A part could not be written back to the package
    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: String,
        source: std::io::Error,
    },

    /// Error parsing XML content
    #[error("xml parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The main document part is absent from the package
    #[error("document part not found")]
    DocumentPartNotFound,

    /// Required file not found in the archive
    #[error("required file not found: {0}")]
    MissingFile(String),

    /// Image file not found on disk
    #[error("image file not found: {0}")]
    ImageNotFound(String),

    /// Image extension outside the supported set
    #[error("unsupported image format: {0}")]
    UnsupportedImage(String),

    /// Image bytes do not match the magic number for the extension
    #[error("file does not appear to be a valid {0} image")]
    InvalidImage(String),

    /// Paragraph index out of range
    #[error("paragraph index {0} out of range")]
    ParagraphOutOfRange(usize),

    /// Table index out of range
    #[error("table index {0} out of range")]
    TableOutOfRange(usize),

    /// Table row index out of range
    #[error("row index {0} out of range")]
    RowOutOfRange(usize),

    /// Table column index out of range
    #[error("column index {0} out of range")]
    ColumnOutOfRange(usize),

    /// Inverted or out-of-bounds paragraph range
    #[error("invalid range [{start}:{end}]")]
    InvalidRange { start: usize, end: usize },

    /// Header kind passed to a footer operation, or vice versa
    #[error("invalid header/footer type: {0}")]
    InvalidHeaderFooterKind(String),

    /// Invalid document structure
    #[error("invalid document structure: {0}")]
    InvalidStructure(String),
}

/// Result type for OOXML operations
pub type Result<T> = std::result::Result<T, OoxmlError>;
