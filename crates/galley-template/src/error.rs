//! Error types for template rendering

use thiserror::Error;

/// Errors that can occur while loading or rendering a template
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Underlying document error
    #[error(transparent)]
    Ooxml(#[from] galley_ooxml::OoxmlError),

    /// Strict mode: a variable could not be resolved
    #[error("variable {name} not found (paragraph {paragraph})")]
    MissingVariable { name: String, paragraph: usize },

    /// Strict mode: a range collection could not be resolved
    #[error("collection {0} not found")]
    MissingCollection(String),

    /// A range target that is not a sequence
    #[error("collection {0} is not iterable")]
    NotIterable(String),

    /// An opener without a terminating `{{end}}`
    #[error("no matching {{{{end}}}} found for {{{{{0}}}}}")]
    UnterminatedBlock(String),

    /// A directive that does not parse
    #[error("invalid {kind} directive: {text}")]
    MalformedDirective { kind: String, text: String },

    /// A table loop without a template row
    #[error("table loop requires at least 2 rows (directive + template)")]
    TableLoopRows,

    /// Template data that is not a top-level mapping
    #[error("template data must be a top-level mapping")]
    NotAMapping,

    /// JSON data that failed to parse
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML data that failed to parse
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Error reading data from disk
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;
