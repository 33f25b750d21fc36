//! Error types for codetodocx

use thiserror::Error;

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Conversion error types
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File '{0}' not found.")]
    FileNotFound(String),

    #[error("An error occurred while reading '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No input given: use --input or --codeblock")]
    NoInput,

    #[error("Cannot run formatter `{program}`: {source}")]
    FormatterSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Formatter `{program}` rejected the code: {message}")]
    Formatter { program: String, message: String },

    #[error("Document packaging error: {0}")]
    Package(#[from] zip::result::ZipError),

    #[error("Mapping serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid built-in color scheme: {0}")]
    Scheme(#[from] toml::de::Error),

    #[error("{0} input(s) could not be converted")]
    Skipped(usize),

    #[error("Invalid lexer pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl ConvertError {
    /// Errors that only concern one input; batch runs report them and move on
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ConvertError::FileNotFound(_) | ConvertError::Read { .. } | ConvertError::Formatter { .. }
        )
    }
}
