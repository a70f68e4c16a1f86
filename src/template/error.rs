/// Error types for template mapping files and the template mapper.
use crate::ooxml::error::OoxmlError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

#[derive(Error, Debug)]
pub enum TemplateError {
    /// The mapping file does not exist
    #[error("Template map file not found: {}", .0.display())]
    MapsNotFound(PathBuf),

    /// A template file referenced by the mapper does not exist
    #[error("Missing template: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// Reading or writing a file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The mapping file is not valid JSON for the expected schema
    #[error("Invalid template map: {0}")]
    Json(#[from] serde_json::Error),

    /// `--template` argument not of the form ID=FILE
    #[error("Invalid template source '{0}': expected ID=FILE")]
    InvalidSource(String),

    /// The template could not be read as a presentation
    #[error("Presentation error: {0}")]
    Presentation(#[from] OoxmlError),
}
