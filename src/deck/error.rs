/// Error types for deck generation.
use crate::ooxml::error::OoxmlError;
use crate::template::error::TemplateError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DeckError>;

#[derive(Error, Debug)]
pub enum DeckError {
    /// No mapping for the requested template id
    #[error("Unknown templateId: {0}")]
    UnknownTemplate(String),

    /// The mapping names a template file that does not exist
    #[error("Template file not found: {}", .0.display())]
    TemplateFileMissing(PathBuf),

    /// The template has no slide layouts to build slides from
    #[error("Template has no slide layouts")]
    NoLayouts,

    /// Mapping file missing or malformed
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Reading or writing the presentation failed
    #[error("Presentation error: {0}")]
    Presentation(#[from] OoxmlError),

    /// Image data could not be decoded
    #[error("Image error: {0}")]
    Image(String),

    /// The watermark predicates could not be built
    #[error("Watermark filter error: {0}")]
    Watermark(String),
}
