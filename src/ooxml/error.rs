/// Error types for PresentationML operations.
use thiserror::Error;

/// Result type for PresentationML operations.
pub type Result<T> = std::result::Result<T, OoxmlError>;

/// Error types for PresentationML operations.
#[derive(Error, Debug)]
pub enum OoxmlError {
    /// OPC package error
    #[error("OPC error: {0}")]
    Opc(#[from] crate::ooxml::opc::error::OpcError),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// Part not found
    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// Invalid content type
    #[error("Invalid content type: expected {expected}, got {got}")]
    InvalidContentType { expected: String, got: String },

    /// Invalid relationship
    #[error("Invalid relationship: {0}")]
    InvalidRelationship(String),

    /// No placeholder with the requested idx on the slide
    #[error("Placeholder idx {0} not found on slide")]
    PlaceholderNotFound(u32),

    /// The placeholder exists but carries no text frame
    #[error("Placeholder idx {0} has no text frame")]
    NoTextFrame(u32),

    /// Layout index outside the slide master's layout list
    #[error("Slide layout index {index} out of range ({count} layouts)")]
    LayoutOutOfRange { index: usize, count: usize },

    /// Invalid format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for OoxmlError {
    fn from(err: quick_xml::Error) -> Self {
        OoxmlError::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for OoxmlError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        OoxmlError::Xml(err.to_string())
    }
}

impl From<std::str::Utf8Error> for OoxmlError {
    fn from(err: std::str::Utf8Error) -> Self {
        OoxmlError::Xml(err.to_string())
    }
}
