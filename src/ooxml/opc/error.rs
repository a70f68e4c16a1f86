//! Errors raised while reading, editing or writing an OPC package.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, OpcError>;

#[derive(Error, Debug)]
pub enum OpcError {
    /// The package file does not exist
    #[error("Package not found: {0}")]
    PackageNotFound(String),

    /// A partname that is not an absolute pack URI
    #[error("Invalid pack URI: {0}")]
    InvalidPackUri(String),

    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// No relationship with the requested rId or type
    #[error("Relationship not found: {0}")]
    RelationshipNotFound(String),

    /// `[Content_Types].xml` has neither an override nor a default for the part
    #[error("No content type for part: {0}")]
    ContentTypeNotFound(String),

    #[error("Invalid relationship: {0}")]
    InvalidRelationship(String),

    /// Malformed XML in a part, a rels file or the content types
    #[error("XML error: {0}")]
    Xml(String),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for OpcError {
    fn from(err: quick_xml::Error) -> Self {
        OpcError::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for OpcError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        OpcError::Xml(err.to_string())
    }
}
