/// Open Packaging Conventions (OPC) implementation.
///
/// The container layer under PresentationML: parts, relationships, content
/// types and the ZIP archive that holds them.
///
/// - `quick-xml` parses `.rels` and `[Content_Types].xml`
/// - `zip` reads and writes the physical archive
/// - parts are owned by [`OpcPackage`] and can be edited in place

pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod part;
pub mod phys_pkg;
pub mod pkgreader;
pub mod pkgwriter;
pub mod rel;

// Re-export commonly used types
pub use package::OpcPackage;
pub use packuri::PackURI;
pub use part::{BlobPart, Part, XmlPart};
pub use rel::{Relationship, Relationships};
