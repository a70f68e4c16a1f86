//! Office Open XML support for PowerPoint packages.
//!
//! Two layers:
//!
//! 1. **OPC Layer** (`opc`): ZIP container, parts, relationships and content types
//! 2. **PresentationML** (`pptx`): masters, layouts and slides on top of the OPC layer
//!
//! # Example
//!
//! ```rust,no_run
//! use deckgen::ooxml::pptx::Presentation;
//!
//! let pres = Presentation::open("template.pptx")?;
//! for (index, layout) in pres.slide_layouts().iter().enumerate() {
//!     println!("{}: {}", index, layout.name);
//! }
//! # Ok::<(), deckgen::ooxml::error::OoxmlError>(())
//! ```
pub mod error;
pub mod opc;
pub mod pptx;

pub use error::{OoxmlError, Result};
pub use opc::{OpcPackage, PackURI};
