//! Deckgen - template-driven PowerPoint deck generation
//!
//! This library builds `.pptx` decks from corporate templates. It is split
//! into two halves that share a mapping file:
//!
//! - **Template mapping**: inspect template files offline and record, per
//!   template, which layout is the title layout, which is the content layout
//!   and which placeholder carries the title, subtitle and body text
//!   ([`template`], binary `template-mapper`).
//! - **Deck generation**: per request, open the mapped template, drop its
//!   slides, build one slide per record from the mapped layouts, strip
//!   inherited watermarks and serialize the result ([`deck`], served over
//!   HTTP by [`server`], binary `deckgen-server`).
//!
//! # Example - Generating a deck
//!
//! ```no_run
//! use deckgen::deck::{DeckGenerator, DeckRecord, ExportRequest, ExportSettings, SlideRecord};
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let generator = DeckGenerator::new(
//!     PathBuf::from("src/resources"),
//!     PathBuf::from("src/resources/template-maps.json"),
//!     ExportSettings::default(),
//! );
//!
//! let request = ExportRequest {
//!     template_id: "bell-enterprise".to_string(),
//!     internal_use_only: true,
//!     deck: DeckRecord {
//!         title: Some("Q3 Review".to_string()),
//!         slides: vec![SlideRecord {
//!             title: Some("Results".to_string()),
//!             bullets: vec!["Revenue up".to_string(), "Costs flat".to_string()],
//!             ..SlideRecord::default()
//!         }],
//!     },
//! };
//!
//! let deck = generator.export(&request)?;
//! std::fs::write(&deck.file_name, &deck.bytes)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Mapping a template
//!
//! ```no_run
//! use deckgen::template::map_template;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let descriptor = map_template(Path::new("src/resources/BellCanadaTemplate.pptx"))?;
//! println!("content layout: {}", descriptor.content_layout_index);
//! # Ok(())
//! # }
//! ```

/// Unit conversion and XML helpers
pub mod common;

/// Slide generation from export requests
pub mod deck;

/// OOXML (Office Open XML) packages and PresentationML
///
/// This module provides the OPC container layer and enough of the
/// PresentationML part model to build decks from a template.
pub mod ooxml;

/// HTTP export service
pub mod server;

/// Template layout and placeholder mapping
pub mod template;

// Re-export commonly used types for convenience
pub use deck::{DeckGenerator, ExportRequest};
pub use ooxml::pptx::Presentation;
pub use template::{TemplateDescriptor, TemplateMaps};
