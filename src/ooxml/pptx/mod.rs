//! PowerPoint (.pptx) presentation support.
//!
//! Enough of PresentationML to build decks from a template: open a package,
//! enumerate its masters and layouts, drop the existing slides, create new
//! slides from layouts and serialize the result.
//!
//! # Example
//!
//! ```rust,no_run
//! use deckgen::ooxml::pptx::Presentation;
//!
//! let mut pres = Presentation::open("template.pptx")?;
//! pres.delete_all_slides()?;
//!
//! let mut slide = pres.new_slide(0)?;
//! slide.set_placeholder_text(0, "Quarterly Review")?;
//! pres.add_slide(&slide)?;
//!
//! let bytes = pres.to_bytes()?;
//! # Ok::<(), deckgen::ooxml::error::OoxmlError>(())
//! ```

pub mod format;
pub mod parts;
pub mod presentation;
pub mod shapes;
pub mod slide;

#[cfg(test)]
pub(crate) mod fixtures;

pub use format::ImageFormat;
pub use parts::{SlideLayout, SlideMaster};
pub use presentation::Presentation;
pub use shapes::{Geometry, Paragraph, PlaceholderType, ShapeRecord, TextFrame};
pub use slide::{ShapeKind, Slide, SlideShape};
