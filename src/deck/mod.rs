//! Deck generation: turn an export request into a `.pptx` built on one of
//! the mapped templates.
//!
//! For every slide record a slide is created from the resolved layout,
//! watermark shapes inherited from the layout are stripped, placeholders
//! are filled, an optional image is placed and, for internal decks, a
//! confidentiality label is stamped in the bottom-left corner.

pub mod error;
pub mod generator;
pub mod image;
pub mod model;
pub mod watermark;

pub use error::{DeckError, Result};
pub use generator::{DeckGenerator, ExportSettings, GeneratedDeck};
pub use image::{DecodedImage, ImagePosition, decode_image_data};
pub use model::{DeckRecord, ExportRequest, SlideRecord};
pub use watermark::{ShapePredicate, ShapeProbe, WatermarkConfig, WatermarkFilter};
