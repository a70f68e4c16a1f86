//! Shapes read from shape trees and text frames.

pub mod base;
pub mod textframe;

pub use base::{Geometry, PlaceholderRef, PlaceholderType, ShapeRecord, ShapeType, parse_shape_tree};
pub use textframe::{Paragraph, TextFrame};
