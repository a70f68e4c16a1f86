//! Common utilities shared by the container layer and the deck generator.

pub mod unit;
pub mod xml;

pub use unit::{EMUS_PER_INCH, emu_to_inches, inches_to_emu};
pub use xml::escape_xml;
