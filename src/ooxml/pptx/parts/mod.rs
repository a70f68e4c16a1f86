/// Part types of a PowerPoint package: the presentation part, slide masters
/// and slide layouts.
pub mod layout;
pub mod presentation;

pub use layout::{SlideLayout, SlideMaster};
pub use presentation::{PresentationPart, SlideId};
