//! Template mapping: which layout and placeholder of a template carries
//! each slide role.
//!
//! The [`mapper`] produces [`TemplateMaps`] offline; the deck generator
//! reads them back with [`load_template_maps`] on every request.

pub mod descriptor;
pub mod error;
pub mod mapper;

pub use descriptor::{
    LayoutInfo, PlaceholderInfo, PlaceholderRole, TemplateDescriptor, TemplateMaps,
    load_template_maps, write_template_maps,
};
pub use error::{Result, TemplateError};
pub use mapper::{TemplateSource, map_template, map_templates};
