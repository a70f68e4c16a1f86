//! Discovers the layout and placeholder structure of template files.

use crate::ooxml::pptx::Presentation;
use crate::ooxml::pptx::shapes::PlaceholderType;
use crate::template::descriptor::{
    LayoutInfo, PlaceholderInfo, PlaceholderRole, TemplateDescriptor, TemplateMaps,
};
use crate::template::error::{Result, TemplateError};
use std::path::Path;
use std::str::FromStr;

/// Templates mapped when none are given explicitly.
pub const DEFAULT_TEMPLATES: [(&str, &str); 3] = [
    ("bell-enterprise", "BellCanadaTemplate.pptx"),
    ("internal-strategy", "11b - alien minds - slides.pptx"),
    ("quarterly-review", "1%2B-%2BIntroduction%2Bto%2B2244.pptx"),
];

/// A template to map: its id and file name in the resources directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSource {
    pub id: String,
    pub file: String,
}

impl FromStr for TemplateSource {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('=') {
            Some((id, file)) if !id.trim().is_empty() && !file.trim().is_empty() => Ok(Self {
                id: id.trim().to_string(),
                file: file.trim().to_string(),
            }),
            _ => Err(TemplateError::InvalidSource(s.to_string())),
        }
    }
}

impl TemplateSource {
    pub fn defaults() -> Vec<Self> {
        DEFAULT_TEMPLATES
            .iter()
            .map(|(id, file)| Self {
                id: id.to_string(),
                file: file.to_string(),
            })
            .collect()
    }
}

/// Semantic role of a placeholder type.
pub fn role_of(ph_type: &PlaceholderType) -> PlaceholderRole {
    match ph_type {
        PlaceholderType::Title | PlaceholderType::CenterTitle => PlaceholderRole::Title,
        PlaceholderType::SubTitle => PlaceholderRole::Subtitle,
        PlaceholderType::Body | PlaceholderType::Object => PlaceholderRole::Body,
        _ => PlaceholderRole::Other,
    }
}

/// Placeholder listing of every layout of the first slide master.
pub fn describe_layouts(pres: &Presentation) -> Vec<LayoutInfo> {
    pres.slide_layouts()
        .iter()
        .enumerate()
        .map(|(index, layout)| LayoutInfo {
            index,
            name: layout.name.clone(),
            placeholders: layout
                .placeholders()
                .map(|(shape, ph)| PlaceholderInfo {
                    name: shape.name.clone(),
                    idx: ph.idx,
                    role: role_of(&ph.ph_type),
                })
                .collect(),
        })
        .collect()
}

/// Index of the first layout with a title placeholder (and a body
/// placeholder when `require_body`), or 0 when none qualifies.
pub fn find_layout_index(layouts: &[LayoutInfo], require_body: bool) -> usize {
    layouts
        .iter()
        .find(|layout| {
            layout.has_role(PlaceholderRole::Title)
                && (!require_body || layout.has_role(PlaceholderRole::Body))
        })
        .map(|layout| layout.index)
        .unwrap_or(0)
}

/// `idx` of the first placeholder with `role` on the layout at `layout_index`.
pub fn placeholder_idx(
    layouts: &[LayoutInfo],
    layout_index: usize,
    role: PlaceholderRole,
) -> Option<u32> {
    layouts
        .iter()
        .find(|layout| layout.index == layout_index)
        .and_then(|layout| layout.first_idx(role))
}

/// Build the descriptor of an opened presentation.
pub fn describe_presentation(pres: &Presentation, template_file: &str) -> TemplateDescriptor {
    let layouts = describe_layouts(pres);
    let title_layout_index = find_layout_index(&layouts, false);
    let content_layout_index = find_layout_index(&layouts, true);

    TemplateDescriptor {
        template_file: template_file.to_string(),
        title_layout_index,
        content_layout_index,
        title_placeholder_idx: placeholder_idx(&layouts, content_layout_index, PlaceholderRole::Title),
        body_placeholder_idx: placeholder_idx(&layouts, content_layout_index, PlaceholderRole::Body),
        subtitle_placeholder_idx: placeholder_idx(
            &layouts,
            title_layout_index,
            PlaceholderRole::Subtitle,
        ),
        layouts,
        watermark: None,
    }
}

/// Open and describe one template file.
pub fn map_template(path: &Path) -> Result<TemplateDescriptor> {
    if !path.exists() {
        return Err(TemplateError::TemplateNotFound(path.to_path_buf()));
    }

    let pres = Presentation::open(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let descriptor = describe_presentation(&pres, &file_name);
    tracing::info!(
        template = %file_name,
        layouts = descriptor.layouts.len(),
        title_layout = descriptor.title_layout_index,
        content_layout = descriptor.content_layout_index,
        "mapped template"
    );
    Ok(descriptor)
}

/// Map every source in `resources_dir`. Stops at the first missing or
/// unreadable template.
pub fn map_templates(resources_dir: &Path, sources: &[TemplateSource]) -> Result<TemplateMaps> {
    let mut maps = TemplateMaps::new();
    for source in sources {
        let descriptor = map_template(&resources_dir.join(&source.file))?;
        maps.insert(source.id.clone(), descriptor);
    }
    Ok(maps)
}
