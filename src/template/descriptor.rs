//! The template mapping file.
//!
//! A JSON object keyed by template id. Each entry says which layout serves
//! as the title and content layout and which placeholder carries each role,
//! plus the raw per-layout placeholder listing the choice was made from.

use crate::deck::watermark::WatermarkConfig;
use crate::template::error::{Result, TemplateError};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// All templates in a mapping file, keyed by template id.
pub type TemplateMaps = BTreeMap<String, TemplateDescriptor>;

/// Semantic role of a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderRole {
    Title,
    Subtitle,
    Body,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderInfo {
    pub name: String,
    pub idx: u32,
    #[serde(rename = "type")]
    pub role: PlaceholderRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub index: usize,
    pub name: String,
    #[serde(default)]
    pub placeholders: Vec<PlaceholderInfo>,
}

impl LayoutInfo {
    pub fn has_role(&self, role: PlaceholderRole) -> bool {
        self.placeholders.iter().any(|ph| ph.role == role)
    }

    /// `idx` of the first placeholder with `role`.
    pub fn first_idx(&self, role: PlaceholderRole) -> Option<u32> {
        self.placeholders
            .iter()
            .find(|ph| ph.role == role)
            .map(|ph| ph.idx)
    }
}

/// Mapping of one template.
///
/// Missing fields take the defaults below when read. An explicit `null`
/// placeholder index means the template has no such placeholder, while a
/// `null` layout index reads as the default layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    /// File name relative to the resources directory
    pub template_file: String,
    #[serde(default, deserialize_with = "title_layout_or_default")]
    pub title_layout_index: usize,
    #[serde(
        default = "default_content_layout_index",
        deserialize_with = "content_layout_or_default"
    )]
    pub content_layout_index: usize,
    #[serde(default = "default_title_placeholder_idx")]
    pub title_placeholder_idx: Option<u32>,
    #[serde(default = "default_body_placeholder_idx")]
    pub body_placeholder_idx: Option<u32>,
    #[serde(default)]
    pub subtitle_placeholder_idx: Option<u32>,
    #[serde(default)]
    pub layouts: Vec<LayoutInfo>,
    /// Replaces the server's watermark policy for this template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watermark: Option<WatermarkConfig>,
}

fn default_content_layout_index() -> usize {
    1
}

fn title_layout_or_default<'de, D>(deserializer: D) -> std::result::Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<usize>::deserialize(deserializer)?.unwrap_or_default())
}

fn content_layout_or_default<'de, D>(deserializer: D) -> std::result::Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<usize>::deserialize(deserializer)?.unwrap_or_else(default_content_layout_index))
}

fn default_title_placeholder_idx() -> Option<u32> {
    Some(0)
}

fn default_body_placeholder_idx() -> Option<u32> {
    Some(1)
}

/// Read a mapping file.
pub fn load_template_maps(path: &Path) -> Result<TemplateMaps> {
    if !path.exists() {
        return Err(TemplateError::MapsNotFound(path.to_path_buf()));
    }
    let json = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&json)?)
}

/// Write a mapping file as pretty-printed JSON.
pub fn write_template_maps(path: &Path, maps: &TemplateMaps) -> Result<()> {
    let json = serde_json::to_string_pretty(maps)?;
    std::fs::write(path, json).map_err(|source| TemplateError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_missing_fields() {
        let maps: TemplateMaps =
            serde_json::from_str(r#"{"t": {"template_file": "t.pptx"}}"#).unwrap();
        let desc = &maps["t"];

        assert_eq!(desc.title_layout_index, 0);
        assert_eq!(desc.content_layout_index, 1);
        assert_eq!(desc.title_placeholder_idx, Some(0));
        assert_eq!(desc.body_placeholder_idx, Some(1));
        assert_eq!(desc.subtitle_placeholder_idx, None);
        assert!(desc.layouts.is_empty());
        assert!(desc.watermark.is_none());
    }

    #[test]
    fn test_explicit_null_means_no_placeholder() {
        let maps: TemplateMaps = serde_json::from_str(
            r#"{"t": {"template_file": "t.pptx", "title_placeholder_idx": null, "body_placeholder_idx": 13}}"#,
        )
        .unwrap();
        assert_eq!(maps["t"].title_placeholder_idx, None);
        assert_eq!(maps["t"].body_placeholder_idx, Some(13));
    }

    #[test]
    fn test_null_layout_index_reads_as_default() {
        let maps: TemplateMaps = serde_json::from_str(
            r#"{"t": {"template_file": "t.pptx", "title_layout_index": null, "content_layout_index": null},
                "u": {"template_file": "u.pptx", "title_layout_index": 2, "content_layout_index": 4}}"#,
        )
        .unwrap();
        assert_eq!(maps["t"].title_layout_index, 0);
        assert_eq!(maps["t"].content_layout_index, 1);
        assert_eq!(maps["u"].title_layout_index, 2);
        assert_eq!(maps["u"].content_layout_index, 4);
    }

    #[test]
    fn test_layout_listing() {
        let json = r#"{
            "index": 1,
            "name": "Title and Content",
            "placeholders": [
                {"name": "Title 1", "idx": 0, "type": "title"},
                {"name": "Content Placeholder 2", "idx": 1, "type": "body"},
                {"name": "Footer Placeholder 4", "idx": 11, "type": "other"}
            ]
        }"#;
        let layout: LayoutInfo = serde_json::from_str(json).unwrap();

        assert!(layout.has_role(PlaceholderRole::Body));
        assert!(!layout.has_role(PlaceholderRole::Subtitle));
        assert_eq!(layout.first_idx(PlaceholderRole::Body), Some(1));
    }

    #[test]
    fn test_write_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template-maps.json");

        let mut maps = TemplateMaps::new();
        maps.insert(
            "quarterly-review".to_string(),
            TemplateDescriptor {
                template_file: "review.pptx".to_string(),
                title_layout_index: 0,
                content_layout_index: 1,
                title_placeholder_idx: Some(0),
                body_placeholder_idx: None,
                subtitle_placeholder_idx: Some(1),
                layouts: Vec::new(),
                watermark: None,
            },
        );
        write_template_maps(&path, &maps).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"body_placeholder_idx\": null"));
        assert!(!text.contains("watermark"));
        assert_eq!(load_template_maps(&path).unwrap(), maps);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_template_maps(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, TemplateError::MapsNotFound(_)));
    }
}
