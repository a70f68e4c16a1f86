//! Export request payloads.

use crate::deck::image::ImagePosition;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/pptx`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub template_id: String,
    /// Stamp every slide with the confidentiality label
    #[serde(default = "default_internal_use_only")]
    pub internal_use_only: bool,
    pub deck: DeckRecord,
}

fn default_internal_use_only() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeckRecord {
    #[serde(default)]
    pub title: Option<String>,
    pub slides: Vec<SlideRecord>,
}

impl DeckRecord {
    /// Download file name: the deck title, or "Presentation" when it has none.
    pub fn file_name(&self) -> String {
        let title = self
            .title
            .as_deref()
            .filter(|title| !title.is_empty())
            .unwrap_or("Presentation");
        format!("{}.pptx", title)
    }
}

/// Content of one slide. Index overrides are taken as given; negative
/// values never match anything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlideRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default)]
    pub layout_index: Option<i64>,
    #[serde(default)]
    pub title_placeholder_idx: Option<i64>,
    #[serde(default)]
    pub body_placeholder_idx: Option<i64>,
    #[serde(default)]
    pub subtitle_placeholder_idx: Option<i64>,
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Accepted and carried; not used for rendering
    #[serde(default)]
    pub image_ref: Option<String>,
    /// Base64 image, optionally with a data-URI header
    #[serde(default)]
    pub image_data: Option<String>,
    /// `"left"` or `"right"`
    #[serde(default)]
    pub image_position: Option<String>,
}

impl SlideRecord {
    pub fn image_position(&self) -> ImagePosition {
        ImagePosition::from_hint(self.image_position.as_deref())
    }
}
