//! Watermark removal for freshly created slides.
//!
//! Layout placeholders can carry vendor branding ("© 2020 Harris Poll"),
//! footer lines and small logos. A [`WatermarkFilter`] runs a set of
//! [`ShapePredicate`]s over every shape of a new slide and drops the shapes
//! any of them flags.

use crate::common::unit::inches_to_emu;
use crate::deck::error::{DeckError, Result};
use crate::ooxml::pptx::shapes::{Geometry, TextFrame};
use crate::ooxml::pptx::slide::{ShapeKind, Slide, SlideShape};
use aho_corasick::AhoCorasick;
use serde::{Deserialize, Serialize};

/// Keywords whose presence marks text as a watermark.
pub const DEFAULT_KEYWORDS: [&str; 12] = [
    "harris",
    "poll",
    "copyright",
    "©",
    "confidential",
    "proprietary",
    "draft",
    "sample",
    "template",
    "all rights reserved",
    "www.",
    "http",
];

/// What a predicate gets to see of a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeProbe {
    pub name: String,
    /// Text of the shape; `None` for shapes that cannot hold text
    /// (pictures), possibly empty for shapes that can.
    pub text: Option<String>,
    pub geometry: Option<Geometry>,
}

impl ShapeProbe {
    pub fn from_slide_shape(shape: &SlideShape) -> Self {
        let text = match shape.kind {
            ShapeKind::Picture { .. } => None,
            _ => Some(
                shape
                    .text_frame
                    .as_ref()
                    .map(TextFrame::text)
                    .unwrap_or_default(),
            ),
        };

        Self {
            name: shape.name.clone(),
            text,
            geometry: shape.geometry,
        }
    }

    /// Lowercased, trimmed text; `None` when the shape has no text frame
    /// or the text is blank.
    fn normalized_text(&self) -> Option<String> {
        let text = self.text.as_deref()?.trim().to_lowercase();
        (!text.is_empty()).then_some(text)
    }
}

/// A rule that flags a shape as a watermark.
pub trait ShapePredicate: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the shape should be removed. Only called for shapes with a
    /// known position.
    fn matches(&self, probe: &ShapeProbe, geometry: &Geometry) -> bool;
}

/// Text containing any of the keywords, case-insensitively.
pub struct KeywordPredicate {
    matcher: AhoCorasick,
}

impl KeywordPredicate {
    pub fn new<I, S>(keywords: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = keywords
            .into_iter()
            .map(|kw| kw.as_ref().to_lowercase())
            .filter(|kw| !kw.is_empty())
            .collect();
        let matcher = AhoCorasick::builder()
            .build(&patterns)
            .map_err(|e| DeckError::Watermark(e.to_string()))?;
        Ok(Self { matcher })
    }
}

impl ShapePredicate for KeywordPredicate {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn matches(&self, probe: &ShapeProbe, _geometry: &Geometry) -> bool {
        probe
            .normalized_text()
            .is_some_and(|text| self.matcher.is_match(&text))
    }
}

/// Short text in a thin shape near the bottom of the slide.
pub struct FooterTextPredicate {
    pub min_top: i64,
    pub max_height: i64,
    pub max_chars: usize,
}

impl ShapePredicate for FooterTextPredicate {
    fn name(&self) -> &'static str {
        "footer-text"
    }

    fn matches(&self, probe: &ShapeProbe, geometry: &Geometry) -> bool {
        let Some(text) = probe.normalized_text() else {
            return false;
        };
        geometry.top > self.min_top
            && geometry.height < self.max_height
            && text.chars().count() < self.max_chars
    }
}

/// A thin shape without a text frame (a logo) near the bottom of the slide.
pub struct FooterLogoPredicate {
    pub min_top: i64,
    pub max_height: i64,
}

impl ShapePredicate for FooterLogoPredicate {
    fn name(&self) -> &'static str {
        "footer-logo"
    }

    fn matches(&self, probe: &ShapeProbe, geometry: &Geometry) -> bool {
        probe.text.is_none() && geometry.top > self.min_top && geometry.height < self.max_height
    }
}

/// Keywords and thresholds of the default predicate set. Distances are in
/// inches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkConfig {
    pub enabled: bool,
    pub keywords: Vec<String>,
    pub footer_text_min_top_in: f64,
    pub footer_text_max_height_in: f64,
    pub footer_text_max_chars: usize,
    pub footer_logo_min_top_in: f64,
    pub footer_logo_max_height_in: f64,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            keywords: DEFAULT_KEYWORDS.iter().map(|kw| kw.to_string()).collect(),
            footer_text_min_top_in: 6.0,
            footer_text_max_height_in: 0.5,
            footer_text_max_chars: 100,
            footer_logo_min_top_in: 6.5,
            footer_logo_max_height_in: 0.75,
        }
    }
}

impl WatermarkConfig {
    /// Names of the thresholds that are not positive.
    pub fn invalid_thresholds(&self) -> Vec<&'static str> {
        let mut invalid = Vec::new();
        let thresholds = [
            ("footer_text_min_top_in", self.footer_text_min_top_in),
            ("footer_text_max_height_in", self.footer_text_max_height_in),
            ("footer_logo_min_top_in", self.footer_logo_min_top_in),
            ("footer_logo_max_height_in", self.footer_logo_max_height_in),
        ];
        for (name, value) in thresholds {
            if !(value > 0.0) {
                invalid.push(name);
            }
        }
        if self.footer_text_max_chars == 0 {
            invalid.push("footer_text_max_chars");
        }
        invalid
    }
}

/// An ordered set of predicates; a shape matching any of them is removed.
#[derive(Default)]
pub struct WatermarkFilter {
    predicates: Vec<Box<dyn ShapePredicate>>,
}

impl WatermarkFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_predicate(mut self, predicate: impl ShapePredicate + 'static) -> Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    /// The keyword, footer-text and footer-logo predicates configured by
    /// `config`; no predicates at all when it is disabled.
    pub fn from_config(config: &WatermarkConfig) -> Result<Self> {
        if !config.enabled {
            return Ok(Self::new());
        }

        Ok(Self::new()
            .with_predicate(KeywordPredicate::new(&config.keywords)?)
            .with_predicate(FooterTextPredicate {
                min_top: inches_to_emu(config.footer_text_min_top_in),
                max_height: inches_to_emu(config.footer_text_max_height_in),
                max_chars: config.footer_text_max_chars,
            })
            .with_predicate(FooterLogoPredicate {
                min_top: inches_to_emu(config.footer_logo_min_top_in),
                max_height: inches_to_emu(config.footer_logo_max_height_in),
            }))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Name of the first predicate flagging `probe`. Shapes without a known
    /// position are never flagged.
    pub fn matching_predicate(&self, probe: &ShapeProbe) -> Option<&'static str> {
        let geometry = probe.geometry.as_ref()?;
        self.predicates
            .iter()
            .find(|predicate| predicate.matches(probe, geometry))
            .map(|predicate| predicate.name())
    }

    pub fn is_watermark(&self, probe: &ShapeProbe) -> bool {
        self.matching_predicate(probe).is_some()
    }

    /// Remove watermark shapes from `slide`. Returns the number removed.
    pub fn strip(&self, slide: &mut Slide) -> usize {
        if self.predicates.is_empty() {
            return 0;
        }

        slide.retain_shapes(|shape| {
            let probe = ShapeProbe::from_slide_shape(shape);
            match self.matching_predicate(&probe) {
                Some(predicate) => {
                    tracing::debug!(shape = %probe.name, predicate, "removing watermark shape");
                    false
                },
                None => true,
            }
        })
    }
}
