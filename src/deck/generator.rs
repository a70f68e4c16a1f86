//! Builds a deck from a template and slide records.

use crate::common::unit::inches_to_emu;
use crate::deck::error::{DeckError, Result};
use crate::deck::image::{decode_image_data, fit_to_box, image_box};
use crate::deck::model::{DeckRecord, ExportRequest, SlideRecord};
use crate::deck::watermark::{WatermarkConfig, WatermarkFilter};
use crate::ooxml::pptx::shapes::{Geometry, Paragraph};
use crate::ooxml::pptx::{Presentation, Slide};
use crate::template::descriptor::{TemplateDescriptor, load_template_maps};
use std::path::PathBuf;

/// Options for the confidentiality label and watermark removal.
#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub confidential_label: String,
    pub confidential_font_pt: f64,
    /// Used for templates without their own watermark block
    pub watermark: WatermarkConfig,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            confidential_label: "Bell Confidential".to_string(),
            confidential_font_pt: 9.0,
            watermark: WatermarkConfig::default(),
        }
    }
}

/// A rendered deck.
#[derive(Debug, Clone)]
pub struct GeneratedDeck {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub slide_count: usize,
}

/// Resolves templates and renders export requests.
#[derive(Debug, Clone)]
pub struct DeckGenerator {
    resources_dir: PathBuf,
    template_maps: PathBuf,
    settings: ExportSettings,
}

impl DeckGenerator {
    pub fn new(resources_dir: PathBuf, template_maps: PathBuf, settings: ExportSettings) -> Self {
        Self {
            resources_dir,
            template_maps,
            settings,
        }
    }

    /// Render `request`. The mapping file is read on every call.
    pub fn export(&self, request: &ExportRequest) -> Result<GeneratedDeck> {
        let maps = load_template_maps(&self.template_maps)?;
        let descriptor = maps
            .get(&request.template_id)
            .ok_or_else(|| DeckError::UnknownTemplate(request.template_id.clone()))?;

        let template_path = self.resources_dir.join(&descriptor.template_file);
        if !template_path.exists() {
            return Err(DeckError::TemplateFileMissing(template_path));
        }

        let pres = Presentation::open(&template_path)?;
        let bytes = self.render(descriptor, pres, &request.deck, request.internal_use_only)?;

        tracing::info!(
            template = %request.template_id,
            slides = request.deck.slides.len(),
            bytes = bytes.len(),
            "exported deck"
        );

        Ok(GeneratedDeck {
            file_name: request.deck.file_name(),
            bytes,
            slide_count: request.deck.slides.len(),
        })
    }

    /// Replace the slides of `pres` with one slide per record and serialize it.
    pub fn render(
        &self,
        descriptor: &TemplateDescriptor,
        mut pres: Presentation,
        deck: &DeckRecord,
        confidential: bool,
    ) -> Result<Vec<u8>> {
        if pres.slide_layouts().is_empty() {
            return Err(DeckError::NoLayouts);
        }

        let watermark = descriptor.watermark.as_ref().unwrap_or(&self.settings.watermark);
        let filter = WatermarkFilter::from_config(watermark)?;

        pres.delete_all_slides()?;

        for (position, record) in deck.slides.iter().enumerate() {
            let slide = self.build_slide(&pres, descriptor, &filter, position, record, confidential)?;
            pres.add_slide(&slide)?;
        }

        Ok(pres.to_bytes()?)
    }

    fn build_slide(
        &self,
        pres: &Presentation,
        descriptor: &TemplateDescriptor,
        filter: &WatermarkFilter,
        position: usize,
        record: &SlideRecord,
        confidential: bool,
    ) -> Result<Slide> {
        let is_title = position == 0;
        let layout_index = resolve_layout_index(
            record.layout_index,
            if is_title {
                descriptor.title_layout_index
            } else {
                descriptor.content_layout_index
            },
            descriptor.content_layout_index,
            pres.slide_layouts().len(),
        );

        let mut slide = pres.new_slide(layout_index)?;
        let removed = filter.strip(&mut slide);
        tracing::debug!(position, layout_index, removed, "created slide");

        let title_idx = placeholder_override(record.title_placeholder_idx, descriptor.title_placeholder_idx);
        if let (Some(idx), Some(title)) = (title_idx, record.title.as_deref()) {
            set_text(&mut slide, idx, title);
        }

        if is_title {
            if let Some(subtitle) = record.subtitle.as_deref().filter(|s| !s.is_empty()) {
                let subtitle_idx = placeholder_override(
                    record.subtitle_placeholder_idx,
                    descriptor.subtitle_placeholder_idx,
                );
                if let Some(idx) = subtitle_idx {
                    set_text(&mut slide, idx, subtitle);
                }
            }
        }

        let has_bullets = !record.bullets.is_empty();
        if has_bullets {
            let body_idx = placeholder_override(record.body_placeholder_idx, descriptor.body_placeholder_idx);
            if let Some(idx) = body_idx {
                set_bullets(&mut slide, idx, &record.bullets);
            }
        }

        if let Some(data) = record.image_data.as_deref().filter(|d| !d.is_empty()) {
            match decode_image_data(data) {
                Ok(image) => {
                    let bounds = image_box(has_bullets, record.image_position());
                    let geometry = fit_to_box(image.dimensions, bounds);
                    slide.add_picture(image.bytes, image.format, geometry);
                },
                Err(e) => tracing::warn!(position, error = %e, "skipping slide image"),
            }
        }

        if confidential {
            self.add_confidential_label(&mut slide);
        }

        Ok(slide)
    }

    fn add_confidential_label(&self, slide: &mut Slide) {
        let geometry = Geometry::new(
            inches_to_emu(0.5),
            inches_to_emu(7.0),
            inches_to_emu(3.0),
            inches_to_emu(0.3),
        );
        slide.add_text_box(
            geometry,
            &self.settings.confidential_label,
            Some(self.settings.confidential_font_pt),
        );
    }
}

/// Layout for a slide: the override or the positional default when in
/// range, else the content layout, else the first layout. A negative
/// override counts from the end, `-1` being the last layout.
pub fn resolve_layout_index(
    requested: Option<i64>,
    default_index: usize,
    content_index: usize,
    layout_count: usize,
) -> usize {
    let candidate = match requested {
        Some(index) if index < 0 => usize::try_from(index.unsigned_abs())
            .ok()
            .and_then(|back| layout_count.checked_sub(back)),
        Some(index) => usize::try_from(index).ok(),
        None => Some(default_index),
    };

    match candidate {
        Some(index) if index < layout_count => index,
        _ if content_index < layout_count => content_index,
        _ => 0,
    }
}

/// Per-slide placeholder override, else the template default. Negative
/// overrides resolve to no placeholder.
pub fn placeholder_override(requested: Option<i64>, default_idx: Option<u32>) -> Option<u32> {
    match requested {
        Some(idx) => u32::try_from(idx).ok(),
        None => default_idx,
    }
}

fn set_text(slide: &mut Slide, idx: u32, text: &str) {
    if let Err(e) = slide.set_placeholder_text(idx, text) {
        tracing::debug!(idx, error = %e, "placeholder skipped");
    }
}

/// One level-0 paragraph per non-empty bullet. Placeholders without a text
/// frame get the bullets as plain text instead.
fn set_bullets(slide: &mut Slide, idx: u32, bullets: &[String]) {
    let mut paragraphs: Vec<Paragraph> = bullets
        .iter()
        .filter(|bullet| !bullet.is_empty())
        .map(Paragraph::new)
        .collect();
    if paragraphs.is_empty() {
        paragraphs.push(Paragraph::default());
    }

    if let Err(e) = slide.set_placeholder_paragraphs(idx, paragraphs) {
        tracing::debug!(idx, error = %e, "writing bullets as plain text");
        let text = bullets
            .iter()
            .filter(|bullet| !bullet.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n");
        set_text(slide, idx, &text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::fixtures;
    use crate::ooxml::pptx::shapes::ShapeRecord;
    use crate::template::descriptor::TemplateMaps;
    use crate::template::mapper::describe_presentation;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;

    fn descriptor() -> TemplateDescriptor {
        let pres = Presentation::from_bytes(&fixtures::template_pptx()).unwrap();
        describe_presentation(&pres, "deck.pptx")
    }

    fn render(deck: &DeckRecord, confidential: bool) -> Presentation {
        let generator = DeckGenerator::new(PathBuf::new(), PathBuf::new(), ExportSettings::default());
        let pres = Presentation::from_bytes(&fixtures::template_pptx()).unwrap();
        let bytes = generator.render(&descriptor(), pres, deck, confidential).unwrap();
        Presentation::from_bytes(&bytes).unwrap()
    }

    fn slide(title: &str, bullets: &[&str]) -> SlideRecord {
        SlideRecord {
            title: Some(title.to_string()),
            bullets: bullets.iter().map(|b| b.to_string()).collect(),
            ..SlideRecord::default()
        }
    }

    fn deck(slides: Vec<SlideRecord>) -> DeckRecord {
        DeckRecord {
            title: Some("Deck".to_string()),
            slides,
        }
    }

    fn shapes_of(pres: &Presentation, index: usize) -> (Vec<ShapeRecord>, String) {
        let (shapes, layout) = pres.slide_shapes(index).unwrap();
        (shapes, layout.to_string())
    }

    #[test]
    fn test_resolve_layout_index() {
        assert_eq!(resolve_layout_index(None, 0, 1, 6), 0);
        assert_eq!(resolve_layout_index(Some(4), 0, 1, 6), 4);
        assert_eq!(resolve_layout_index(Some(9), 0, 1, 6), 1);
        assert_eq!(resolve_layout_index(Some(-1), 0, 1, 6), 5);
        assert_eq!(resolve_layout_index(Some(-6), 0, 1, 6), 0);
        assert_eq!(resolve_layout_index(Some(-7), 0, 1, 6), 1);
        assert_eq!(resolve_layout_index(Some(i64::MIN), 0, 1, 6), 1);
        assert_eq!(resolve_layout_index(Some(9), 0, 7, 6), 0);
        assert_eq!(resolve_layout_index(None, 3, 7, 2), 0);
    }

    #[test]
    fn test_placeholder_override() {
        assert_eq!(placeholder_override(None, Some(1)), Some(1));
        assert_eq!(placeholder_override(Some(13), Some(1)), Some(13));
        assert_eq!(placeholder_override(Some(-1), Some(1)), None);
        assert_eq!(placeholder_override(None, None), None);
    }

    #[test]
    fn test_slides_in_order_with_layouts() {
        let records = vec![
            SlideRecord {
                subtitle: Some("Subtitle text".to_string()),
                ..slide("Opening", &[])
            },
            slide("Second", &["x"]),
            slide("Third", &["y"]),
        ];
        let pres = render(&deck(records), false);
        assert_eq!(pres.slide_count(), 3);

        let (shapes, layout) = shapes_of(&pres, 0);
        assert_eq!(layout, "/ppt/slideLayouts/slideLayout1.xml");
        assert_eq!(shapes[0].text().as_deref(), Some("Opening"));
        assert_eq!(shapes[1].text().as_deref(), Some("Subtitle text"));

        for (index, title) in [(1, "Second"), (2, "Third")] {
            let (shapes, layout) = shapes_of(&pres, index);
            assert_eq!(layout, "/ppt/slideLayouts/slideLayout2.xml");
            assert_eq!(shapes[0].text().as_deref(), Some(title));
        }
    }

    #[test]
    fn test_empty_bullets_are_skipped() {
        let pres = render(&deck(vec![slide("T", &[]), slide("Body", &["a", "", "b"])]), false);
        let (shapes, _) = shapes_of(&pres, 1);

        let body = shapes[1].text_frame.as_ref().unwrap();
        assert_eq!(body.paragraphs(), &[Paragraph::new("a"), Paragraph::new("b")]);
        assert!(body.paragraphs().iter().all(|p| p.level == 0));
    }

    #[test]
    fn test_bullets_fall_back_to_plain_text() {
        let mut record = slide("Pictures", &["one", "", "two"]);
        record.layout_index = Some(4);
        let pres = render(&deck(vec![slide("T", &[]), record]), false);

        let (shapes, _) = shapes_of(&pres, 1);
        let picture_placeholder = shapes
            .iter()
            .find(|s| s.placeholder.as_ref().is_some_and(|ph| ph.idx == 1))
            .unwrap();
        assert_eq!(picture_placeholder.text().as_deref(), Some("one\ntwo"));
    }

    #[test]
    fn test_missing_placeholder_is_skipped() {
        let mut record = slide("Only title", &["lost"]);
        record.layout_index = Some(2);
        let pres = render(&deck(vec![slide("T", &[]), record]), false);

        let (shapes, _) = shapes_of(&pres, 1);
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].text().as_deref(), Some("Only title"));
    }

    #[test]
    fn test_subtitle_only_on_first_slide() {
        let mut second = slide("Second", &[]);
        second.layout_index = Some(0);
        second.subtitle = Some("ignored".to_string());
        let pres = render(&deck(vec![slide("T", &[]), second]), false);

        let (shapes, _) = shapes_of(&pres, 1);
        assert_eq!(shapes[1].text().as_deref(), Some(""));
    }

    #[test]
    fn test_confidential_label() {
        let pres = render(&deck(vec![slide("T", &[]), slide("C", &["x"])]), true);

        for index in 0..2 {
            let (shapes, _) = shapes_of(&pres, index);
            let label = shapes.last().unwrap();
            assert_eq!(label.text().as_deref(), Some("Bell Confidential"));
            assert_eq!(
                label.geometry,
                Some(Geometry::new(
                    inches_to_emu(0.5),
                    inches_to_emu(7.0),
                    inches_to_emu(3.0),
                    inches_to_emu(0.3)
                ))
            );
        }
    }

    #[test]
    fn test_image_placement() {
        let data = format!(
            "data:image/png;base64,{}",
            STANDARD.encode(fixtures::png_of_size(200, 100))
        );
        let mut with_bullets = slide("Chart", &["point"]);
        with_bullets.image_data = Some(data.clone());
        with_bullets.image_position = Some("left".to_string());
        let mut image_only = slide("Photo", &[]);
        image_only.image_data = Some(data);
        let mut broken = slide("Broken", &[]);
        broken.image_data = Some("%%%".to_string());

        let pres = render(&deck(vec![with_bullets, image_only, broken]), false);
        assert_eq!(pres.slide_count(), 3);

        let (shapes, _) = shapes_of(&pres, 0);
        let picture = shapes.last().unwrap().geometry.unwrap();
        assert_eq!(picture.left, inches_to_emu(0.5));
        assert_eq!(picture.top, inches_to_emu(1.5));
        assert_eq!(picture.width, inches_to_emu(4.0));
        assert_eq!(picture.height, inches_to_emu(2.0));

        let (shapes, _) = shapes_of(&pres, 1);
        let picture = shapes.last().unwrap().geometry.unwrap();
        assert_eq!(picture.left, inches_to_emu(2.0));
        assert_eq!(picture.width, inches_to_emu(6.0));
        assert_eq!(picture.height, inches_to_emu(3.0));

        let (shapes, _) = shapes_of(&pres, 2);
        assert!(shapes.iter().all(|s| s.placeholder.is_some()));
    }

    #[test]
    fn test_existing_slides_are_replaced() {
        let pres = render(&deck(vec![slide("Fresh", &[])]), false);
        assert_eq!(pres.slide_count(), 1);
        let (shapes, _) = shapes_of(&pres, 0);
        assert!(shapes.iter().all(|s| s.text().as_deref() != Some("Old deck")));
    }

    #[test]
    fn test_blank_logo_placeholder_is_kept() {
        let mut record = slide("Branded", &["x"]);
        record.layout_index = Some(5);
        let pres = render(&deck(vec![slide("T", &[]), record]), false);

        let (shapes, _) = shapes_of(&pres, 1);
        assert!(shapes.iter().any(|s| s.placeholder.as_ref().is_some_and(|ph| ph.idx == 13)));
    }

    #[test]
    fn test_export_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut maps = TemplateMaps::new();
        maps.insert("present".to_string(), descriptor());
        let mut missing = descriptor();
        missing.template_file = "gone.pptx".to_string();
        maps.insert("missing-file".to_string(), missing);
        let maps_path = dir.path().join("template-maps.json");
        crate::template::write_template_maps(&maps_path, &maps).unwrap();
        std::fs::write(dir.path().join("deck.pptx"), fixtures::template_pptx()).unwrap();

        let generator = DeckGenerator::new(dir.path().to_path_buf(), maps_path, ExportSettings::default());
        let request = |template_id: &str| ExportRequest {
            template_id: template_id.to_string(),
            internal_use_only: true,
            deck: deck(vec![slide("T", &[])]),
        };

        assert!(matches!(
            generator.export(&request("does-not-exist")),
            Err(DeckError::UnknownTemplate(_))
        ));
        assert!(matches!(
            generator.export(&request("missing-file")),
            Err(DeckError::TemplateFileMissing(_))
        ));

        let generated = generator.export(&request("present")).unwrap();
        assert_eq!(generated.file_name, "Deck.pptx");
        assert_eq!(generated.slide_count, 1);
        assert_eq!(Presentation::from_bytes(&generated.bytes).unwrap().slide_count(), 1);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn prop_resolved_layout_is_in_range(
                requested in proptest::option::of(-5i64..20i64),
                default_index in 0usize..20usize,
                content_index in 0usize..20usize,
                layout_count in 1usize..12usize,
            ) {
                let index = resolve_layout_index(requested, default_index, content_index, layout_count);
                prop_assert!(index < layout_count);
                let count = layout_count as i64;
                match requested {
                    Some(r) if (0..count).contains(&r) => prop_assert_eq!(index, r as usize),
                    Some(r) if (-count..0).contains(&r) => prop_assert_eq!(index, (count + r) as usize),
                    _ => {},
                }
            }
        }
    }
}
