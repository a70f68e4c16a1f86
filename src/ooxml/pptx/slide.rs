/// A slide under construction.
///
/// A [`Slide`] starts as a copy of a layout's placeholders and collects
/// content (placeholder text, pictures, text boxes) before it is written
/// into the package by
/// [`Presentation::add_slide`](crate::ooxml::pptx::Presentation::add_slide).
use crate::common::xml::escape_xml;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::namespace;
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::pptx::format::ImageFormat;
use crate::ooxml::pptx::parts::layout::{SlideLayout, SlideMaster};
use crate::ooxml::pptx::shapes::base::{Geometry, PlaceholderRef, PlaceholderType};
use crate::ooxml::pptx::shapes::textframe::{Paragraph, TextFrame};
use std::collections::HashMap;
use std::fmt::Write as FmtWrite;

/// Shape id 1 belongs to the slide's root group shape.
const FIRST_SHAPE_ID: u32 = 2;

/// Kind-specific data of a slide shape.
#[derive(Debug, Clone)]
pub enum ShapeKind {
    /// Placeholder cloned from the layout. Its position is inherited.
    Placeholder(PlaceholderRef),
    /// Picture with its image bytes, embedded on write.
    Picture { data: Vec<u8>, format: ImageFormat },
    /// Free-standing text box with an optional fixed font size.
    TextBox { font_pt: Option<f64> },
}

/// One shape on a [`Slide`].
#[derive(Debug, Clone)]
pub struct SlideShape {
    pub id: u32,
    pub name: String,
    pub kind: ShapeKind,
    /// Effective position; for placeholders this is resolved through the
    /// layout and master, and is `None` when neither defines one.
    pub geometry: Option<Geometry>,
    pub text_frame: Option<TextFrame>,
}

impl SlideShape {
    pub fn placeholder(&self) -> Option<&PlaceholderRef> {
        match &self.kind {
            ShapeKind::Placeholder(ph) => Some(ph),
            _ => None,
        }
    }

    #[inline]
    pub fn is_picture(&self) -> bool {
        matches!(self.kind, ShapeKind::Picture { .. })
    }

    fn write_xml(&self, xml: &mut String, image_rids: &HashMap<u32, String>) -> Result<()> {
        match &self.kind {
            ShapeKind::Placeholder(ph) => self.write_placeholder(xml, ph),
            ShapeKind::TextBox { font_pt } => self.write_text_box(xml, *font_pt),
            ShapeKind::Picture { .. } => {
                let r_id = image_rids.get(&self.id).ok_or_else(|| {
                    OoxmlError::InvalidRelationship(format!("no image relationship for shape {}", self.id))
                })?;
                self.write_picture(xml, r_id)
            },
        }
    }

    fn write_placeholder(&self, xml: &mut String, ph: &PlaceholderRef) -> Result<()> {
        xml.push_str("<p:sp><p:nvSpPr>");
        self.write_cnvpr(xml)?;
        xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph"#);
        if ph.ph_type != PlaceholderType::Object {
            write!(xml, r#" type="{}""#, escape_xml(ph.ph_type.as_str())).map_err(fmt_err)?;
        }
        if let Some(orient) = &ph.orient {
            write!(xml, r#" orient="{}""#, escape_xml(orient)).map_err(fmt_err)?;
        }
        if let Some(sz) = &ph.sz {
            write!(xml, r#" sz="{}""#, escape_xml(sz)).map_err(fmt_err)?;
        }
        if ph.idx != 0 {
            write!(xml, r#" idx="{}""#, ph.idx).map_err(fmt_err)?;
        }
        xml.push_str("/></p:nvPr></p:nvSpPr><p:spPr/>");

        if let Some(frame) = &self.text_frame {
            frame.write_body(xml, "<a:bodyPr/>", None)?;
        }
        xml.push_str("</p:sp>");
        Ok(())
    }

    fn write_text_box(&self, xml: &mut String, font_pt: Option<f64>) -> Result<()> {
        xml.push_str("<p:sp><p:nvSpPr>");
        self.write_cnvpr(xml)?;
        xml.push_str(r#"<p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>"#);
        write_xfrm(xml, &self.geometry.unwrap_or_default())?;
        xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>"#);

        let empty = TextFrame::new();
        let frame = self.text_frame.as_ref().unwrap_or(&empty);
        frame.write_body(
            xml,
            r#"<a:bodyPr wrap="square" rtlCol="0"><a:spAutoFit/></a:bodyPr>"#,
            font_pt,
        )?;
        xml.push_str("</p:sp>");
        Ok(())
    }

    fn write_picture(&self, xml: &mut String, r_id: &str) -> Result<()> {
        xml.push_str("<p:pic><p:nvPicPr>");
        self.write_cnvpr(xml)?;
        xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#);
        write!(
            xml,
            r#"<p:blipFill><a:blip r:embed="{}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#,
            escape_xml(r_id)
        )
        .map_err(fmt_err)?;
        xml.push_str("<p:spPr>");
        write_xfrm(xml, &self.geometry.unwrap_or_default())?;
        xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#);
        Ok(())
    }

    fn write_cnvpr(&self, xml: &mut String) -> Result<()> {
        write!(
            xml,
            r#"<p:cNvPr id="{}" name="{}"/>"#,
            self.id,
            escape_xml(&self.name)
        )
        .map_err(fmt_err)
    }
}

fn write_xfrm(xml: &mut String, geometry: &Geometry) -> Result<()> {
    write!(
        xml,
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        geometry.left, geometry.top, geometry.width, geometry.height
    )
    .map_err(fmt_err)
}

fn fmt_err(e: std::fmt::Error) -> OoxmlError {
    OoxmlError::Xml(e.to_string())
}

/// Name given to a placeholder cloned onto a slide, e.g. "Content Placeholder 2".
fn placeholder_name(ph: &PlaceholderRef, id: u32) -> String {
    let base = match ph.ph_type {
        PlaceholderType::Title | PlaceholderType::CenterTitle => "Title",
        PlaceholderType::SubTitle => "Subtitle",
        PlaceholderType::Body => "Text Placeholder",
        PlaceholderType::Object => "Content Placeholder",
        PlaceholderType::Picture => "Picture Placeholder",
        PlaceholderType::Chart => "Chart Placeholder",
        PlaceholderType::Table => "Table Placeholder",
        PlaceholderType::ClipArt => "ClipArt Placeholder",
        PlaceholderType::Diagram => "SmartArt Placeholder",
        PlaceholderType::Media => "Media Placeholder",
        PlaceholderType::SlideImage => "Slide Image Placeholder",
        PlaceholderType::Date => "Date Placeholder",
        PlaceholderType::Footer => "Footer Placeholder",
        PlaceholderType::SlideNumber => "Slide Number Placeholder",
        PlaceholderType::Header => "Header Placeholder",
        PlaceholderType::Other(_) => "Placeholder",
    };
    let base = if ph.orient.as_deref() == Some("vert") {
        format!("Vertical {}", base)
    } else {
        base.to_string()
    };
    format!("{} {}", base, id - 1)
}

/// A new slide based on a layout.
#[derive(Debug, Clone)]
pub struct Slide {
    layout_partname: PackURI,
    shapes: Vec<SlideShape>,
}

impl Slide {
    /// Create a slide holding a copy of every placeholder on `layout` except
    /// date, footer and slide-number placeholders.
    pub fn from_layout(layout: &SlideLayout, master: &SlideMaster) -> Self {
        let mut slide = Self {
            layout_partname: layout.partname.clone(),
            shapes: Vec::new(),
        };

        for (layout_shape, ph) in layout.placeholders() {
            if ph.ph_type.is_footer_kind() {
                continue;
            }

            let id = slide.next_shape_id();
            let geometry = master.placeholder_geometry(layout_shape, ph);
            let text_frame = ph.ph_type.has_text_body().then(TextFrame::new);

            slide.shapes.push(SlideShape {
                id,
                name: placeholder_name(ph, id),
                kind: ShapeKind::Placeholder(ph.clone()),
                geometry,
                text_frame,
            });
        }

        slide
    }

    #[inline]
    pub fn layout_partname(&self) -> &PackURI {
        &self.layout_partname
    }

    #[inline]
    pub fn shapes(&self) -> &[SlideShape] {
        &self.shapes
    }

    /// Placeholder with the given `idx`.
    pub fn placeholder(&self, idx: u32) -> Option<&SlideShape> {
        self.shapes
            .iter()
            .find(|shape| shape.placeholder().is_some_and(|ph| ph.idx == idx))
    }

    fn placeholder_mut(&mut self, idx: u32) -> Result<&mut SlideShape> {
        self.shapes
            .iter_mut()
            .find(|shape| shape.placeholder().is_some_and(|ph| ph.idx == idx))
            .ok_or(OoxmlError::PlaceholderNotFound(idx))
    }

    /// Replace the text of a placeholder, creating its text frame when it
    /// has none. Each line feed starts a new paragraph.
    pub fn set_placeholder_text(&mut self, idx: u32, text: &str) -> Result<()> {
        let shape = self.placeholder_mut(idx)?;
        shape.text_frame = Some(TextFrame::from_text(text));
        Ok(())
    }

    /// Replace the paragraphs of a placeholder's existing text frame.
    pub fn set_placeholder_paragraphs(&mut self, idx: u32, paragraphs: Vec<Paragraph>) -> Result<()> {
        let shape = self.placeholder_mut(idx)?;
        match shape.text_frame.as_mut() {
            Some(frame) => {
                *frame = TextFrame::from_paragraphs(paragraphs);
                Ok(())
            },
            None => Err(OoxmlError::NoTextFrame(idx)),
        }
    }

    /// Add a picture and return its shape id.
    pub fn add_picture(&mut self, data: Vec<u8>, format: ImageFormat, geometry: Geometry) -> u32 {
        let id = self.next_shape_id();
        self.shapes.push(SlideShape {
            id,
            name: format!("Picture {}", id - 1),
            kind: ShapeKind::Picture { data, format },
            geometry: Some(geometry),
            text_frame: None,
        });
        id
    }

    /// Add a text box and return its shape id.
    pub fn add_text_box(&mut self, geometry: Geometry, text: &str, font_pt: Option<f64>) -> u32 {
        let id = self.next_shape_id();
        self.shapes.push(SlideShape {
            id,
            name: format!("TextBox {}", id - 1),
            kind: ShapeKind::TextBox { font_pt },
            geometry: Some(geometry),
            text_frame: Some(TextFrame::from_text(text)),
        });
        id
    }

    /// Keep only the shapes for which `keep` returns true. Returns the
    /// number of shapes removed.
    pub fn retain_shapes<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&SlideShape) -> bool,
    {
        let before = self.shapes.len();
        self.shapes.retain(|shape| keep(shape));
        before - self.shapes.len()
    }

    /// Pictures on the slide as (shape id, bytes, format).
    pub(crate) fn pictures(&self) -> impl Iterator<Item = (u32, &[u8], ImageFormat)> {
        self.shapes.iter().filter_map(|shape| match &shape.kind {
            ShapeKind::Picture { data, format } => Some((shape.id, data.as_slice(), *format)),
            _ => None,
        })
    }

    fn next_shape_id(&self) -> u32 {
        self.shapes
            .iter()
            .map(|shape| shape.id + 1)
            .max()
            .unwrap_or(FIRST_SHAPE_ID)
            .max(FIRST_SHAPE_ID)
    }

    /// Serialize as a slide part. `image_rids` maps picture shape ids to
    /// the relationship ids of their image parts.
    pub fn to_xml(&self, image_rids: &HashMap<u32, String>) -> Result<String> {
        let mut xml = String::with_capacity(1024 + self.shapes.len() * 512);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        write!(
            xml,
            r#"<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
            namespace::DML_MAIN,
            namespace::OFC_RELATIONSHIPS,
            namespace::PML_MAIN
        )
        .map_err(fmt_err)?;
        xml.push_str("<p:cSld><p:spTree>");
        xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
        xml.push_str(
            r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#,
        );

        for shape in &self.shapes {
            shape.write_xml(&mut xml, image_rids)?;
        }

        xml.push_str("</p:spTree></p:cSld>");
        xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
        xml.push_str("</p:sld>");
        Ok(xml)
    }
}
