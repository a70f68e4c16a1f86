/// Base shape types for PowerPoint presentations.
///
/// [`parse_shape_tree`] reads the top-level children of a `p:spTree` (on a
/// slide, layout or master) into [`ShapeRecord`]s carrying what the deck
/// generator needs: identity, placeholder binding, geometry and text.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::pptx::shapes::textframe::TextFrame;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fmt;

/// Shape type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeType {
    /// An autoshape or placeholder (p:sp)
    Shape,
    /// A picture shape (p:pic)
    Picture,
    /// A graphic frame containing a table or chart (p:graphicFrame)
    GraphicFrame,
    /// A group shape (p:grpSp)
    GroupShape,
    /// A connector shape (p:cxnSp)
    Connector,
}

impl ShapeType {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"sp" => Some(Self::Shape),
            b"pic" => Some(Self::Picture),
            b"graphicFrame" => Some(Self::GraphicFrame),
            b"grpSp" => Some(Self::GroupShape),
            b"cxnSp" => Some(Self::Connector),
            _ => None,
        }
    }
}

/// Placeholder type, the `type` attribute of `p:ph`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlaceholderType {
    Title,
    CenterTitle,
    SubTitle,
    Body,
    /// `obj`, also the meaning of a `p:ph` without a `type` attribute
    Object,
    Chart,
    Table,
    ClipArt,
    Diagram,
    Media,
    Picture,
    SlideImage,
    Date,
    Footer,
    SlideNumber,
    Header,
    Other(String),
}

impl PlaceholderType {
    pub fn parse(value: &str) -> Self {
        match value {
            "title" => Self::Title,
            "ctrTitle" => Self::CenterTitle,
            "subTitle" => Self::SubTitle,
            "body" => Self::Body,
            "obj" => Self::Object,
            "chart" => Self::Chart,
            "tbl" => Self::Table,
            "clipArt" => Self::ClipArt,
            "dgm" => Self::Diagram,
            "media" => Self::Media,
            "pic" => Self::Picture,
            "sldImg" => Self::SlideImage,
            "dt" => Self::Date,
            "ftr" => Self::Footer,
            "sldNum" => Self::SlideNumber,
            "hdr" => Self::Header,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Title => "title",
            Self::CenterTitle => "ctrTitle",
            Self::SubTitle => "subTitle",
            Self::Body => "body",
            Self::Object => "obj",
            Self::Chart => "chart",
            Self::Table => "tbl",
            Self::ClipArt => "clipArt",
            Self::Diagram => "dgm",
            Self::Media => "media",
            Self::Picture => "pic",
            Self::SlideImage => "sldImg",
            Self::Date => "dt",
            Self::Footer => "ftr",
            Self::SlideNumber => "sldNum",
            Self::Header => "hdr",
            Self::Other(value) => value,
        }
    }

    /// Date, footer and slide-number placeholders are not copied onto new slides.
    pub fn is_footer_kind(&self) -> bool {
        matches!(self, Self::Date | Self::Footer | Self::SlideNumber)
    }

    /// Placeholder kinds that receive an empty text frame when cloned onto a slide.
    pub fn has_text_body(&self) -> bool {
        matches!(
            self,
            Self::Title | Self::CenterTitle | Self::SubTitle | Self::Body | Self::Object
        )
    }

    /// The master placeholder type a layout placeholder of this type
    /// inherits its position from.
    pub fn master_type(&self) -> PlaceholderType {
        match self {
            Self::Title | Self::CenterTitle => Self::Title,
            Self::Date => Self::Date,
            Self::Footer => Self::Footer,
            Self::SlideNumber => Self::SlideNumber,
            _ => Self::Body,
        }
    }
}

impl fmt::Display for PlaceholderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `p:ph` element of a placeholder shape.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderRef {
    pub ph_type: PlaceholderType,
    /// `idx` attribute, 0 when absent
    pub idx: u32,
    pub orient: Option<String>,
    pub sz: Option<String>,
}

impl PlaceholderRef {
    fn from_element(e: &BytesStart<'_>) -> Result<Self> {
        let mut ph = PlaceholderRef {
            ph_type: PlaceholderType::Object,
            idx: 0,
            orient: None,
            sz: None,
        };

        for attr in e.attributes() {
            let attr = attr?;
            match attr.key.as_ref() {
                b"type" => ph.ph_type = PlaceholderType::parse(&attr.unescape_value()?),
                b"idx" => ph.idx = atoi_simd::parse::<u32, false, false>(&attr.value).unwrap_or(0),
                b"orient" => ph.orient = Some(attr.unescape_value()?.to_string()),
                b"sz" => ph.sz = Some(attr.unescape_value()?.to_string()),
                _ => {},
            }
        }

        Ok(ph)
    }
}

/// Position and size in EMUs, from `a:xfrm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

impl Geometry {
    pub fn new(left: i64, top: i64, width: i64, height: i64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// One top-level shape of a shape tree.
#[derive(Debug, Clone)]
pub struct ShapeRecord {
    /// `cNvPr@id`
    pub id: u32,
    /// `cNvPr@name`
    pub name: String,
    pub shape_type: ShapeType,
    pub placeholder: Option<PlaceholderRef>,
    /// Own `a:xfrm`; `None` when the shape inherits its position
    pub geometry: Option<Geometry>,
    /// `p:txBody`; `None` when the shape has no text frame
    pub text_frame: Option<TextFrame>,
}

impl ShapeRecord {
    fn new(shape_type: ShapeType) -> Self {
        Self {
            id: 0,
            name: String::new(),
            shape_type,
            placeholder: None,
            geometry: None,
            text_frame: None,
        }
    }

    #[inline]
    pub fn is_placeholder(&self) -> bool {
        self.placeholder.is_some()
    }

    /// Text of the shape's text frame, if it has one.
    pub fn text(&self) -> Option<String> {
        self.text_frame.as_ref().map(TextFrame::text)
    }
}

/// Parse the top-level shapes of the first `p:spTree` in `xml`.
///
/// Children of group shapes are not listed separately; a group is a single
/// record carrying the group's own name and transform.
pub fn parse_shape_tree(xml: &[u8]) -> Result<Vec<ShapeRecord>> {
    let mut reader = Reader::from_reader(xml);

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"spTree" => break,
            Event::Empty(e) if e.local_name().as_ref() == b"spTree" => return Ok(Vec::new()),
            Event::Eof => return Ok(Vec::new()),
            _ => {},
        }
    }

    let mut shapes = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match ShapeType::from_local_name(e.local_name().as_ref()) {
                Some(shape_type) => shapes.push(read_shape(&mut reader, shape_type)?),
                None => skip_element(&mut reader)?,
            },
            Event::End(_) => break,
            Event::Eof => {
                return Err(OoxmlError::Xml("unterminated spTree".to_string()));
            },
            _ => {},
        }
    }

    Ok(shapes)
}

/// Read one shape element whose start tag was just consumed.
fn read_shape(reader: &mut Reader<&[u8]>, shape_type: ShapeType) -> Result<ShapeRecord> {
    let mut record = ShapeRecord::new(shape_type);
    // Depth below the shape element; its direct children are seen at 0.
    let mut depth = 0usize;
    let mut in_own_xfrm = false;
    let mut geometry = Geometry::default();
    let mut has_xfrm = false;
    let mut seen_cnvpr = false;

    loop {
        let event = reader.read_event()?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_start = matches!(event, Event::Start(_));
                let name = e.local_name();
                match name.as_ref() {
                    b"cNvPr" if !seen_cnvpr => {
                        seen_cnvpr = true;
                        read_cnvpr(e, &mut record)?;
                    },
                    b"ph" if record.placeholder.is_none() && depth == 2 => {
                        record.placeholder = Some(PlaceholderRef::from_element(e)?);
                    },
                    // spPr/a:xfrm for shapes, p:xfrm for graphic frames, grpSpPr/a:xfrm for groups
                    b"xfrm" if !has_xfrm && (depth == 1 || depth == 0) => {
                        has_xfrm = true;
                        in_own_xfrm = is_start;
                    },
                    b"off" if in_own_xfrm => {
                        geometry.left = i64_attr(e, b"x")?;
                        geometry.top = i64_attr(e, b"y")?;
                    },
                    b"ext" if in_own_xfrm => {
                        geometry.width = i64_attr(e, b"cx")?;
                        geometry.height = i64_attr(e, b"cy")?;
                    },
                    b"txBody" if depth == 0 && is_start => {
                        record.text_frame = Some(TextFrame::read_body(reader)?);
                        continue;
                    },
                    b"txBody" if depth == 0 => {
                        record.text_frame = Some(TextFrame::new());
                    },
                    _ => {},
                }
                if is_start {
                    depth += 1;
                }
            },
            Event::End(ref e) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                if e.local_name().as_ref() == b"xfrm" {
                    in_own_xfrm = false;
                }
            },
            Event::Eof => {
                return Err(OoxmlError::Xml("unterminated shape element".to_string()));
            },
            _ => {},
        }
    }

    if has_xfrm {
        record.geometry = Some(geometry);
    }
    Ok(record)
}

fn read_cnvpr(e: &BytesStart<'_>, record: &mut ShapeRecord) -> Result<()> {
    for attr in e.attributes() {
        let attr = attr?;
        match attr.key.as_ref() {
            b"id" => record.id = atoi_simd::parse::<u32, false, false>(&attr.value).unwrap_or(0),
            b"name" => record.name = attr.unescape_value()?.to_string(),
            _ => {},
        }
    }
    Ok(())
}

fn i64_attr(e: &BytesStart<'_>, key: &[u8]) -> Result<i64> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == key {
            return atoi_simd::parse::<i64, false, false>(&attr.value)
                .map_err(|_| OoxmlError::Xml(format!("invalid coordinate '{}'", String::from_utf8_lossy(&attr.value))));
        }
    }
    Ok(0)
}

/// Skip to the end of an element whose start tag was just consumed.
fn skip_element(reader: &mut Reader<&[u8]>) -> Result<()> {
    let mut depth = 1usize;
    loop {
        match reader.read_event()? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            },
            Event::Eof => return Err(OoxmlError::Xml("unexpected end of document".to_string())),
            _ => {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld name="Title and Content">
    <p:spTree>
      <p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>
      <p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/></a:xfrm></p:grpSpPr>
      <p:sp>
        <p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>
        <p:spPr/>
        <p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:t>Click to edit title</a:t></a:r></a:p></p:txBody>
      </p:sp>
      <p:sp>
        <p:nvSpPr><p:cNvPr id="3" name="Content Placeholder 2"/><p:cNvSpPr/><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr>
        <p:spPr><a:xfrm><a:off x="457200" y="1600200"/><a:ext cx="8229600" cy="4525963"/></a:xfrm></p:spPr>
      </p:sp>
      <p:pic>
        <p:nvPicPr><p:cNvPr id="7" name="Logo"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr>
        <p:blipFill><a:blip r:embed="rId2"/></p:blipFill>
        <p:spPr><a:xfrm><a:off x="100" y="6400800"/><a:ext cx="200" cy="300"/></a:xfrm></p:spPr>
      </p:pic>
      <p:grpSp>
        <p:nvGrpSpPr><p:cNvPr id="8" name="Group"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>
        <p:grpSpPr><a:xfrm><a:off x="10" y="20"/><a:ext cx="30" cy="40"/></a:xfrm></p:grpSpPr>
        <p:sp><p:nvSpPr><p:cNvPr id="9" name="Inner"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/></p:sp>
      </p:grpSp>
    </p:spTree>
  </p:cSld>
</p:sldLayout>"#;

    #[test]
    fn test_parse_top_level_shapes() {
        let shapes = parse_shape_tree(LAYOUT_XML.as_bytes()).unwrap();
        assert_eq!(shapes.len(), 4);

        let title = &shapes[0];
        assert_eq!(title.id, 2);
        assert_eq!(title.name, "Title 1");
        let ph = title.placeholder.as_ref().unwrap();
        assert_eq!(ph.ph_type, PlaceholderType::Title);
        assert_eq!(ph.idx, 0);
        assert!(title.geometry.is_none());
        assert_eq!(title.text().as_deref(), Some("Click to edit title"));

        let body = &shapes[1];
        let ph = body.placeholder.as_ref().unwrap();
        assert_eq!(ph.ph_type, PlaceholderType::Object);
        assert_eq!(ph.idx, 1);
        assert_eq!(body.geometry, Some(Geometry::new(457200, 1600200, 8229600, 4525963)));
        assert!(body.text_frame.is_none());

        let logo = &shapes[2];
        assert_eq!(logo.shape_type, ShapeType::Picture);
        assert!(!logo.is_placeholder());
        assert_eq!(logo.geometry.map(|g| g.top), Some(6400800));

        let group = &shapes[3];
        assert_eq!(group.shape_type, ShapeType::GroupShape);
        assert_eq!(group.name, "Group");
        assert_eq!(group.geometry, Some(Geometry::new(10, 20, 30, 40)));
    }

    #[test]
    fn test_placeholder_type_round_trip() {
        for value in ["title", "ctrTitle", "subTitle", "body", "obj", "pic", "dt", "ftr", "sldNum"] {
            assert_eq!(PlaceholderType::parse(value).as_str(), value);
        }
        assert_eq!(PlaceholderType::parse("custom"), PlaceholderType::Other("custom".into()));
    }

    #[test]
    fn test_placeholder_kinds() {
        assert!(PlaceholderType::Footer.is_footer_kind());
        assert!(!PlaceholderType::Body.is_footer_kind());
        assert!(PlaceholderType::Object.has_text_body());
        assert!(!PlaceholderType::Picture.has_text_body());
        assert_eq!(PlaceholderType::CenterTitle.master_type(), PlaceholderType::Title);
        assert_eq!(PlaceholderType::SubTitle.master_type(), PlaceholderType::Body);
    }

    #[test]
    fn test_missing_sp_tree() {
        assert!(parse_shape_tree(b"<p:sld/>").unwrap().is_empty());
    }
}
