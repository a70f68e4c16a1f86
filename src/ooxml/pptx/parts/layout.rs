/// Slide master and slide layout parts.
///
/// A master owns an ordered list of layouts (`p:sldLayoutIdLst`); each layout
/// points back at its master. Both are loaded once when a presentation is
/// opened and are never modified afterwards.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use crate::ooxml::opc::package::OpcPackage;
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::part::Part;
use crate::ooxml::pptx::parts::presentation::id_and_rel;
use crate::ooxml::pptx::shapes::base::{
    Geometry, PlaceholderRef, PlaceholderType, ShapeRecord, parse_shape_tree,
};
use quick_xml::Reader;
use quick_xml::events::Event;

/// A slide master with its shapes and layouts.
#[derive(Debug, Clone)]
pub struct SlideMaster {
    pub partname: PackURI,
    pub shapes: Vec<ShapeRecord>,
    /// Layout partnames in `p:sldLayoutIdLst` order
    pub layout_partnames: Vec<PackURI>,
}

impl SlideMaster {
    pub fn load(package: &OpcPackage, partname: &PackURI) -> Result<Self> {
        let part = package.get_part(partname)?;
        expect_content_type(part, ct::PML_SLIDE_MASTER)?;

        let shapes = parse_shape_tree(part.blob())?;
        let mut layout_partnames = Vec::new();
        for r_id in layout_r_ids(part.blob())? {
            layout_partnames.push(part.related_partname(&r_id)?);
        }

        Ok(Self {
            partname: partname.clone(),
            shapes,
            layout_partnames,
        })
    }

    /// Master placeholder a layout placeholder of `ph_type` inherits from.
    pub fn inherited_placeholder(&self, ph_type: &PlaceholderType) -> Option<&ShapeRecord> {
        let wanted = ph_type.master_type();
        self.shapes.iter().find(|shape| {
            shape
                .placeholder
                .as_ref()
                .is_some_and(|ph| ph.ph_type == wanted)
        })
    }

    /// Effective position of a layout placeholder: its own transform, or
    /// that of the master placeholder it inherits from.
    pub fn placeholder_geometry(&self, shape: &ShapeRecord, ph: &PlaceholderRef) -> Option<Geometry> {
        shape.geometry.or_else(|| {
            self.inherited_placeholder(&ph.ph_type)
                .and_then(|master_shape| master_shape.geometry)
        })
    }
}

/// A slide layout with its shapes.
#[derive(Debug, Clone)]
pub struct SlideLayout {
    pub partname: PackURI,
    /// `p:cSld@name`
    pub name: String,
    pub shapes: Vec<ShapeRecord>,
    pub master_partname: PackURI,
}

impl SlideLayout {
    pub fn load(package: &OpcPackage, partname: &PackURI) -> Result<Self> {
        let part = package.get_part(partname)?;
        expect_content_type(part, ct::PML_SLIDE_LAYOUT)?;

        let master_partname = part
            .rels()
            .part_with_reltype(rt::SLIDE_MASTER)?
            .target_partname()?;

        Ok(Self {
            partname: partname.clone(),
            name: common_slide_name(part.blob())?,
            shapes: parse_shape_tree(part.blob())?,
            master_partname,
        })
    }

    /// Placeholders of this layout in document order.
    pub fn placeholders(&self) -> impl Iterator<Item = (&ShapeRecord, &PlaceholderRef)> {
        self.shapes
            .iter()
            .filter_map(|shape| shape.placeholder.as_ref().map(|ph| (shape, ph)))
    }

}

fn expect_content_type(part: &dyn Part, expected: &str) -> Result<()> {
    if part.content_type() != expected {
        return Err(OoxmlError::InvalidContentType {
            expected: expected.to_string(),
            got: part.content_type().to_string(),
        });
    }
    Ok(())
}

fn layout_r_ids(xml: &[u8]) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(xml);
    let mut r_ids = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sldLayoutId" => {
                if let (_, Some(r_id)) = id_and_rel(&e)? {
                    r_ids.push(r_id);
                }
            },
            Event::Eof => break,
            _ => {},
        }
    }

    Ok(r_ids)
}

/// `name` attribute of `p:cSld`, empty when absent.
fn common_slide_name(xml: &[u8]) -> Result<String> {
    let mut reader = Reader::from_reader(xml);

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"cSld" => {
                for attr in e.attributes() {
                    let attr = attr?;
                    if attr.key.as_ref() == b"name" {
                        return Ok(attr.unescape_value()?.to_string());
                    }
                }
                return Ok(String::new());
            },
            Event::Eof => return Ok(String::new()),
            _ => {},
        }
    }
}
