/// Presentation - an open .pptx package with its masters, layouts and slides.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use crate::ooxml::opc::package::OpcPackage;
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::part::{BlobPart, Part, XmlPart};
use crate::ooxml::pptx::parts::layout::{SlideLayout, SlideMaster};
use crate::ooxml::pptx::parts::presentation::{
    MIN_SLIDE_ID, PresentationPart, SlideId, rewrite_slide_id_list,
};
use crate::ooxml::pptx::shapes::base::{ShapeRecord, parse_shape_tree};
use crate::ooxml::pptx::slide::Slide;
use std::collections::HashMap;
use std::path::Path;

const SLIDE_PARTNAME_TEMPLATE: &str = "/ppt/slides/slide%d.xml";

/// A PowerPoint presentation loaded in memory.
///
/// Masters and layouts are read once when the presentation is opened and
/// are not modified; slides can be removed and added.
///
/// # Examples
///
/// ```rust,no_run
/// use deckgen::ooxml::pptx::Presentation;
///
/// let mut pres = Presentation::open("templates/quarterly-review.pptx")?;
/// pres.delete_all_slides()?;
/// let slide = pres.new_slide(1)?;
/// pres.add_slide(&slide)?;
/// pres.save("out.pptx")?;
/// # Ok::<(), deckgen::ooxml::error::OoxmlError>(())
/// ```
pub struct Presentation {
    package: OpcPackage,
    pres_partname: PackURI,
    masters: Vec<SlideMaster>,
    /// Layouts of the first slide master, in `sldLayoutIdLst` order
    layouts: Vec<SlideLayout>,
    slide_ids: Vec<SlideId>,
}

impl Presentation {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_package(OpcPackage::open(path)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_package(OpcPackage::from_bytes(bytes)?)
    }

    pub fn from_package(package: OpcPackage) -> Result<Self> {
        let pres_partname = package.main_document_partname()?;
        let main_part = package.get_part(&pres_partname)?;

        let content_type = main_part.content_type();
        if !matches!(
            content_type,
            ct::PML_PRESENTATION_MAIN
                | ct::PML_PRES_MACRO_MAIN
                | ct::PML_TEMPLATE_MAIN
                | ct::PML_SLIDESHOW_MAIN
        ) {
            return Err(OoxmlError::InvalidContentType {
                expected: ct::PML_PRESENTATION_MAIN.to_string(),
                got: content_type.to_string(),
            });
        }

        let pres_part = PresentationPart::from_part(main_part)?;
        let slide_ids = pres_part.slide_ids()?;

        let mut masters = Vec::new();
        for r_id in pres_part.slide_master_r_ids()? {
            let partname = main_part.related_partname(&r_id)?;
            masters.push(SlideMaster::load(&package, &partname)?);
        }

        let mut layouts = Vec::new();
        if let Some(master) = masters.first() {
            for partname in &master.layout_partnames {
                layouts.push(SlideLayout::load(&package, partname)?);
            }
        }

        tracing::debug!(
            masters = masters.len(),
            layouts = layouts.len(),
            slides = slide_ids.len(),
            "opened presentation"
        );

        Ok(Self {
            package,
            pres_partname,
            masters,
            layouts,
            slide_ids,
        })
    }

    #[inline]
    pub fn slide_masters(&self) -> &[SlideMaster] {
        &self.masters
    }

    /// Layouts of the first slide master.
    #[inline]
    pub fn slide_layouts(&self) -> &[SlideLayout] {
        &self.layouts
    }

    pub fn slide_layout(&self, index: usize) -> Result<&SlideLayout> {
        self.layouts.get(index).ok_or(OoxmlError::LayoutOutOfRange {
            index,
            count: self.layouts.len(),
        })
    }

    /// The master a layout belongs to.
    pub fn master_of(&self, layout: &SlideLayout) -> Result<&SlideMaster> {
        self.masters
            .iter()
            .find(|master| master.partname == layout.master_partname)
            .ok_or_else(|| OoxmlError::PartNotFound(layout.master_partname.to_string()))
    }

    #[inline]
    pub fn slide_count(&self) -> usize {
        self.slide_ids.len()
    }

    /// Partnames of the slides in presentation order.
    pub fn slide_partnames(&self) -> Result<Vec<PackURI>> {
        let pres = self.package.get_part(&self.pres_partname)?;
        self.slide_ids
            .iter()
            .map(|slide_id| pres.related_partname(&slide_id.r_id).map_err(OoxmlError::from))
            .collect()
    }

    /// Shapes of the slide at `index` and the partname of its layout.
    pub fn slide_shapes(&self, index: usize) -> Result<(Vec<ShapeRecord>, PackURI)> {
        let partname = self
            .slide_partnames()?
            .into_iter()
            .nth(index)
            .ok_or_else(|| OoxmlError::PartNotFound(format!("slide {}", index)))?;
        let part = self.package.get_part(&partname)?;
        let layout = part
            .rels()
            .part_with_reltype(rt::SLIDE_LAYOUT)?
            .target_partname()?;
        Ok((parse_shape_tree(part.blob())?, layout))
    }

    /// Remove every slide from the slide list and drop the parts that are
    /// no longer referenced. Layouts and masters are kept.
    pub fn delete_all_slides(&mut self) -> Result<usize> {
        let removed = self.slide_ids.len();
        let pres = self.package.get_part_mut(&self.pres_partname)?;
        for slide_id in self.slide_ids.drain(..) {
            pres.rels_mut().remove(&slide_id.r_id);
        }

        self.sync_slide_id_list()?;
        let pruned = self.package.prune_unreachable();
        tracing::debug!(removed, pruned, "deleted existing slides");
        Ok(removed)
    }

    /// A new slide based on the layout at `layout_index`.
    pub fn new_slide(&self, layout_index: usize) -> Result<Slide> {
        let layout = self.slide_layout(layout_index)?;
        let master = self.master_of(layout)?;
        Ok(Slide::from_layout(layout, master))
    }

    /// Write `slide` into the package and append it to the slide list.
    /// Returns the partname of the new slide part.
    pub fn add_slide(&mut self, slide: &Slide) -> Result<PackURI> {
        let partname = self.package.next_partname(SLIDE_PARTNAME_TEMPLATE)?;
        let mut part = XmlPart::new(partname.clone(), ct::PML_SLIDE.to_string(), Vec::new());
        part.relate_to(slide.layout_partname(), rt::SLIDE_LAYOUT);

        let mut image_rids = HashMap::new();
        for (shape_id, data, format) in slide.pictures() {
            let media_template = format!("/ppt/media/image%d.{}", format.extension());
            let media_partname = self.package.next_partname(&media_template)?;
            self.package.add_part(Box::new(BlobPart::new(
                media_partname.clone(),
                format.content_type().to_string(),
                data.to_vec(),
            )));
            let r_id = part.relate_to(&media_partname, rt::IMAGE);
            image_rids.insert(shape_id, r_id);
        }

        part.set_blob(slide.to_xml(&image_rids)?.into_bytes());
        self.package.add_part(Box::new(part));

        let pres = self.package.get_part_mut(&self.pres_partname)?;
        let r_id = pres.relate_to(&partname, rt::SLIDE);
        let id = self
            .slide_ids
            .iter()
            .map(|slide_id| slide_id.id + 1)
            .max()
            .unwrap_or(MIN_SLIDE_ID)
            .max(MIN_SLIDE_ID);
        self.slide_ids.push(SlideId { id, r_id });
        self.sync_slide_id_list()?;

        Ok(partname)
    }

    /// Rewrite `p:sldIdLst` in the presentation part from `slide_ids`.
    fn sync_slide_id_list(&mut self) -> Result<()> {
        let pres = self.package.get_part_mut(&self.pres_partname)?;
        let xml = rewrite_slide_id_list(pres.blob(), &self.slide_ids)?;
        pres.set_blob(xml);
        Ok(())
    }

    #[inline]
    pub fn package(&self) -> &OpcPackage {
        &self.package
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.package.to_bytes()?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        Ok(self.package.save(path)?)
    }
}
