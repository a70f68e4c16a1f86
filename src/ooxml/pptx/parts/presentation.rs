/// Presentation part - the main part in a .pptx package.
///
/// Corresponds to `/ppt/presentation.xml` in the package.
use crate::common::xml::escape_xml;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::part::Part;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fmt::Write as FmtWrite;

/// Lowest slide id PowerPoint accepts.
pub const MIN_SLIDE_ID: u32 = 256;

/// One `p:sldId` entry of the slide list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideId {
    pub id: u32,
    pub r_id: String,
}

/// Read-only view over the main presentation part.
///
/// # Example
///
/// ```rust,ignore
/// let pres_part = PresentationPart::from_part(opc_part)?;
/// for slide_id in pres_part.slide_ids()? {
///     println!("{} -> {}", slide_id.id, slide_id.r_id);
/// }
/// ```
pub struct PresentationPart<'a> {
    part: &'a dyn Part,
}

impl<'a> PresentationPart<'a> {
    pub fn from_part(part: &'a dyn Part) -> Result<Self> {
        Ok(Self { part })
    }

    #[inline]
    fn xml_bytes(&self) -> &[u8] {
        self.part.blob()
    }

    /// Entries of `p:sldIdLst` in presentation order.
    pub fn slide_ids(&self) -> Result<Vec<SlideId>> {
        let mut reader = Reader::from_reader(self.xml_bytes());
        let mut ids = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sldId" => {
                    let (id, r_id) = id_and_rel(&e)?;
                    ids.push(SlideId {
                        id: id.unwrap_or(0),
                        r_id: r_id.ok_or_else(|| OoxmlError::Xml("sldId without r:id".to_string()))?,
                    });
                },
                Event::Eof => break,
                _ => {},
            }
        }

        Ok(ids)
    }

    /// Relationship ids of `p:sldMasterIdLst` in order.
    pub fn slide_master_r_ids(&self) -> Result<Vec<String>> {
        let mut reader = Reader::from_reader(self.xml_bytes());
        let mut r_ids = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sldMasterId" => {
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
}

/// `id` and `r:id` attributes of a list entry element.
pub(crate) fn id_and_rel(e: &BytesStart<'_>) -> Result<(Option<u32>, Option<String>)> {
    let mut id = None;
    let mut r_id = None;

    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() != b"id" {
            continue;
        }
        if attr.key.prefix().is_some() {
            r_id = Some(attr.unescape_value()?.to_string());
        } else {
            id = atoi_simd::parse::<u32, false, false>(&attr.value).ok();
        }
    }

    Ok((id, r_id))
}

/// Master lists that precede `p:sldIdLst` in `p:presentation`.
fn precedes_slide_list(local_name: &[u8]) -> bool {
    matches!(
        local_name,
        b"sldMasterIdLst" | b"notesMasterIdLst" | b"handoutMasterIdLst"
    )
}

/// Return `xml` with its `p:sldIdLst` replaced by one listing `slide_ids`.
///
/// The rest of the document is copied byte for byte. An empty list removes
/// the element; a missing one is inserted in schema position, before
/// `p:sldSz`.
pub fn rewrite_slide_id_list(xml: &[u8], slide_ids: &[SlideId]) -> Result<Vec<u8>> {
    let mut reader = Reader::from_reader(xml);
    let mut depth = 0usize;
    let mut prefix = String::new();
    let mut list_start: Option<usize> = None;
    let mut existing: Option<(usize, usize)> = None;
    let mut insert_at: Option<usize> = None;

    loop {
        let before = reader.buffer_position() as usize;
        let event = reader.read_event()?;
        let after = reader.buffer_position() as usize;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_start = matches!(event, Event::Start(_));
                if depth == 0 {
                    prefix = element_prefix(e);
                } else if depth == 1 && existing.is_none() && list_start.is_none() {
                    let name = e.local_name();
                    if name.as_ref() == b"sldIdLst" {
                        if is_start {
                            list_start = Some(before);
                        } else {
                            existing = Some((before, after));
                        }
                    } else if !precedes_slide_list(name.as_ref()) && insert_at.is_none() {
                        insert_at = Some(before);
                    }
                }
                if is_start {
                    depth += 1;
                }
            },
            Event::End(ref e) => {
                depth = depth.saturating_sub(1);
                if depth == 1 && e.local_name().as_ref() == b"sldIdLst" {
                    if let Some(start) = list_start.take() {
                        existing = Some((start, after));
                    }
                } else if depth == 0 {
                    if insert_at.is_none() {
                        insert_at = Some(before);
                    }
                    break;
                }
            },
            Event::Eof => {
                return Err(OoxmlError::InvalidFormat(
                    "presentation part has no closed root element".to_string(),
                ));
            },
            _ => {},
        }
    }

    let list_xml = slide_id_list_xml(&prefix, slide_ids)?;
    let (splice_start, splice_end) = match (existing, insert_at) {
        (Some(range), _) => range,
        (None, Some(pos)) => (pos, pos),
        (None, None) => {
            return Err(OoxmlError::InvalidFormat(
                "no position for slide id list".to_string(),
            ));
        },
    };

    let mut out = Vec::with_capacity(xml.len() + list_xml.len());
    out.extend_from_slice(&xml[..splice_start]);
    out.extend_from_slice(list_xml.as_bytes());
    out.extend_from_slice(&xml[splice_end..]);
    Ok(out)
}

fn element_prefix(e: &BytesStart<'_>) -> String {
    e.name()
        .prefix()
        .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned())
        .unwrap_or_default()
}

fn slide_id_list_xml(prefix: &str, slide_ids: &[SlideId]) -> Result<String> {
    if slide_ids.is_empty() {
        return Ok(String::new());
    }

    let tag = |local: &str| {
        if prefix.is_empty() {
            local.to_string()
        } else {
            format!("{}:{}", prefix, local)
        }
    };
    let list_tag = tag("sldIdLst");
    let id_tag = tag("sldId");

    let mut xml = String::with_capacity(32 + slide_ids.len() * 48);
    write!(xml, "<{}>", list_tag).map_err(|e| OoxmlError::Xml(e.to_string()))?;
    for slide_id in slide_ids {
        write!(
            xml,
            r#"<{} id="{}" r:id="{}"/>"#,
            id_tag,
            slide_id.id,
            escape_xml(&slide_id.r_id)
        )
        .map_err(|e| OoxmlError::Xml(e.to_string()))?;
    }
    write!(xml, "</{}>", list_tag).map_err(|e| OoxmlError::Xml(e.to_string()))?;
    Ok(xml)
}
