//! In-memory template archives for tests.
//!
//! The template has one master (title, body, date, footer and slide-number
//! placeholders), six layouts and one existing slide.

use crate::ooxml::pptx::shapes::base::Geometry;
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub const LAYOUT_NAMES: [&str; 6] = [
    "Title Slide",
    "Title and Content",
    "Title Only",
    "Blank",
    "Picture with Caption",
    "Logo Footer",
];

pub const MASTER_TITLE_GEOMETRY: Geometry = Geometry {
    left: 457200,
    top: 274638,
    width: 8229600,
    height: 1143000,
};

pub const MASTER_BODY_GEOMETRY: Geometry = Geometry {
    left: 457200,
    top: 1600200,
    width: 8229600,
    height: 4525963,
};

pub const CONTENT_BODY_GEOMETRY: Geometry = Geometry {
    left: 457200,
    top: 1417638,
    width: 8229600,
    height: 4708525,
};

/// Logo placeholder on the "Logo Footer" layout: top 6.6 in, 0.5 in high.
pub const LOGO_GEOMETRY: Geometry = Geometry {
    left: 7772400,
    top: 6035040,
    width: 914400,
    height: 457200,
};

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const RT: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

fn xfrm(g: &Geometry) -> String {
    format!(
        r#"<p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm></p:spPr>"#,
        g.left, g.top, g.width, g.height
    )
}

/// A placeholder `p:sp`; `ph_attrs` is the attribute text of `p:ph`.
fn placeholder(id: u32, name: &str, ph_attrs: &str, geometry: Option<&Geometry>, text: Option<&str>) -> String {
    let sp_pr = geometry.map(xfrm).unwrap_or_else(|| "<p:spPr/>".to_string());
    let body = text
        .map(|t| {
            format!(
                r#"<p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US"/><a:t>{}</a:t></a:r></a:p></p:txBody>"#,
                t
            )
        })
        .unwrap_or_default();
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph {}/></p:nvPr></p:nvSpPr>{}{}</p:sp>"#,
        id, name, ph_attrs, sp_pr, body
    )
}

fn sp_tree(shapes: &[String]) -> String {
    format!(
        r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>{}</p:spTree>"#,
        shapes.concat()
    )
}

fn rels(entries: &[(&str, &str, &str)]) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{}">"#,
        REL_NS
    );
    for (r_id, reltype, target) in entries {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}/{}" Target="{}"/>"#,
            r_id, RT, reltype, target
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn master_xml() -> String {
    let shapes = vec![
        placeholder(2, "Title Placeholder 1", r#"type="title""#, Some(&MASTER_TITLE_GEOMETRY), Some("Master title")),
        placeholder(3, "Text Placeholder 2", r#"type="body" idx="1""#, Some(&MASTER_BODY_GEOMETRY), Some("Master text")),
        placeholder(
            4,
            "Date Placeholder 3",
            r#"type="dt" sz="half" idx="2""#,
            Some(&Geometry::new(457200, 6356350, 2133600, 365125)),
            None,
        ),
        placeholder(
            5,
            "Footer Placeholder 4",
            r#"type="ftr" sz="quarter" idx="3""#,
            Some(&Geometry::new(3124200, 6356350, 2895600, 365125)),
            None,
        ),
        placeholder(
            6,
            "Slide Number Placeholder 5",
            r#"type="sldNum" sz="quarter" idx="4""#,
            Some(&Geometry::new(6553200, 6356350, 2133600, 365125)),
            None,
        ),
    ];

    let layout_ids: String = (1..=LAYOUT_NAMES.len())
        .map(|n| format!(r#"<p:sldLayoutId id="{}" r:id="rId{}"/>"#, 2147483648u32 + n as u32, n))
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldMaster {}><p:cSld>{}</p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst>{}</p:sldLayoutIdLst></p:sldMaster>"#,
        NS,
        sp_tree(&shapes),
        layout_ids
    )
}

fn layout_shapes(index: usize) -> Vec<String> {
    let footers = || {
        vec![
            placeholder(4, "Date Placeholder 3", r#"type="dt" sz="half" idx="10""#, None, None),
            placeholder(5, "Footer Placeholder 4", r#"type="ftr" sz="quarter" idx="11""#, None, None),
            placeholder(6, "Slide Number Placeholder 5", r#"type="sldNum" sz="quarter" idx="12""#, None, None),
        ]
    };

    match index {
        0 => {
            let mut shapes = vec![
                placeholder(
                    2,
                    "Title 1",
                    r#"type="ctrTitle""#,
                    Some(&Geometry::new(685800, 2130425, 7772400, 1470025)),
                    Some("Click to edit Master title style"),
                ),
                placeholder(
                    3,
                    "Subtitle 2",
                    r#"type="subTitle" idx="1""#,
                    Some(&Geometry::new(1371600, 3886200, 6400800, 1752600)),
                    Some("Click to edit Master subtitle style"),
                ),
            ];
            shapes.extend(footers());
            shapes
        },
        1 => vec![
            placeholder(2, "Title 1", r#"type="title""#, None, None),
            placeholder(3, "Content Placeholder 2", r#"idx="1""#, Some(&CONTENT_BODY_GEOMETRY), None),
            placeholder(5, "Footer Placeholder 4", r#"type="ftr" sz="quarter" idx="11""#, None, None),
        ],
        2 => vec![placeholder(2, "Title 1", r#"type="title""#, None, None)],
        3 => footers(),
        4 => vec![
            placeholder(2, "Title 1", r#"type="title""#, None, None),
            placeholder(
                3,
                "Picture Placeholder 2",
                r#"type="pic" idx="1""#,
                Some(&Geometry::new(1792288, 612775, 5486400, 4114800)),
                None,
            ),
        ],
        _ => vec![
            placeholder(2, "Title 1", r#"type="title""#, None, None),
            placeholder(3, "Content Placeholder 2", r#"idx="1""#, None, None),
            placeholder(7, "Logo Placeholder 6", r#"type="pic" idx="13""#, Some(&LOGO_GEOMETRY), None),
        ],
    }
}

fn layout_xml(index: usize) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldLayout {} preserve="1"><p:cSld name="{}">{}</p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#,
        NS,
        LAYOUT_NAMES[index],
        sp_tree(&layout_shapes(index))
    )
}

fn slide_xml() -> String {
    let shapes = vec![placeholder(2, "Title 1", r#"type="ctrTitle""#, None, Some("Old deck"))];
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sld {}><p:cSld>{}</p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
        NS,
        sp_tree(&shapes)
    )
}

fn presentation_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation {} saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst><p:sldId id="256" r:id="rId2"/></p:sldIdLst><p:sldSz cx="9144000" cy="6858000" type="screen4x3"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#,
        NS
    )
}

const THEME_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme"><a:themeElements/></a:theme>"#;

fn content_types() -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>"#,
    );
    let overrides = [
        ("/ppt/presentation.xml", "presentationml.presentation.main+xml"),
        ("/ppt/slideMasters/slideMaster1.xml", "presentationml.slideMaster+xml"),
        ("/ppt/slides/slide1.xml", "presentationml.slide+xml"),
        ("/ppt/theme/theme1.xml", "theme+xml"),
    ];
    for (partname, suffix) in overrides {
        xml.push_str(&format!(
            r#"<Override PartName="{}" ContentType="application/vnd.openxmlformats-officedocument.{}"/>"#,
            partname, suffix
        ));
    }
    for n in 1..=LAYOUT_NAMES.len() {
        xml.push_str(&format!(
            r#"<Override PartName="/ppt/slideLayouts/slideLayout{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>"#,
            n
        ));
    }
    xml.push_str("</Types>");
    xml
}

/// Build the test template as `.pptx` bytes.
pub fn template_pptx() -> Vec<u8> {
    let mut members: Vec<(String, String)> = vec![
        ("[Content_Types].xml".into(), content_types()),
        ("_rels/.rels".into(), rels(&[("rId1", "officeDocument", "ppt/presentation.xml")])),
        ("ppt/presentation.xml".into(), presentation_xml()),
        (
            "ppt/_rels/presentation.xml.rels".into(),
            rels(&[
                ("rId1", "slideMaster", "slideMasters/slideMaster1.xml"),
                ("rId2", "slide", "slides/slide1.xml"),
                ("rId3", "theme", "theme/theme1.xml"),
            ]),
        ),
        ("ppt/slideMasters/slideMaster1.xml".into(), master_xml()),
        ("ppt/slides/slide1.xml".into(), slide_xml()),
        (
            "ppt/slides/_rels/slide1.xml.rels".into(),
            rels(&[("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")]),
        ),
        ("ppt/theme/theme1.xml".into(), THEME_XML.to_string()),
    ];

    let mut master_rels: Vec<(String, &str, String)> = (1..=LAYOUT_NAMES.len())
        .map(|n| (format!("rId{}", n), "slideLayout", format!("../slideLayouts/slideLayout{}.xml", n)))
        .collect();
    master_rels.push((
        format!("rId{}", LAYOUT_NAMES.len() + 1),
        "theme",
        "../theme/theme1.xml".to_string(),
    ));
    let master_rel_refs: Vec<(&str, &str, &str)> = master_rels
        .iter()
        .map(|(r_id, reltype, target)| (r_id.as_str(), *reltype, target.as_str()))
        .collect();
    members.push(("ppt/slideMasters/_rels/slideMaster1.xml.rels".into(), rels(&master_rel_refs)));

    for n in 1..=LAYOUT_NAMES.len() {
        members.push((format!("ppt/slideLayouts/slideLayout{}.xml", n), layout_xml(n - 1)));
        members.push((
            format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", n),
            rels(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]),
        ));
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in members {
        zip.start_file(name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// A 1×1 PNG.
pub fn tiny_png() -> Vec<u8> {
    png_of_size(1, 1)
}

/// An RGB PNG of the given pixel size.
pub fn png_of_size(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]));
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
    bytes.into_inner()
}
