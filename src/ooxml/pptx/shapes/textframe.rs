/// Text frames: the `p:txBody` of a shape, as a list of paragraphs.
use crate::common::unit::pt_to_centipoints;
use crate::common::xml::escape_xml;
use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, Event};
use std::fmt::Write as FmtWrite;

/// A text frame containing paragraphs.
///
/// Used both for text read from existing slide parts and for text about to
/// be written into new ones.
///
/// # Examples
///
/// ```rust,ignore
/// let frame = TextFrame::from_text("First\nSecond");
/// assert_eq!(frame.paragraphs().len(), 2);
/// assert_eq!(frame.text(), "First\nSecond");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextFrame {
    paragraphs: Vec<Paragraph>,
}

/// A paragraph (`a:p`) with its outline level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub text: String,
    pub level: u32,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: 0,
        }
    }
}

impl TextFrame {
    /// An empty frame; serializes as a single empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_paragraphs(paragraphs: Vec<Paragraph>) -> Self {
        Self { paragraphs }
    }

    /// Plain text where each line feed starts a new paragraph.
    pub fn from_text(text: &str) -> Self {
        Self {
            paragraphs: text.split('\n').map(Paragraph::new).collect(),
        }
    }

    #[inline]
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// All paragraph text joined with line feeds.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// True when the frame holds no visible characters.
    pub fn is_blank(&self) -> bool {
        self.paragraphs.iter().all(|p| p.text.trim().is_empty())
    }

    /// Parse the paragraphs of a `p:txBody` (or `a:txBody`) element.
    ///
    /// `reader` must be positioned just after the element's start tag; it is
    /// left just after the matching end tag.
    pub(crate) fn read_body(reader: &mut Reader<&[u8]>) -> Result<Self> {
        let mut paragraphs = Vec::new();
        let mut current: Option<Paragraph> = None;
        let mut in_text = false;
        let mut depth = 1usize;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    depth += 1;
                    match e.local_name().as_ref() {
                        b"p" => current = Some(Paragraph::default()),
                        b"pPr" => {
                            if let Some(para) = current.as_mut() {
                                para.level = level_attr(&e)?;
                            }
                        },
                        b"t" => in_text = true,
                        b"br" => {
                            if let Some(para) = current.as_mut() {
                                para.text.push('\u{b}');
                            }
                        },
                        _ => {},
                    }
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"p" => paragraphs.push(Paragraph::default()),
                    b"pPr" => {
                        if let Some(para) = current.as_mut() {
                            para.level = level_attr(&e)?;
                        }
                    },
                    b"br" => {
                        if let Some(para) = current.as_mut() {
                            para.text.push('\u{b}');
                        }
                    },
                    _ => {},
                },
                Event::Text(e) if in_text => {
                    if let Some(para) = current.as_mut() {
                        para.text.push_str(std::str::from_utf8(&e)?);
                    }
                },
                Event::CData(e) if in_text => {
                    if let Some(para) = current.as_mut() {
                        para.text.push_str(std::str::from_utf8(&e)?);
                    }
                },
                Event::GeneralRef(e) if in_text => {
                    if let Some(para) = current.as_mut() {
                        push_general_ref(&mut para.text, &e)?;
                    }
                },
                Event::End(e) => {
                    depth -= 1;
                    match e.local_name().as_ref() {
                        b"t" => in_text = false,
                        b"p" => {
                            if let Some(para) = current.take() {
                                paragraphs.push(para);
                            }
                        },
                        _ => {},
                    }
                    if depth == 0 {
                        break;
                    }
                },
                Event::Eof => {
                    return Err(OoxmlError::Xml("unterminated txBody".to_string()));
                },
                _ => {},
            }
        }

        Ok(Self { paragraphs })
    }

    /// Write this frame as a `p:txBody` element.
    ///
    /// `font_pt` sets the run size of every paragraph; `None` leaves the
    /// size to the inherited list style.
    pub(crate) fn write_body(
        &self,
        xml: &mut String,
        body_pr: &str,
        font_pt: Option<f64>,
    ) -> Result<()> {
        xml.push_str("<p:txBody>");
        xml.push_str(body_pr);
        xml.push_str("<a:lstStyle/>");

        if self.paragraphs.is_empty() {
            xml.push_str("<a:p/>");
        }

        for para in &self.paragraphs {
            xml.push_str("<a:p>");
            if para.level > 0 {
                write!(xml, r#"<a:pPr lvl="{}"/>"#, para.level)
                    .map_err(|e| OoxmlError::Xml(e.to_string()))?;
            }
            if !para.text.is_empty() {
                let mut run_pr = String::from(r#"<a:rPr lang="en-US" dirty="0""#);
                if let Some(size) = font_pt {
                    write!(run_pr, r#" sz="{}""#, pt_to_centipoints(size))
                        .map_err(|e| OoxmlError::Xml(e.to_string()))?;
                }
                run_pr.push_str("/>");

                // Vertical tabs and newlines inside a paragraph are soft line breaks
                for (i, segment) in para.text.split(['\n', '\u{b}']).enumerate() {
                    if i > 0 {
                        write!(xml, "<a:br>{}</a:br>", run_pr)
                            .map_err(|e| OoxmlError::Xml(e.to_string()))?;
                    }
                    let segment = segment.strip_suffix('\r').unwrap_or(segment);
                    if segment.is_empty() {
                        continue;
                    }
                    write!(
                        xml,
                        "<a:r>{}<a:t>{}</a:t></a:r>",
                        run_pr,
                        escape_xml(segment)
                    )
                    .map_err(|e| OoxmlError::Xml(e.to_string()))?;
                }
            } else if let Some(size) = font_pt {
                write!(
                    xml,
                    r#"<a:endParaRPr lang="en-US" sz="{}" dirty="0"/>"#,
                    pt_to_centipoints(size)
                )
                .map_err(|e| OoxmlError::Xml(e.to_string()))?;
            }
            xml.push_str("</a:p>");
        }

        xml.push_str("</p:txBody>");
        Ok(())
    }
}

/// `lvl` attribute of an `a:pPr`, 0 when absent.
fn level_attr(e: &quick_xml::events::BytesStart<'_>) -> Result<u32> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == b"lvl" {
            return Ok(atoi_simd::parse::<u32, false, false>(&attr.value).unwrap_or(0));
        }
    }
    Ok(0)
}

/// Append the text a general entity reference (`&amp;`, `&#169;`) stands for.
pub(crate) fn push_general_ref(out: &mut String, reference: &BytesRef<'_>) -> Result<()> {
    if let Some(ch) = reference.resolve_char_ref()? {
        out.push(ch);
        return Ok(());
    }

    let name = std::str::from_utf8(reference)?;
    match resolve_predefined_entity(name) {
        Some(resolved) => out.push_str(resolved),
        None => {
            out.push('&');
            out.push_str(name);
            out.push(';');
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(xml: &str) -> TextFrame {
        let mut reader = Reader::from_reader(xml.as_bytes());
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) if e.local_name().as_ref() == b"txBody" => break,
                Event::Eof => panic!("no txBody"),
                _ => {},
            }
        }
        TextFrame::read_body(&mut reader).unwrap()
    }

    #[test]
    fn test_read_paragraphs_and_levels() {
        let frame = read(
            r#"<p:txBody><a:bodyPr/><a:lstStyle/>
                <a:p><a:r><a:t>First</a:t></a:r></a:p>
                <a:p><a:pPr lvl="2"/><a:r><a:t>Sec</a:t></a:r><a:r><a:t>ond</a:t></a:r></a:p>
                <a:p/>
            </p:txBody>"#,
        );

        assert_eq!(frame.paragraphs().len(), 3);
        assert_eq!(frame.paragraphs()[0], Paragraph::new("First"));
        assert_eq!(frame.paragraphs()[1].text, "Second");
        assert_eq!(frame.paragraphs()[1].level, 2);
        assert_eq!(frame.text(), "First\nSecond\n");
    }

    #[test]
    fn test_read_resolves_entities() {
        let frame = read(
            r#"<p:txBody><a:p><a:r><a:t>&#169; 2020 Harris &amp; Co &lt;x&gt;</a:t></a:r></a:p></p:txBody>"#,
        );
        assert_eq!(frame.text(), "© 2020 Harris & Co <x>");
    }

    #[test]
    fn test_blank_frame() {
        assert!(TextFrame::new().is_blank());
        assert!(TextFrame::from_text("  \n ").is_blank());
        assert!(!TextFrame::from_text("x").is_blank());
    }

    #[test]
    fn test_write_body() {
        let frame = TextFrame::from_paragraphs(vec![Paragraph::new("a & b"), Paragraph::new("")]);
        let mut xml = String::new();
        frame.write_body(&mut xml, "<a:bodyPr/>", Some(9.0)).unwrap();

        assert!(xml.starts_with("<p:txBody><a:bodyPr/><a:lstStyle/>"));
        assert!(xml.contains(r#"<a:rPr lang="en-US" dirty="0" sz="900"/><a:t>a &amp; b</a:t>"#));
        assert!(xml.contains(r#"<a:endParaRPr lang="en-US" sz="900" dirty="0"/>"#));
        assert_eq!(xml.matches("<a:p>").count(), 2);
    }

    #[test]
    fn test_write_soft_line_breaks() {
        let frame = TextFrame::from_paragraphs(vec![Paragraph::new("Line one\u{b}Line two\r\nLine three")]);
        let mut xml = String::new();
        frame.write_body(&mut xml, "<a:bodyPr/>", None).unwrap();

        assert!(!xml.contains('\u{b}'));
        assert!(!xml.contains('\n'));
        assert_eq!(xml.matches(r#"<a:br><a:rPr lang="en-US" dirty="0"/></a:br>"#).count(), 2);
        assert_eq!(xml.matches("<a:r>").count(), 3);
        assert_eq!(xml.matches("<a:p>").count(), 1);

        let reread = read(&xml);
        assert_eq!(reread.paragraphs().len(), 1);
        assert_eq!(reread.paragraphs()[0].text, "Line one\u{b}Line two\u{b}Line three");
    }

    #[test]
    fn test_write_empty_frame() {
        let mut xml = String::new();
        TextFrame::new().write_body(&mut xml, "<a:bodyPr/>", None).unwrap();
        assert_eq!(xml, "<p:txBody><a:bodyPr/><a:lstStyle/><a:p/></p:txBody>");
    }
}
