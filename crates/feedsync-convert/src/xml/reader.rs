//! XML text -> [`XmlDocument`]

use feedsync_common::{FeedError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::tree::{XmlDocument, XmlElement};

/// Parse raw XML text into an element tree.
///
/// Fails with [`FeedError::Parse`] when the text is not well-formed, has no
/// root element, or has more than one. Comments, processing instructions and
/// the declaration are dropped.
///
/// Leaf text is kept exactly as written, surrounding spaces included. Text of
/// an element that has child elements is trimmed, so indentation between
/// children never shows up as content.
pub fn parse(raw: &str) -> Result<XmlDocument> {
    let mut reader = Reader::from_str(raw);

    let mut open: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let position = reader.buffer_position();
        match reader.read_event() {
            Ok(Event::Start(start)) => open.push(open_element(&start)?),
            Ok(Event::Empty(start)) => {
                let element = open_element(&start)?;
                close_element(element, &mut open, &mut root)?;
            },
            Ok(Event::End(end)) => {
                let element = open.pop().ok_or_else(|| {
                    FeedError::parse(format!(
                        "unexpected closing tag </{}> at byte {}",
                        String::from_utf8_lossy(end.name().as_ref()),
                        position
                    ))
                })?;
                close_element(element, &mut open, &mut root)?;
            },
            Ok(Event::Text(text)) => {
                let value = text
                    .unescape()
                    .map_err(|e| FeedError::parse(format!("bad character data at byte {}: {}", position, e)))?;
                append_text(&mut open, &value, position)?;
            },
            Ok(Event::CData(cdata)) => {
                let value = std::str::from_utf8(cdata.as_ref())
                    .map_err(|e| FeedError::parse(format!("CDATA is not UTF-8 at byte {}: {}", position, e)))?;
                append_text(&mut open, value, position)?;
            },
            Ok(Event::Eof) => break,
            Ok(_) => {},
            Err(e) => {
                return Err(FeedError::parse(format!(
                    "malformed XML at byte {}: {}",
                    reader.buffer_position(),
                    e
                )))
            },
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(FeedError::parse(format!(
            "unexpected end of document, <{}> is not closed",
            unclosed.name
        )));
    }

    root.map(XmlDocument::new)
        .ok_or_else(|| FeedError::parse("document has no root element"))
}

fn open_element(start: &BytesStart<'_>) -> Result<XmlElement> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| FeedError::parse(format!("element name is not UTF-8: {}", e)))?
        .to_string();

    let mut element = XmlElement::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| {
            FeedError::parse(format!("bad attribute on <{}>: {}", element.name, e))
        })?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| FeedError::parse(format!("attribute name is not UTF-8: {}", e)))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| FeedError::parse(format!("bad value for attribute '{}': {}", key, e)))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn close_element(
    mut element: XmlElement,
    open: &mut [XmlElement],
    root: &mut Option<XmlElement>,
) -> Result<()> {
    if !element.children.is_empty() && element.text.len() != element.text.trim().len() {
        element.text = element.text.trim().to_string();
    }

    match open.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        },
        None if root.is_some() => Err(FeedError::parse(format!(
            "second root element <{}> after the document root",
            element.name
        ))),
        None => {
            *root = Some(element);
            Ok(())
        },
    }
}

fn append_text(open: &mut [XmlElement], value: &str, position: impl std::fmt::Display) -> Result<()> {
    match open.last_mut() {
        Some(element) => {
            element.text.push_str(value);
            Ok(())
        },
        None if value.trim().is_empty() => Ok(()),
        None => Err(FeedError::parse(format!(
            "text outside the root element at byte {}",
            position
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_attributes_children_and_text_apart() {
        let doc = parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <Root version="2">
                <!-- supplier export -->
                <Ozellik Tanim="Renk" Deger="Mavi">inline</Ozellik>
                <Aciklama><![CDATA[<b>Pamuk</b> &amp; keten]]></Aciklama>
                <Marka>Ali &amp; Veli</Marka>
                <Bos/>
            </Root>"#,
        )
        .unwrap();

        let root = &doc.root;
        assert_eq!(root.name, "Root");
        assert_eq!(root.attribute("version"), Some("2"));
        assert_eq!(root.children.len(), 4);
        assert_eq!(root.text, "");

        let attr = root.child("Ozellik").unwrap();
        assert_eq!(attr.attribute("Tanim"), Some("Renk"));
        assert_eq!(attr.attribute("Deger"), Some("Mavi"));
        assert_eq!(attr.text, "inline");

        assert_eq!(root.child_text("Aciklama"), Some("<b>Pamuk</b> &amp; keten"));
        assert_eq!(root.child_text("Marka"), Some("Ali & Veli"));
        assert!(root.child("Bos").unwrap().is_empty());
    }

    #[test]
    fn test_leaf_text_is_kept_verbatim() {
        let doc = parse("<a>\n  <b> spaced value </b>\n  <c>   </c>\n</a>").unwrap();
        assert_eq!(doc.root.text, "");
        assert_eq!(doc.root.child_text("b"), Some(" spaced value "));
        assert_eq!(doc.root.child_text("c"), Some("   "));
    }

    #[test]
    fn test_indentation_between_children_is_dropped() {
        let doc = parse("<Resimler>\n\t<Resim>a.jpg</Resim>\n\t<Resim>b.jpg</Resim>\n</Resimler>\n").unwrap();
        assert_eq!(doc.root.text, "");
        assert_eq!(doc.root.children.len(), 2);
    }

    #[test]
    fn test_mismatched_tags_are_rejected() {
        let err = parse("<Root><Urun></Root>").unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn test_unclosed_document_is_rejected() {
        let err = parse("<Root><Urunler><Urun>").unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(parse("").unwrap_err(), FeedError::Parse(_)));
        assert!(matches!(parse("   \n ").unwrap_err(), FeedError::Parse(_)));
    }

    #[test]
    fn test_second_root_is_rejected() {
        let err = parse("<a/><b/>").unwrap_err();
        assert!(matches!(err, FeedError::Parse(ref msg) if msg.contains("second root")), "got {err:?}");
    }

    #[test]
    fn test_stray_text_is_rejected() {
        assert!(matches!(parse("not xml at all").unwrap_err(), FeedError::Parse(_)));
    }
}
