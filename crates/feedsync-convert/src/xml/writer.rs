//! [`XmlDocument`] -> XML text

use feedsync_common::{FeedError, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::tree::{XmlDocument, XmlElement};

const INDENT_WIDTH: usize = 2;

/// Serialize a document with an XML declaration and two-space indentation.
///
/// Leaf text stays on the same line as its tags and empty elements are
/// self-closing, so the output parses back to an equal tree.
pub fn serialize(doc: &XmlDocument) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_WIDTH);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(write_failed)?;
    write_element(&mut writer, &doc.root)?;

    String::from_utf8(writer.into_inner())
        .map_err(|e| FeedError::transform(format!("serialized XML is not UTF-8: {}", e)))
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() && element.text.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(write_failed);
    }

    writer.write_event(Event::Start(start)).map_err(write_failed)?;
    if !element.text.is_empty() {
        writer
            .write_event(Event::Text(BytesText::new(&element.text)))
            .map_err(write_failed)?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(write_failed)
}

fn write_failed(e: impl std::fmt::Display) -> FeedError {
    FeedError::transform(format!("failed to write XML: {}", e))
}
