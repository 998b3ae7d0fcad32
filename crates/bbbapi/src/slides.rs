//! Presentation slides uploaded with `create`.
//!
//! Slides are sent as a `<modules>` XML document in the body of a POST to
//! the signed `create` URL. Attribute values are XML-escaped.

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

use crate::error::{BbbError, BbbResult};

/// A document the server should download and preload for a meeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    /// Where the server fetches the document from.
    pub url: String,
    /// File name shown in the presentation pod.
    pub filename: String,
}

impl Slide {
    /// Creates a new slide.
    pub fn new(url: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            filename: filename.into(),
        }
    }
}

/// Serializes slides into a presentation module document.
///
/// ```text
/// <?xml version="1.0"?>
/// <modules><module name="presentation"><document url=".." filename=".."/></module></modules>
/// ```
pub fn encode_slide_document(slides: &[Slide]) -> BbbResult<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    write(&mut writer, Event::Decl(BytesDecl::new("1.0", None, None)))?;
    write(&mut writer, Event::Start(BytesStart::new("modules")))?;

    let mut module = BytesStart::new("module");
    module.push_attribute(("name", "presentation"));
    write(&mut writer, Event::Start(module))?;

    for slide in slides {
        let mut document = BytesStart::new("document");
        document.push_attribute(("url", slide.url.as_str()));
        document.push_attribute(("filename", slide.filename.as_str()));
        write(&mut writer, Event::Empty(document))?;
    }

    write(&mut writer, Event::End(BytesEnd::new("module")))?;
    write(&mut writer, Event::End(BytesEnd::new("modules")))?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|e| BbbError::Encode(e.to_string()))
}

fn write(writer: &mut Writer<Cursor<Vec<u8>>>, event: Event<'_>) -> BbbResult<()> {
    writer
        .write_event(event)
        .map_err(|e| BbbError::Encode(format!("failed to write slide document: {}", e)))
}
