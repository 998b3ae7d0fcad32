//! Decoding of XML response bodies into JSON-like values.
//!
//! The mapping matches how the server's responses are
//! commonly consumed:
//!
//! - an element holding only text becomes a string
//! - an empty element becomes `""`
//! - an element with child elements becomes an object keyed by child name
//! - a child name seen more than once becomes an array, in document order
//!
//! This loses cardinality (zero, one and many children all look different),
//! which [`crate::meeting::Cardinality`] resolves afterwards.

use quick_xml::Reader;
use quick_xml::events::Event;
use serde_json::{Map, Value};

use crate::error::{BbbError, BbbResult};

struct Frame {
    name: String,
    children: Map<String, Value>,
    text: String,
}

impl Frame {
    fn new(name: String) -> Self {
        Self {
            name,
            children: Map::new(),
            text: String::new(),
        }
    }

    fn into_value(self) -> (String, Value) {
        let value = if self.children.is_empty() {
            Value::String(self.text.trim().to_string())
        } else {
            Value::Object(self.children)
        };
        (self.name, value)
    }
}

/// Decodes an XML document into `{ <root name>: <root value> }`.
///
/// # Errors
///
/// Returns [`BbbError::MalformedResponse`] if the document is not
/// well-formed or has no root element.
pub fn decode(xml: &str) -> BbbResult<Value> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = local_name(&String::from_utf8_lossy(e.name().as_ref())).to_string();
                stack.push(Frame::new(name));
            }
            Ok(Event::Empty(e)) => {
                let name = local_name(&String::from_utf8_lossy(e.name().as_ref())).to_string();
                attach(&mut stack, &mut root, name, Value::String(String::new()))?;
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| BbbError::malformed(format!("invalid XML text: {}", err)))?;
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::End(_)) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| BbbError::malformed("unbalanced XML end tag"))?;
                let (name, value) = frame.into_value();
                attach(&mut stack, &mut root, name, value)?;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(BbbError::malformed(format!(
                    "invalid XML at position {}: {}",
                    reader.error_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(BbbError::malformed("unexpected end of XML document"));
    }

    let (name, value) = root.ok_or_else(|| BbbError::malformed("XML document has no root"))?;
    let mut document = Map::new();
    document.insert(name, value);
    Ok(Value::Object(document))
}

/// Attaches a finished element to its parent, or makes it the root.
fn attach(
    stack: &mut [Frame],
    root: &mut Option<(String, Value)>,
    name: String,
    value: Value,
) -> BbbResult<()> {
    let Some(parent) = stack.last_mut() else {
        if root.is_some() {
            return Err(BbbError::malformed("XML document has more than one root"));
        }
        *root = Some((name, value));
        return Ok(());
    };

    match parent.children.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            parent.children.insert(name, value);
        }
    }
    Ok(())
}

/// Extracts the local name from a potentially namespaced element name.
fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}
