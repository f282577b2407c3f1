//! Pull-parser plumbing shared by the response parsers.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fmt::Display;

use super::error::{FinanceError, Result};

pub(crate) fn malformed(e: impl Display) -> FinanceError {
    FinanceError::MalformedResponse(e.to_string())
}

/// Callbacks for [`walk`]. Names are local names, namespace prefixes stripped.
pub trait XmlVisitor {
    fn open(&mut self, _name: &str, _element: &BytesStart<'_>) -> Result<()> {
        Ok(())
    }

    /// Entity-unescaped character data (CDATA included), trimmed, never empty.
    fn text(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }

    fn close(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }
}

/// Walk a complete XML document, feeding its events to `visitor`.
///
/// The body must decode as UTF-8 and hold exactly one root element whose
/// tags are balanced; anything else is [`FinanceError::MalformedResponse`].
pub fn walk<V: XmlVisitor>(bytes: &[u8], visitor: &mut V) -> Result<()> {
    let xml = std::str::from_utf8(bytes)
        .map_err(|e| malformed(format!("response is not UTF-8: {e}")))?;
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut depth = 0usize;
    let mut roots = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                enter(&mut depth, &mut roots)?;
                let local = e.local_name();
                visitor.open(utf8_name(local.as_ref())?, &e)?;
            }
            Ok(Event::Empty(e)) => {
                enter(&mut depth, &mut roots)?;
                let local = e.local_name();
                let name = utf8_name(local.as_ref())?;
                visitor.open(name, &e)?;
                depth -= 1;
                visitor.close(name)?;
            }
            Ok(Event::End(e)) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| malformed("closing tag without matching opening tag"))?;
                let local = e.local_name();
                visitor.close(utf8_name(local.as_ref())?)?;
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(malformed)?;
                if text.is_empty() {
                    continue;
                }
                if depth == 0 {
                    return Err(malformed(format!("unexpected text outside of an element: {text:?}")));
                }
                visitor.text(&text)?;
            }
            Ok(Event::CData(e)) => {
                let text = std::str::from_utf8(&e).map_err(malformed)?.trim();
                if text.is_empty() {
                    continue;
                }
                if depth == 0 {
                    return Err(malformed("unexpected CDATA outside of an element"));
                }
                visitor.text(text)?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(malformed(format!(
                    "XML error at position {}: {e}",
                    reader.buffer_position()
                )));
            }
        }
    }

    if depth != 0 {
        return Err(malformed("unexpected end of document"));
    }
    if roots == 0 {
        return Err(malformed("document has no root element"));
    }
    Ok(())
}

fn enter(depth: &mut usize, roots: &mut usize) -> Result<()> {
    if *depth == 0 {
        *roots += 1;
        if *roots > 1 {
            return Err(malformed("document has more than one root element"));
        }
    }
    *depth += 1;
    Ok(())
}

fn utf8_name(raw: &[u8]) -> Result<&str> {
    std::str::from_utf8(raw).map_err(malformed)
}

/// Look up an attribute by local name, unescaping its value.
pub fn attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(malformed)?;
        if attr.key.local_name().as_ref() == name.as_bytes() {
            return Ok(Some(attr.unescape_value().map_err(malformed)?.into_owned()));
        }
    }
    Ok(None)
}

/// Character data directly inside the root element, whatever it is named.
///
/// Text of nested elements is ignored.
pub fn parse_string_element(bytes: &[u8]) -> Result<String> {
    #[derive(Default)]
    struct RootText {
        depth: usize,
        value: String,
    }

    impl XmlVisitor for RootText {
        fn open(&mut self, _name: &str, _element: &BytesStart<'_>) -> Result<()> {
            self.depth += 1;
            Ok(())
        }

        fn text(&mut self, text: &str) -> Result<()> {
            if self.depth == 1 {
                self.value.push_str(text);
            }
            Ok(())
        }

        fn close(&mut self, _name: &str) -> Result<()> {
            self.depth -= 1;
            Ok(())
        }
    }

    let mut root = RootText::default();
    walk(bytes, &mut root)?;
    Ok(root.value)
}
