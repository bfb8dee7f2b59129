//! XML text → [`Node`]

use crate::error::{DecodeError, DecodeResult};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use xdef_model::tag::{attribute_key, TEXT_MARKER};
use xdef_model::{Node, NodeMap};

/// Element being read
struct Frame {
    name: String,
    entries: NodeMap,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> DecodeResult<Self> {
        let name = utf8(start.name().as_ref())?.to_string();
        let mut entries = NodeMap::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| DecodeError::malformed(format!("in <{name}>: {e}")))?;
            let key = utf8(attr.key.as_ref())?;
            let value = attr.unescape_value()?;
            entries.insert(attribute_key(key), Node::text(value));
        }
        Ok(Self {
            name,
            entries,
            text: String::new(),
        })
    }

    /// Text-only elements become `Text`; anything with attributes or
    /// children becomes a `Map`, text kept under `#text`.
    fn close(self) -> (String, Node) {
        if self.entries.is_empty() {
            return (self.name, Node::Text(self.text));
        }
        let mut entries = self.entries;
        if !self.text.is_empty() {
            entries.insert(TEXT_MARKER.to_string(), Node::Text(self.text));
        }
        (self.name, Node::Map(entries))
    }
}

fn utf8(bytes: &[u8]) -> DecodeResult<&str> {
    std::str::from_utf8(bytes).map_err(|e| DecodeError::malformed(e.to_string()))
}

/// Repeated child names collect into a `List`
fn append_child(entries: &mut NodeMap, name: String, child: Node) {
    match entries.get_mut(&name) {
        None => {
            entries.insert(name, child);
        }
        Some(Node::List(items)) => items.push(child),
        Some(existing) => {
            let first = std::mem::replace(existing, Node::List(Vec::new()));
            *existing = Node::List(vec![first, child]);
        }
    }
}

/// Parse a document into a map of its top-level elements
///
/// Text is trimmed and unescaped, CDATA sections are merged into the
/// element text, declarations, comments and processing instructions are
/// skipped. Top-level elements are at depth 1.
///
/// # Errors
/// - [`DecodeError::MalformedDocument`] for anything that is not a
///   well-formed XML document with at least one element
/// - [`DecodeError::TooDeep`] once an element opens below `max_depth`
pub fn parse(xml: &str, max_depth: usize) -> DecodeResult<Node> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut top = NodeMap::new();

    let mut finish = |stack: &mut Vec<Frame>, frame: Frame| {
        let (name, node) = frame.close();
        match stack.last_mut() {
            Some(parent) => append_child(&mut parent.entries, name, node),
            None => append_child(&mut top, name, node),
        }
    };

    loop {
        let event = reader.read_event()?;
        if matches!(event, Event::Start(_) | Event::Empty(_)) && stack.len() >= max_depth {
            return Err(DecodeError::TooDeep { max: max_depth });
        }
        match event {
            Event::Start(start) => stack.push(Frame::open(&start)?),
            Event::Empty(start) => {
                let frame = Frame::open(&start)?;
                finish(&mut stack, frame);
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| DecodeError::malformed("closing tag without opening tag"))?;
                finish(&mut stack, frame);
            }
            Event::Text(text) => {
                let Some(frame) = stack.last_mut() else {
                    return Err(DecodeError::malformed("text outside of any element"));
                };
                frame.text.push_str(&text.unescape()?);
            }
            Event::CData(data) => {
                let Some(frame) = stack.last_mut() else {
                    return Err(DecodeError::malformed("CDATA outside of any element"));
                };
                frame.text.push_str(utf8(&data.into_inner())?);
            }
            Event::Eof => break,
            // declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(DecodeError::malformed(format!("unclosed element <{}>", open.name)));
    }
    if top.is_empty() {
        return Err(DecodeError::malformed("document has no element"));
    }
    Ok(Node::Map(top))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use xdef_model::tag::{ITEM_MARKER, KIND_MARKER};

    const DEPTH: usize = 64;

    fn parse(xml: &str) -> DecodeResult<Node> {
        super::parse(xml, DEPTH)
    }

    fn nested(depth: usize) -> String {
        format!("{}x{}", "<a>".repeat(depth), "</a>".repeat(depth))
    }

    fn root(node: &Node) -> &Node {
        node.as_map().and_then(|m| m.get("root")).unwrap()
    }

    #[test]
    fn text_elements_and_attributes() {
        let doc = parse(r#"<root><a>1</a><b type="null"/><c/></root>"#).unwrap();
        let root = root(&doc).as_map().unwrap();
        assert_eq!(root.get("a"), Some(&Node::text("1")));
        assert_eq!(root.get("b"), Some(&Node::null_placeholder()));
        assert_eq!(root.get("c"), Some(&Node::text("")));
    }

    #[test]
    fn repeated_elements_become_list() {
        let doc = parse(
            "<root><v type=\"array\"><_ITEM_>x</_ITEM_><_ITEM_>y</_ITEM_><_ITEM_>z</_ITEM_></v></root>",
        )
        .unwrap();
        let v = root(&doc).as_map().unwrap().get("v").unwrap().as_map().unwrap();
        assert_eq!(v.get(KIND_MARKER), Some(&Node::text("array")));
        assert_eq!(
            v.get(ITEM_MARKER),
            Some(&Node::List(vec![Node::text("x"), Node::text("y"), Node::text("z")]))
        );
    }

    #[test]
    fn whitespace_trimmed_and_entities_unescaped() {
        let doc = parse("<?xml version=\"1.0\"?>\n<root>\n  <a>  x &amp; y &lt;z&gt;  </a>\n  <!-- note -->\n</root>\n")
            .unwrap();
        assert_eq!(root(&doc).as_map().unwrap().get("a"), Some(&Node::text("x & y <z>")));
    }

    #[test]
    fn cdata_merges_into_text() {
        let doc = parse("<root><definition><![CDATA[{\"a\":\"<b>\"}]]></definition></root>").unwrap();
        assert_eq!(
            root(&doc).as_map().unwrap().get("definition"),
            Some(&Node::text("{\"a\":\"<b>\"}"))
        );
    }

    #[test]
    fn text_beside_children_kept_under_text_marker() {
        let doc = parse(r#"<root><b type="boolean">true</b></root>"#).unwrap();
        let b = root(&doc).as_map().unwrap().get("b").unwrap();
        assert_eq!(b.as_map().unwrap().get(TEXT_MARKER), Some(&Node::text("true")));
    }

    #[test]
    fn empty_root_is_text() {
        let doc = parse("<root></root>").unwrap();
        assert_eq!(root(&doc), &Node::text(""));
    }

    #[test]
    fn malformed_documents() {
        for xml in [
            "",
            "   ",
            "<root><a></root>",
            "<root><a>1</a>",
            "</root>",
            "garbage",
            "<root a=\"1></root>",
            "<root>&bogus;</root>",
        ] {
            assert!(
                matches!(parse(xml), Err(DecodeError::MalformedDocument { .. })),
                "{xml:?} should be malformed"
            );
        }
    }

    #[test]
    fn nesting_depth_is_bounded() {
        assert!(super::parse(&nested(5), 5).is_ok());
        assert!(matches!(super::parse(&nested(6), 5), Err(DecodeError::TooDeep { max: 5 })));
        assert!(matches!(
            super::parse("<a><b><c/></b></a>", 2),
            Err(DecodeError::TooDeep { max: 2 })
        ));
    }

    #[test]
    fn very_deep_document_fails_without_recursing() {
        let xml = nested(200_000);
        assert!(matches!(parse(&xml), Err(DecodeError::TooDeep { max: DEPTH })));
    }
}
