//! [`Node`] → XML text

use quick_xml::escape::escape;
use xdef_model::tag::{attribute_name, CDATA_MARKER, TEXT_MARKER};
use xdef_model::Node;

/// Layout of serialized documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// One element per line, children indented
    pub pretty: bool,
    /// Spaces per level when pretty
    pub indent: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: 2,
        }
    }
}

/// Serialize a map of top-level elements
///
/// `@_`-prefixed keys become attributes, `#text` becomes element text,
/// `__cdata` becomes a CDATA section, `List` values become repeated
/// elements. Empty elements are written as `<x></x>`.
#[must_use]
pub fn serialize(node: &Node, options: &WriteOptions) -> String {
    let mut writer = XmlWriter {
        options,
        out: String::new(),
    };
    match node {
        Node::Map(elements) => {
            for (name, child) in elements {
                writer.element(name, child, 0);
            }
        }
        Node::List(items) => {
            for item in items {
                writer.out.push_str(&serialize(item, options));
            }
        }
        Node::Text(text) => writer.out.push_str(&escape(text.as_str())),
    }
    writer.out
}

struct XmlWriter<'a> {
    options: &'a WriteOptions,
    out: String,
}

impl XmlWriter<'_> {
    fn indent(&mut self, depth: usize) {
        if self.options.pretty {
            self.out.extend(std::iter::repeat(' ').take(self.options.indent * depth));
        }
    }

    fn newline(&mut self) {
        if self.options.pretty {
            self.out.push('\n');
        }
    }

    fn element(&mut self, name: &str, node: &Node, depth: usize) {
        match node {
            Node::List(items) => {
                for item in items {
                    self.element(name, item, depth);
                }
            }
            Node::Text(text) => {
                self.indent(depth);
                self.open(name, "");
                self.out.push_str(&escape(text.as_str()));
                self.close(name);
                self.newline();
            }
            Node::Map(entries) => {
                let mut attributes = String::new();
                let mut text = None;
                let mut cdata = None;
                let mut children = Vec::new();
                for (key, value) in entries {
                    if let Some(attr) = attribute_name(key) {
                        match value.as_text() {
                            Some(v) => {
                                attributes.push_str(&format!(" {attr}=\"{}\"", escape(v)));
                            }
                            None => tracing::warn!(element = name, attribute = attr, "non-text attribute skipped"),
                        }
                    } else if key == TEXT_MARKER {
                        text = value.as_text();
                    } else if key == CDATA_MARKER {
                        cdata = value.as_text();
                    } else {
                        children.push((key, value));
                    }
                }

                self.indent(depth);
                self.open(name, &attributes);
                if children.is_empty() {
                    self.leaf_content(text, cdata);
                    self.close(name);
                    self.newline();
                    return;
                }

                self.newline();
                if text.is_some() || cdata.is_some() {
                    self.indent(depth + 1);
                    self.leaf_content(text, cdata);
                    self.newline();
                }
                for (key, child) in children {
                    self.element(key, child, depth + 1);
                }
                self.indent(depth);
                self.close(name);
                self.newline();
            }
        }
    }

    fn leaf_content(&mut self, text: Option<&str>, cdata: Option<&str>) {
        if let Some(text) = text {
            self.out.push_str(&escape(text));
        }
        if let Some(cdata) = cdata {
            self.out.push_str("<![CDATA[");
            self.out.push_str(&cdata.replace("]]>", "]]]]><![CDATA[>"));
            self.out.push_str("]]>");
        }
    }

    fn open(&mut self, name: &str, attributes: &str) {
        self.out.push('<');
        self.out.push_str(name);
        self.out.push_str(attributes);
        self.out.push('>');
    }

    fn close(&mut self, name: &str) {
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
    }
}
