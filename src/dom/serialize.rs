//! HTML serialization of arena subtrees.

use super::arena::{Dom, NodeData, NodeId};

/// Elements that never have children or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Serialize a node and its subtree into `out`.
///
/// `rewrite_attr` sees every attribute as `(local name, value)` and may
/// return a replacement value.
pub fn serialize_node<F>(dom: &Dom, id: NodeId, out: &mut String, rewrite_attr: &F)
where
    F: Fn(&str, &str) -> Option<String>,
{
    let Some(node) = dom.get(id) else {
        return;
    };

    match &node.data {
        NodeData::Text(text) => out.push_str(&escape_text(text)),
        NodeData::Element { name, attrs, .. } => {
            let tag = name.local.as_ref();
            out.push('<');
            out.push_str(tag);
            for attr in attrs {
                let value = rewrite_attr(attr.name.local.as_ref(), &attr.value)
                    .unwrap_or_else(|| attr.value.clone());
                out.push(' ');
                out.push_str(&attr.qualified_name());
                out.push_str("=\"");
                out.push_str(&escape_html(&value));
                out.push('"');
            }

            if VOID_ELEMENTS.contains(&tag) {
                out.push_str("/>");
                return;
            }

            out.push('>');
            for child in dom.children(id) {
                serialize_node(dom, child, out, rewrite_attr);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        NodeData::Document => {
            for child in dom.children(id) {
                serialize_node(dom, child, out, rewrite_attr);
            }
        }
        NodeData::Comment(_) | NodeData::Doctype => {}
    }
}

/// Escape text node content.
pub fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape text for attribute values and template interpolation.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
