//! Parsed content documents.
//!
//! Content documents are parsed leniently with html5ever (XHTML included)
//! into an arena [`Dom`]. Script and style subtrees are detached on load so
//! they can never leak into extracted article bodies.

mod arena;
mod serialize;
mod tree_sink;

use std::path::Path;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

pub use arena::{Attribute, ChildrenIter, Dom, FlatNode, Node, NodeData, NodeId, heading_level};
pub use serialize::{escape_html, escape_text, serialize_node};
pub use tree_sink::DomSink;

use crate::error::Result;
use crate::util::{decode_text, xml_encoding_hint};

/// Elements whose subtrees never contribute content.
const STRIPPED_TAGS: &[&str] = &["script", "style"];

/// Parse markup into a DOM with script/style subtrees removed.
pub fn parse_html(html: &str) -> Dom {
    let sink = DomSink::new();
    let mut dom = parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_dom();
    dom.detach_tags(STRIPPED_TAGS);
    dom
}

/// Decode raw document bytes and parse them.
pub fn parse_bytes(bytes: &[u8]) -> Dom {
    let text = decode_text(bytes, xml_encoding_hint(bytes).as_deref());
    parse_html(&text)
}

/// Read and parse a content document from disk.
pub fn load_document(path: &Path) -> Result<Dom> {
    let bytes = std::fs::read(path)?;
    Ok(parse_bytes(&bytes))
}
