//! Package document parsing (container.xml and OPF).

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Error, Result};
use crate::util::strip_bom;

/// The parts of an OPF package document the reading order needs.
#[derive(Debug, Default)]
pub struct PackageDocument {
    pub title: Option<String>,
    /// Maps manifest id -> href
    pub manifest: HashMap<String, String>,
    /// `itemref idref` values in spine order.
    pub spine_ids: Vec<String>,
}

impl PackageDocument {
    /// Hrefs of the spine in reading order. Idrefs missing from the
    /// manifest are skipped.
    pub fn spine_hrefs(&self) -> impl Iterator<Item = &str> {
        self.spine_ids
            .iter()
            .filter_map(|id| self.manifest.get(id))
            .map(String::as_str)
    }
}

/// Parse META-INF/container.xml to find the OPF path.
pub fn parse_container_xml(bytes: &[u8]) -> Result<String> {
    let content = String::from_utf8(strip_bom(bytes).to_vec())?;

    let mut reader = Reader::from_str(&content);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"rootfile" => {
                if let Some(path) = attr_value(&e, b"full-path")? {
                    return Ok(path);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(e)),
            _ => {}
        }
    }

    Err(Error::InvalidPackage(
        "No rootfile found in container.xml".into(),
    ))
}

/// Parse an OPF package document.
///
/// Namespace prefixes are ignored (`opf:item` and `item` are the same).
/// Input without a `<package>` root is rejected.
pub fn parse_package(content: &str) -> Result<PackageDocument> {
    // Text is not trimmed: entity references split titles into several
    // events and the spaces around them matter.
    let mut reader = Reader::from_str(content);

    let mut package = PackageDocument::default();
    let mut saw_package = false;
    let mut in_metadata = false;
    let mut in_title = false;
    let mut buf_text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"package" => saw_package = true,
                    b"metadata" => in_metadata = true,
                    b"title" if in_metadata && package.title.is_none() => {
                        in_title = true;
                        buf_text.clear();
                    }
                    b"item" => insert_item(&e, &mut package.manifest)?,
                    b"itemref" => push_itemref(&e, &mut package.spine_ids)?,
                    _ => {}
                }
            }
            Ok(Event::Empty(e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"package" => saw_package = true,
                    b"item" => insert_item(&e, &mut package.manifest)?,
                    b"itemref" => push_itemref(&e, &mut package.spine_ids)?,
                    _ => {}
                }
            }
            Ok(Event::Text(e)) => {
                if in_title {
                    buf_text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if in_title {
                    let entity = String::from_utf8_lossy(e.as_ref());
                    if let Some(resolved) = resolve_entity(&entity) {
                        buf_text.push_str(&resolved);
                    }
                }
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"metadata" => in_metadata = false,
                    b"title" if in_title => {
                        in_title = false;
                        let title = buf_text.trim();
                        if !title.is_empty() {
                            package.title = Some(title.to_string());
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(e)),
            _ => {}
        }
    }

    if !saw_package {
        return Err(Error::InvalidPackage("no <package> element".into()));
    }

    Ok(package)
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

fn insert_item(e: &BytesStart<'_>, manifest: &mut HashMap<String, String>) -> Result<()> {
    let Some(id) = attr_value(e, b"id")? else {
        return Ok(());
    };
    let href = attr_value(e, b"href")?.unwrap_or_default();
    if !id.is_empty() {
        manifest.insert(id, href);
    }
    Ok(())
}

fn push_itemref(e: &BytesStart<'_>, spine_ids: &mut Vec<String>) -> Result<()> {
    if let Some(idref) = attr_value(e, b"idref")? {
        spine_ids.push(idref);
    }
    Ok(())
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key {
            return Ok(Some(String::from_utf8(attr.value.to_vec())?));
        }
    }
    Ok(None)
}

/// Extract local name from namespaced XML name (e.g., "dc:title" -> "title").
fn local_name(name: &[u8]) -> &[u8] {
    name.iter()
        .rposition(|&b| b == b':')
        .map(|i| &name[i + 1..])
        .unwrap_or(name)
}

/// Resolve XML entity references.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        entity.strip_prefix('#')?.parse::<u32>().ok()?
    };
    char::from_u32(code).map(|c| c.to_string())
}
