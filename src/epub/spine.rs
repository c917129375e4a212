//! Reading-order resolution for an extracted package.

use std::fs;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::parser::{PackageDocument, parse_container_xml, parse_package};
use crate::error::Result;
use crate::util::{decode_text, has_extension, xml_encoding_hint};

/// File extensions treated as content documents by the fallback ordering.
pub const CONTENT_EXTENSIONS: &[&str] = &["html", "xhtml", "htm"];

/// Where a reading order came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSource {
    /// The package document's spine.
    Spine,
    /// Lexicographic order of every content document in the tree.
    Fallback,
}

#[derive(Debug, Clone)]
pub struct ReadingOrder {
    pub documents: Vec<PathBuf>,
    pub source: OrderSource,
    /// Package `dc:title`, when a package document could be parsed.
    pub title: Option<String>,
}

/// Resolve the ordered content documents under an extraction root.
///
/// Never fails: any problem with the package document falls back to
/// [`fallback_order`], which may be empty.
pub fn resolve_reading_order(root: &Path) -> ReadingOrder {
    let mut title = None;

    match find_package_document(root) {
        Some(opf_path) => match read_spine(&opf_path) {
            Ok((documents, package_title)) => {
                title = package_title;
                if !documents.is_empty() {
                    debug!(
                        package = %opf_path.display(),
                        documents = documents.len(),
                        "reading order from spine"
                    );
                    return ReadingOrder {
                        documents,
                        source: OrderSource::Spine,
                        title,
                    };
                }
                warn!(package = %opf_path.display(), "spine resolved to no documents");
            }
            Err(e) => warn!(package = %opf_path.display(), "unusable package document: {e}"),
        },
        None => debug!(root = %root.display(), "no package document found"),
    }

    ReadingOrder {
        documents: fallback_order(root),
        source: OrderSource::Fallback,
        title,
    }
}

/// Locate the package document.
///
/// A rootfile named by `META-INF/container.xml` wins when it exists;
/// otherwise the first `*.opf` of a name-sorted walk.
pub fn find_package_document(root: &Path) -> Option<PathBuf> {
    let container = root.join("META-INF").join("container.xml");
    if let Ok(bytes) = fs::read(&container)
        && let Ok(rootfile) = parse_container_xml(&bytes)
    {
        let path = resolve_href(root, &rootfile);
        if path.is_file() {
            return Some(path);
        }
        debug!(rootfile = %rootfile, "container.xml names a missing rootfile");
    }

    sorted_files(root).find(|path| has_extension(path, &["opf"]))
}

/// Every content document under `root`, sorted by path string.
pub fn fallback_order(root: &Path) -> Vec<PathBuf> {
    let mut documents: Vec<PathBuf> = sorted_files(root)
        .filter(|path| has_extension(path, CONTENT_EXTENSIONS))
        .collect();
    documents.sort_by(|a, b| a.to_string_lossy().cmp(&b.to_string_lossy()));
    documents
}

/// Join a package-relative href onto a directory.
///
/// Fragments are dropped and percent-escapes decoded.
pub fn resolve_href(base: &Path, href: &str) -> PathBuf {
    let href = href.split('#').next().unwrap_or(href);
    let decoded = percent_decode_str(href).decode_utf8_lossy();
    base.join(decoded.as_ref())
}

fn read_spine(opf_path: &Path) -> Result<(Vec<PathBuf>, Option<String>)> {
    let bytes = fs::read(opf_path)?;
    let content = decode_text(&bytes, xml_encoding_hint(&bytes).as_deref());
    let package: PackageDocument = parse_package(&content)?;

    let base = opf_path.parent().unwrap_or(Path::new(""));
    let documents = package
        .spine_hrefs()
        .filter(|href| !href.is_empty())
        .map(|href| resolve_href(base, href))
        .collect();
    Ok((documents, package.title))
}

/// Regular files under `root` in a deterministic, name-sorted walk.
pub(crate) fn sorted_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
}
