//! EPUB package handling: unpacking and reading order.

mod archive;
mod parser;
mod spine;

pub use archive::{extract_archive, prepare_workspace};
pub use parser::{PackageDocument, parse_container_xml, parse_package};
pub use spine::{
    CONTENT_EXTENSIONS, OrderSource, ReadingOrder, fallback_order, find_package_document,
    resolve_href, resolve_reading_order,
};
pub(crate) use spine::sorted_files;
