//! Error types for broadsheet operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while turning an issue into a site.
///
/// Only archive and output failures abort a run. Package-document errors
/// are recovered by the reading-order fallback, and a document that cannot
/// be read is skipped.
#[derive(Error, Debug)]
pub enum Error {
    #[error("input archive not found: {}", .0.display())]
    ArchiveNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid package document: {0}")]
    InvalidPackage(String),

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
