//! Edition date detection from the front matter.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::dom::load_document;

/// Documents scanned for the edition date; it lives in the front matter.
pub const EDITION_SCAN_LIMIT: usize = 5;

static EDITION_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2}(?:st|nd|rd|th)?,?\s+20\d{2}\b",
    )
    .unwrap()
});

/// First date found in the first `limit` documents, in reading order.
///
/// Documents that cannot be read are skipped.
pub fn find_edition_date<P: AsRef<Path>>(documents: &[P], limit: usize) -> Option<String> {
    documents.iter().take(limit).find_map(|path| {
        let path = path.as_ref();
        match load_document(path) {
            Ok(dom) => {
                let date = find_date_in_text(&dom.collect_text(dom.body()));
                if let Some(date) = &date {
                    debug!(document = %path.display(), date = %date, "found edition date");
                }
                date
            }
            Err(e) => {
                warn!(document = %path.display(), "skipping unreadable document: {e}");
                None
            }
        }
    })
}

/// Match "Month day[suffix][,] 20YY" in free text.
pub fn find_date_in_text(text: &str) -> Option<String> {
    EDITION_DATE_RE.find(text).map(|m| m.as_str().to_string())
}
