//! Article extraction.
//!
//! Content documents carry no explicit article records. Articles are
//! recovered from heading adjacency:
//!
//! - [`classify()`] decides what each element means (section, rubric,
//!   article title, or nothing),
//! - [`Segmenter`] walks documents in reading order, carrying a
//!   [`ReadingState`] between them, and cuts article bodies,
//! - [`SlugRegistry`] gives each article a unique identifier,
//! - [`filter_sections`] drops sections outside the allow-list.

mod classify;
mod edition;
mod filter;
mod segment;
mod slug;

use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

pub use classify::{
    HeadingKind, HeadingRules, MAX_RUBRIC_CHARS, MAX_SECTION_CHARS, RUBRIC_MARKERS,
    SECTION_MARKERS, classify,
};
pub use edition::{EDITION_SCAN_LIMIT, find_date_in_text, find_edition_date};
pub use filter::{DEFAULT_SECTIONS, SectionFilter, filter_sections};
pub use segment::{
    IMAGE_EXTENSIONS, MIN_BODY_CHARS, ReadingState, Segmenter, UNKNOWN_SECTION, compose_header,
    rewrite_image_ref,
};
pub use slug::{MAX_SLUG_CHARS, SlugRegistry, slugify};

use crate::dom::load_document;

/// One extracted article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub title: String,
    /// Canonical section, as tracked when the article was found.
    pub section: String,
    pub rubric: Option<String>,
    /// Display header: the section, plus the rubric when it adds anything.
    pub header: String,
    /// Serialized markup: header element followed by the captured fragment.
    #[serde(skip_serializing)]
    pub body: String,
    pub slug: String,
}

/// Extract articles from documents in reading order.
///
/// A document that cannot be read is skipped; the section and rubric state
/// passes over it unchanged.
pub fn extract_articles<P: AsRef<Path>>(
    documents: &[P],
    rules: &HeadingRules,
    min_body_chars: usize,
) -> Vec<Article> {
    let mut segmenter = Segmenter::new(rules).with_min_body_chars(min_body_chars);
    let mut state = ReadingState::default();

    for path in documents {
        let path = path.as_ref();
        let dom = match load_document(path) {
            Ok(dom) => dom,
            Err(e) => {
                warn!(document = %path.display(), "skipping unreadable document: {e}");
                continue;
            }
        };

        let before = segmenter.articles().len();
        state = segmenter.segment_document(&dom, state);
        debug!(
            document = %path.display(),
            articles = segmenter.articles().len() - before,
            section = %state.section,
            "segmented document"
        );
    }

    segmenter.into_articles()
}
