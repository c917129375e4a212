//! Article identity: filesystem- and URL-safe slugs, unique per run.

use std::collections::HashSet;

pub const MAX_SLUG_CHARS: usize = 80;

/// Used when a title has no letters or digits at all.
const FALLBACK_SLUG: &str = "article";

/// Generate a slug from an article title.
///
/// Lowercases, drops everything except letters, digits, whitespace and
/// hyphens, replaces each whitespace run with one hyphen, and keeps at most
/// [`MAX_SLUG_CHARS`] characters.
///
/// # Examples
///
/// ```
/// use broadsheet::extract::slugify;
///
/// assert_eq!(slugify("Global Markets"), "global-markets");
/// assert_eq!(slugify("Who's afraid of AI?"), "whos-afraid-of-ai");
/// assert_eq!(slugify("  Lots   of\tspace "), "lots-of-space");
/// ```
pub fn slugify(title: &str) -> String {
    // Lowercase first: case mapping can emit combining marks.
    let kept: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();

    kept.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .take(MAX_SLUG_CHARS)
        .collect()
}

/// Slugs handed out during one run.
///
/// Replaces checking the output directory for existing pages: the set is
/// consulted before anything is written.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    taken: HashSet<String>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a slug for `title`.
    ///
    /// `ordinal` is the number of articles emitted before this one in the
    /// run. It becomes the suffix when the plain slug is already taken.
    pub fn assign(&mut self, title: &str, ordinal: usize) -> String {
        let mut base = slugify(title);
        if base.is_empty() {
            base = FALLBACK_SLUG.to_string();
        }

        let mut candidate = base.clone();
        let mut suffix = ordinal;
        while self.taken.contains(&candidate) {
            candidate = format!("{base}-{suffix}");
            suffix += 1;
        }

        self.taken.insert(candidate.clone());
        candidate
    }
}
