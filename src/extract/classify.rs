//! Heading classification.
//!
//! Whether an element names a section, carries a rubric, or titles an
//! article is decided from its tag, its class tokens and its text alone.

use crate::dom::heading_level;

/// Class tokens that mark a section (department) heading.
pub const SECTION_MARKERS: &[&str] = &["section", "department", "part"];

/// Class tokens that mark a rubric (kicker / fly-title).
pub const RUBRIC_MARKERS: &[&str] = &["rubric", "kicker", "flytitle", "fly-title"];

/// Section names are short labels; anything this long is body copy.
pub const MAX_SECTION_CHARS: usize = 50;

pub const MAX_RUBRIC_CHARS: usize = 100;

/// What an element means to the segmenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingKind {
    /// Sets the current section.
    Section,
    /// Sets the rubric for the next article.
    Rubric,
    /// Starts an article.
    Primary,
    Ignored,
}

impl HeadingKind {
    /// Whether this kind ends the body of the article before it.
    pub fn is_boundary(self) -> bool {
        matches!(self, HeadingKind::Section | HeadingKind::Primary)
    }
}

/// Tunable parts of the classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingRules {
    /// Heading level of article titles (`1` for `h1`).
    pub primary_level: u8,
    /// Heading levels that name sections regardless of class.
    pub section_levels: Vec<u8>,
    pub section_markers: Vec<String>,
    pub rubric_markers: Vec<String>,
}

impl Default for HeadingRules {
    fn default() -> Self {
        Self {
            primary_level: 1,
            section_levels: Vec::new(),
            section_markers: SECTION_MARKERS.iter().map(|s| s.to_string()).collect(),
            rubric_markers: RUBRIC_MARKERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl HeadingRules {
    pub fn with_primary_level(mut self, level: u8) -> Self {
        self.primary_level = level;
        self
    }

    pub fn with_section_level(mut self, level: u8) -> Self {
        if !self.section_levels.contains(&level) {
            self.section_levels.push(level);
        }
        self
    }

    /// Cheap pre-check so text is only gathered for elements that can
    /// classify as something other than [`HeadingKind::Ignored`].
    pub fn is_candidate<S: AsRef<str>>(&self, tag: &str, classes: &[S]) -> bool {
        heading_level(tag).is_some() || has_marker(classes, &self.rubric_markers)
    }
}

/// Classify one element.
///
/// `text` is the element's whitespace-normalized text. Precedence is
/// section, then rubric, then primary.
pub fn classify<S: AsRef<str>>(
    tag: &str,
    classes: &[S],
    text: &str,
    rules: &HeadingRules,
) -> HeadingKind {
    let text = text.trim();
    let chars = text.chars().count();
    let level = heading_level(tag);
    let section_marked = has_marker(classes, &rules.section_markers);

    if let Some(level) = level
        && (rules.section_levels.contains(&level) || section_marked)
        && chars > 0
        && chars < MAX_SECTION_CHARS
    {
        return HeadingKind::Section;
    }

    if has_marker(classes, &rules.rubric_markers) && chars > 0 && chars < MAX_RUBRIC_CHARS {
        return HeadingKind::Rubric;
    }

    if level == Some(rules.primary_level) && !section_marked {
        return HeadingKind::Primary;
    }

    HeadingKind::Ignored
}

fn has_marker<S: AsRef<str>>(classes: &[S], markers: &[String]) -> bool {
    classes.iter().any(|class| {
        markers
            .iter()
            .any(|marker| class.as_ref().eq_ignore_ascii_case(marker))
    })
}
