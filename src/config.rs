//! Run configuration.

use std::path::PathBuf;

use crate::extract::{EDITION_SCAN_LIMIT, HeadingRules, MIN_BODY_CHARS, SectionFilter};

pub const DEFAULT_INPUT: &str = "input/economist.epub";
pub const DEFAULT_WORK_DIR: &str = "temp_epub";
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Everything one run needs to know.
///
/// `Default` reproduces the fixed-path layout: `input/economist.epub` is
/// extracted into `temp_epub/` and the site is written to `output/`.
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub work_dir: PathBuf,
    pub output_dir: PathBuf,
    pub rules: HeadingRules,
    pub min_body_chars: usize,
    pub edition_scan_limit: usize,
    pub sections: SectionFilter,
    /// Overrides the package title on the index and feed.
    pub site_title: Option<String>,
    /// Prefix for absolute links in the feed.
    pub base_url: Option<String>,
    pub keep_work_dir: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            work_dir: PathBuf::from(DEFAULT_WORK_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            rules: HeadingRules::default(),
            min_body_chars: MIN_BODY_CHARS,
            edition_scan_limit: EDITION_SCAN_LIMIT,
            sections: SectionFilter::default(),
            site_title: None,
            base_url: None,
            keep_work_dir: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input = input.into();
        self
    }

    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_rules(mut self, rules: HeadingRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_min_body_chars(mut self, min_body_chars: usize) -> Self {
        self.min_body_chars = min_body_chars;
        self
    }

    pub fn with_edition_scan_limit(mut self, limit: usize) -> Self {
        self.edition_scan_limit = limit;
        self
    }

    pub fn with_sections(mut self, sections: SectionFilter) -> Self {
        self.sections = sections;
        self
    }

    pub fn with_site_title(mut self, title: impl Into<String>) -> Self {
        self.site_title = Some(title.into());
        self
    }

    /// Trailing slashes are dropped so links join with a single `/`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = Some(base_url.trim_end_matches('/').to_string());
        self
    }

    pub fn with_keep_work_dir(mut self, keep: bool) -> Self {
        self.keep_work_dir = keep;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_layout() {
        let config = Config::default();
        assert_eq!(config.input, PathBuf::from("input/economist.epub"));
        assert_eq!(config.work_dir, PathBuf::from("temp_epub"));
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.min_body_chars, 200);
        assert_eq!(config.edition_scan_limit, 5);
        assert!(!config.keep_work_dir);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = Config::new().with_base_url("https://example.org/weekly/");
        assert_eq!(config.base_url.as_deref(), Some("https://example.org/weekly"));
    }
}
