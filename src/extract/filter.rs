//! Section allow-list, applied after segmentation.

use super::Article;

/// Departments of a weekly news magazine kept by default.
pub const DEFAULT_SECTIONS: &[&str] = &[
    "The world this week",
    "Leaders",
    "Letters",
    "By Invitation",
    "Briefing",
    "United States",
    "The Americas",
    "Asia",
    "China",
    "Middle East & Africa",
    "Europe",
    "Britain",
    "International",
    "Special report",
    "Technology Quarterly",
    "Business",
    "Finance & economics",
    "Science & technology",
    "Culture",
    "Essay",
    "Schools brief",
    "Graphic detail",
    "Economic & financial indicators",
    "Obituary",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionFilter {
    /// Keep every article.
    All,
    /// Keep articles whose section matches an entry (trimmed, ignoring case).
    AllowList(Vec<String>),
}

impl Default for SectionFilter {
    fn default() -> Self {
        SectionFilter::AllowList(DEFAULT_SECTIONS.iter().map(|s| s.to_string()).collect())
    }
}

impl SectionFilter {
    pub fn allows(&self, section: &str) -> bool {
        match self {
            SectionFilter::All => true,
            SectionFilter::AllowList(allowed) => {
                let section = section.trim().to_lowercase();
                allowed.iter().any(|s| s.trim().to_lowercase() == section)
            }
        }
    }
}

/// Drop articles from sections the filter does not allow, keeping order.
pub fn filter_sections(articles: Vec<Article>, filter: &SectionFilter) -> Vec<Article> {
    articles
        .into_iter()
        .filter(|article| filter.allows(&article.section))
        .collect()
}
