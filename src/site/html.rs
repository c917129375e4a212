//! Static HTML site renderer.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::{
    ARTICLES_DIR, ARTICLES_JSON_FILE, FEED_FILE, FEED_ITEMS, INDEX_FILE, Issue, RenderSummary,
    Renderer, article_path, article_page, copy_images, copy_stylesheet, index_page, render_feed,
};
use crate::error::Result;
use crate::extract::Article;

/// Configuration for the HTML site.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Prefix for absolute links in the feed, without a trailing slash.
    pub base_url: Option<String>,
    pub feed_items: usize,
    /// Build timestamp; the current time when unset.
    pub built_at: Option<DateTime<Utc>>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            feed_items: FEED_ITEMS,
            built_at: None,
        }
    }
}

/// Writes article pages, an index, a feed and a JSON article list.
#[derive(Debug, Clone, Default)]
pub struct HtmlSiteRenderer {
    config: SiteConfig,
}

impl HtmlSiteRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: SiteConfig) -> Self {
        self.config = config;
        self
    }
}

#[derive(Serialize)]
struct IndexEntry<'a> {
    #[serde(flatten)]
    article: &'a Article,
    path: String,
}

#[derive(Serialize)]
struct SiteIndex<'a> {
    title: &'a str,
    edition_date: Option<&'a str>,
    built_at: String,
    articles: Vec<IndexEntry<'a>>,
}

impl Renderer for HtmlSiteRenderer {
    fn render(&self, issue: &Issue, output: &Path) -> Result<RenderSummary> {
        let built_at = self.config.built_at.unwrap_or_else(Utc::now);

        let images = copy_images(&issue.extraction_root, output)?;
        let stylesheet = copy_stylesheet(&issue.extraction_root, output)?;

        fs::create_dir_all(output.join(ARTICLES_DIR))?;
        for article in &issue.articles {
            let page = article_page(&issue.title, article, stylesheet.as_deref());
            fs::write(output.join(article_path(&article.slug)), page)?;
            debug!(slug = %article.slug, "wrote article page");
        }

        let built = built_at.format("%Y-%m-%d").to_string();
        fs::write(
            output.join(INDEX_FILE),
            index_page(issue, &built, stylesheet.as_deref()),
        )?;

        let feed = render_feed(
            issue,
            self.config.base_url.as_deref(),
            built_at,
            self.config.feed_items,
        );
        fs::write(output.join(FEED_FILE), feed)?;

        let index = SiteIndex {
            title: &issue.title,
            edition_date: issue.edition_date.as_deref(),
            built_at: built_at.to_rfc3339(),
            articles: issue
                .articles
                .iter()
                .map(|article| IndexEntry {
                    article,
                    path: article_path(&article.slug),
                })
                .collect(),
        };
        fs::write(
            output.join(ARTICLES_JSON_FILE),
            serde_json::to_string_pretty(&index)?,
        )?;

        Ok(RenderSummary {
            pages: issue.articles.len(),
            images,
            stylesheet,
        })
    }
}
