//! Static site output.
//!
//! The pipeline hands a finished [`Issue`] to a [`Renderer`]; the renderer
//! owns every file written under the output root.
//!
//! # Example
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//! use broadsheet::site::{HtmlSiteRenderer, Issue, Renderer};
//!
//! let issue = Issue {
//!     title: "The Economist".into(),
//!     edition_date: Some("March 1st 2025".into()),
//!     articles: Vec::new(),
//!     extraction_root: PathBuf::from("temp_epub"),
//! };
//! let summary = HtmlSiteRenderer::new().render(&issue, Path::new("output"))?;
//! println!("{} pages", summary.pages);
//! # Ok::<(), broadsheet::Error>(())
//! ```

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::extract::Article;

mod assets;
mod feed;
mod html;
mod pages;

pub use assets::{copy_images, copy_stylesheet};
pub use feed::{FEED_ITEMS, render_feed};
pub use html::{HtmlSiteRenderer, SiteConfig};
pub use pages::{article_page, index_page, section_runs};

pub const ARTICLES_DIR: &str = "articles";
pub const IMAGES_DIR: &str = "images";
pub const CSS_DIR: &str = "css";

pub const INDEX_FILE: &str = "index.html";
pub const FEED_FILE: &str = "feed.xml";
pub const ARTICLES_JSON_FILE: &str = "articles.json";

/// Site title when neither the caller nor the package names one.
pub const DEFAULT_SITE_TITLE: &str = "The Economist";

/// One edition, ready to render.
#[derive(Debug, Clone)]
pub struct Issue {
    pub title: String,
    pub edition_date: Option<String>,
    /// Articles in reading order.
    pub articles: Vec<Article>,
    /// Where the archive was unpacked; images and stylesheets come from here.
    pub extraction_root: PathBuf,
}

/// What a render wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub pages: usize,
    pub images: usize,
    /// Site-relative path of the copied stylesheet.
    pub stylesheet: Option<String>,
}

/// Writes an issue out as a browsable site.
pub trait Renderer {
    /// Render `issue` under `output`, which already exists.
    fn render(&self, issue: &Issue, output: &Path) -> Result<RenderSummary>;
}

/// Site-relative path of an article page.
pub fn article_path(slug: &str) -> String {
    format!("{ARTICLES_DIR}/{slug}.html")
}
