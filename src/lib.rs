//! # broadsheet
//!
//! Turns a weekly news-magazine EPUB into a static website: one page per
//! article, an index grouped by section, an RSS feed and a JSON article
//! list.
//!
//! ## Pipeline
//!
//! 1. [`epub::extract_archive`] unpacks the issue into a work directory.
//! 2. [`epub::resolve_reading_order`] orders the content documents by the
//!    package spine, falling back to file-name order.
//! 3. [`extract::extract_articles`] recovers articles from heading
//!    adjacency, tracking the current section and rubric across documents.
//! 4. A [`site::Renderer`] writes the site.
//!
//! ## Quick Start
//!
//! ```no_run
//! use broadsheet::{Config, run};
//!
//! let config = Config::new()
//!     .with_input("input/economist.epub")
//!     .with_output_dir("output");
//! let summary = run(&config)?;
//! println!("{} articles", summary.articles);
//! # Ok::<(), broadsheet::Error>(())
//! ```
//!
//! ## Segmenting Documents Directly
//!
//! ```
//! use broadsheet::dom::parse_html;
//! use broadsheet::extract::{HeadingRules, ReadingState, Segmenter};
//!
//! let html = format!(
//!     r#"<h2 class="section">China</h2><h1>Growth Slows</h1><p>{}</p>"#,
//!     "Output fell again. ".repeat(12)
//! );
//! let rules = HeadingRules::default();
//! let mut segmenter = Segmenter::new(&rules);
//! let state = segmenter.segment_document(&parse_html(&html), ReadingState::default());
//!
//! assert_eq!(state.section, "China");
//! assert_eq!(segmenter.articles()[0].slug, "growth-slows");
//! ```

pub mod config;
pub mod dom;
pub mod epub;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod site;
pub(crate) mod util;

pub use config::Config;
pub use error::{Error, Result};
pub use extract::Article;
pub use pipeline::{RunSummary, run, run_with};
pub use site::{HtmlSiteRenderer, Issue, Renderer};
