//! One run, end to end: archive in, site out.

use std::fs;

use tracing::{info, warn};

use crate::config::Config;
use crate::epub::{OrderSource, extract_archive, prepare_workspace, resolve_reading_order};
use crate::error::Result;
use crate::extract::{extract_articles, filter_sections, find_edition_date};
use crate::site::{DEFAULT_SITE_TITLE, HtmlSiteRenderer, Issue, RenderSummary, Renderer, SiteConfig};

/// What a run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub documents: usize,
    pub order: OrderSource,
    pub edition_date: Option<String>,
    /// Articles found before the section filter.
    pub extracted: usize,
    /// Articles written.
    pub articles: usize,
    pub render: RenderSummary,
}

/// Run with the built-in HTML site renderer.
pub fn run(config: &Config) -> Result<RunSummary> {
    let renderer = HtmlSiteRenderer::new().with_config(SiteConfig {
        base_url: config.base_url.clone(),
        ..SiteConfig::default()
    });
    run_with(config, &renderer)
}

/// Run with a caller-supplied renderer.
///
/// Both the work and output roots are cleared first. The work root is
/// removed again after a successful run unless `keep_work_dir` is set.
pub fn run_with<R: Renderer + ?Sized>(config: &Config, renderer: &R) -> Result<RunSummary> {
    prepare_workspace(&config.work_dir, &config.output_dir)?;

    info!(archive = %config.input.display(), "extracting archive");
    let files = extract_archive(&config.input, &config.work_dir)?;
    info!(files, root = %config.work_dir.display(), "archive extracted");

    let order = resolve_reading_order(&config.work_dir);
    info!(documents = order.documents.len(), source = ?order.source, "resolved reading order");

    let edition_date = find_edition_date(&order.documents, config.edition_scan_limit);
    match &edition_date {
        Some(date) => info!(date = %date, "edition date"),
        None => warn!("no edition date found"),
    }

    let articles = extract_articles(&order.documents, &config.rules, config.min_body_chars);
    let extracted = articles.len();
    let articles = filter_sections(articles, &config.sections);
    info!(extracted, kept = articles.len(), "extracted articles");
    if articles.is_empty() {
        warn!("no articles survived extraction");
    }

    let title = config
        .site_title
        .clone()
        .or(order.title.clone())
        .unwrap_or_else(|| DEFAULT_SITE_TITLE.to_string());
    let issue = Issue {
        title,
        edition_date,
        articles,
        extraction_root: config.work_dir.clone(),
    };

    let render = renderer.render(&issue, &config.output_dir)?;
    info!(
        pages = render.pages,
        images = render.images,
        output = %config.output_dir.display(),
        "site written"
    );

    if !config.keep_work_dir {
        fs::remove_dir_all(&config.work_dir)?;
    }

    Ok(RunSummary {
        documents: order.documents.len(),
        order: order.source,
        edition_date: issue.edition_date,
        extracted,
        articles: issue.articles.len(),
        render,
    })
}
