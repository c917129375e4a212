//! HTML page templates.

use std::fmt::Write;

use super::{FEED_FILE, INDEX_FILE, Issue, article_path};
use crate::dom::escape_html;
use crate::extract::Article;

const BASE_STYLE: &str = "\
body { max-width: 46em; margin: 0 auto; padding: 2em 1em; \
font-family: Georgia, \"Times New Roman\", serif; line-height: 1.6; color: #222; }
.article-header, .section { color: #e3120b; font-size: 0.75em; \
text-transform: uppercase; letter-spacing: 0.06em; }
.article { border-bottom: 1px solid #eee; padding: 0.6em 0; }
.article a { color: #222; text-decoration: none; }
.subtitle { color: #666; }
img { max-width: 100%; height: auto; }
";

/// Group articles into runs of consecutive articles sharing a section.
///
/// Runs are never merged: a section that recurs later gets a second run.
pub fn section_runs(articles: &[Article]) -> Vec<(&str, &[Article])> {
    articles
        .chunk_by(|a, b| a.section == b.section)
        .map(|run| (run[0].section.as_str(), run))
        .collect()
}

fn head(out: &mut String, title: &str, stylesheet: Option<&str>) {
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(out, "<title>{}</title>", escape_html(title));
    let _ = writeln!(out, "<style>\n{BASE_STYLE}</style>");
    if let Some(href) = stylesheet {
        let _ = writeln!(out, "<link rel=\"stylesheet\" href=\"{}\">", escape_html(href));
    }
    out.push_str("</head>\n");
}

/// Standalone page for one article, linked from `articles/`.
///
/// `stylesheet` is site-relative.
pub fn article_page(site_title: &str, article: &Article, stylesheet: Option<&str>) -> String {
    let mut out = String::new();
    let stylesheet = stylesheet.map(|href| format!("../{href}"));
    head(
        &mut out,
        &format!("{} | {}", article.title, site_title),
        stylesheet.as_deref(),
    );

    out.push_str("<body>\n");
    let _ = writeln!(
        out,
        "<nav><a href=\"../{INDEX_FILE}\">&larr; {}</a></nav>",
        escape_html(site_title)
    );
    out.push_str("<article>\n");
    out.push_str(&article.body);
    out.push_str("\n</article>\n</body>\n</html>\n");
    out
}

/// Table of contents for the whole issue.
pub fn index_page(issue: &Issue, built: &str, stylesheet: Option<&str>) -> String {
    let mut out = String::new();
    head(&mut out, &issue.title, stylesheet);

    out.push_str("<body>\n");
    let _ = writeln!(out, "<h1>{}</h1>", escape_html(&issue.title));
    if let Some(date) = &issue.edition_date {
        let _ = writeln!(out, "<p class=\"edition\">{}</p>", escape_html(date));
    }
    let _ = writeln!(
        out,
        "<p class=\"subtitle\">{} articles &middot; Updated {}</p>",
        issue.articles.len(),
        escape_html(built)
    );

    for (section, run) in section_runs(&issue.articles) {
        let _ = writeln!(out, "<h2 class=\"section\">{}</h2>", escape_html(section));
        for article in run {
            out.push_str("<div class=\"article\">");
            if let Some(rubric) = &article.rubric {
                let _ = write!(out, "<span class=\"rubric\">{}</span> ", escape_html(rubric));
            }
            let _ = write!(
                out,
                "<a href=\"{}\">{}</a>",
                escape_html(&article_path(&article.slug)),
                escape_html(&article.title)
            );
            out.push_str("</div>\n");
        }
    }

    let _ = writeln!(out, "<p><a href=\"{FEED_FILE}\" class=\"rss\">RSS feed</a></p>");
    out.push_str("</body>\n</html>\n");
    out
}
