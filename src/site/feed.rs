//! RSS 2.0 feed.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use super::{Issue, article_path};
use crate::dom::escape_html;

/// Articles included in the feed, from the start of the issue.
pub const FEED_ITEMS: usize = 20;

const RFC822_FORMAT: &str = "%a, %d %b %Y %H:%M:%S +0000";

const CONTENT_NS: &str = "http://purl.org/rss/1.0/modules/content/";

/// Wrap `s` in CDATA, splitting any `]]>` it contains.
fn cdata(s: &str) -> String {
    format!("<![CDATA[{}]]>", s.replace("]]>", "]]]]><![CDATA[>"))
}

fn link(base_url: Option<&str>, path: &str) -> String {
    match base_url {
        Some(base) => format!("{base}/{path}"),
        None => path.to_string(),
    }
}

/// Render the feed for the first `limit` articles.
///
/// Links are relative when no `base_url` is given.
pub fn render_feed(
    issue: &Issue,
    base_url: Option<&str>,
    built_at: DateTime<Utc>,
    limit: usize,
) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(out, "<rss xmlns:content=\"{CONTENT_NS}\" version=\"2.0\">");
    out.push_str("  <channel>\n");
    let _ = writeln!(out, "    <title>{}</title>", escape_html(&issue.title));
    let _ = writeln!(out, "    <link>{}</link>", escape_html(&link(base_url, "")));
    let description = match &issue.edition_date {
        Some(date) => format!("Full-text articles, {date} edition"),
        None => "Full-text articles".to_string(),
    };
    let _ = writeln!(out, "    <description>{}</description>", escape_html(&description));
    out.push_str("    <language>en</language>\n");
    let _ = writeln!(out, "    <lastBuildDate>{}</lastBuildDate>", built_at.format(RFC822_FORMAT));

    for article in issue.articles.iter().take(limit) {
        let url = escape_html(&link(base_url, &article_path(&article.slug)));
        out.push_str("    <item>\n");
        let _ = writeln!(out, "      <title>{}</title>", cdata(&article.title));
        let _ = writeln!(out, "      <link>{url}</link>");
        let _ = writeln!(out, "      <guid>{url}</guid>");
        let _ = writeln!(
            out,
            "      <description>{}</description>",
            cdata(&format!("{} - {}", article.title, article.header))
        );
        let _ = writeln!(
            out,
            "      <content:encoded>{}</content:encoded>",
            cdata(&article.body)
        );
        out.push_str("    </item>\n");
    }

    out.push_str("  </channel>\n</rss>\n");
    out
}
