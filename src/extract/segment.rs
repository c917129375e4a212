//! Article segmentation over a flattened document.
//!
//! Each document is flattened once into a pre-order node list. Every node
//! is classified up front; article bodies are then half-open index ranges
//! over that list, running from a primary heading through its following
//! siblings up to the next section or primary heading.
//!
//! Section and rubric state outlive a single document and are threaded
//! through [`Segmenter::segment_document`] as a [`ReadingState`] value.

use std::ops::Range;
use std::path::Path;

use tracing::trace;

use super::Article;
use super::classify::{HeadingKind, HeadingRules, classify};
use super::slug::SlugRegistry;
use crate::dom::{Dom, FlatNode, escape_html, serialize_node};
use crate::site::IMAGES_DIR;
use crate::util::has_extension;

/// Section of anything seen before the first section heading.
pub const UNKNOWN_SECTION: &str = "Unknown";

/// Bodies shorter than this (in characters) are navigation chrome.
pub const MIN_BODY_CHARS: usize = 200;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "svg", "webp"];

/// Section/rubric state carried from one document to the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingState {
    /// Never empty: starts as [`UNKNOWN_SECTION`].
    pub section: String,
    /// Rubric waiting for the next primary heading.
    pub pending_rubric: Option<String>,
}

impl Default for ReadingState {
    fn default() -> Self {
        Self {
            section: UNKNOWN_SECTION.to_string(),
            pending_rubric: None,
        }
    }
}

/// Classification of one flat node.
#[derive(Debug, Clone)]
struct Classified {
    kind: HeadingKind,
    text: String,
}

impl Classified {
    const IGNORED: Classified = Classified {
        kind: HeadingKind::Ignored,
        text: String::new(),
    };
}

/// Accumulates articles across the documents of one run.
pub struct Segmenter<'r> {
    rules: &'r HeadingRules,
    min_body_chars: usize,
    slugs: SlugRegistry,
    articles: Vec<Article>,
}

impl<'r> Segmenter<'r> {
    pub fn new(rules: &'r HeadingRules) -> Self {
        Self {
            rules,
            min_body_chars: MIN_BODY_CHARS,
            slugs: SlugRegistry::new(),
            articles: Vec::new(),
        }
    }

    pub fn with_min_body_chars(mut self, min_body_chars: usize) -> Self {
        self.min_body_chars = min_body_chars;
        self
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn into_articles(self) -> Vec<Article> {
        self.articles
    }

    /// Segment one document, returning the state for the next one.
    pub fn segment_document(&mut self, dom: &Dom, mut state: ReadingState) -> ReadingState {
        let flat = dom.flatten(dom.body());
        let classes: Vec<Classified> = flat
            .iter()
            .map(|node| self.classify_node(dom, node))
            .collect();

        for (index, node) in classes.iter().enumerate() {
            match node.kind {
                HeadingKind::Section => {
                    state.section = node.text.clone();
                    // A rubric never crosses into another section.
                    state.pending_rubric = None;
                }
                HeadingKind::Rubric => {
                    state.pending_rubric = Some(node.text.clone());
                }
                HeadingKind::Primary => {
                    if node.text.is_empty() {
                        continue;
                    }
                    let rubric = state.pending_rubric.take();
                    let span = article_span(&flat, &classes, index);
                    self.emit(dom, &flat, span, &node.text, &state.section, rubric);
                }
                HeadingKind::Ignored => {}
            }
        }

        state
    }

    fn classify_node(&self, dom: &Dom, node: &FlatNode) -> Classified {
        let Some(tag) = dom.element_name(node.id) else {
            return Classified::IGNORED;
        };
        let classes = dom.element_classes(node.id);
        if !self.rules.is_candidate(tag, classes) {
            return Classified::IGNORED;
        }

        let text = dom.collect_text(node.id);
        let kind = classify(tag, classes, &text, self.rules);
        Classified { kind, text }
    }

    fn emit(
        &mut self,
        dom: &Dom,
        flat: &[FlatNode],
        span: Range<usize>,
        title: &str,
        section: &str,
        rubric: Option<String>,
    ) {
        let fragment = serialize_span(dom, flat, span);
        if fragment.chars().count() < self.min_body_chars {
            trace!(title, chars = fragment.chars().count(), "dropping short candidate");
            return;
        }

        let header = compose_header(section, rubric.as_deref());
        let slug = self.slugs.assign(title, self.articles.len());
        let body = format!(
            "<p class=\"article-header\">{}</p>\n{}",
            escape_html(&header),
            fragment
        );

        self.articles.push(Article {
            title: title.to_string(),
            section: section.to_string(),
            rubric,
            header,
            body,
            slug,
        });
    }
}

/// Display header for an article.
///
/// A rubric that merely restates the section (ignoring case) is dropped.
pub fn compose_header(section: &str, rubric: Option<&str>) -> String {
    match rubric.map(str::trim) {
        Some(rubric) if !rubric.is_empty() && rubric.to_lowercase() != section.to_lowercase() => {
            format!("{section} | {rubric}")
        }
        _ => section.to_string(),
    }
}

/// Body range of the article whose heading sits at `start`.
///
/// Covers the heading and its following siblings, stopping before the
/// first sibling that is, or contains, a section or primary heading.
fn article_span(flat: &[FlatNode], classes: &[Classified], start: usize) -> Range<usize> {
    let parent = flat[start].parent;
    let mut end = flat[start].end;

    while end < flat.len() && flat[end].parent == parent {
        let subtree = end..flat[end].end;
        if classes[subtree.clone()].iter().any(|c| c.kind.is_boundary()) {
            break;
        }
        end = subtree.end;
    }

    start..end
}

/// Serialize the sibling roots inside `span`, rewriting image references.
fn serialize_span(dom: &Dom, flat: &[FlatNode], span: Range<usize>) -> String {
    let mut out = String::new();
    let mut index = span.start;
    while index < span.end {
        serialize_node(dom, flat[index].id, &mut out, &rewrite_image_ref);
        index = flat[index].end;
    }
    out
}

/// Point an image reference at the flat images directory.
///
/// Only the file name survives; image file names are unique across a
/// package because they all land in one directory.
pub fn rewrite_image_ref(attr: &str, value: &str) -> Option<String> {
    match attr {
        "src" | "href" => rewrite_image_url(value),
        "srcset" => rewrite_srcset(value),
        _ => None,
    }
}

fn rewrite_image_url(value: &str) -> Option<String> {
    if value.contains("://") {
        return None;
    }

    let path = value.split(['?', '#']).next().unwrap_or(value);
    if !has_extension(Path::new(path), IMAGE_EXTENSIONS) {
        return None;
    }

    let file_name = path.rsplit('/').next().unwrap_or(path);
    Some(format!("../{IMAGES_DIR}/{file_name}"))
}

/// Rewrite every URL of a `srcset` candidate list, keeping descriptors.
fn rewrite_srcset(value: &str) -> Option<String> {
    let mut changed = false;
    let candidates: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|candidate| !candidate.is_empty())
        .map(|candidate| {
            let (url, descriptor) = candidate
                .split_once(char::is_whitespace)
                .unwrap_or((candidate, ""));
            let Some(url) = rewrite_image_url(url) else {
                return candidate.to_string();
            };
            changed = true;
            match descriptor.trim() {
                "" => url,
                descriptor => format!("{url} {descriptor}"),
            }
        })
        .collect();

    changed.then(|| candidates.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    fn in_section(section: &str) -> ReadingState {
        ReadingState {
            section: section.to_string(),
            pending_rubric: None,
        }
    }

    fn filler(words: usize) -> String {
        "lorem ipsum ".repeat(words)
    }

    fn run(docs: &[String], state: ReadingState) -> (Vec<Article>, ReadingState) {
        let rules = HeadingRules::default();
        let mut segmenter = Segmenter::new(&rules);
        let mut state = state;
        for doc in docs {
            state = segmenter.segment_document(&parse_html(doc), state);
        }
        (segmenter.into_articles(), state)
    }

    #[test]
    fn test_section_then_article() {
        let doc = format!(
            r#"<body><h2 class="section">China</h2><h1>Growth Slows</h1><p>{}</p></body>"#,
            filler(25)
        );
        let (articles, state) = run(&[doc], ReadingState::default());

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Growth Slows");
        assert_eq!(articles[0].section, "China");
        assert_eq!(articles[0].header, "China");
        assert_eq!(articles[0].slug, "growth-slows");
        assert!(articles[0].body.starts_with("<p class=\"article-header\">China</p>"));
        assert!(articles[0].body.contains("<h1>Growth Slows</h1>"));
        assert_eq!(state.section, "China");
    }

    #[test]
    fn test_section_carries_across_documents() {
        let first = r#"<body><h2 class="section">China</h2></body>"#.to_string();
        let second = format!("<body><h1>Factories idle</h1><p>{}</p></body>", filler(25));
        let (articles, _) = run(&[first, second], ReadingState::default());

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].section, "China");
    }

    #[test]
    fn test_unknown_section_before_first_heading() {
        let doc = format!("<body><h1>Orphan</h1><p>{}</p></body>", filler(25));
        let (articles, _) = run(&[doc], ReadingState::default());
        assert_eq!(articles[0].section, UNKNOWN_SECTION);
    }

    #[test]
    fn test_rubric_restating_section_is_deduplicated() {
        let doc = format!(
            r#"<body><p class="rubric">BUSINESS</p><h1>Deals</h1><p>{}</p></body>"#,
            filler(25)
        );
        let (articles, _) = run(&[doc], in_section("Business"));
        assert_eq!(articles[0].header, "Business");
        assert_eq!(articles[0].rubric.as_deref(), Some("BUSINESS"));
    }

    #[test]
    fn test_rubric_does_not_leak_into_next_article() {
        let doc = format!(
            r#"<body>
<p class="kicker">Free exchange</p>
<h1>First</h1><p>{0}</p>
<h1>Second</h1><p>{0}</p>
</body>"#,
            filler(25)
        );
        let (articles, state) = run(&[doc], in_section("Finance"));

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].header, "Finance | Free exchange");
        assert_eq!(articles[1].header, "Finance");
        assert_eq!(articles[1].rubric, None);
        assert_eq!(state.pending_rubric, None);
    }

    #[test]
    fn test_rubric_is_cleared_by_section_change() {
        let doc = format!(
            r#"<body>
<p class="rubric">Stray</p>
<h2 class="section">Europe</h2>
<h1>Elections</h1><p>{}</p>
</body>"#,
            filler(25)
        );
        let (articles, _) = run(&[doc], ReadingState::default());
        assert_eq!(articles[0].header, "Europe");
    }

    #[test]
    fn test_rubric_carries_across_documents() {
        let first = r#"<body><p class="rubric">Lexington</p></body>"#.to_string();
        let second = format!("<body><h1>Column</h1><p>{}</p></body>", filler(25));
        let (articles, _) = run(&[first, second], in_section("United States"));
        assert_eq!(articles[0].header, "United States | Lexington");
    }

    #[test]
    fn test_empty_title_keeps_rubric() {
        let doc = format!(
            r#"<body><p class="rubric">Bagehot</p><h1> </h1><p>{0}</p><h1>Real</h1><p>{0}</p></body>"#,
            filler(25)
        );
        let (articles, _) = run(&[doc], in_section("Britain"));
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Real");
        assert_eq!(articles[0].header, "Britain | Bagehot");
    }

    #[test]
    fn test_short_body_is_dropped() {
        let doc = "<body><h1>Contents</h1><p>page 3</p></body>".to_string();
        let (articles, _) = run(&[doc], ReadingState::default());
        assert!(articles.is_empty());
    }

    #[test]
    fn test_short_body_still_consumes_rubric() {
        let doc = format!(
            r#"<body><p class="rubric">Kicker</p><h1>Stub</h1><h1>Full</h1><p>{}</p></body>"#,
            filler(25)
        );
        let (articles, _) = run(&[doc], in_section("Asia"));
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].header, "Asia");
    }

    #[test]
    fn test_body_stops_at_next_heading() {
        let doc = format!(
            r#"<body><h1>One</h1><p>{0} ONE</p><h2 class="section">Asia</h2><p>{0}</p><h1>Two</h1><p>{0} TWO</p></body>"#,
            filler(25)
        );
        let (articles, _) = run(&[doc], ReadingState::default());

        assert_eq!(articles.len(), 2);
        assert!(articles[0].body.contains("ONE"));
        assert!(!articles[0].body.contains("Asia"));
        assert!(!articles[0].body.contains("TWO"));
        assert_eq!(articles[1].section, "Asia");
        assert!(articles[1].body.contains("TWO"));
    }

    #[test]
    fn test_nested_heading_is_found_and_bounds_siblings() {
        let doc = format!(
            r#"<body><div class="wrap"><h1>Outer</h1><p>{0}</p><div><h1>Inner</h1><p>{0}</p></div></div></body>"#,
            filler(25)
        );
        let (articles, _) = run(&[doc], ReadingState::default());

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Outer");
        assert!(!articles[0].body.contains("Inner"));
        assert_eq!(articles[1].title, "Inner");
    }

    #[test]
    fn test_scripts_never_reach_bodies() {
        let doc = format!(
            "<body><h1>Clean</h1><script>track()</script><p>{}</p></body>",
            filler(25)
        );
        let (articles, _) = run(&[doc], ReadingState::default());
        assert!(!articles[0].body.contains("track()"));
    }

    #[test]
    fn test_image_paths_are_flattened() {
        let doc = format!(
            r#"<body><h1>Pictures</h1><figure><img src="../images/sub/chart.PNG"></figure><p>{}</p></body>"#,
            filler(25)
        );
        let (articles, _) = run(&[doc], ReadingState::default());
        assert!(articles[0].body.contains(r#"<img src="../images/chart.PNG"/>"#));
    }

    #[test]
    fn test_duplicate_titles_get_distinct_slugs() {
        let doc = format!(
            "<body><h1>Global Markets</h1><p>{0}</p><h1>Global Markets</h1><p>{0}</p></body>",
            filler(25)
        );
        let (articles, _) = run(&[doc], ReadingState::default());
        assert_eq!(articles[0].slug, "global-markets");
        assert_eq!(articles[1].slug, "global-markets-1");
    }

    #[test]
    fn test_inline_markup_in_title() {
        let doc = format!(
            "<body><h1>The <em>Economist</em>'s view</h1><p>{}</p></body>",
            filler(25)
        );
        let (articles, _) = run(&[doc], ReadingState::default());
        assert_eq!(articles[0].title, "The Economist's view");
        assert_eq!(articles[0].slug, "the-economists-view");
    }

    #[test]
    fn test_compose_header() {
        assert_eq!(compose_header("Business", None), "Business");
        assert_eq!(compose_header("Business", Some("business")), "Business");
        assert_eq!(compose_header("Business", Some("  ")), "Business");
        assert_eq!(
            compose_header("Business", Some("Schumpeter")),
            "Business | Schumpeter"
        );
    }

    #[test]
    fn test_rewrite_image_ref() {
        assert_eq!(
            rewrite_image_ref("src", "img/a/b.jpeg?x=1"),
            Some("../images/b.jpeg".to_string())
        );
        assert_eq!(
            rewrite_image_ref("href", "cover.svg#frag"),
            Some("../images/cover.svg".to_string())
        );
        assert_eq!(rewrite_image_ref("src", "https://cdn/x.png"), None);
        assert_eq!(rewrite_image_ref("src", "chapter2.html"), None);
        assert_eq!(rewrite_image_ref("alt", "x.png"), None);
    }

    #[test]
    fn test_rewrite_srcset() {
        assert_eq!(
            rewrite_image_ref("srcset", "img/a/small.jpg 480w, img/b/large.jpg?v=2 1080w"),
            Some("../images/small.jpg 480w, ../images/large.jpg 1080w".to_string())
        );
        assert_eq!(
            rewrite_image_ref("srcset", "https://cdn/x.png 2x, img/y.png"),
            Some("https://cdn/x.png 2x, ../images/y.png".to_string())
        );
        assert_eq!(rewrite_image_ref("srcset", "https://cdn/x.png 1x"), None);
    }

    #[test]
    fn test_responsive_images_are_flattened() {
        let doc = format!(
            r#"<body><h1>Charts</h1><picture><source srcset="../images/wide/map.webp 2x, ../images/map.png 1x"><img src="../images/map.png"></picture><p>{}</p></body>"#,
            filler(25)
        );
        let (articles, _) = run(&[doc], ReadingState::default());
        assert!(articles[0].body.contains(
            r#"<source srcset="../images/map.webp 2x, ../images/map.png 1x"/>"#
        ));
    }

    #[test]
    fn test_article_span_ranges() {
        let dom = parse_html("<body><h1>A</h1><p>x</p><p>y</p><h1>B</h1><p>z</p></body>");
        let flat = dom.flatten(dom.body());
        let rules = HeadingRules::default();
        let segmenter = Segmenter::new(&rules);
        let classes: Vec<_> = flat.iter().map(|n| segmenter.classify_node(&dom, n)).collect();

        // h1 A(0) "A"(1) p(2) "x"(3) p(4) "y"(5) h1 B(6) ...
        assert_eq!(article_span(&flat, &classes, 0), 0..6);
        assert_eq!(article_span(&flat, &classes, 6), 6..flat.len());
    }
}
