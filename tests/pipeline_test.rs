use std::cell::RefCell;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use broadsheet::epub::OrderSource;
use broadsheet::extract::SectionFilter;
use broadsheet::site::RenderSummary;
use broadsheet::{Config, Error, Issue, Renderer, run, run_with};
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const CONTAINER: &str = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

const PACKAGE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:title>The Economist &amp; Friends</dc:title>
  </metadata>
  <manifest>
    <item id="front" href="text/front.xhtml" media-type="application/xhtml+xml"/>
    <item id="china" href="text/china.xhtml" media-type="application/xhtml+xml"/>
    <item id="css" href="styles/main.css" media-type="text/css"/>
    <item id="chart" href="images/chart.png" media-type="image/png"/>
  </manifest>
  <spine>
    <itemref idref="front"/>
    <itemref idref="china"/>
  </spine>
</package>"#;

const FRONT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<html xmlns="http://www.w3.org/1999/xhtml"><body>
<p>March 1st 2025</p>
<h2 class="section">China</h2>
</body></html>"#;

fn china() -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<html xmlns="http://www.w3.org/1999/xhtml"><body>
<h1>Growth Slows</h1>
<img src="../images/chart.png" alt="chart"/>
<p>{}</p>
</body></html>"#,
        "Factories across the country reported weaker orders. ".repeat(6)
    )
}

fn write_epub(path: &Path, entries: &[(&str, &[u8])]) {
    let file = File::create(path).unwrap();
    let mut writer = ZipWriter::new(file);
    for (name, data) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap();
}

fn issue_epub(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("economist.epub");
    let china = china();
    write_epub(
        &path,
        &[
            ("mimetype", b"application/epub+zip"),
            ("META-INF/container.xml", CONTAINER.as_bytes()),
            ("OEBPS/content.opf", PACKAGE.as_bytes()),
            ("OEBPS/text/front.xhtml", FRONT.as_bytes()),
            ("OEBPS/text/china.xhtml", china.as_bytes()),
            // Not in the spine: must never be read.
            (
                "OEBPS/text/aaa-stray.xhtml",
                b"<h1>Stray</h1><p>stray stray stray stray stray stray stray stray stray stray stray stray stray stray stray stray stray stray stray stray stray stray stray stray stray stray stray stray stray stray stray stray stray stray stray</p>",
            ),
            ("OEBPS/styles/main.css", b"h1 { color: red; }"),
            ("OEBPS/images/chart.png", b"\x89PNG"),
        ],
    );
    path
}

fn config(tmp: &Path, input: &Path) -> Config {
    Config::new()
        .with_input(input)
        .with_work_dir(tmp.join("temp_epub"))
        .with_output_dir(tmp.join("output"))
}

#[test]
fn test_two_document_issue() {
    let tmp = TempDir::new().unwrap();
    let input = issue_epub(tmp.path());
    let config = config(tmp.path(), &input);

    let summary = run(&config).unwrap();

    assert_eq!(summary.order, OrderSource::Spine);
    assert_eq!(summary.documents, 2);
    assert_eq!(summary.articles, 1);
    assert_eq!(summary.edition_date.as_deref(), Some("March 1st 2025"));
    assert_eq!(summary.render.images, 1);
    assert_eq!(summary.render.stylesheet.as_deref(), Some("css/main.css"));

    let output = tmp.path().join("output");
    let page = fs::read_to_string(output.join("articles/growth-slows.html")).unwrap();
    assert!(page.contains("<p class=\"article-header\">China</p>"));
    assert!(page.contains("<h1>Growth Slows</h1>"));
    assert!(page.contains(r#"src="../images/chart.png""#));
    assert!(!page.contains("Stray"));
    assert!(output.join("images/chart.png").is_file());

    let index = fs::read_to_string(output.join("index.html")).unwrap();
    assert!(index.contains("<title>The Economist &amp; Friends</title>"));
    assert!(index.contains("March 1st 2025"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output.join("articles.json")).unwrap()).unwrap();
    assert_eq!(json["articles"][0]["section"], "China");
    assert_eq!(json["articles"][0]["header"], "China");

    let feed = fs::read_to_string(output.join("feed.xml")).unwrap();
    assert_eq!(feed.matches("<item>").count(), 1);

    assert!(!tmp.path().join("temp_epub").exists());
}

#[test]
fn test_fallback_order_without_package() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("bare.epub");
    let body = format!(
        "<h1>Second Story</h1><p>{}</p>",
        "words and more words ".repeat(12)
    );
    write_epub(
        &input,
        &[
            ("b.html", body.as_bytes()),
            ("a.html", br#"<h2 class="section">Europe</h2>"#),
        ],
    );

    let mut recorded = Recorder::default();
    let summary = run_with(&config(tmp.path(), &input), &recorded).unwrap();

    assert_eq!(summary.order, OrderSource::Fallback);
    let issue = recorded.issue.get_mut().take().unwrap();
    assert_eq!(issue.articles.len(), 1);
    assert_eq!(issue.articles[0].section, "Europe");
    assert_eq!(issue.title, "The Economist");
}

#[test]
fn test_section_filter_and_unique_paths() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("many.epub");
    let filler = "lorem ipsum dolor ".repeat(14);
    let doc = format!(
        r#"<body>
<h1>Contents page</h1><p>{filler}</p>
<h2 class="section">Finance &amp; economics</h2>
<h1>Global Markets</h1><p>{filler}</p>
<h1>Global Markets</h1><p>{filler}</p>
<h1>Global Markets</h1><p>{filler}</p>
</body>"#
    );
    write_epub(&input, &[("issue.html", doc.as_bytes())]);

    let filtered = run(&config(tmp.path(), &input)).unwrap();
    assert_eq!(filtered.extracted, 4);
    assert_eq!(filtered.articles, 3);

    let output = tmp.path().join("output");
    let pages: HashSet<_> = fs::read_dir(output.join("articles"))
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    let expected: HashSet<_> = [
        "global-markets.html",
        "global-markets-2.html",
        "global-markets-3.html",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    assert_eq!(pages, expected);

    let everything = config(tmp.path(), &input).with_sections(SectionFilter::All);
    assert_eq!(run(&everything).unwrap().articles, 4);
    assert!(output.join("articles/contents-page.html").is_file());
}

#[test]
fn test_missing_archive_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let config = config(tmp.path(), &tmp.path().join("missing.epub"));
    let err = run(&config).unwrap_err();
    assert!(matches!(err, Error::ArchiveNotFound(_)));
    assert!(err.to_string().contains("missing.epub"));
}

#[test]
fn test_work_dir_can_be_kept() {
    let tmp = TempDir::new().unwrap();
    let input = issue_epub(tmp.path());
    let config = config(tmp.path(), &input).with_keep_work_dir(true);

    run(&config).unwrap();
    assert!(tmp.path().join("temp_epub/OEBPS/content.opf").is_file());
}

#[derive(Default)]
struct Recorder {
    issue: RefCell<Option<Issue>>,
}

impl Renderer for Recorder {
    fn render(&self, issue: &Issue, _output: &Path) -> broadsheet::Result<RenderSummary> {
        *self.issue.borrow_mut() = Some(issue.clone());
        Ok(RenderSummary {
            pages: issue.articles.len(),
            ..RenderSummary::default()
        })
    }
}
