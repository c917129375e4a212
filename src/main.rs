//! broadsheet - EPUB issue to static site

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use broadsheet::config::{DEFAULT_INPUT, DEFAULT_OUTPUT_DIR, DEFAULT_WORK_DIR};
use broadsheet::extract::SectionFilter;
use broadsheet::{Config, run};

#[derive(Parser)]
#[command(name = "broadsheet")]
#[command(version, about = "Turn a magazine EPUB into a static website", long_about = None)]
#[command(after_help = "EXAMPLES:
    broadsheet                              Convert input/economist.epub into output/
    broadsheet issue.epub -o site           Convert issue.epub into site/
    broadsheet issue.epub --all-sections    Keep articles from every section")]
struct Cli {
    /// Input EPUB archive
    #[arg(value_name = "INPUT", default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Output directory (cleared on every run)
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Directory the archive is unpacked into (cleared on every run)
    #[arg(long, value_name = "DIR", default_value = DEFAULT_WORK_DIR)]
    work_dir: PathBuf,

    /// Keep articles from every section, not just the known departments
    #[arg(long)]
    all_sections: bool,

    /// Treat headings of this level as section names (repeatable)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u8).range(1..=6))]
    section_level: Vec<u8>,

    /// Base URL for absolute links in the feed
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Site title (defaults to the package title)
    #[arg(long, value_name = "TITLE")]
    title: Option<String>,

    /// Keep the unpacked archive after a successful run
    #[arg(long)]
    keep_work_dir: bool,

    /// Only report warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Report per-document progress
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::new()
            .with_input(&self.input)
            .with_output_dir(&self.output)
            .with_work_dir(&self.work_dir)
            .with_keep_work_dir(self.keep_work_dir);

        let mut rules = config.rules.clone();
        for level in &self.section_level {
            rules = rules.with_section_level(*level);
        }
        config = config.with_rules(rules);

        if self.all_sections {
            config = config.with_sections(SectionFilter::All);
        }
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url);
        }
        if let Some(title) = &self.title {
            config = config.with_site_title(title);
        }
        config
    }

    fn log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(&cli.config()) {
        Ok(summary) => {
            if !cli.quiet {
                println!(
                    "Generated {} articles ({} pages, {} images) in {}",
                    summary.articles,
                    summary.render.pages,
                    summary.render.images,
                    cli.output.display()
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
