use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use blog_audit::config::{self, Config};
use blog_audit::report::Diagnostics;
use blog_audit::sheet::CsvSheet;
use blog_audit::{crossref, feed};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// List non-review posts as well
    #[arg(long)]
    nonreview: bool,

    /// Print the classification tally after the feed pass
    #[arg(long, short)]
    verbose: bool,

    /// Path to YAML config file; defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Atom export of the blog
    feed: PathBuf,

    /// CSV export of the ledger spreadsheet
    ledger: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = match &args.config {
        Some(path) => config::load(path)?,
        None => Config::default(),
    };

    info!(feed = %args.feed.display(), "reading blog export");
    let items = feed::load(&args.feed)?;
    let report = feed::validate(&items, &cfg.blog, args.nonreview)?;
    report.diagnostics.print();
    if args.verbose {
        print!("{}", report.tally);
    }

    info!(ledger = %args.ledger.display(), "reading ledger");
    let sheet = CsvSheet::open(&args.ledger)?;
    let mut crossref_diags = Diagnostics::default();
    crossref::reconcile(&sheet, &cfg.ledger, &report.reviews, &mut crossref_diags)?;
    crossref_diags.print();

    let total = report.diagnostics.error_count() + crossref_diags.error_count();
    println!("Total errors: {total}");

    Ok(())
}
