//! Feed loading and validation.
//!
//! The feed side of the audit: parse the Atom export, classify every
//! entry, run the consistency rules, and collect the validated reviews
//! plus all findings along the way.

pub mod classify;
pub mod rules;

pub use classify::{classify, ItemClassification, PubState};
pub use rules::enforce;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use feed_rs::model::Entry;
use tracing::info;

use crate::config::BlogConfig;
use crate::model::ReviewTable;
use crate::report::{Diagnostics, Tally};

/// One feed entry, reduced to the fields the classifier reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawItem {
    pub title: String,
    pub categories: Vec<RawCategory>,
    pub links: Vec<RawLink>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCategory {
    pub scheme: Option<String>,
    pub term: String,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLink {
    pub title: Option<String>,
    pub href: String,
}

impl RawItem {
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            title: entry
                .title
                .as_ref()
                .map(|t| t.content.clone())
                .unwrap_or_default(),
            categories: entry
                .categories
                .iter()
                .map(|c| RawCategory {
                    scheme: c.scheme.clone(),
                    term: c.term.clone(),
                    label: c.label.clone(),
                })
                .collect(),
            links: entry
                .links
                .iter()
                .map(|l| RawLink {
                    title: l.title.clone(),
                    href: l.href.clone(),
                })
                .collect(),
            body: entry
                .content
                .as_ref()
                .and_then(|c| c.body.clone())
                .unwrap_or_default(),
        }
    }
}

/// Parse an Atom export into raw items, in document order.
pub fn load(path: &Path) -> Result<Vec<RawItem>> {
    let file =
        File::open(path).with_context(|| format!("failed to open feed {}", path.display()))?;
    let feed = feed_rs::parser::parse(BufReader::new(file))
        .with_context(|| format!("failed to parse feed {}", path.display()))?;
    Ok(feed.entries.iter().map(RawItem::from_entry).collect())
}

/// Everything the feed pass produces.
#[derive(Debug)]
pub struct FeedReport {
    pub reviews: ReviewTable,
    pub diagnostics: Diagnostics,
    pub tally: Tally,
}

/// Classify every item and run the consistency rules over it.
///
/// Anomalies land in the report's diagnostics; only a malformed value
/// the classifier cannot represent (a bad URL, an unparsable rating)
/// aborts the pass.
pub fn validate(items: &[RawItem], cfg: &BlogConfig, nonreview: bool) -> Result<FeedReport> {
    let mut reviews = ReviewTable::default();
    let mut diagnostics = Diagnostics::default();
    let mut tally = Tally::default();

    for item in items {
        let mut classification = classify(item, cfg, &mut diagnostics, &mut tally)?;
        enforce(
            item,
            &mut classification,
            nonreview,
            &mut reviews,
            &mut diagnostics,
            &mut tally,
        );
    }

    info!(
        items = items.len(),
        reviews = reviews.len(),
        errors = diagnostics.error_count(),
        "validated feed"
    );
    Ok(FeedReport {
        reviews,
        diagnostics,
        tally,
    })
}
