//! Cross-reference phase: join the validated reviews against the ledger
//! and report whatever fails to line up.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use anyhow::Result;
use tracing::info;
use url::Url;

use crate::config::LedgerConfig;
use crate::model::ReviewTable;
use crate::report::{Diagnostic, Diagnostics};
use crate::sheet::{SheetRecord, SheetSource};

/// Elements of `first` that are absent from `second`, deduplicated and
/// in first-appearance order.
fn set_difference<'a>(first: &'a [String], second: &[String]) -> Vec<&'a str> {
    let exclude: HashSet<&str> = second.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    first
        .iter()
        .map(String::as_str)
        .filter(|s| !exclude.contains(s) && seen.insert(*s))
        .collect()
}

/// Walk the ledger's data rows, join them against the review table by
/// Blogger link, and report mismatches in both directions.
///
/// Rows without a link and reprint rows are exempt from the join. The
/// scan stops at the first row with a blank title cell.
pub fn reconcile(
    sheet: &dyn SheetSource,
    cfg: &LedgerConfig,
    reviews: &ReviewTable,
    diags: &mut Diagnostics,
) -> Result<()> {
    let mut by_link: HashMap<Url, SheetRecord> = HashMap::new();
    let mut records = 0usize;
    let mut reviewed = 0usize;
    let mut not_reviewed = 0usize;

    let mut row = cfg.first_data_row;
    while sheet.cell(row, &cfg.columns.title).is_some() {
        let record = SheetRecord::read(sheet, row, cfg)?;
        records += 1;
        match record.blogger_link.clone() {
            Some(link) if !record.reprint => {
                if reviews.contains(&link) {
                    match by_link.entry(link) {
                        Entry::Occupied(existing) => {
                            diags.push(Diagnostic::error(format!(
                                "Unexpected Duplicate Url: {} is used for {} and {}",
                                existing.key(),
                                record.title,
                                existing.get().title
                            )));
                        }
                        Entry::Vacant(slot) => {
                            slot.insert(record);
                            reviewed += 1;
                        }
                    }
                } else {
                    diags.push(Diagnostic::error(format!(
                        "Spreadsheet contains URL {link} not in blog: {}",
                        record.title
                    )));
                }
            }
            _ => not_reviewed += 1,
        }
        row += 1;
    }

    info!(records, reviewed, not_reviewed, "read ledger");

    for (url, review) in reviews.iter() {
        match by_link.get(url) {
            Some(record) => {
                let missing = set_difference(&review.labels, &record.blog_labels);
                for label in &missing {
                    diags.push(Diagnostic::error(format!(
                        "Blog contains label {label} not in spreadsheet: {url} {}",
                        review.title
                    )));
                }
                // Blog labels are normally a subset of the ledger's, so
                // the reverse direction is only worth listing once the
                // forward direction has already diverged.
                if !missing.is_empty() {
                    for label in set_difference(&record.blog_labels, &review.labels) {
                        diags.push(Diagnostic::warning(format!(
                            "Spreadsheet contains label {label} not in blog: {url} {}",
                            review.title
                        )));
                    }
                }
                if let Some(blog_title) = &record.blog_title {
                    if blog_title != &review.title {
                        diags.push(Diagnostic::error(format!(
                            "Spreadsheet blog title '{blog_title}' does not match blog: {url} {}",
                            review.title
                        )));
                    }
                }
            }
            None => {
                diags.push(Diagnostic::error(format!(
                    "Blog contains URL {url} not in spreadsheet: {}",
                    review.title
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn set_difference_is_distinct_and_order_preserving() {
        let first = strings(&["Review", "Novel", "Review", "2016 Hugos", "Novel"]);
        let second = strings(&["Novel"]);
        assert_eq!(set_difference(&first, &second), vec!["Review", "2016 Hugos"]);

        let empty: Vec<&str> = Vec::new();
        assert_eq!(set_difference(&first, &first), empty);
        assert_eq!(set_difference(&[], &second), empty);
    }
}
