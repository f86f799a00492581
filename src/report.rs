//! Diagnostic records and aggregate counters for a validation run.
//!
//! Findings are collected as an ordered sequence of structured records
//! rather than a running counter, so callers can assert on individual
//! findings and the error total is derived after the fact.

use std::fmt;

/// How a finding affects the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Counts toward the final error total.
    Error,
    /// Reported but not counted.
    Warning,
    /// Informational listing, gated by CLI flags at emission time.
    Note,
}

/// One validation finding, tied to a feed entry when one is at fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Kind and subject of the offending feed entry, when known.
    pub entry: Option<(String, String)>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            entry: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            entry: None,
        }
    }

    pub fn note(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Note,
            message: message.into(),
            entry: None,
        }
    }

    /// Attach the kind and subject of the feed entry this finding points at.
    pub fn with_entry(mut self, kind: &str, subject: &str) -> Self {
        self.entry = Some((kind.to_string(), subject.to_string()));
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some((kind, subject)) = &self.entry {
            write!(f, "\n{kind}\t{subject}")?;
        }
        Ok(())
    }
}

/// Ordered collection of findings from one pass.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// Number of `Error`-severity findings.
    pub fn error_count(&self) -> usize {
        self.items
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Print every finding as line-oriented text, in emission order.
    pub fn print(&self) {
        for diagnostic in &self.items {
            println!("{diagnostic}");
        }
    }
}

/// Classification outcome counters for the verbose summary.
///
/// Purely observational; no rule reads these back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    pub templates: usize,
    pub settings: usize,
    pub pages: usize,
    pub posts: usize,
    pub comments: usize,
    pub unrecognized_kinds: usize,
    /// All labels seen, drafts included.
    pub labels: usize,
    pub ratings: usize,
    pub reviews: usize,
    pub blogs: usize,
    pub others: usize,
    pub short_stories: usize,
    pub novelettes: usize,
    pub novellas: usize,
    pub novels: usize,
    pub anthologies: usize,
    pub collections: usize,
    pub post_drafts: usize,
    pub page_drafts: usize,
    /// Ratings seen per star value, 0 ("NR") through 5.
    pub rating_stars: [usize; 6],
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Templates:\t{}", self.templates)?;
        writeln!(f, "Settings:\t{}", self.settings)?;
        writeln!(f, "Pages:\t{}", self.pages)?;
        writeln!(f, "Posts:\t{}", self.posts)?;
        writeln!(f, "Comments:\t{}", self.comments)?;
        writeln!(f, "Unrecognized:\t{}", self.unrecognized_kinds)?;
        writeln!(f, "Labels:\t{}", self.labels)?;
        writeln!(f, " Ratings:\t{}", self.ratings)?;
        writeln!(f, " Reviews:\t{}", self.reviews)?;
        writeln!(f, "  Short Stories:\t{}", self.short_stories)?;
        writeln!(f, "  Novelettes:\t{}", self.novelettes)?;
        writeln!(f, "  Novellas:\t{}", self.novellas)?;
        writeln!(f, "  Novels:\t{}", self.novels)?;
        writeln!(f, "  Anthologies:\t{}", self.anthologies)?;
        writeln!(f, "  Collections:\t{}", self.collections)?;
        writeln!(f, " Blogs:\t{}", self.blogs)?;
        writeln!(f, " Others:\t{}", self.others)?;
        writeln!(f, "Post Drafts:\t{}", self.post_drafts)?;
        writeln!(f, "Page Drafts:\t{}", self.page_drafts)?;
        for (stars, count) in self.rating_stars.iter().enumerate() {
            writeln!(f, "Rating: {stars}\t{count}")?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_count_ignores_warnings_and_notes() {
        let mut diags = Diagnostics::default();
        diags.push(Diagnostic::error("bad"));
        diags.push(Diagnostic::warning("odd"));
        diags.push(Diagnostic::note("fyi"));
        diags.push(Diagnostic::error("worse"));
        assert_eq!(diags.len(), 4);
        assert_eq!(diags.error_count(), 2);
    }

    #[test]
    fn diagnostic_display_includes_entry_context() {
        let plain = Diagnostic::error("Unknown Kind: widget");
        assert_eq!(plain.to_string(), "Unknown Kind: widget");

        let with_entry = Diagnostic::error("Review has no rating!").with_entry("post", "My Review");
        assert_eq!(
            with_entry.to_string(),
            "Review has no rating!\npost\tMy Review"
        );
    }

    #[test]
    fn tally_display_lists_rating_buckets() {
        let mut tally = Tally::default();
        tally.rating_stars[4] = 7;
        let dump = tally.to_string();
        assert!(dump.contains("Rating: 4\t7"));
        assert!(dump.contains("Rating: 0\t0"));
        assert!(dump.ends_with("Rating: 5\t0\n\n"));
    }
}
