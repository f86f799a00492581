//! Domain types shared across feed classification and cross-referencing.

use std::collections::btree_map::{self, BTreeMap};

use thiserror::Error;
use url::Url;

/// Structural kind of a feed entry, taken from its kind category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    Comment,
    Page,
    Post,
    Settings,
    Template,
    /// Kind fragment the taxonomy does not know, kept verbatim for reporting.
    Unrecognized(String),
}

impl ItemKind {
    /// Map a kind-term fragment (the part after `#`) to a variant.
    pub fn parse(fragment: &str) -> Self {
        match fragment {
            "comment" => Self::Comment,
            "page" => Self::Page,
            "post" => Self::Post,
            "settings" => Self::Settings,
            "template" => Self::Template,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::Page => "page",
            Self::Post => "post",
            Self::Settings => "settings",
            Self::Template => "template",
            Self::Unrecognized(_) => "unknown",
        }
    }
}

/// Role a label category plays in the blog's taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Rating,
    Review,
    Blog,
    Other,
}

impl LabelKind {
    /// Case-sensitive match on the label text.
    pub fn parse(label: &str) -> Self {
        match label {
            "Ratings" => Self::Rating,
            "Review" => Self::Review,
            "Blog" => Self::Blog,
            _ => Self::Other,
        }
    }
}

/// Work-length buckets recognized among label categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthCategory {
    ShortStory,
    Novelette,
    Novella,
    Novel,
    Anthology,
    Collection,
}

impl LengthCategory {
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Short Story" => Some(Self::ShortStory),
            "Novelette" => Some(Self::Novelette),
            "Novella" => Some(Self::Novella),
            "Novel" => Some(Self::Novel),
            "Anthology" => Some(Self::Anthology),
            "Collection" => Some(Self::Collection),
            _ => None,
        }
    }
}

/// A review that survived every consistency rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedReview {
    pub title: String,
    /// Label texts in feed order, length and taxonomy labels included.
    pub labels: Vec<String>,
    pub body: String,
}

/// Rejected insertion: the canonical URL is already claimed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("a validated review already exists at {0}")]
pub struct DuplicateUrl(pub Url);

/// Validated reviews keyed by canonical URL.
///
/// Iteration order follows URL ordering, which keeps cross-reference
/// output stable between runs.
#[derive(Debug, Default)]
pub struct ReviewTable {
    inner: BTreeMap<Url, ValidatedReview>,
}

impl ReviewTable {
    /// Insert a review under its canonical URL.
    ///
    /// The first claimant of a URL wins; a second insert is rejected and
    /// the table keeps the original entry.
    pub fn insert(&mut self, url: Url, review: ValidatedReview) -> Result<(), DuplicateUrl> {
        match self.inner.entry(url) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(review);
                Ok(())
            }
            btree_map::Entry::Occupied(slot) => Err(DuplicateUrl(slot.key().clone())),
        }
    }

    pub fn get(&self, url: &Url) -> Option<&ValidatedReview> {
        self.inner.get(url)
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.inner.contains_key(url)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Url, &ValidatedReview)> {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
