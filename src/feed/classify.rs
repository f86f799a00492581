//! Per-item classification: fold an item's links and categories into
//! draft status, kind, taxonomy flags, length category, and rating.

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::config::BlogConfig;
use crate::feed::RawItem;
use crate::model::{ItemKind, LabelKind, LengthCategory};
use crate::report::{Diagnostic, Diagnostics, Tally};

/// Link titles like "3 Comments" name the comment-count widget, not a
/// permalink, and are skipped without comment.
static COMMENT_COUNT_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\S+ Comments$").unwrap()
});

/// Whether the item is published, and where.
///
/// An item is a draft until a link is found whose title exactly matches
/// the item's subject; that link is the canonical permalink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PubState {
    Draft,
    Published { url: Url },
}

/// Everything classification learns about one feed item.
///
/// Built fresh per item and consumed immediately by the rule pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemClassification {
    pub state: PubState,
    /// `None` until a kind category is seen.
    pub kind: Option<ItemKind>,
    pub is_rating: bool,
    pub is_review: bool,
    pub is_blog: bool,
    pub other_labels: usize,
    pub is_anthology: bool,
    pub is_collection: bool,
    pub is_novel: bool,
    pub is_novelette: bool,
    pub is_novella: bool,
    pub is_short_story: bool,
    /// Length-category labels seen, duplicates included. Exactly 1 for a
    /// well-formed review.
    pub category_count: usize,
    pub has_rating: bool,
    /// 0 means "NR" (not rated). Meaningless unless `has_rating`.
    pub rating: u8,
    /// Every label name on the item, in feed order.
    pub labels: Vec<String>,
}

impl ItemClassification {
    fn new() -> Self {
        Self {
            state: PubState::Draft,
            kind: None,
            is_rating: false,
            is_review: false,
            is_blog: false,
            other_labels: 0,
            is_anthology: false,
            is_collection: false,
            is_novel: false,
            is_novelette: false,
            is_novella: false,
            is_short_story: false,
            category_count: 0,
            has_rating: false,
            rating: 0,
            labels: Vec::new(),
        }
    }

    pub fn is_draft(&self) -> bool {
        matches!(self.state, PubState::Draft)
    }

    pub fn canonical_url(&self) -> Option<&Url> {
        match &self.state {
            PubState::Draft => None,
            PubState::Published { url } => Some(url),
        }
    }

    /// Kind name for diagnostic context lines; "unknown" when no kind
    /// category was seen.
    pub fn kind_str(&self) -> &'static str {
        self.kind.as_ref().map_or("unknown", ItemKind::as_str)
    }

    /// An item labeled Review, Blog, and Ratings at once is an
    /// announcement post, not a review; drop the review flags.
    pub fn collapse_announcement(&mut self) {
        if self.is_review && self.is_blog && self.is_rating {
            self.is_review = false;
            self.is_rating = false;
        }
    }
}

/// Classify one item: scan its links for the canonical permalink, then
/// fold every category into the classification.
///
/// Anomalies are reported through `diags` and classification continues;
/// a URL or rating value that cannot be parsed at all is an error.
pub fn classify(
    item: &RawItem,
    cfg: &BlogConfig,
    diags: &mut Diagnostics,
    tally: &mut Tally,
) -> Result<ItemClassification> {
    let mut cls = ItemClassification::new();
    let subject = item.title.as_str();

    // Untitled items never match a permalink and stay drafts.
    if !subject.is_empty() {
        for link in &item.links {
            match link.title.as_deref() {
                None | Some("") | Some("Post Comments") => {}
                Some(title) if title == subject => {
                    let url = Url::parse(&link.href).with_context(|| {
                        format!("bad link URL {:?} on item {subject:?}", link.href)
                    })?;
                    if url.host_str() != Some(cfg.host.as_str()) {
                        diags.push(Diagnostic::error(format!(
                            "Unexpected Host: '{}'",
                            url.host_str().unwrap_or_default()
                        )));
                    }
                    // A later self-titled link overwrites an earlier one.
                    cls.state = PubState::Published { url };
                }
                Some(title) if COMMENT_COUNT_TITLE.is_match(title) => {}
                Some(title) => {
                    diags.push(Diagnostic::error(format!("Unexpected Link Title {title}")));
                }
            }
        }
    }

    for category in &item.categories {
        let scheme = category.scheme.as_deref().unwrap_or_default();
        let name = category.term.as_str();

        if scheme == cfg.kind_scheme {
            match name.split_once('#') {
                Some((prefix, rest)) if prefix == cfg.kind_term_prefix => {
                    // Only the segment before any further '#' names the kind.
                    let fragment = rest.split_once('#').map_or(rest, |(first, _)| first);
                    let kind = ItemKind::parse(fragment);
                    match &kind {
                        ItemKind::Comment => tally.comments += 1,
                        ItemKind::Page => tally.pages += 1,
                        ItemKind::Post => tally.posts += 1,
                        ItemKind::Settings => tally.settings += 1,
                        ItemKind::Template => tally.templates += 1,
                        ItemKind::Unrecognized(fragment) => {
                            diags.push(Diagnostic::error(format!("Unknown Kind: {fragment}")));
                            tally.unrecognized_kinds += 1;
                        }
                    }
                    cls.kind = Some(kind);
                }
                _ => {
                    diags.push(Diagnostic::error(format!("Unknown Name: {name}")));
                }
            }
        } else if scheme == cfg.label_scheme {
            cls.labels.push(name.to_string());
            match LabelKind::parse(name) {
                LabelKind::Rating => {
                    cls.is_rating = true;
                    tally.ratings += 1;
                }
                LabelKind::Review => {
                    cls.is_review = true;
                    tally.reviews += 1;
                }
                LabelKind::Blog => {
                    cls.is_blog = true;
                    tally.blogs += 1;
                }
                LabelKind::Other => {
                    cls.other_labels += 1;
                    tally.others += 1;
                }
            }
            tally.labels += 1;

            // Drafts keep their labels on record but never accumulate
            // length categories or ratings.
            if !cls.is_draft() {
                if let Some(length) = LengthCategory::parse(name) {
                    match length {
                        LengthCategory::Anthology => {
                            cls.is_anthology = true;
                            tally.anthologies += 1;
                        }
                        LengthCategory::Collection => {
                            cls.is_collection = true;
                            tally.collections += 1;
                        }
                        LengthCategory::Novel => {
                            cls.is_novel = true;
                            tally.novels += 1;
                        }
                        LengthCategory::Novelette => {
                            cls.is_novelette = true;
                            tally.novelettes += 1;
                        }
                        LengthCategory::Novella => {
                            cls.is_novella = true;
                            tally.novellas += 1;
                        }
                        LengthCategory::ShortStory => {
                            cls.is_short_story = true;
                            tally.short_stories += 1;
                        }
                    }
                    cls.category_count += 1;
                }

                let mut fields = name.split(':');
                if fields.next() == Some("Rating") {
                    if cls.has_rating {
                        diags.push(Diagnostic::error(format!(
                            "Two Ratings for one review! {scheme}\t{}\t{name}",
                            category.label.as_deref().unwrap_or_default()
                        )));
                    }
                    cls.has_rating = true;
                    let value = match fields.next() {
                        Some(value) => value,
                        None => bail!("rating label {name:?} on item {subject:?} has no value"),
                    };
                    let stars: u8 = if value == " NR" {
                        0
                    } else {
                        value.trim().parse().with_context(|| {
                            format!("bad rating in label {name:?} on item {subject:?}")
                        })?
                    };
                    if stars > 5 {
                        bail!("rating {stars} out of range in label {name:?} on item {subject:?}");
                    }
                    cls.rating = stars;
                    tally.rating_stars[stars as usize] += 1;
                }
            }
        } else {
            diags.push(Diagnostic::error(format!(
                "Unknown Scheme: {scheme}\t{}\t{name}",
                category.label.as_deref().unwrap_or_default()
            )));
        }
    }

    Ok(cls)
}
