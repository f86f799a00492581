//! Consistency rules: the checks an item must pass after classification,
//! and admission of surviving reviews into the table.

use crate::feed::{ItemClassification, PubState, RawItem};
use crate::model::{ItemKind, ReviewTable, ValidatedReview};
use crate::report::{Diagnostic, Diagnostics, Tally};

/// Run every consistency rule over one classified item and, if it is a
/// review, attempt to admit it into the table.
///
/// Rule order matters only for output stability; no rule short-circuits
/// another, and admission is attempted even after failed checks so that
/// the cross-reference phase sees every claimed URL.
pub fn enforce(
    item: &RawItem,
    cls: &mut ItemClassification,
    nonreview: bool,
    table: &mut ReviewTable,
    diags: &mut Diagnostics,
    tally: &mut Tally,
) {
    let subject = item.title.as_str();
    let has_labels = !cls.labels.is_empty();

    if !matches!(cls.kind, Some(ItemKind::Post)) && has_labels {
        diags.push(
            Diagnostic::error("Label(s) on a non-post!").with_entry(cls.kind_str(), subject),
        );
    }

    if cls.is_draft() {
        if has_labels {
            diags.push(
                Diagnostic::warning("Label(s) on a draft").with_entry(cls.kind_str(), subject),
            );
        }
        match cls.kind {
            Some(ItemKind::Page) => tally.page_drafts += 1,
            Some(ItemKind::Post) => tally.post_drafts += 1,
            _ => {}
        }
        return;
    }

    cls.collapse_announcement();

    if cls.is_review {
        if cls.category_count == 0 {
            diags.push(
                Diagnostic::error("Review has no category!").with_entry(cls.kind_str(), subject),
            );
        }
        if cls.category_count > 1 {
            diags.push(
                Diagnostic::error(format!("Review has {} categories!", cls.category_count))
                    .with_entry(cls.kind_str(), subject),
            );
        }
        if !cls.has_rating {
            diags.push(
                Diagnostic::error("Review has no rating!").with_entry(cls.kind_str(), subject),
            );
        }
        if cls.is_blog {
            diags.push(Diagnostic::error("Review is a blog!").with_entry(cls.kind_str(), subject));
        }
        // Anthology and collection reviews are scored through the
        // "Ratings" label; single-work reviews must not be.
        if cls.is_anthology || cls.is_collection {
            if !cls.is_rating {
                diags.push(
                    Diagnostic::error("Anthology/Collection Review is not a Rating!")
                        .with_entry(cls.kind_str(), subject),
                );
            }
        } else if cls.is_rating {
            diags.push(
                Diagnostic::error("Non Anthology/Collection Review is a Rating!")
                    .with_entry(cls.kind_str(), subject),
            );
        }

        // Admission happens regardless of failed checks above, so the
        // cross-reference phase still sees this URL.
        if let PubState::Published { url } = &cls.state {
            let review = ValidatedReview {
                title: subject.to_string(),
                labels: cls.labels.clone(),
                body: item.body.clone(),
            };
            if table.insert(url.clone(), review).is_err() {
                diags.push(
                    Diagnostic::error(format!("Syndicated Item already exists at {url}!"))
                        .with_entry(cls.kind_str(), subject),
                );
            }
        }
    } else {
        if nonreview
            && matches!(cls.kind, Some(ItemKind::Post))
            && !cls.is_blog
            && !cls.is_rating
        {
            if let Some(url) = cls.canonical_url() {
                diags.push(Diagnostic::note(format!(
                    "{}\t{subject}\t{url}",
                    cls.kind_str()
                )));
            }
        }
        if cls.category_count != 0 {
            diags.push(
                Diagnostic::error(format!(
                    "Non-Review has {} categories!",
                    cls.category_count
                ))
                .with_entry(cls.kind_str(), subject),
            );
        }
        if cls.has_rating {
            diags.push(
                Diagnostic::error(format!("Non-Review has rating {}!", cls.rating))
                    .with_entry(cls.kind_str(), subject),
            );
        }
    }
}
