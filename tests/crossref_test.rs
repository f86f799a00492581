use blog_audit::config::LedgerConfig;
use blog_audit::crossref::reconcile;
use blog_audit::model::{ReviewTable, ValidatedReview};
use blog_audit::report::{Diagnostics, Severity};
use blog_audit::sheet::{column_index, SheetSource};
use url::Url;

struct MemSheet {
    rows: Vec<Vec<String>>,
}

impl SheetSource for MemSheet {
    fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let value = self.rows.get(row.checked_sub(1)?)?.get(column_index(column)?)?;
        if value.is_empty() {
            None
        } else {
            Some(value.as_str())
        }
    }
}

/// Build a ledger row with the audited columns (A, H, AE, AF, AT) filled.
fn ledger_row(title: &str, year: &str, blog_title: &str, labels: &str, link: &str) -> Vec<String> {
    let mut row = vec![String::new(); 46];
    row[0] = title.to_string();
    row[7] = year.to_string();
    row[30] = blog_title.to_string();
    row[31] = labels.to_string();
    row[45] = link.to_string();
    row
}

fn review(title: &str, labels: &[&str]) -> ValidatedReview {
    ValidatedReview {
        title: title.to_string(),
        labels: labels.iter().map(|s| s.to_string()).collect(),
        body: String::new(),
    }
}

fn url(path: &str) -> Url {
    Url::parse(&format!("https://www.rocketstackrank.com{path}")).unwrap()
}

/// Rows start at 1 in these tests; the production layout with two header
/// rows is covered separately.
fn test_cfg() -> LedgerConfig {
    LedgerConfig {
        first_data_row: 1,
        ..Default::default()
    }
}

fn run(sheet: &MemSheet, cfg: &LedgerConfig, reviews: &ReviewTable) -> Diagnostics {
    let mut diags = Diagnostics::default();
    reconcile(sheet, cfg, reviews, &mut diags).unwrap();
    diags
}

fn messages(diags: &Diagnostics, severity: Severity) -> Vec<&str> {
    diags
        .iter()
        .filter(|d| d.severity == severity)
        .map(|d| d.message.as_str())
        .collect()
}

#[test]
fn matching_row_and_review_report_nothing() {
    let story_url = url("/2016/08/tuesdays-with-molakesh.html");
    let mut reviews = ReviewTable::default();
    reviews
        .insert(
            story_url.clone(),
            review("Tuesdays With Molakesh", &["Review", "Short Story", "Rating: 4"]),
        )
        .unwrap();

    let sheet = MemSheet {
        rows: vec![ledger_row(
            "Tuesdays with Molakesh the Destroyer",
            "2016",
            "Tuesdays With Molakesh",
            "Review, Short Story, Rating: 4",
            story_url.as_str(),
        )],
    };

    let diags = run(&sheet, &test_cfg(), &reviews);
    assert!(diags.is_empty(), "{diags:?}");
}

#[test]
fn sheet_url_missing_from_blog_is_reported() {
    let sheet = MemSheet {
        rows: vec![ledger_row(
            "Ghost Story",
            "2016",
            "",
            "",
            "https://www.rocketstackrank.com/2016/09/ghost-story.html",
        )],
    };

    let diags = run(&sheet, &test_cfg(), &ReviewTable::default());
    assert_eq!(
        messages(&diags, Severity::Error),
        vec!["Spreadsheet contains URL https://www.rocketstackrank.com/2016/09/ghost-story.html not in blog: Ghost Story"]
    );
}

#[test]
fn blog_url_missing_from_sheet_is_reported() {
    let story_url = url("/2016/10/orphan.html");
    let mut reviews = ReviewTable::default();
    reviews
        .insert(story_url.clone(), review("Orphan", &["Review"]))
        .unwrap();

    let sheet = MemSheet { rows: Vec::new() };
    let diags = run(&sheet, &test_cfg(), &reviews);
    assert_eq!(
        messages(&diags, Severity::Error),
        vec![format!("Blog contains URL {story_url} not in spreadsheet: Orphan").as_str()]
    );
}

#[test]
fn label_differences_are_reported_both_ways() {
    let story_url = url("/2016/11/labels.html");
    let mut reviews = ReviewTable::default();
    reviews
        .insert(
            story_url.clone(),
            review("Labels", &["Review", "Novel", "2016 Hugos"]),
        )
        .unwrap();

    let sheet = MemSheet {
        rows: vec![ledger_row(
            "Labels",
            "2016",
            "Labels",
            "Review, Novelette",
            story_url.as_str(),
        )],
    };

    let diags = run(&sheet, &test_cfg(), &reviews);
    assert_eq!(
        messages(&diags, Severity::Error),
        vec![
            format!("Blog contains label Novel not in spreadsheet: {story_url} Labels").as_str(),
            format!("Blog contains label 2016 Hugos not in spreadsheet: {story_url} Labels")
                .as_str(),
        ]
    );
    assert_eq!(
        messages(&diags, Severity::Warning),
        vec![format!("Spreadsheet contains label Novelette not in blog: {story_url} Labels")
            .as_str()]
    );
}

#[test]
fn reverse_label_listing_needs_a_forward_difference() {
    let story_url = url("/2016/12/subset.html");
    let mut reviews = ReviewTable::default();
    reviews
        .insert(story_url.clone(), review("Subset", &["Review"]))
        .unwrap();

    // Ledger carries extra labels; the blog being a subset is normal.
    let sheet = MemSheet {
        rows: vec![ledger_row(
            "Subset",
            "2016",
            "Subset",
            "Review, Novelette, 2016 Hugos",
            story_url.as_str(),
        )],
    };

    let diags = run(&sheet, &test_cfg(), &reviews);
    assert!(diags.is_empty(), "{diags:?}");
}

#[test]
fn duplicate_ledger_links_are_reported_once_joined() {
    let story_url = url("/2017/01/twice-listed.html");
    let mut reviews = ReviewTable::default();
    reviews
        .insert(story_url.clone(), review("Twice Listed", &["Review"]))
        .unwrap();

    let sheet = MemSheet {
        rows: vec![
            ledger_row("Twice Listed", "2017", "Twice Listed", "Review", story_url.as_str()),
            ledger_row("Also Listed", "2017", "Twice Listed", "Review", story_url.as_str()),
        ],
    };

    let diags = run(&sheet, &test_cfg(), &reviews);
    assert_eq!(
        messages(&diags, Severity::Error),
        vec![format!(
            "Unexpected Duplicate Url: {story_url} is used for Also Listed and Twice Listed"
        )
        .as_str()]
    );
}

#[test]
fn reprint_rows_are_excluded_from_the_join() {
    let story_url = url("/2017/02/classic.html");
    let mut reviews = ReviewTable::default();
    reviews
        .insert(story_url.clone(), review("Classic", &["Review"]))
        .unwrap();

    // Year 2011 is below the cutoff, so the row is a reprint and does
    // not participate even though its link matches.
    let sheet = MemSheet {
        rows: vec![ledger_row("Classic", "2011", "Classic", "Review", story_url.as_str())],
    };

    let diags = run(&sheet, &test_cfg(), &reviews);
    assert_eq!(
        messages(&diags, Severity::Error),
        vec![format!("Blog contains URL {story_url} not in spreadsheet: Classic").as_str()]
    );
}

#[test]
fn linkless_rows_are_simply_not_reviewed() {
    let sheet = MemSheet {
        rows: vec![ledger_row("Unreviewed Story", "2017", "", "", "")],
    };

    let diags = run(&sheet, &test_cfg(), &ReviewTable::default());
    assert!(diags.is_empty(), "{diags:?}");
}

#[test]
fn unparsable_year_aborts_the_scan() {
    let sheet = MemSheet {
        rows: vec![ledger_row("Bad Year", "late 2011", "", "", "")],
    };

    let mut diags = Diagnostics::default();
    let err = reconcile(&sheet, &test_cfg(), &ReviewTable::default(), &mut diags).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("row 1"));
    assert!(message.contains("column H"));
}

#[test]
fn scan_stops_at_first_blank_title() {
    let cfg = LedgerConfig::default();
    assert_eq!(cfg.first_data_row, 3);

    let mut header = vec![String::new(); 46];
    header[0] = "Title".to_string();
    let blank = vec![String::new(); 46];
    // A row past the blank terminator would be an error if it were read.
    let stray = ledger_row(
        "Stray",
        "2017",
        "",
        "",
        "https://www.rocketstackrank.com/2017/03/stray.html",
    );

    let sheet = MemSheet {
        rows: vec![
            header.clone(),
            header,
            ledger_row("Only Row", "2017", "", "", ""),
            blank,
            stray,
        ],
    };

    let diags = run(&sheet, &cfg, &ReviewTable::default());
    assert!(diags.is_empty(), "{diags:?}");
}

#[test]
fn ledger_blog_title_must_match_the_blog() {
    let story_url = url("/2017/04/renamed.html");
    let mut reviews = ReviewTable::default();
    reviews
        .insert(story_url.clone(), review("New Title", &["Review"]))
        .unwrap();

    let sheet = MemSheet {
        rows: vec![ledger_row("Renamed", "2017", "Old Title", "Review", story_url.as_str())],
    };

    let diags = run(&sheet, &test_cfg(), &reviews);
    assert_eq!(
        messages(&diags, Severity::Error),
        vec![format!(
            "Spreadsheet blog title 'Old Title' does not match blog: {story_url} New Title"
        )
        .as_str()]
    );

    // A row with no blog-title cell is not checked.
    let sheet = MemSheet {
        rows: vec![ledger_row("Renamed", "2017", "", "Review", story_url.as_str())],
    };
    let diags = run(&sheet, &test_cfg(), &reviews);
    assert!(diags.is_empty(), "{diags:?}");
}
