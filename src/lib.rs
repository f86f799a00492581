//! Cross-validation of a review blog's Atom export against its ledger
//! spreadsheet.

pub mod config;
pub mod crossref;
pub mod feed;
pub mod model;
pub mod report;
pub mod sheet;
