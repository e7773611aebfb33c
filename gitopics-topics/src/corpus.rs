//! Corpus assembly for the topic model
//!
//! Merges a repository record's text fields into one cleaned full-text
//! string, the sole input the topic model sees.

use gitopics_core::{RepositoryRecord, TextField};

/// Assemble one corpus text per record, preserving input order
pub fn assemble(records: &[RepositoryRecord]) -> Vec<String> {
    records.iter().map(corpus_text).collect()
}

/// Corpus text for a single repository.
///
/// The primary text is description + readme + file names. When all three are
/// empty the concatenation collapses to the bare `". "` separator, and the
/// commit messages stand in instead.
pub fn corpus_text(record: &RepositoryRecord) -> String {
    let full_text = format!(
        "{}. {}{}",
        record.text_field(TextField::Description),
        record.text_field(TextField::Readme),
        record.text_field(TextField::Filenames),
    );

    let full_text = if full_text == ". " {
        record.text_field(TextField::Commits)
    } else {
        full_text
    };

    clean(&full_text)
}

/// Collapse whitespace runs to single spaces and trim the ends
fn clean(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
