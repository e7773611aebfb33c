//! Core data type definitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single repository issue with its discussion thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    /// Issue title
    pub title: String,
    /// Issue body text
    pub body: String,
    /// Comment bodies, in thread order
    pub comments: Vec<String>,
}

impl IssueRecord {
    pub fn new(title: String, body: String, comments: Vec<String>) -> Self {
        Self {
            title,
            body,
            comments,
        }
    }
}

/// Aggregate record for one fetched repository.
///
/// Constructed once by the fetcher from multiple API responses and read-only
/// afterward. Two records are equal when their `gh_id` matches, regardless of
/// the remaining content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryRecord {
    /// Numeric repository identifier, immutable once fetched
    pub gh_id: u64,
    /// Repository name
    pub name: String,
    /// Repository description ("" when the repository has none)
    pub description: String,
    /// Login of the owning user or organization
    pub owner_name: String,
    /// Language name -> byte count (order irrelevant)
    pub languages: BTreeMap<String, u64>,
    /// Cleaned README text ("" when no README exists)
    pub readme_text: String,
    /// Issues with their comment threads
    pub issues: Vec<IssueRecord>,
    /// Commit messages in page order
    pub commit_messages: Vec<String>,
    /// Humanized names of the source files whose comments were extracted
    pub filenames: Vec<String>,
    /// Extracted source comments, in archive order
    pub comments: Vec<String>,
}

impl PartialEq for RepositoryRecord {
    fn eq(&self, other: &Self) -> bool {
        self.gh_id == other.gh_id
    }
}

impl Eq for RepositoryRecord {}

impl std::hash::Hash for RepositoryRecord {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.gh_id.hash(state);
    }
}

impl fmt::Display for RepositoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}: {} - {}",
            self.gh_id, self.owner_name, self.name, self.description
        )
    }
}

/// Closed set of named text fields a repository record flattens into.
///
/// Downstream consumers address record text through this enum instead of an
/// ad hoc string-keyed mapping, so a typo in a field name cannot silently
/// produce empty corpus text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextField {
    Description,
    Readme,
    Filenames,
    Commits,
    Issues,
    Comments,
}

impl TextField {
    pub const ALL: [TextField; 6] = [
        TextField::Description,
        TextField::Readme,
        TextField::Filenames,
        TextField::Commits,
        TextField::Issues,
        TextField::Comments,
    ];

    /// Stable field name used in flattened output
    pub fn name(&self) -> &'static str {
        match self {
            TextField::Description => "description",
            TextField::Readme => "readme_text",
            TextField::Filenames => "filenames",
            TextField::Commits => "commits_text",
            TextField::Issues => "issues_text",
            TextField::Comments => "comments_text",
        }
    }
}

impl RepositoryRecord {
    /// Render one named text field.
    ///
    /// Filenames join with single spaces; commit messages, issue bodies, and
    /// comments join with newlines.
    pub fn text_field(&self, field: TextField) -> String {
        match field {
            TextField::Description => self.description.clone(),
            TextField::Readme => self.readme_text.clone(),
            TextField::Filenames => self.filenames.join(" "),
            TextField::Commits => self.commit_messages.join("\n"),
            TextField::Issues => self
                .issues
                .iter()
                .map(|issue| issue.body.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
            TextField::Comments => self.comments.join("\n"),
        }
    }

    /// Flatten the record into its full named-text-field mapping
    pub fn text_fields(&self) -> BTreeMap<&'static str, String> {
        TextField::ALL
            .iter()
            .map(|field| (field.name(), self.text_field(*field)))
            .collect()
    }

    /// Language table rendered as `name: bytes` entries joined by `|`
    pub fn languages_text(&self) -> String {
        self.languages
            .iter()
            .map(|(language, num_bytes)| format!("{}: {}", language, num_bytes))
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Browsable URL of the repository
    pub fn source_url(&self) -> String {
        format!("https://www.github.com/{}/{}", self.owner_name, self.name)
    }
}
