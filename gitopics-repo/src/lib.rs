//! Gitopics Repository - GitHub data collection
//!
//! Fetches repository metadata, issues, README text, commit messages, and
//! source-archive comments, and assembles them into repository records for
//! corpus assembly.

pub mod api;
pub mod comments;
pub mod fetcher;
pub mod filter;
pub mod readme;

pub use api::{ApiClientConfig, GitHubApiClient};
pub use comments::{Comment, CommentExtractor, SourceLanguage};
pub use fetcher::{parse_repo_url, RepositoryFetcher};
pub use filter::{CommentFilter, LicenseFilter};
pub use readme::parse_readme_page;
