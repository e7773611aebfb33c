//! Per-repository fetch orchestration
//!
//! Drives the API client, README parser, and comment extractor to build one
//! complete `RepositoryRecord`. Fetching is strictly sequential; the first
//! failing call (other than a missing README) aborts the repository and no
//! partial record is returned.

use tracing::{debug, info};
use url::Url;

use gitopics_core::{ErrorContext, GitopicsError, GitopicsResult, RepositoryRecord};

use crate::api::{ApiClientConfig, GitHubApiClient};
use crate::comments::CommentExtractor;
use crate::filter::{CommentFilter, LicenseFilter};
use crate::readme::parse_readme_page;

/// Fetches repository data and assembles repository records
pub struct RepositoryFetcher {
    client: GitHubApiClient,
    extractor: CommentExtractor,
    filters: Vec<Box<dyn CommentFilter>>,
}

impl RepositoryFetcher {
    /// Create a fetcher with the standard license/copyright comment filter
    pub fn new(config: ApiClientConfig) -> GitopicsResult<Self> {
        Ok(Self {
            client: GitHubApiClient::new(config)?,
            extractor: CommentExtractor::new(),
            filters: vec![Box::new(LicenseFilter)],
        })
    }

    /// Fetch everything the corpus needs for one repository
    pub async fn fetch(&self, repo_url: &str) -> GitopicsResult<RepositoryRecord> {
        let (owner, repo) = parse_repo_url(repo_url)?;
        info!(owner = %owner, repo = %repo, "Fetching repository data");

        let metadata = self.client.get_repository(&owner, &repo).await?;

        let issues = if metadata.has_issues {
            self.client.get_issues(&owner, &repo).await?
        } else {
            Vec::new()
        };

        let languages = self.client.get_languages(&metadata.languages_url).await?;
        let readme_text = self.fetch_readme_text(&owner, &repo).await?;
        let commit_messages = self.client.get_commit_messages(&owner, &repo).await?;

        let tarball = self.client.get_tarball(&owner, &repo).await?;
        let per_file = self.extractor.extract(&tarball, &self.filters)?;
        let filenames: Vec<String> = per_file.keys().cloned().collect();
        let comments: Vec<String> = per_file.into_values().flatten().collect();

        info!(
            issues = issues.len(),
            commits = commit_messages.len(),
            commented_files = filenames.len(),
            "Assembled repository record for {}/{}",
            owner,
            repo
        );

        Ok(RepositoryRecord {
            gh_id: metadata.id,
            name: metadata.name,
            description: metadata.description.unwrap_or_default(),
            owner_name: metadata.owner.login,
            languages,
            readme_text,
            issues,
            commit_messages,
            filenames,
            comments,
        })
    }

    /// README text for the repository; "" when no README exists
    async fn fetch_readme_text(&self, owner: &str, repo: &str) -> GitopicsResult<String> {
        match self.client.get_readme_html_url(owner, repo).await? {
            None => Ok(String::new()),
            Some(html_url) => {
                debug!(owner = %owner, repo = %repo, "Parsing rendered README");
                let page = self.client.fetch_page_html(&html_url).await?;
                Ok(parse_readme_page(&page))
            }
        }
    }
}

/// Extract owner and repository name from a repository URL.
///
/// The owner and name are the last two non-empty path segments, so plain
/// `https://github.com/owner/repo` URLs and deeper mirror paths both work.
pub fn parse_repo_url(repo_url: &str) -> GitopicsResult<(String, String)> {
    let parsed = Url::parse(repo_url).map_err(|e| GitopicsError::Validation {
        message: format!("Invalid repository URL '{}': {}", repo_url, e),
        field: Some("repo_url".to_string()),
        context: ErrorContext::new("fetcher")
            .with_operation("parse_repo_url")
            .with_suggestion("Pass a full URL like https://github.com/owner/repo"),
    })?;

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    if segments.len() < 2 {
        return Err(GitopicsError::Validation {
            message: format!(
                "Repository URL '{}' does not contain an owner and name",
                repo_url
            ),
            field: Some("repo_url".to_string()),
            context: ErrorContext::new("fetcher")
                .with_operation("parse_repo_url")
                .with_suggestion("Pass a full URL like https://github.com/owner/repo"),
        });
    }

    Ok((
        segments[segments.len() - 2].to_string(),
        segments[segments.len() - 1].to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_owner_and_repo_from_url() {
        let (owner, repo) = parse_repo_url("https://github.com/rust-lang/rust").unwrap();
        assert_eq!(owner, "rust-lang");
        assert_eq!(repo, "rust");
    }

    #[test]
    fn trailing_slashes_are_ignored() {
        let (owner, repo) = parse_repo_url("https://github.com/octocat/Hello-World/").unwrap();
        assert_eq!(owner, "octocat");
        assert_eq!(repo, "Hello-World");
    }

    #[test]
    fn last_two_segments_win_on_deep_paths() {
        let (owner, repo) =
            parse_repo_url("https://mirror.example.com/github/octocat/Hello-World").unwrap();
        assert_eq!(owner, "octocat");
        assert_eq!(repo, "Hello-World");
    }

    #[test]
    fn urls_without_two_segments_are_rejected() {
        assert!(parse_repo_url("https://github.com/").is_err());
        assert!(parse_repo_url("https://github.com/just-owner").is_err());
        assert!(parse_repo_url("not a url").is_err());
    }

    #[tokio::test]
    async fn fetcher_construction_succeeds() {
        let fetcher = RepositoryFetcher::new(ApiClientConfig::github(None));
        assert!(fetcher.is_ok());
    }
}
