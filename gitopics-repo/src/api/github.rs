//! GitHub API client implementation

use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

use gitopics_core::{ErrorContext, GitopicsError, GitopicsResult, IssueRecord};

use super::{create_http_client, handle_response_error, ApiClientConfig};

/// GitHub API client
///
/// One client instance serves a whole run; every request carries the same
/// bearer token and user agent.
pub struct GitHubApiClient {
    client: reqwest::Client,
    config: ApiClientConfig,
}

/// GitHub repository response
#[derive(Debug, Deserialize)]
pub struct GitHubRepository {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub owner: GitHubOwner,
    pub has_issues: bool,
    pub languages_url: String,
}

/// Owner sub-object of a repository response
#[derive(Debug, Deserialize)]
pub struct GitHubOwner {
    pub login: String,
}

/// GitHub issue response
#[derive(Debug, Deserialize)]
struct GitHubIssue {
    title: String,
    body: Option<String>,
    comments_url: String,
}

/// GitHub issue comment response
#[derive(Debug, Deserialize)]
struct GitHubIssueComment {
    body: Option<String>,
}

/// GitHub commit-list entry
#[derive(Debug, Deserialize)]
pub(crate) struct GitHubCommit {
    pub(crate) commit: GitHubCommitDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GitHubCommitDetail {
    pub(crate) message: String,
}

/// GitHub README response
#[derive(Debug, Deserialize)]
struct GitHubReadme {
    html_url: String,
}

impl GitHubApiClient {
    /// Create a new GitHub API client
    pub fn new(config: ApiClientConfig) -> GitopicsResult<Self> {
        let client = create_http_client(&config)?;

        info!("Created GitHub API client for {}", config.base_url);

        Ok(Self { client, config })
    }

    /// Create authorization headers
    fn auth_headers(&self) -> reqwest::header::HeaderMap {
        let mut headers = reqwest::header::HeaderMap::new();

        if let Some(ref token) = self.config.access_token {
            if let Ok(auth_value) =
                reqwest::header::HeaderValue::from_str(&format!("token {}", token))
            {
                headers.insert(reqwest::header::AUTHORIZATION, auth_value);
            }
        }

        // GitHub API version
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github.v3+json"),
        );

        headers
    }

    /// Make an authorized GET request to an absolute API URL.
    ///
    /// Any non-success status is mapped to a fatal repository error.
    async fn get(&self, url: &str) -> GitopicsResult<reqwest::Response> {
        debug!("Making GitHub API request to: {}", url);

        let response = self
            .client
            .get(url)
            .headers(self.auth_headers())
            .send()
            .await
            .map_err(|e| GitopicsError::Repository {
                message: format!("Failed to make request to GitHub API: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("github_api_client").with_operation("get"),
            })?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "github_api_request").await);
        }

        Ok(response)
    }

    /// Make an authorized GET request to an endpoint under the base URL
    async fn get_endpoint(&self, endpoint: &str) -> GitopicsResult<reqwest::Response> {
        let url = format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        self.get(&url).await
    }

    /// Fetch repository metadata
    pub async fn get_repository(
        &self,
        owner: &str,
        repo: &str,
    ) -> GitopicsResult<GitHubRepository> {
        info!("Fetching GitHub repository metadata for {}/{}", owner, repo);

        let endpoint = format!("repos/{}/{}", owner, repo);
        let response = self.get_endpoint(&endpoint).await?;

        response
            .json()
            .await
            .map_err(|e| GitopicsError::Repository {
                message: format!("Failed to parse repository metadata: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("github_api_client").with_operation("get_repository"),
            })
    }

    /// Fetch the language byte-count table from a repository's languages URL
    pub async fn get_languages(&self, languages_url: &str) -> GitopicsResult<BTreeMap<String, u64>> {
        let response = self.get(languages_url).await?;

        response
            .json()
            .await
            .map_err(|e| GitopicsError::Repository {
                message: format!("Failed to parse language table: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("github_api_client").with_operation("get_languages"),
            })
    }

    /// Fetch the open issues of a repository together with their comment threads
    pub async fn get_issues(&self, owner: &str, repo: &str) -> GitopicsResult<Vec<IssueRecord>> {
        let endpoint = format!("repos/{}/{}/issues", owner, repo);
        let response = self.get_endpoint(&endpoint).await?;

        let issues: Vec<GitHubIssue> =
            response
                .json()
                .await
                .map_err(|e| GitopicsError::Repository {
                    message: format!("Failed to parse issue list: {}", e),
                    source: Some(Box::new(e)),
                    context: ErrorContext::new("github_api_client").with_operation("get_issues"),
                })?;

        let mut records = Vec::with_capacity(issues.len());
        for issue in issues {
            let comments = self.get_issue_comments(&issue.comments_url).await?;
            records.push(IssueRecord::new(
                issue.title,
                issue.body.unwrap_or_default(),
                comments,
            ));
        }

        info!(
            "Retrieved {} issues from GitHub repository {}/{}",
            records.len(),
            owner,
            repo
        );
        Ok(records)
    }

    /// Fetch the comment bodies of one issue
    async fn get_issue_comments(&self, comments_url: &str) -> GitopicsResult<Vec<String>> {
        let response = self.get(comments_url).await?;

        let comments: Vec<GitHubIssueComment> =
            response
                .json()
                .await
                .map_err(|e| GitopicsError::Repository {
                    message: format!("Failed to parse issue comments: {}", e),
                    source: Some(Box::new(e)),
                    context: ErrorContext::new("github_api_client")
                        .with_operation("get_issue_comments"),
                })?;

        Ok(comments
            .into_iter()
            .map(|comment| comment.body.unwrap_or_default())
            .collect())
    }

    /// Resolve the browsable URL of the repository's rendered README.
    ///
    /// A missing README is the one recovered condition: 404 yields `None`
    /// instead of an error.
    pub async fn get_readme_html_url(
        &self,
        owner: &str,
        repo: &str,
    ) -> GitopicsResult<Option<String>> {
        debug!("Fetching GitHub README location for {}/{}", owner, repo);

        let url = format!(
            "{}/repos/{}/{}/readme",
            self.config.base_url.trim_end_matches('/'),
            owner,
            repo
        );

        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers())
            .send()
            .await
            .map_err(|e| GitopicsError::Repository {
                message: format!("Failed to make request to GitHub API: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("github_api_client").with_operation("get_readme"),
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!("README not found for {}/{}", owner, repo);
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(handle_response_error(response, "get_readme").await);
        }

        let readme: GitHubReadme =
            response
                .json()
                .await
                .map_err(|e| GitopicsError::Repository {
                    message: format!("Failed to parse README response: {}", e),
                    source: Some(Box::new(e)),
                    context: ErrorContext::new("github_api_client").with_operation("get_readme"),
                })?;

        Ok(Some(readme.html_url))
    }

    /// Fetch a rendered HTML page (no API authentication)
    pub async fn fetch_page_html(&self, url: &str) -> GitopicsResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GitopicsError::Repository {
                message: format!("Failed to fetch page {}: {}", url, e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("github_api_client").with_operation("fetch_page_html"),
            })?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "fetch_page_html").await);
        }

        response.text().await.map_err(|e| GitopicsError::Repository {
            message: format!("Failed to read page body: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("github_api_client").with_operation("fetch_page_html"),
        })
    }

    /// Fetch every commit message of a repository, following `Link` header
    /// pagination until no further page is indicated
    pub async fn get_commit_messages(
        &self,
        owner: &str,
        repo: &str,
    ) -> GitopicsResult<Vec<String>> {
        let mut url = format!(
            "{}/repos/{}/{}/commits",
            self.config.base_url.trim_end_matches('/'),
            owner,
            repo
        );
        let mut messages = Vec::new();

        loop {
            let response = self.get(&url).await?;

            let next = response
                .headers()
                .get(reqwest::header::LINK)
                .and_then(|value| value.to_str().ok())
                .and_then(next_page_url);

            let page: Vec<GitHubCommit> =
                response
                    .json()
                    .await
                    .map_err(|e| GitopicsError::Repository {
                        message: format!("Failed to parse commit list: {}", e),
                        source: Some(Box::new(e)),
                        context: ErrorContext::new("github_api_client")
                            .with_operation("get_commit_messages"),
                    })?;

            messages.extend(page.into_iter().map(|commit| commit.commit.message));

            match next {
                Some(next_url) => url = next_url,
                None => break,
            }
        }

        info!(
            "Retrieved {} commit messages from GitHub repository {}/{}",
            messages.len(),
            owner,
            repo
        );
        Ok(messages)
    }

    /// Download the repository's source tarball
    pub async fn get_tarball(&self, owner: &str, repo: &str) -> GitopicsResult<Vec<u8>> {
        let endpoint = format!("repos/{}/{}/tarball", owner, repo);
        let response = self.get_endpoint(&endpoint).await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GitopicsError::Repository {
                message: format!("Failed to download tarball: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("github_api_client").with_operation("get_tarball"),
            })?;

        debug!(
            "Downloaded {} byte tarball for {}/{}",
            bytes.len(),
            owner,
            repo
        );
        Ok(bytes.to_vec())
    }
}

/// Extract the `rel="next"` target from a `Link` response header, if present.
///
/// Header shape: `<https://...&page=2>; rel="next", <https://...&page=5>; rel="last"`.
pub(crate) fn next_page_url(link_header: &str) -> Option<String> {
    for part in link_header.split(',') {
        let mut segments = part.split(';');
        let target = segments.next()?.trim();
        let is_next = segments.any(|segment| segment.trim() == "rel=\"next\"");
        if is_next {
            return Some(
                target
                    .trim_start_matches('<')
                    .trim_end_matches('>')
                    .to_string(),
            );
        }
    }
    None
}
