//! Tests for the API client

use super::github::{next_page_url, GitHubCommit};
use super::*;

#[test]
fn test_api_client_config_creation() {
    let config = ApiClientConfig::github(Some("test_token".to_string()));
    assert_eq!(config.base_url, "https://api.github.com");
    assert_eq!(config.access_token, Some("test_token".to_string()));

    let settings = gitopics_core::ApiConfig {
        base_url: "https://github.example.com/api/v3/".to_string(),
        user_agent: "gitopics-test/0.1".to_string(),
        timeout_seconds: 10,
    };
    let config = ApiClientConfig::from_settings(&settings, None);
    assert_eq!(config.base_url, "https://github.example.com/api/v3");
    assert_eq!(config.user_agent, "gitopics-test/0.1");
    assert_eq!(config.timeout_seconds, 10);

    let config = ApiClientConfig::github(None).with_timeout(60);
    assert_eq!(config.timeout_seconds, 60);
}

#[tokio::test]
async fn test_http_client_creation() {
    let config = ApiClientConfig::github(None);
    let client = GitHubApiClient::new(config);
    assert!(client.is_ok());
}

#[test]
fn test_next_page_url_present() {
    let header = "<https://api.github.com/repositories/1/commits?page=2>; rel=\"next\", \
                  <https://api.github.com/repositories/1/commits?page=5>; rel=\"last\"";
    assert_eq!(
        next_page_url(header),
        Some("https://api.github.com/repositories/1/commits?page=2".to_string())
    );
}

#[test]
fn test_next_page_url_absent_on_last_page() {
    let header = "<https://api.github.com/repositories/1/commits?page=1>; rel=\"first\", \
                  <https://api.github.com/repositories/1/commits?page=4>; rel=\"prev\"";
    assert_eq!(next_page_url(header), None);
    assert_eq!(next_page_url(""), None);
}

#[test]
fn test_repository_payload_parsing() {
    let payload = r#"{
        "id": 1296269,
        "name": "Hello-World",
        "description": null,
        "owner": {"login": "octocat"},
        "has_issues": true,
        "languages_url": "https://api.github.com/repos/octocat/Hello-World/languages",
        "full_name": "octocat/Hello-World"
    }"#;

    let repo: github::GitHubRepository = serde_json::from_str(payload).expect("parse payload");
    assert_eq!(repo.id, 1296269);
    assert_eq!(repo.name, "Hello-World");
    assert_eq!(repo.description, None);
    assert_eq!(repo.owner.login, "octocat");
    assert!(repo.has_issues);
}

#[test]
fn test_commit_pages_accumulate_in_order() {
    // Two pages of 30 and 5 commits; messages must accumulate in page order.
    let page = |start: usize, count: usize| -> String {
        let entries: Vec<String> = (start..start + count)
            .map(|i| format!(r#"{{"sha": "{i}", "commit": {{"message": "commit {i}"}}}}"#))
            .collect();
        format!("[{}]", entries.join(","))
    };

    let first: Vec<GitHubCommit> = serde_json::from_str(&page(0, 30)).expect("page 1");
    let second: Vec<GitHubCommit> = serde_json::from_str(&page(30, 5)).expect("page 2");

    let mut messages: Vec<String> = Vec::new();
    messages.extend(first.into_iter().map(|c| c.commit.message));
    messages.extend(second.into_iter().map(|c| c.commit.message));

    assert_eq!(messages.len(), 35);
    assert_eq!(messages[0], "commit 0");
    assert_eq!(messages[29], "commit 29");
    assert_eq!(messages[34], "commit 34");
}

// Live-API coverage requires network access and a token, so these stay as
// ignored placeholders exercised manually.

#[tokio::test]
#[ignore]
async fn test_github_client_get_repository_live() {
    let config = ApiClientConfig::github(std::env::var("GITHUB_TOKEN").ok());
    let client = GitHubApiClient::new(config).expect("client");
    let repo = client
        .get_repository("octocat", "Hello-World")
        .await
        .expect("metadata");
    assert_eq!(repo.name, "Hello-World");
}

#[tokio::test]
#[ignore]
async fn test_github_client_readme_not_found_live() {
    let config = ApiClientConfig::github(std::env::var("GITHUB_TOKEN").ok());
    let client = GitHubApiClient::new(config).expect("client");
    let readme = client
        .get_readme_html_url("octocat", "linguist")
        .await
        .expect("readme lookup");
    // Result depends on the live repository; the call itself must not error.
    let _ = readme;
}
