//! API client for accessing remote repository data
//!
//! Provides the HTTP plumbing shared by every GitHub endpoint: client
//! construction, authentication headers, and response error mapping.

use gitopics_core::{ErrorContext, GitopicsError, GitopicsResult};

pub mod github;

#[cfg(test)]
mod tests;

pub use github::GitHubApiClient;

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Access token for authentication
    pub access_token: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.github.com".to_string(),
            access_token: None,
            timeout_seconds: 30,
            user_agent: "gitopics/0.1".to_string(),
        }
    }
}

impl ApiClientConfig {
    /// Create a configuration for the public GitHub API
    pub fn github(access_token: Option<String>) -> Self {
        Self {
            access_token,
            ..Default::default()
        }
    }

    /// Create a configuration from application settings plus a token
    pub fn from_settings(api: &gitopics_core::ApiConfig, access_token: Option<String>) -> Self {
        Self {
            base_url: api.base_url.trim_end_matches('/').to_string(),
            access_token,
            timeout_seconds: api.timeout_seconds,
            user_agent: api.user_agent.clone(),
        }
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }
}

/// Helper function to create an HTTP client with common configuration
pub(crate) fn create_http_client(config: &ApiClientConfig) -> GitopicsResult<reqwest::Client> {
    let mut headers = reqwest::header::HeaderMap::new();

    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_str(&config.user_agent).map_err(|e| {
            GitopicsError::Repository {
                message: format!("Invalid user agent: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("http_client").with_operation("create_client"),
            }
        })?,
    );

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .default_headers(headers)
        .build()
        .map_err(|e| GitopicsError::Repository {
            message: format!("Failed to create HTTP client: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("http_client").with_operation("create_client"),
        })?;

    Ok(client)
}

/// Helper function to map a non-success HTTP response into an error
pub(crate) async fn handle_response_error(
    response: reqwest::Response,
    operation: &str,
) -> GitopicsError {
    let status = response.status();
    let url = response.url().clone();

    let error_body = response.text().await.unwrap_or_default();

    GitopicsError::Repository {
        message: format!(
            "HTTP {} error for {}: {}",
            status.as_u16(),
            url,
            if error_body.is_empty() {
                status.canonical_reason().unwrap_or("Unknown error")
            } else {
                &error_body
            }
        ),
        source: None,
        context: ErrorContext::new("api_client")
            .with_operation(operation)
            .with_suggestion(match status.as_u16() {
                401 => "Check your access token",
                403 => "Check repository permissions or rate limits",
                404 => "Repository not found or not accessible",
                _ => "Check network connectivity and API status",
            }),
    }
}
