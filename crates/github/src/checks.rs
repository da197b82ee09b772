//! GitHub Checks API client.
//!
//! Implements [`CheckRunApi`] over the REST endpoints:
//! - `POST /repos/{owner}/{repo}/check-runs`
//! - `PATCH /repos/{owner}/{repo}/check-runs/{id}`
//!
//! Every request carries the bearer token, the checks preview media type and
//! a fixed user agent. Calls are made once; a non-2xx status is an error.

use async_trait::async_trait;
use lintcheck_ci::report::{CheckRunApi, CreateCheckRun, UpdateCheckRun};
use lintcheck_core::{ActionConfig, Error, Repository, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// User agent sent with every request
pub const USER_AGENT: &str = "lintcheck-action";

/// Media type of the checks API preview
pub const CHECKS_ACCEPT: &str = "application/vnd.github.antiope-preview+json";

/// The part of a check run response we need.
#[derive(Debug, Deserialize)]
struct CheckRunCreated {
    id: u64,
}

/// Client for the GitHub Checks API of one repository.
pub struct GitHubChecksClient {
    client: Client,
    api_url: String,
    repository: Repository,
    token: SecretString,
}

impl std::fmt::Debug for GitHubChecksClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubChecksClient")
            .field("api_url", &self.api_url)
            .field("repository", &self.repository)
            .finish_non_exhaustive()
    }
}

impl GitHubChecksClient {
    /// Create a client for `repository` at `api_url`.
    ///
    /// # Errors
    ///
    /// Fails if the token is empty or the HTTP client cannot be built.
    pub fn new(api_url: impl Into<String>, repository: Repository, token: SecretString) -> Result<Self> {
        if token.expose_secret().trim().is_empty() {
            return Err(Error::configuration_with_help(
                "GitHub token is not set or empty",
                "Pass --github-token or set the github-token input",
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(CHECKS_ACCEPT));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create GitHub client: {e}")))?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            repository,
            token,
        })
    }

    /// Create a client from the action configuration.
    ///
    /// # Errors
    ///
    /// See [`GitHubChecksClient::new`].
    pub fn from_config(config: &ActionConfig) -> Result<Self> {
        Self::new(
            config.api_url.clone(),
            config.repository.clone(),
            SecretString::from(config.token.expose_secret().to_owned()),
        )
    }

    fn check_runs_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/check-runs",
            self.api_url, self.repository.owner, self.repository.name
        )
    }

    /// Send `body` as JSON and fail on anything but a 2xx status.
    async fn send<T: Serialize + Sync>(
        &self,
        operation: &'static str,
        method: Method,
        url: &str,
        body: &T,
    ) -> Result<Response> {
        debug!(%method, %url, operation, "Calling GitHub API");

        let response = self
            .client
            .request(method, url)
            .header(
                AUTHORIZATION,
                format!("Bearer {}", self.token.expose_secret()),
            )
            .json(body)
            .send()
            .await
            .map_err(|e| Error::http(operation, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::api(operation, status.as_u16(), body));
        }
        Ok(response)
    }
}

#[async_trait]
impl CheckRunApi for GitHubChecksClient {
    async fn create_check_run(&self, request: &CreateCheckRun) -> Result<u64> {
        let response = self
            .send("create check run", Method::POST, &self.check_runs_url(), request)
            .await?;

        let created: CheckRunCreated = response
            .json()
            .await
            .map_err(|e| Error::decode("check run response", e.to_string()))?;

        info!(id = created.id, name = %request.name, "Created check run");
        Ok(created.id)
    }

    async fn update_check_run(&self, check_run_id: u64, request: &UpdateCheckRun) -> Result<()> {
        let url = format!("{}/{}", self.check_runs_url(), check_run_id);
        self.send("update check run", Method::PATCH, &url, request)
            .await?;

        debug!(id = check_run_id, status = ?request.status, "Updated check run");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> Repository {
        "acme/widgets".parse().unwrap()
    }

    #[test]
    fn test_rejects_empty_token() {
        let err = GitHubChecksClient::new("https://api.github.com", repo(), SecretString::from(""))
            .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_check_runs_url_trims_slash() {
        let client = GitHubChecksClient::new(
            "https://ghe.example.com/api/v3/",
            repo(),
            SecretString::from("t"),
        )
        .unwrap();
        assert_eq!(
            client.check_runs_url(),
            "https://ghe.example.com/api/v3/repos/acme/widgets/check-runs"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let client =
            GitHubChecksClient::new("https://api.github.com", repo(), SecretString::from("s3cret"))
                .unwrap();
        assert!(!format!("{client:?}").contains("s3cret"));
    }
}
