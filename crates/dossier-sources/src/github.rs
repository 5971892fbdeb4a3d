//! Source-hosting profile lookup against the GitHub REST API

use crate::config::SourcesConfig;
use crate::error::SourceError;
use async_trait::async_trait;
use dossier_domain::traits::{HostedProfile, SourceHostingLookup};
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// Public user record as returned by `GET /users/{login}`
#[derive(Debug, Deserialize)]
struct UserRecord {
    login: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    blog: Option<String>,
    #[serde(default)]
    html_url: Option<String>,
}

impl From<UserRecord> for HostedProfile {
    fn from(record: UserRecord) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        HostedProfile {
            login: record.login,
            name: non_empty(record.name),
            email: non_empty(record.email),
            blog_url: non_empty(record.blog),
            profile_url: non_empty(record.html_url),
        }
    }
}

/// Looks up GitHub users and their profile README
pub struct GitHubLookup {
    client: reqwest::Client,
    api_url: String,
    raw_url: String,
}

impl GitHubLookup {
    /// Create a lookup from configuration
    pub fn new(config: &SourcesConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.fetch_timeout())
            .build()
            .map_err(|e| SourceError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.github_api_url.trim_end_matches('/').to_string(),
            raw_url: config.github_raw_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_user(&self, login: &str) -> Result<HostedProfile, SourceError> {
        let url = format!("{}/users/{}", self.api_url, login);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Status {
                status: response.status().as_u16(),
                url,
            });
        }
        let record: UserRecord = response.json().await?;
        Ok(record.into())
    }

    /// Raw url of the profile README (`{login}/{login}` repository)
    pub fn readme_url(&self, login: &str) -> String {
        format!("{}/{}/{}/refs/heads/main/README.md", self.raw_url, login, login)
    }
}

/// Account handle from a profile url: the first path segment
pub fn login_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl SourceHostingLookup for GitHubLookup {
    async fn lookup_profile(&self, url: &str) -> Option<HostedProfile> {
        let login = login_from_url(url)?;
        match self.fetch_user(&login).await {
            Ok(profile) => Some(profile),
            Err(e) => {
                debug!(login, error = %e, "GitHub user lookup failed");
                None
            }
        }
    }

    async fn fetch_readme(&self, profile: &HostedProfile) -> String {
        let url = self.readme_url(&profile.login);
        let response = match self.client.get(&url).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                debug!(url, status = r.status().as_u16(), "No profile README");
                return String::new();
            }
            Err(e) => {
                debug!(url, error = %e, "README fetch failed");
                return String::new();
            }
        };
        response.text().await.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_from_url() {
        assert_eq!(login_from_url("https://github.com/yanful").as_deref(), Some("yanful"));
        assert_eq!(
            login_from_url("https://github.com/jane-doe/some-repo/tree/main").as_deref(),
            Some("jane-doe")
        );
        assert_eq!(login_from_url("https://github.com/"), None);
        assert_eq!(login_from_url("github.com/jane"), None);
    }

    #[test]
    fn test_user_record_conversion() {
        let record: UserRecord = serde_json::from_str(
            r#"{
                "login": "jane",
                "name": "Jane Doe",
                "email": null,
                "blog": "",
                "html_url": "https://github.com/jane",
                "public_repos": 12
            }"#,
        )
        .unwrap();
        let profile = HostedProfile::from(record);
        assert_eq!(profile.name.as_deref(), Some("Jane Doe"));
        assert!(profile.email.is_none());
        assert!(profile.blog_url.is_none());
        assert_eq!(profile.profile_url.as_deref(), Some("https://github.com/jane"));
    }

    #[test]
    fn test_readme_url() {
        let lookup = GitHubLookup::new(&SourcesConfig::default()).unwrap();
        assert_eq!(
            lookup.readme_url("jane"),
            "https://raw.githubusercontent.com/jane/jane/refs/heads/main/README.md"
        );
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_lookup_real_user() {
        let lookup = GitHubLookup::new(&SourcesConfig::default()).unwrap();
        let profile = lookup.lookup_profile("https://github.com/octocat").await.unwrap();
        assert_eq!(profile.login, "octocat");
    }
}
