use std::collections::BTreeSet;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;

use crate::core::config::Settings;

const PAGE_SIZE: usize = 100;
const MAX_PAGES: u32 = 200;

/// Lists the repositories that actually exist under a hosting organization.
#[async_trait]
pub(crate) trait RepoDirectory: Send + Sync {
    async fn list_org_repos(&self, org_name: &str) -> Result<BTreeSet<String>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum OrgUrlError {
    #[error("course has no organization url")]
    Missing,
    #[error("organization url {url:?} does not look like https://{host}/<org>")]
    Malformed { url: String, host: String },
}

/// Extracts `<org>` from `https://<host>/<org>`, ignoring trailing slashes.
/// Organization names are case-insensitive on the host, so the result is lowercased.
pub(crate) fn parse_org_name(org_url: Option<&str>, host: &str) -> Result<String, OrgUrlError> {
    let raw = org_url.map(str::trim).unwrap_or_default().trim_end_matches('/');
    if raw.is_empty() {
        return Err(OrgUrlError::Missing);
    }

    let malformed = || OrgUrlError::Malformed { url: raw.to_string(), host: host.to_string() };

    let url = Url::parse(raw).map_err(|_| malformed())?;
    let host_matches = url.host_str().is_some_and(|value| value.eq_ignore_ascii_case(host));
    if url.scheme() != "https"
        || !host_matches
        || url.port().is_some()
        || !url.username().is_empty()
        || url.query().is_some()
        || url.fragment().is_some()
    {
        return Err(malformed());
    }

    let mut segments = url.path_segments().ok_or_else(malformed)?;
    let org_name = segments.next().filter(|segment| !segment.is_empty()).ok_or_else(malformed)?;
    if segments.next().is_some() {
        return Err(malformed());
    }

    Ok(org_name.to_ascii_lowercase())
}

#[derive(Debug, Deserialize)]
struct GithubRepo {
    name: String,
}

#[derive(Debug, Clone)]
pub(crate) struct GithubClient {
    client: Client,
    api_url: String,
    token: String,
}

impl GithubClient {
    pub(crate) fn from_settings(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(settings.github().timeout_seconds))
            .user_agent(concat!("submission-reaper/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build GitHub HTTP client")?;

        Ok(Self {
            client,
            api_url: settings.github().api_url.clone(),
            token: settings.github().token.clone(),
        })
    }
}

#[async_trait]
impl RepoDirectory for GithubClient {
    async fn list_org_repos(&self, org_name: &str) -> Result<BTreeSet<String>> {
        let mut repos = BTreeSet::new();

        for page in 1..=MAX_PAGES {
            let endpoint = format!(
                "{}/orgs/{}/repos?type=all&per_page={PAGE_SIZE}&page={page}",
                self.api_url, org_name
            );

            let mut request = self
                .client
                .get(&endpoint)
                .header(ACCEPT, "application/vnd.github+json")
                .header("X-GitHub-Api-Version", "2022-11-28");
            if !self.token.is_empty() {
                request = request.bearer_auth(&self.token);
            }

            let response = request
                .send()
                .await
                .with_context(|| format!("Failed to list repositories for org {org_name}"))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                anyhow::bail!("GitHub API returned {status} for org {org_name}: {body}");
            }

            let batch: Vec<GithubRepo> =
                response.json().await.context("Failed to decode GitHub repository listing")?;
            let fetched = batch.len();
            repos.extend(batch.into_iter().map(|repo| repo.name));

            if fetched < PAGE_SIZE {
                return Ok(repos);
            }
        }

        tracing::warn!(org_name, max_pages = MAX_PAGES, "Stopped paginating GitHub repositories");
        Ok(repos)
    }
}
