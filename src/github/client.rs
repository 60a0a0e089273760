//! GitHub REST client.
//!
//! Token authentication, `Link`-header pagination and mapping of HTTP
//! failures onto [`Error`].

use crate::github::model::{GithubErrorBody, GithubLabel, GithubRepository};
use crate::github::PageProgress;
use crate::model::{Config, Error, Repository, Result, REQUEST_TIMEOUT_SECS};
use chrono::DateTime;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const API_VERSION: &str = "2022-11-28";

#[derive(Debug, Clone)]
pub struct GithubClient {
    client: Client,
    api_url: String,
    per_page: u8,
}

impl GithubClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| Error::Unauthorized)?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            per_page: config.per_page,
        })
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_url, endpoint)
    }

    /// Names of every label defined on the repository.
    pub async fn labels(&self, repo: &Repository) -> Result<Vec<String>> {
        let labels: Vec<GithubLabel> = self
            .get_all_pages(&format!("{}/labels", repo.api_path()), &[], Box::new(|_: u32| {}))
            .await
            .map_err(|err| err.for_repository(repo))?;
        Ok(labels.into_iter().map(|label| label.name).collect())
    }

    /// Full names of the repositories owned by the token's user.
    pub async fn owned_repositories(&self) -> Result<Vec<String>> {
        let repos: Vec<GithubRepository> = self
            .get_all_pages("/user/repos", &[("affiliation", "owner")], Box::new(|_: u32| {}))
            .await?;
        Ok(repos.into_iter().map(|repo| repo.full_name).collect())
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let response = self.client.get(self.api_url(endpoint)).send().await?;
        Self::handle_response(response, endpoint).await
    }

    /// Follow `rel="next"` links until the listing is exhausted.
    pub(crate) async fn get_all_pages<'a, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
        mut cb: PageProgress<'a>,
    ) -> Result<Vec<T>> {
        let per_page = self.per_page.to_string();
        let mut all_data = Vec::new();
        let mut next: Option<String> = None;
        let mut page = 1;

        loop {
            cb(page);
            let request = match &next {
                Some(url) => self.client.get(url),
                None => self
                    .client
                    .get(self.api_url(endpoint))
                    .query(query)
                    .query(&[("per_page", per_page.as_str())]),
            };
            let response = request.send().await?;
            next = next_page_url(response.headers());
            let data: Vec<T> = Self::handle_response(response, endpoint).await?;
            debug!(endpoint, page, items = data.len(), "Fetched page");
            all_data.extend(data);

            if next.is_none() {
                break;
            }
            page += 1;
        }

        info!(endpoint, pages = page, items = all_data.len(), "Fetched listing");
        Ok(all_data)
    }

    async fn handle_response<T: DeserializeOwned>(response: Response, endpoint: &str) -> Result<T> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|source| Error::Decode {
                endpoint: endpoint.to_string(),
                source,
            });
        }

        warn!(endpoint, status = status.as_u16(), "GitHub request failed");
        Err(match status {
            StatusCode::UNAUTHORIZED => Error::Unauthorized,
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS if is_rate_limited(&headers) => {
                Error::RateLimited {
                    resets_at: rate_limit_reset(&headers),
                }
            }
            _ => Error::Api {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
                message: error_message(&body),
            },
        })
    }
}

fn next_page_url(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(header::LINK)?.to_str().ok()?;
    parse_next_link(link)
}

/// Extract the `rel="next"` target from an RFC 8288 `Link` header.
fn parse_next_link(link: &str) -> Option<String> {
    link.split(',').find_map(|part| {
        let mut segments = part.split(';');
        let target = segments.next()?.trim();
        let is_next = segments.any(|param| {
            let param = param.trim();
            param == r#"rel="next""# || param == "rel=next"
        });
        let url = target.strip_prefix('<')?.strip_suffix('>')?;
        is_next.then(|| url.to_string())
    })
}

fn is_rate_limited(headers: &HeaderMap) -> bool {
    headers
        .get("x-ratelimit-remaining")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|remaining| remaining.trim() == "0")
}

fn rate_limit_reset(headers: &HeaderMap) -> String {
    headers
        .get("x-ratelimit-reset")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<i64>().ok())
        .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
        .map(|reset| reset.to_rfc3339())
        .unwrap_or_else(|| "an unknown time".to_string())
}

/// GitHub reports failures as `{"message": "..."}`; fall back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<GithubErrorBody>(body)
        .map(|body| body.message)
        .unwrap_or_else(|_| body.trim().to_string())
}
