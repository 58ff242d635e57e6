//! HTTP client for the GitHub REST API

use crate::error::{FetchError, FetchResult};
use crate::url::GitHubRef;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// GitHub REST API root
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Environment variable holding an optional access token
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Total attempts for network failures and 5xx responses
pub const MAX_ATTEMPTS: u32 = 3;

/// Largest prompt file that will be downloaded
pub const MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Listing more prompt files than this logs a warning
pub const MANY_FILES_THRESHOLD: usize = 100;

const PROMPT_EXTENSION: &str = ".md";
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Repository metadata from `GET /repos/{owner}/{repo}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoInfo {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub default_branch: String,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
}

/// One item of a contents API listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub size: u64,
}

impl ContentEntry {
    fn is_prompt_file(&self) -> bool {
        self.kind == "file" && self.name.ends_with(PROMPT_EXTENSION)
    }
}

/// The contents API answers with an array for a directory and an object
/// for a single file
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Contents {
    Directory(Vec<ContentEntry>),
    File(ContentEntry),
}

/// A downloaded prompt file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFile {
    pub name: String,
    pub content: String,
}

/// GitHub API client with a fixed timeout and bounded retry
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
    retry_delay: Duration,
}

impl GitHubClient {
    /// Create a client for `api.github.com`, authenticated when `token` is
    /// given
    ///
    /// # Errors
    /// Returns an error if the token is not a valid header value or the
    /// HTTP client cannot be built
    pub fn new(token: Option<&str>) -> FetchResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(default_headers(token)?)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            http,
            api_base: DEFAULT_API_BASE.to_string(),
            retry_delay: DEFAULT_RETRY_DELAY,
        })
    }

    /// Create a client using `GITHUB_TOKEN` if it is set
    ///
    /// # Errors
    /// See [`GitHubClient::new`]
    pub fn from_env() -> FetchResult<Self> {
        let token = std::env::var(TOKEN_ENV).ok().filter(|t| !t.trim().is_empty());
        if token.is_some() {
            tracing::debug!("Using {TOKEN_ENV} for GitHub requests");
        }
        Self::new(token.as_deref())
    }

    /// Point at another API root, e.g. GitHub Enterprise or a test server
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Base delay between attempts; doubled after each failure
    #[must_use]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Repository metadata
    ///
    /// # Errors
    /// Returns `FetchError::NotFound` for a missing (or hidden private)
    /// repository, or any request error
    pub async fn repo_info(&self, owner: &str, repo: &str) -> FetchResult<RepoInfo> {
        let url = self.api_url(&["repos", owner, repo])?;
        self.get_json(url.as_str()).await.map_err(|e| match e {
            FetchError::NotFound(_) => FetchError::NotFound(format!("Repository not found: {owner}/{repo}")),
            other => other,
        })
    }

    /// `.md` files at `target`, which may be a directory or a single file
    ///
    /// # Errors
    /// Returns `FetchError::NotFound` if the path does not exist on the
    /// branch, or any request error
    pub async fn list_prompt_files(&self, target: &GitHubRef) -> FetchResult<Vec<ContentEntry>> {
        let mut segments = vec!["repos", target.owner.as_str(), target.repo.as_str(), "contents"];
        segments.extend(target.path.split('/').filter(|s| !s.is_empty()));
        let mut url = self.api_url(&segments)?;
        url.query_pairs_mut().append_pair("ref", &target.branch);

        let contents: Contents = self.get_json(url.as_str()).await.map_err(|e| match e {
            FetchError::NotFound(_) => FetchError::NotFound(format!(
                "Path '{}' on branch '{}' of {}",
                target.path,
                target.branch,
                target.slug()
            )),
            other => other,
        })?;

        let entries = match contents {
            Contents::Directory(entries) => entries,
            Contents::File(entry) => vec![entry],
        };
        let prompts: Vec<ContentEntry> = entries.into_iter().filter(ContentEntry::is_prompt_file).collect();
        tracing::debug!("Listed {} prompt files in {}", prompts.len(), target.tree_url());
        Ok(prompts)
    }

    /// Download every `.md` prompt file at `target`
    ///
    /// # Errors
    /// Returns the first listing or download error, or
    /// `FetchError::FileTooLarge` for a file over [`MAX_FILE_SIZE`]
    pub async fn fetch_prompt_files(&self, target: &GitHubRef) -> FetchResult<Vec<FetchedFile>> {
        let entries = self.list_prompt_files(target).await?;
        if entries.len() > MANY_FILES_THRESHOLD {
            tracing::warn!(
                "Repository contains {} files, which may impact performance",
                entries.len()
            );
        }

        let mut files = Vec::with_capacity(entries.len());
        for entry in &entries {
            files.push(self.download(entry).await?);
        }

        tracing::info!("Fetched {} prompt files from {}", files.len(), target.tree_url());
        Ok(files)
    }

    async fn download(&self, entry: &ContentEntry) -> FetchResult<FetchedFile> {
        let too_large = |size| FetchError::FileTooLarge {
            name: entry.name.clone(),
            size,
            limit: MAX_FILE_SIZE,
        };
        if entry.size > MAX_FILE_SIZE {
            return Err(too_large(entry.size));
        }
        let Some(url) = entry.download_url.as_deref() else {
            return Err(FetchError::InvalidResponse {
                url: entry.path.clone(),
                message: format!("no download_url for {}", entry.name),
            });
        };

        let response = self.send(url).await?;
        if let Some(length) = response.content_length().filter(|&len| len > MAX_FILE_SIZE) {
            return Err(too_large(length));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| request_error(&e, url))?;
        let size = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        if size > MAX_FILE_SIZE {
            return Err(too_large(size));
        }
        let content = String::from_utf8(bytes.to_vec()).map_err(|e| FetchError::InvalidResponse {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        tracing::debug!("Downloaded {} ({size} bytes)", entry.name);
        Ok(FetchedFile {
            name: entry.name.clone(),
            content,
        })
    }

    fn api_url(&self, segments: &[&str]) -> FetchResult<Url> {
        let invalid = || FetchError::InvalidUrl(self.api_base.clone());
        let mut url = Url::parse(&self.api_base).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> FetchResult<T> {
        let body = self
            .send(url)
            .await?
            .text()
            .await
            .map_err(|e| request_error(&e, url))?;
        serde_json::from_str(&body).map_err(|e| FetchError::InvalidResponse {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// GET `url`, retrying network failures and 5xx responses
    async fn send(&self, url: &str) -> FetchResult<Response> {
        let mut attempt = 1;
        loop {
            let result = match self.http.get(url).send().await {
                Ok(response) => check_status(response, url),
                Err(e) => Err(request_error(&e, url)),
            };

            match result {
                Err(e) if e.is_retryable() && attempt < MAX_ATTEMPTS => {
                    tracing::warn!("Request failed (attempt {attempt}/{MAX_ATTEMPTS}): {e}");
                    tokio::time::sleep(self.retry_delay * 2_u32.pow(attempt - 1)).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

fn default_headers(token: Option<&str>) -> FetchResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!("slash-man/", env!("CARGO_PKG_VERSION"))),
    );
    if let Some(token) = token {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|_| FetchError::Forbidden(format!("{TOKEN_ENV} is not a valid header value")))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

fn check_status(response: Response, url: &str) -> FetchResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            FetchError::Forbidden(format!("{url} (HTTP {})", status.as_u16()))
        }
        StatusCode::NOT_FOUND => FetchError::NotFound(url.to_string()),
        s if s.is_server_error() => FetchError::Network(format!("HTTP {} from {url}", s.as_u16())),
        s => FetchError::InvalidResponse {
            url: url.to_string(),
            message: format!("unexpected HTTP status {}", s.as_u16()),
        },
    })
}

fn request_error(error: &reqwest::Error, url: &str) -> FetchError {
    if error.is_timeout() {
        FetchError::Network(format!(
            "Network timeout after {}s: {url}",
            REQUEST_TIMEOUT.as_secs()
        ))
    } else {
        FetchError::Network(format!("{url}: {error}"))
    }
}
