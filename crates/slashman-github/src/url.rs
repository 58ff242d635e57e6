//! GitHub tree URLs and `owner/repo` strings

use crate::error::{FetchError, FetchResult};
use reqwest::Url;
use serde::Serialize;
use std::borrow::Cow;

const GITHUB_HOSTS: &[&str] = &["github.com", "www.github.com"];

/// A directory (or file) on one branch of a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GitHubRef {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Path inside the repository, without leading or trailing `/`.
    /// Empty for the repository root.
    pub path: String,
}

impl GitHubRef {
    /// `owner/repo`
    #[must_use]
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Browser URL this ref was parsed from, normalized
    #[must_use]
    pub fn tree_url(&self) -> String {
        let mut url = format!(
            "https://github.com/{}/{}/tree/{}",
            self.owner, self.repo, self.branch
        );
        if !self.path.is_empty() {
            url.push('/');
            url.push_str(&self.path);
        }
        url
    }
}

/// Parse `https://github.com/<owner>/<repo>/tree/<branch>/<path...>`.
///
/// The path may be empty or nested. Branch names containing `/` are not
/// supported; the first segment after `tree` is the branch.
///
/// # Errors
/// Returns `FetchError::InvalidUrl` for other hosts, non-`tree` URLs, and
/// URLs missing the owner, repo or branch
pub fn parse_github_url(url: &str) -> FetchResult<GitHubRef> {
    let invalid = || FetchError::InvalidUrl(url.to_string());
    let parsed = Url::parse(url.trim()).map_err(|_| invalid())?;

    if !matches!(parsed.scheme(), "https" | "http") {
        return Err(invalid());
    }
    if !parsed.host_str().is_some_and(|host| GITHUB_HOSTS.contains(&host)) {
        return Err(invalid());
    }

    // Segments arrive percent-encoded; API URLs encode them again
    let decoded = parsed
        .path_segments()
        .into_iter()
        .flatten()
        .map(|segment| urlencoding::decode(segment).map(Cow::into_owned))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid())?;
    let segments: Vec<&str> = decoded.iter().map(String::as_str).collect();
    let [owner, repo, "tree", branch, rest @ ..] = segments.as_slice() else {
        return Err(invalid());
    };
    if owner.is_empty() || repo.is_empty() || branch.is_empty() {
        return Err(invalid());
    }

    let path = rest
        .iter()
        .filter(|segment| !segment.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/");

    Ok(GitHubRef {
        owner: (*owner).to_string(),
        repo: (*repo).to_string(),
        branch: (*branch).to_string(),
        path,
    })
}

/// Split `owner/repo` into its parts
///
/// # Errors
/// Returns `FetchError::InvalidRepo` unless there are exactly two non-empty
/// parts
pub fn validate_github_repo(repo: &str) -> FetchResult<(String, String)> {
    let shown = if repo.is_empty() { "(empty string)" } else { repo };
    match repo.split('/').collect::<Vec<_>>().as_slice() {
        [owner, name] if !owner.is_empty() && !name.is_empty() => {
            Ok(((*owner).to_string(), (*name).to_string()))
        }
        _ => Err(FetchError::InvalidRepo(shown.to_string())),
    }
}
