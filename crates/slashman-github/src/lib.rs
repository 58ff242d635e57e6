//! slash-man GitHub source - fetching prompt files from a repository
//!
//! Parses GitHub tree URLs, reads repository metadata, and downloads the
//! `.md` prompt files under a path with a fixed timeout and bounded retry.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod client;
pub mod error;
pub mod url;

pub use client::{ContentEntry, FetchedFile, GitHubClient, RepoInfo, MAX_FILE_SIZE};
pub use error::{FetchError, FetchResult};
pub use url::{parse_github_url, validate_github_repo, GitHubRef};
