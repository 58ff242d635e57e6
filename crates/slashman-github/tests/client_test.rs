//! GitHub client tests against a mock server

use serde_json::json;
use slashman_github::{parse_github_url, FetchError, GitHubClient, GitHubRef, MAX_FILE_SIZE};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> GitHubClient {
    GitHubClient::new(None)
        .unwrap()
        .with_api_base(server.uri())
        .with_retry_delay(Duration::ZERO)
}

fn prompts_ref() -> GitHubRef {
    parse_github_url("https://github.com/owner/repo/tree/main/prompts").unwrap()
}

fn file_entry(server: &MockServer, name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "path": format!("prompts/{name}"),
        "type": "file",
        "size": 32,
        "download_url": format!("{}/raw/{name}", server.uri()),
    })
}

// =============================================================================
// Repository Info
// =============================================================================

#[tokio::test]
async fn test_repo_info_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "test-repo",
            "full_name": "owner/test-repo",
            "description": "Test repository",
            "default_branch": "main",
            "stargazers_count": 10,
            "forks_count": 5,
        })))
        .mount(&server)
        .await;

    let info = client(&server).repo_info("owner", "repo").await.unwrap();
    assert_eq!(info.full_name, "owner/test-repo");
    assert_eq!(info.default_branch, "main");
    assert_eq!(info.stargazers_count, 10);
}

#[tokio::test]
async fn test_repo_info_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/nonexistent"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client(&server)
        .repo_info("owner", "nonexistent")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::NotFound(_)));
    assert!(err.to_string().contains("Repository not found: owner/nonexistent"));
}

#[tokio::test]
async fn test_auth_failures_are_forbidden() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/private"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/secret"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client(&server);
    assert!(matches!(
        client.repo_info("owner", "private").await,
        Err(FetchError::Forbidden(_))
    ));
    assert!(matches!(
        client.repo_info("owner", "secret").await,
        Err(FetchError::Forbidden(_))
    ));
}

#[tokio::test]
async fn test_malformed_json_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    assert!(matches!(
        client(&server).repo_info("owner", "repo").await,
        Err(FetchError::InvalidResponse { .. })
    ));
}

#[tokio::test]
async fn test_token_sent_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "repo",
            "full_name": "owner/repo",
            "default_branch": "main",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GitHubClient::new(Some("s3cret"))
        .unwrap()
        .with_api_base(server.uri());
    let info = client.repo_info("owner", "repo").await.unwrap();
    assert_eq!(info.description, None);
}

// =============================================================================
// Retry
// =============================================================================

#[tokio::test]
async fn test_server_errors_retried_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "repo",
            "full_name": "owner/repo",
            "default_branch": "main",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let info = client(&server).repo_info("owner", "repo").await.unwrap();
    assert_eq!(info.name, "repo");
}

#[tokio::test]
async fn test_retries_stop_after_three_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let err = client(&server).repo_info("owner", "repo").await.unwrap_err();
    assert!(matches!(err, FetchError::Network(_)));
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client(&server).repo_info("owner", "repo").await.is_err());
}

// =============================================================================
// Prompt Files
// =============================================================================

#[tokio::test]
async fn test_fetch_prompt_files_keeps_markdown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/contents/prompts"))
        .and(query_param("ref", "main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            file_entry(&server, "prompt1.md"),
            file_entry(&server, "prompt2.md"),
            file_entry(&server, "README.txt"),
            {"name": "nested", "path": "prompts/nested", "type": "dir", "download_url": null},
        ])))
        .mount(&server)
        .await;
    for name in ["prompt1.md", "prompt2.md"] {
        Mock::given(method("GET"))
            .and(path(format!("/raw/{name}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!("# {name}\n")))
            .mount(&server)
            .await;
    }

    let files = client(&server).fetch_prompt_files(&prompts_ref()).await.unwrap();
    let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["prompt1.md", "prompt2.md"]);
    assert_eq!(files[0].content, "# prompt1.md\n");
}

#[tokio::test]
async fn test_single_file_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/contents/prompts/only.md"))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_entry(&server, "only.md")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/raw/only.md"))
        .respond_with(ResponseTemplate::new(200).set_body_string("body"))
        .mount(&server)
        .await;

    let target = parse_github_url("https://github.com/owner/repo/tree/main/prompts/only.md").unwrap();
    let files = client(&server).fetch_prompt_files(&target).await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].content, "body");
}

#[tokio::test]
async fn test_escaped_path_encoded_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/contents/my%20prompts"))
        .and(query_param("ref", "main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            file_entry(&server, "review.md"),
        ])))
        .mount(&server)
        .await;

    let target = parse_github_url("https://github.com/owner/repo/tree/main/my%20prompts").unwrap();
    assert_eq!(target.path, "my prompts");
    let entries = client(&server).list_prompt_files(&target).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "review.md");
}

#[tokio::test]
async fn test_missing_path_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/contents/prompts"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client(&server)
        .list_prompt_files(&prompts_ref())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::NotFound(ref message) if message.contains("prompts")));
}

#[tokio::test]
async fn test_large_listed_file_rejected_before_download() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/contents/prompts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "name": "large.md",
            "path": "prompts/large.md",
            "type": "file",
            "size": 2 * MAX_FILE_SIZE,
            "download_url": format!("{}/raw/large.md", server.uri()),
        }])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/raw/large.md"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .fetch_prompt_files(&prompts_ref())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::FileTooLarge { ref name, .. } if name == "large.md"));
}

#[tokio::test]
async fn test_large_downloaded_body_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/contents/prompts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([file_entry(&server, "big.md")])))
        .mount(&server)
        .await;
    let oversized = "x".repeat(usize::try_from(MAX_FILE_SIZE).unwrap() + 1);
    Mock::given(method("GET"))
        .and(path("/raw/big.md"))
        .respond_with(ResponseTemplate::new(200).set_body_string(oversized))
        .mount(&server)
        .await;

    assert!(matches!(
        client(&server).fetch_prompt_files(&prompts_ref()).await,
        Err(FetchError::FileTooLarge { .. })
    ));
}
