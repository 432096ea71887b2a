/// GitHub client tests against a local mockito server
use base64::{engine::general_purpose::STANDARD, Engine as _};
use gitdoc_text::{
    ContentEncoding, ContentSource, Converter, EntryType, GitHubClient, RepoId, RepositoryHost,
    ScrapeError,
};
use mockito::{Matcher, Server};

const REPO_BODY: &str = r#"{"full_name": "owner/repo", "default_branch": "main"}"#;

fn client(server: &Server) -> GitHubClient {
    GitHubClient::new("secret-token".to_string(), server.url())
}

fn repo_id() -> RepoId {
    "owner/repo".parse().unwrap()
}

async fn mock_repo(server: &mut Server) -> mockito::Mock {
    server
        .mock("GET", "/repos/owner/repo")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(REPO_BODY)
        .create_async()
        .await
}

#[tokio::test]
async fn test_authenticate_sends_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/user")
        .match_header("authorization", "Bearer secret-token")
        .match_header("accept", "application/vnd.github+json")
        .match_header("user-agent", Matcher::Regex("^gitdoc-text/".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"login": "octocat", "id": 1}"#)
        .create_async()
        .await;

    let principal = client(&server).authenticate().await.unwrap();

    assert_eq!(principal.login, "octocat");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_authenticate_rejected() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/user")
        .with_status(401)
        .with_body(r#"{"message": "Bad credentials"}"#)
        .create_async()
        .await;

    match client(&server).authenticate().await {
        Err(ScrapeError::Unauthorized { message }) => assert_eq!(message, "Bad credentials"),
        other => panic!("expected Unauthorized, got {:?}", other.map(|p| p.login)),
    }
}

#[tokio::test]
async fn test_open_missing_repository() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/repos/owner/missing")
        .with_status(404)
        .with_body(r#"{"message": "Not Found"}"#)
        .create_async()
        .await;

    let result = client(&server)
        .open_repository(&"owner/missing".parse().unwrap())
        .await;

    assert!(matches!(
        result,
        Err(ScrapeError::RepositoryNotFound { repository }) if repository == "owner/missing"
    ));
}

#[tokio::test]
async fn test_list_directory() {
    let mut server = Server::new_async().await;
    mock_repo(&mut server).await;
    server
        .mock("GET", "/repos/owner/repo/contents/docs")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"name": "guide", "path": "docs/guide", "type": "dir"},
                {"name": "intro.md", "path": "docs/intro.md", "type": "file"},
                {"name": "vendor", "path": "docs/vendor", "type": "submodule"}
            ]"#,
        )
        .create_async()
        .await;

    let source = client(&server).open_repository(&repo_id()).await.unwrap();
    assert_eq!(source.identifier(), "github://owner/repo");
    assert_eq!(source.repository().default_branch.as_deref(), Some("main"));

    let entries = source.list_directory("docs").await.unwrap();

    let kinds: Vec<_> = entries.iter().map(|e| (e.name.as_str(), e.entry_type)).collect();
    assert_eq!(
        kinds,
        vec![
            ("guide", EntryType::Dir),
            ("intro.md", EntryType::File),
            ("vendor", EntryType::Submodule)
        ]
    );
    assert_eq!(entries[1].path, "docs/intro.md");
}

#[tokio::test]
async fn test_list_missing_directory() {
    let mut server = Server::new_async().await;
    mock_repo(&mut server).await;
    server
        .mock("GET", "/repos/owner/repo/contents/docs")
        .with_status(404)
        .with_body(r#"{"message": "Not Found"}"#)
        .create_async()
        .await;

    let source = client(&server).open_repository(&repo_id()).await.unwrap();

    assert!(matches!(
        source.list_directory("docs").await,
        Err(ScrapeError::NotFound { path }) if path == "docs"
    ));
}

#[tokio::test]
async fn test_fetch_file_and_convert() {
    let encoded = STANDARD.encode("# Hello\n\nFrom the **docs**.");
    let wrapped = format!("{}\\n{}", &encoded[..16], &encoded[16..]);
    let body = format!(
        r#"{{"name": "intro.md", "path": "docs/intro.md", "type": "file", "encoding": "base64", "content": "{}"}}"#,
        wrapped
    );

    let mut server = Server::new_async().await;
    mock_repo(&mut server).await;
    server
        .mock("GET", "/repos/owner/repo/contents/docs/intro.md")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let source = client(&server).open_repository(&repo_id()).await.unwrap();
    let file = source.fetch_file("docs/intro.md").await.unwrap();

    assert_eq!(file.name, "intro.md");
    assert_eq!(file.encoding, ContentEncoding::Base64);

    let text = Converter::default().convert(&file);
    assert!(text.contains("Hello"));
    assert!(text.contains("docs"));
}

#[tokio::test]
async fn test_fetch_readme() {
    let body = format!(
        r#"{{"name": "README.md", "path": "README.md", "type": "file", "encoding": "base64", "content": "{}"}}"#,
        STANDARD.encode("Project readme")
    );

    let mut server = Server::new_async().await;
    mock_repo(&mut server).await;
    let mock = server
        .mock("GET", "/repos/owner/repo/readme")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let source = client(&server).open_repository(&repo_id()).await.unwrap();
    let readme = source.fetch_readme().await.unwrap();

    assert_eq!(readme.path, "README.md");
    assert!(Converter::default().convert(&readme).contains("Project readme"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_rate_limit_and_server_errors() {
    let mut server = Server::new_async().await;
    mock_repo(&mut server).await;
    server
        .mock("GET", "/repos/owner/repo/contents/limited")
        .with_status(403)
        .with_body(r#"{"message": "API rate limit exceeded for 127.0.0.1."}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/repos/owner/repo/contents/broken")
        .with_status(502)
        .with_body("")
        .create_async()
        .await;

    let source = client(&server).open_repository(&repo_id()).await.unwrap();

    assert!(matches!(
        source.list_directory("limited").await,
        Err(ScrapeError::RateLimited { .. })
    ));
    assert!(matches!(
        source.list_directory("broken").await,
        Err(ScrapeError::Api { status: 502, .. })
    ));
}

#[tokio::test]
async fn test_fetch_file_with_reserved_characters() {
    let body = format!(
        r##"{{"name": "C#.md", "path": "docs/C#.md", "type": "file", "encoding": "base64", "content": "{}"}}"##,
        STANDARD.encode("# Sharp")
    );

    let mut server = Server::new_async().await;
    mock_repo(&mut server).await;
    let mock = server
        .mock("GET", "/repos/owner/repo/contents/docs/C%23.md")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let source = client(&server).open_repository(&repo_id()).await.unwrap();
    let file = source.fetch_file("docs/C#.md").await.unwrap();

    assert_eq!(file.name, "C#.md");
    assert!(Converter::default().convert(&file).contains("Sharp"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_file_not_inlined() {
    let mut server = Server::new_async().await;
    mock_repo(&mut server).await;
    server
        .mock("GET", "/repos/owner/repo/contents/docs/huge.md")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"name": "huge.md", "path": "docs/huge.md", "type": "file", "encoding": "none", "content": ""}"#,
        )
        .create_async()
        .await;

    let source = client(&server).open_repository(&repo_id()).await.unwrap();
    let file = source.fetch_file("docs/huge.md").await.unwrap();

    assert_eq!(file.encoding, ContentEncoding::None);
    let converter = Converter::default();
    assert!(matches!(
        converter.try_convert(&file),
        Err(ScrapeError::Decode { .. })
    ));
    assert_eq!(converter.convert(&file), "");
}
