use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;

use crate::{
    error::{Result, ScrapeError},
    source::{ContentSource, RepositoryHost},
    types::{ContentEncoding, EntryType, FileContent, Principal, RepoId, RepositoryInfo, TreeEntry},
};

/// Public GitHub REST API endpoint
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("gitdoc-text/", env!("CARGO_PKG_VERSION"));

/// GitHub API client holding the credential
///
/// Authenticates the token and resolves repositories into [`GitHubSource`]s.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    api_base: String,
    token: String,
}

/// GitHub-backed content source for a single repository
///
/// Uses the REST contents API for directory listings, files and the README.
#[derive(Clone)]
pub struct GitHubSource {
    client: Client,
    api_base: String,
    token: String,
    repository: RepositoryInfo,
}

#[derive(Deserialize)]
struct GitHubContentItem {
    name: String,
    path: String,
    #[serde(rename = "type")]
    entry_type: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

/// The contents endpoint answers with an array for directories and an
/// object for files
#[derive(Deserialize)]
#[serde(untagged)]
enum ContentsResponse {
    Listing(Vec<GitHubContentItem>),
    Single(GitHubContentItem),
}

#[derive(Deserialize)]
struct GitHubErrorBody {
    message: String,
}

impl GitHubClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `token` - Personal access token sent as a bearer credential
    /// * `api_base` - REST API root, e.g. [`DEFAULT_API_BASE`]
    pub fn new(token: String, api_base: String) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn get(&self, url: Url) -> RequestBuilder {
        authorized_get(&self.client, &self.token, url)
    }
}

#[async_trait]
impl RepositoryHost for GitHubClient {
    type Source = GitHubSource;

    async fn authenticate(&self) -> Result<Principal> {
        let url = endpoint(&self.api_base, ["user"])?;
        let response = ensure_success(self.get(url).send().await?, "user").await?;
        Ok(response.json().await?)
    }

    async fn open_repository(&self, id: &RepoId) -> Result<GitHubSource> {
        let url = endpoint(&self.api_base, ["repos", id.owner.as_str(), id.name.as_str()])?;
        let response = match ensure_success(self.get(url).send().await?, &id.full_name()).await
        {
            Ok(response) => response,
            Err(e) if e.is_not_found() => {
                return Err(ScrapeError::RepositoryNotFound {
                    repository: id.full_name(),
                })
            }
            Err(e) => return Err(e),
        };

        let repository: RepositoryInfo = response.json().await?;
        Ok(GitHubSource {
            client: self.client.clone(),
            api_base: self.api_base.clone(),
            token: self.token.clone(),
            repository,
        })
    }
}

impl GitHubSource {
    pub fn repository(&self) -> &RepositoryInfo {
        &self.repository
    }

    /// Build the contents API URL for a path inside the repository
    ///
    /// Each path segment is percent-encoded, so names such as `C#.md` survive.
    fn contents_url(&self, path: &str) -> Result<Url> {
        let segments = ["repos"]
            .into_iter()
            .chain(self.repository.full_name.split('/'))
            .chain(["contents"])
            .chain(path.split('/').filter(|segment| !segment.is_empty()));
        endpoint(&self.api_base, segments)
    }

    fn readme_url(&self) -> Result<Url> {
        let segments = ["repos"]
            .into_iter()
            .chain(self.repository.full_name.split('/'))
            .chain(["readme"]);
        endpoint(&self.api_base, segments)
    }

    async fn get_contents(&self, url: Url, path: &str) -> Result<ContentsResponse> {
        let response = authorized_get(&self.client, &self.token, url).send().await?;
        let response = ensure_success(response, path).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ContentSource for GitHubSource {
    async fn list_directory(&self, path: &str) -> Result<Vec<TreeEntry>> {
        let url = self.contents_url(path)?;

        let entries = match self.get_contents(url, path).await? {
            ContentsResponse::Listing(items) => items.into_iter().map(to_tree_entry).collect(),
            ContentsResponse::Single(item) => vec![to_tree_entry(item)],
        };

        Ok(entries)
    }

    async fn fetch_file(&self, path: &str) -> Result<FileContent> {
        let url = self.contents_url(path)?;

        match self.get_contents(url, path).await? {
            ContentsResponse::Single(item) => to_file_content(item),
            ContentsResponse::Listing(_) => Err(ScrapeError::InvalidStructure {
                message: format!("expected a file at '{}', found a directory", path),
            }),
        }
    }

    async fn fetch_readme(&self) -> Result<FileContent> {
        let url = self.readme_url()?;

        match self.get_contents(url, "README").await? {
            ContentsResponse::Single(item) => to_file_content(item),
            ContentsResponse::Listing(_) => Err(ScrapeError::InvalidStructure {
                message: "readme endpoint returned a listing".to_string(),
            }),
        }
    }

    fn identifier(&self) -> String {
        format!("github://{}", self.repository.full_name)
    }
}

/// Append percent-encoded path segments to the API base URL
fn endpoint<'a, I>(api_base: &str, segments: I) -> Result<Url>
where
    I: IntoIterator<Item = &'a str>,
{
    let invalid = |reason: String| ScrapeError::InvalidConfig {
        message: format!("invalid API base URL '{}': {}", api_base, reason),
    };

    let mut url = Url::parse(api_base).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| invalid("cannot be a base".to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn authorized_get(client: &Client, token: &str, url: Url) -> RequestBuilder {
    client
        .get(url)
        .bearer_auth(token)
        .header("Accept", "application/vnd.github+json")
}

/// Map a non-success response onto the error taxonomy
async fn ensure_success(response: Response, path: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<GitHubErrorBody>(&body) {
        Ok(parsed) => parsed.message,
        Err(_) if body.trim().is_empty() => status.to_string(),
        Err(_) => body,
    };

    Err(match status {
        StatusCode::NOT_FOUND => ScrapeError::NotFound {
            path: path.to_string(),
        },
        StatusCode::UNAUTHORIZED => ScrapeError::Unauthorized { message },
        status if is_rate_limit_error(status, &message) => ScrapeError::RateLimited { message },
        status => ScrapeError::Api {
            status: status.as_u16(),
            message,
        },
    })
}

/// GitHub reports exhausted quotas as 429, or as 403 with a rate limit message
fn is_rate_limit_error(status: StatusCode, message: &str) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN && message.to_ascii_lowercase().contains("rate limit"))
}

fn to_tree_entry(item: GitHubContentItem) -> TreeEntry {
    TreeEntry {
        entry_type: parse_entry_type(&item.entry_type),
        name: item.name,
        path: item.path,
    }
}

fn parse_entry_type(value: &str) -> EntryType {
    match value {
        "dir" => EntryType::Dir,
        "symlink" => EntryType::Symlink,
        "submodule" => EntryType::Submodule,
        _ => EntryType::File,
    }
}

fn to_file_content(item: GitHubContentItem) -> Result<FileContent> {
    let content = item.content.ok_or_else(|| ScrapeError::InvalidStructure {
        message: format!("no content returned for '{}'", item.path),
    })?;

    Ok(FileContent {
        encoding: ContentEncoding::from_declared(item.encoding.as_deref().unwrap_or("")),
        content: bytes::Bytes::from(content.into_bytes()),
        name: item.name,
        path: item.path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(api_base: &str) -> GitHubSource {
        GitHubSource {
            client: Client::new(),
            api_base: api_base.to_string(),
            token: "token".to_string(),
            repository: RepositoryInfo {
                full_name: "owner/repo".to_string(),
                default_branch: Some("main".to_string()),
            },
        }
    }

    #[test]
    fn test_contents_url() {
        let source = source("https://api.github.com");

        assert_eq!(
            source.contents_url("docs/guide").unwrap().as_str(),
            "https://api.github.com/repos/owner/repo/contents/docs/guide"
        );
        assert_eq!(
            source.contents_url("/docs/").unwrap().as_str(),
            "https://api.github.com/repos/owner/repo/contents/docs"
        );
        assert_eq!(
            source.contents_url("").unwrap().as_str(),
            "https://api.github.com/repos/owner/repo/contents"
        );
        assert_eq!(
            source.readme_url().unwrap().as_str(),
            "https://api.github.com/repos/owner/repo/readme"
        );
    }

    #[test]
    fn test_contents_url_encodes_segments() {
        let source = source("https://api.github.com");

        assert_eq!(
            source.contents_url("docs/C#.md").unwrap().as_str(),
            "https://api.github.com/repos/owner/repo/contents/docs/C%23.md"
        );
        assert_eq!(
            source.contents_url("docs/what?.md").unwrap().as_str(),
            "https://api.github.com/repos/owner/repo/contents/docs/what%3F.md"
        );
        assert_eq!(
            source.contents_url("docs/my notes.md").unwrap().as_str(),
            "https://api.github.com/repos/owner/repo/contents/docs/my%20notes.md"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let url = endpoint("https://ghe.example.com/api/v3", ["user"]).unwrap();
        assert_eq!(url.as_str(), "https://ghe.example.com/api/v3/user");

        assert!(matches!(
            endpoint("not a url", ["user"]),
            Err(ScrapeError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_client_trims_api_base() {
        let client = GitHubClient::new("t".to_string(), "https://ghe.example.com/api/v3/".to_string());
        assert_eq!(client.api_base, "https://ghe.example.com/api/v3");
    }

    #[test]
    fn test_parse_entry_type() {
        assert_eq!(parse_entry_type("dir"), EntryType::Dir);
        assert_eq!(parse_entry_type("file"), EntryType::File);
        assert_eq!(parse_entry_type("submodule"), EntryType::Submodule);
        assert_eq!(parse_entry_type("symlink"), EntryType::Symlink);
    }

    #[test]
    fn test_rate_limit_detection() {
        assert!(is_rate_limit_error(StatusCode::TOO_MANY_REQUESTS, ""));
        assert!(is_rate_limit_error(
            StatusCode::FORBIDDEN,
            "API rate limit exceeded for user"
        ));
        assert!(!is_rate_limit_error(
            StatusCode::FORBIDDEN,
            "Resource not accessible by integration"
        ));
    }

    #[test]
    fn test_to_file_content_requires_payload() {
        let item = GitHubContentItem {
            name: "a.md".to_string(),
            path: "docs/a.md".to_string(),
            entry_type: "file".to_string(),
            content: None,
            encoding: None,
        };
        assert!(matches!(
            to_file_content(item),
            Err(ScrapeError::InvalidStructure { .. })
        ));
    }
}
