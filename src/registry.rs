use async_trait::async_trait;
use reqwest::header::LINK;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::error::RegistryError;
use crate::models::{Page, Tag};

/// Outcome of a single tag deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTagStatus {
    Deleted,
    /// The tag was already gone; callers treat this as success.
    NotFound,
    /// The server refused the deletion with an error status.
    Failed,
}

/// Remote registry operations the cleanup engine depends on.
///
/// `delete_tag` distinguishes a logical `Failed` (the server answered) from
/// an `Err` (the server could not be reached); callers handle the two very
/// differently.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Fetch one page of the repository's tag listing. `cursor` is the
    /// previous page's continuation token, passed back verbatim.
    async fn list_tags(
        &self,
        repository: &str,
        page_size: usize,
        cursor: Option<&str>,
    ) -> Result<Page, RegistryError>;

    /// Delete a single tag by name.
    async fn delete_tag(
        &self,
        repository: &str,
        name: &str,
    ) -> Result<DeleteTagStatus, RegistryError>;
}

/// HTTP client for registries exposing the tag listing/deletion API.
pub struct RegistryClient {
    client: Client,
    base_url: String,
}

impl RegistryClient {
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let client = Client::builder()
            .user_agent(concat!("regsweep/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Resolve a relative URL path against the base URL
    fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    /// Parse the Link header for pagination (next URL)
    fn parse_next_link(resp: &reqwest::Response) -> Option<String> {
        let link = resp.headers().get(LINK)?.to_str().ok()?;
        next_link(link)
    }
}

/// Extract the rel="next" URL from a Link header value.
/// Format: </gitlab/v1/repositories/app/tags/list/?n=100&last=xxx>; rel="next"
fn next_link(link: &str) -> Option<String> {
    for part in link.split(',') {
        let part = part.trim();
        if part.contains("rel=\"next\"") {
            let start = part.find('<')? + 1;
            let end = part.find('>')?;
            return Some(part[start..end].to_string());
        }
    }
    None
}

#[async_trait]
impl Registry for RegistryClient {
    /// GET /gitlab/v1/repositories/<repo>/tags/list/ with cursor pagination
    async fn list_tags(
        &self,
        repository: &str,
        page_size: usize,
        cursor: Option<&str>,
    ) -> Result<Page, RegistryError> {
        let url = match cursor {
            Some(next) => self.resolve_url(next),
            None => format!(
                "{}/gitlab/v1/repositories/{}/tags/list/?n={}",
                self.base_url, repository, page_size
            ),
        };
        debug!(%url, "listing tags");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(RegistryError::Status {
                status: status.as_u16(),
                context: format!("tag listing of {}", repository),
            });
        }

        let next_cursor = Self::parse_next_link(&resp);
        let body = resp.text().await?;
        let tags: Vec<Tag> = serde_json::from_str(&body)?;

        Ok(Page { tags, next_cursor })
    }

    /// DELETE /v2/<repo>/tags/reference/<name>
    async fn delete_tag(
        &self,
        repository: &str,
        name: &str,
    ) -> Result<DeleteTagStatus, RegistryError> {
        let url = format!(
            "{}/v2/{}/tags/reference/{}",
            self.base_url, repository, name
        );
        debug!(%url, "deleting tag");

        let resp = self.client.delete(&url).send().await?;
        match resp.status() {
            StatusCode::OK | StatusCode::ACCEPTED | StatusCode::NO_CONTENT => {
                Ok(DeleteTagStatus::Deleted)
            }
            StatusCode::NOT_FOUND => Ok(DeleteTagStatus::NotFound),
            status => {
                warn!(tag = %name, %status, "registry refused tag deletion");
                Ok(DeleteTagStatus::Failed)
            }
        }
    }
}
