use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::error::RegistryError;
use crate::models::{Page, Tag};
use crate::registry::{DeleteTagStatus, Registry};

/// Build a tag whose creation time lies `age` in the past; `None` leaves it
/// undated.
pub fn tag(name: &str, age: Option<Duration>) -> Tag {
    Tag {
        name: name.to_string(),
        digest: format!("sha256:{}", name),
        media_type: "application/vnd.oci.image.manifest.v1+json".to_string(),
        created_at: age.map(|age| Utc::now() - age),
        updated_at: None,
    }
}

pub fn page(tags: Vec<Tag>, next_cursor: Option<&str>) -> Page {
    Page {
        tags,
        next_cursor: next_cursor.map(|cursor| cursor.to_string()),
    }
}

/// Registry double driven by pre-scripted pages and per-tag deletion
/// responses. Unscripted deletions succeed.
pub struct ScriptedRegistry {
    pages: Mutex<VecDeque<Result<Page, RegistryError>>>,
    delete_responses: HashMap<String, Result<DeleteTagStatus, RegistryError>>,
    list_cursors: Mutex<Vec<Option<String>>>,
    delete_calls: Mutex<Vec<String>>,
}

impl ScriptedRegistry {
    pub fn with_pages(pages: Vec<Result<Page, RegistryError>>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            delete_responses: HashMap::new(),
            list_cursors: Mutex::new(Vec::new()),
            delete_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn delete_response(
        mut self,
        name: &str,
        response: Result<DeleteTagStatus, RegistryError>,
    ) -> Self {
        self.delete_responses.insert(name.to_string(), response);
        self
    }

    /// Cursors received by `list_tags`, in call order.
    pub fn list_cursors(&self) -> Vec<Option<String>> {
        self.list_cursors.lock().unwrap().clone()
    }

    /// Names passed to `delete_tag`, in call order.
    pub fn deleted_names(&self) -> Vec<String> {
        self.delete_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Registry for ScriptedRegistry {
    async fn list_tags(
        &self,
        _repository: &str,
        _page_size: usize,
        cursor: Option<&str>,
    ) -> Result<Page, RegistryError> {
        self.list_cursors
            .lock()
            .unwrap()
            .push(cursor.map(|cursor| cursor.to_string()));
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(page(vec![], None)))
    }

    async fn delete_tag(
        &self,
        _repository: &str,
        name: &str,
    ) -> Result<DeleteTagStatus, RegistryError> {
        self.delete_calls.lock().unwrap().push(name.to_string());
        self.delete_responses
            .get(name)
            .cloned()
            .unwrap_or(Ok(DeleteTagStatus::Deleted))
    }
}

/// Registry double backed by a real mutable tag list, paged on demand, so
/// repeated runs observe each other's deletions.
pub struct InMemoryRegistry {
    tags: Mutex<Vec<Tag>>,
}

impl InMemoryRegistry {
    pub fn new(tags: Vec<Tag>) -> Self {
        Self {
            tags: Mutex::new(tags),
        }
    }
}

#[async_trait]
impl Registry for InMemoryRegistry {
    async fn list_tags(
        &self,
        _repository: &str,
        page_size: usize,
        cursor: Option<&str>,
    ) -> Result<Page, RegistryError> {
        let tags = self.tags.lock().unwrap();
        let start = cursor
            .map(|cursor| cursor.parse().unwrap())
            .unwrap_or(0)
            .min(tags.len());
        let end = (start + page_size).min(tags.len());
        let next_cursor = (end < tags.len()).then(|| end.to_string());
        Ok(Page {
            tags: tags[start..end].to_vec(),
            next_cursor,
        })
    }

    async fn delete_tag(
        &self,
        _repository: &str,
        name: &str,
    ) -> Result<DeleteTagStatus, RegistryError> {
        let mut tags = self.tags.lock().unwrap();
        let before = tags.len();
        tags.retain(|tag| tag.name != name);
        if tags.len() < before {
            Ok(DeleteTagStatus::Deleted)
        } else {
            Ok(DeleteTagStatus::NotFound)
        }
    }
}
