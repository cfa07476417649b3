use tracing::debug;

use crate::error::RegistryError;
use crate::models::Page;
use crate::registry::Registry;

/// Lazy walk over a repository's tag listing, one page at a time.
///
/// The registry's continuation token is carried between calls verbatim. A
/// pager only moves forward and cannot be rewound; a fresh run starts from a
/// fresh pager. Fetches are not retried here.
pub struct TagPager<'a> {
    registry: &'a dyn Registry,
    repository: &'a str,
    page_size: usize,
    cursor: Option<String>,
    finished: bool,
}

impl<'a> TagPager<'a> {
    pub fn new(registry: &'a dyn Registry, repository: &'a str, page_size: usize) -> Self {
        Self {
            registry,
            repository,
            page_size,
            cursor: None,
            finished: false,
        }
    }

    /// Fetch the next page, or `None` once the listing is exhausted.
    /// A fetch error also ends the sequence.
    pub async fn next_page(&mut self) -> Option<Result<Page, RegistryError>> {
        if self.finished {
            return None;
        }

        match self
            .registry
            .list_tags(self.repository, self.page_size, self.cursor.as_deref())
            .await
        {
            Ok(page) => {
                debug!(
                    repository = self.repository,
                    tags = page.tags.len(),
                    more = page.next_cursor.is_some(),
                    "fetched tag page"
                );
                self.cursor = page.next_cursor.clone();
                self.finished = self.cursor.is_none();
                Some(Ok(page))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
