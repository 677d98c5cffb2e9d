//! List trait for fetching collections of entities.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::client::DtrackClient;
use crate::error::Result;
use crate::pagination::{fetch_all_with, Page, PageOptions, SortOptions, DEFAULT_PAGE_SIZE};

/// List/filter entities with pagination support.
///
/// Implement this trait for entity types that can be listed with
/// optional filtering, sorting and pagination.
///
/// # Example
///
/// ```ignore
/// use dtrack::{DtrackClient, Project, List, PageOptions, SortOptions};
///
/// let client = DtrackClient::from_env()?;
///
/// // Fetch a single page
/// let page = Project::list_page(&client, &Default::default(), PageOptions::new(1, 50), &SortOptions::asc("name")).await?;
///
/// // Fetch all pages
/// let all_projects = Project::list_all(&client, &Default::default(), &Default::default()).await?;
/// ```
#[async_trait]
pub trait List: Sized + Send {
    /// Filter options (and, for nested resources, the owning entity).
    type Query: Default + Send + Sync;

    /// List entities matching the query (single page).
    ///
    /// # Arguments
    ///
    /// * `client` - The Dependency-Track API client
    /// * `query` - Filter options
    /// * `page` - Page selection; a page size of 0 leaves the size to the server
    /// * `sort` - Sort options
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed options, or an error if the
    /// request fails.
    async fn list_page(
        client: &DtrackClient,
        query: &Self::Query,
        page: PageOptions,
        sort: &SortOptions,
    ) -> Result<Page<Self>>;

    /// List all entities matching the query (fetches all pages).
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails; no partial result is
    /// returned in that case.
    async fn list_all(
        client: &DtrackClient,
        query: &Self::Query,
        sort: &SortOptions,
    ) -> Result<Vec<Self>> {
        let cancel = CancellationToken::new();
        Self::list_all_with(client, query, sort, DEFAULT_PAGE_SIZE, &cancel).await
    }

    /// List all entities with an explicit page size and cancellation token.
    ///
    /// # Errors
    ///
    /// Returns [`DtrackError::Cancelled`](crate::DtrackError::Cancelled) if
    /// the token fires, or the first error from a page request.
    async fn list_all_with(
        client: &DtrackClient,
        query: &Self::Query,
        sort: &SortOptions,
        page_size: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<Self>> {
        fetch_all_with(page_size, cancel, move |page| {
            Self::list_page(client, query, page, sort)
        })
        .await
    }
}
