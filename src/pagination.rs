//! Pagination primitives for Dependency-Track listings.
//!
//! Every listing endpoint is driven by the same three inputs: a
//! [`PageOptions`] selecting the slice, a [`SortOptions`] selecting the
//! order, and a resource-specific filter struct. [`ListParams`] validates
//! and flattens them into one query string. [`fetch_all`] drives a
//! single-page fetch function until the whole result set is collected.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::{DtrackError, Result};

/// Page size used by [`fetch_all`] and whenever a traversal is started
/// with a page size of 0.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// A page of results from the Dependency-Track API.
///
/// `total_count` is the size of the entire result set as reported by the
/// server (`X-Total-Count`), not the number of items on this page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    /// Total number of items across all pages.
    pub total_count: u64,
    /// The items on this page.
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// Create a new page from items and the reported total.
    #[must_use]
    pub fn new(items: Vec<T>, total_count: u64) -> Self {
        Self { total_count, items }
    }

    /// A page with no items and a total of zero.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }

    /// Map the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            total_count: self.total_count,
            items: self.items.into_iter().map(f).collect(),
        }
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns an iterator over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Selects one page of a listing.
///
/// `page_number` is 1-indexed; 0 is rejected by [`PageOptions::validate`]
/// rather than clamped. A `page_size` of 0 means "unset": the parameter is
/// left out of the query and the server applies its own default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageOptions {
    /// Page number (1-indexed).
    #[serde(default = "first_page")]
    pub page_number: u32,
    /// Number of items per page (0 = server default).
    #[serde(default, skip_serializing_if = "is_zero")]
    pub page_size: u32,
}

fn first_page() -> u32 {
    1
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: 0,
        }
    }
}

impl PageOptions {
    /// Options for a specific page.
    #[must_use]
    pub fn new(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number,
            page_size,
        }
    }

    /// Options for the first page with the given size.
    #[must_use]
    pub fn with_size(page_size: u32) -> Self {
        Self::new(1, page_size)
    }

    /// The page following this one, with the same size.
    #[must_use]
    pub fn next(self) -> Self {
        Self {
            page_number: self.page_number.saturating_add(1),
            ..self
        }
    }

    /// Check the options before they are sent.
    ///
    /// # Errors
    ///
    /// Returns [`DtrackError::Validation`] if `page_number` is 0.
    pub fn validate(&self) -> Result<()> {
        if self.page_number == 0 {
            return Err(DtrackError::Validation(
                "page number must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => f.write_str("asc"),
            SortDirection::Desc => f.write_str("desc"),
        }
    }
}

/// Ordering of a listing.
///
/// Leaving both fields unset keeps the server's default ordering and sends
/// nothing. A direction without a field is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOptions {
    /// Field to sort on (`sortName`).
    #[serde(rename = "sortName", default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Sort direction (`sortOrder`).
    #[serde(rename = "sortOrder", default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<SortDirection>,
}

impl SortOptions {
    /// Sort ascending on `field`.
    #[must_use]
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            direction: Some(SortDirection::Asc),
        }
    }

    /// Sort descending on `field`.
    #[must_use]
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            direction: Some(SortDirection::Desc),
        }
    }

    /// Check the options before they are sent.
    ///
    /// # Errors
    ///
    /// Returns [`DtrackError::Validation`] if a direction is set without a
    /// field, or if the field is an empty string.
    pub fn validate(&self) -> Result<()> {
        match (&self.field, self.direction) {
            (None, Some(direction)) => Err(DtrackError::Validation(format!(
                "sort direction '{direction}' given without a sort field"
            ))),
            (Some(field), _) if field.trim().is_empty() => Err(DtrackError::Validation(
                "sort field must not be empty".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Filter for listings that take no resource-specific criteria.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct NoFilter {}

/// Validated query parameters for one listing request.
///
/// Flattens page, sort and filter options into a single query. Filter
/// fields that are set are combined by the server with AND semantics.
#[derive(Debug, Serialize)]
pub struct ListParams<'a, F: Serialize> {
    #[serde(flatten)]
    page: &'a PageOptions,
    #[serde(flatten)]
    sort: &'a SortOptions,
    #[serde(flatten)]
    filter: &'a F,
}

impl<'a, F: Serialize> ListParams<'a, F> {
    /// Validate and combine listing options.
    ///
    /// # Errors
    ///
    /// Returns [`DtrackError::Validation`] if the page or sort options are
    /// malformed.
    pub fn new(page: &'a PageOptions, sort: &'a SortOptions, filter: &'a F) -> Result<Self> {
        page.validate()?;
        sort.validate()?;
        Ok(Self { page, sort, filter })
    }
}

/// Fetch every item of a listing, one page at a time.
///
/// Equivalent to [`fetch_all_with`] using [`DEFAULT_PAGE_SIZE`] and a token
/// that is never cancelled.
///
/// # Example
///
/// ```ignore
/// use dtrack::{fetch_all, DtrackClient, Finding, FindingFilterOptions, List, SortOptions};
///
/// let client = DtrackClient::from_env()?;
/// let query = ("2d16089e-6d3a-437e-b334-f27eb2cbd7f4".to_string(), FindingFilterOptions::default());
/// let sort = SortOptions::default();
/// let findings = fetch_all(|po| Finding::list_page(&client, &query, po, &sort)).await?;
/// ```
///
/// # Errors
///
/// Returns the first error produced by `fetch_page`.
pub async fn fetch_all<T, F, Fut>(fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(PageOptions) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let cancel = CancellationToken::new();
    fetch_all_with(DEFAULT_PAGE_SIZE, &cancel, fetch_page).await
}

/// Fetch every item of a listing with an explicit page size and
/// cancellation token.
///
/// Pages are requested strictly in order, starting at page 1. The loop
/// stops once the accumulated count reaches the `total_count` reported by
/// the latest page, or when a page comes back empty. A `page_size` of 0 is
/// replaced with [`DEFAULT_PAGE_SIZE`].
///
/// The token is checked before every page and raced against the in-flight
/// request, which is dropped when the token fires.
///
/// The traversal is not transactional: if the server's total changes while
/// pages are being fetched, the result is best effort. Such drift is logged
/// and does not fail the call.
///
/// # Errors
///
/// Returns [`DtrackError::Cancelled`] if the token fires, or the first
/// error produced by `fetch_page`. Items gathered before the error are
/// discarded.
pub async fn fetch_all_with<T, F, Fut>(
    page_size: u32,
    cancel: &CancellationToken,
    mut fetch_page: F,
) -> Result<Vec<T>>
where
    F: FnMut(PageOptions) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let page_size = if page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size
    };

    let mut options = PageOptions::with_size(page_size);
    let mut all_items = Vec::new();
    let mut previous_total: Option<u64> = None;

    loop {
        if cancel.is_cancelled() {
            return Err(DtrackError::Cancelled);
        }

        let page = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(DtrackError::Cancelled),
            page = fetch_page(options) => page?,
        };
        let Page { total_count, items } = page;

        if let Some(previous) = previous_total.filter(|p| *p != total_count) {
            tracing::warn!(
                previous,
                current = total_count,
                page = options.page_number,
                "Total count changed during traversal, results are best effort"
            );
        }
        previous_total = Some(total_count);

        let fetched = items.len();
        all_items.extend(items);

        tracing::debug!(
            page = options.page_number,
            fetched,
            accumulated = all_items.len(),
            total = total_count,
            "Fetched page"
        );

        if fetched == 0 || all_items.len() as u64 >= total_count {
            break;
        }
        options = options.next();
    }

    Ok(all_items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::time::Duration;

    fn numbered_pages(total: u32, size: u32) -> Vec<Page<u32>> {
        (1..=total)
            .collect::<Vec<_>>()
            .chunks(size as usize)
            .map(|chunk| Page::new(chunk.to_vec(), u64::from(total)))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Option Serialization Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_default_page_options_omit_page_size() {
        let serialized = serde_qs::to_string(&PageOptions::default()).unwrap();
        assert_eq!(serialized, "pageNumber=1");
    }

    #[test]
    fn test_page_options_serialize() {
        let serialized = serde_qs::to_string(&PageOptions::new(2, 50)).unwrap();
        assert_eq!(serialized, "pageNumber=2&pageSize=50");
    }

    #[test]
    fn test_page_options_reject_page_zero() {
        let err = PageOptions::new(0, 10).validate().unwrap_err();
        assert!(matches!(err, DtrackError::Validation(_)));
    }

    #[test]
    fn test_page_options_next_keeps_size() {
        let next = PageOptions::new(3, 25).next();
        assert_eq!(next, PageOptions::new(4, 25));
    }

    #[test]
    fn test_unset_sort_serializes_to_nothing() {
        let serialized = serde_qs::to_string(&SortOptions::default()).unwrap();
        assert!(serialized.is_empty());
    }

    #[test]
    fn test_sort_options_round_trip() {
        let sort = SortOptions::asc("name");
        let serialized = serde_qs::to_string(&sort).unwrap();
        assert_eq!(serialized, "sortName=name&sortOrder=asc");

        let parsed: SortOptions = serde_qs::from_str(&serialized).unwrap();
        assert_eq!(parsed, sort);
        assert_eq!(parsed.field.as_deref(), Some("name"));
        assert_eq!(parsed.direction, Some(SortDirection::Asc));
    }

    #[test]
    fn test_sort_field_without_direction_is_valid() {
        let sort = SortOptions {
            field: Some("version".to_string()),
            direction: None,
        };
        assert!(sort.validate().is_ok());
        assert_eq!(serde_qs::to_string(&sort).unwrap(), "sortName=version");
    }

    #[test]
    fn test_sort_direction_without_field_is_rejected() {
        let sort = SortOptions {
            field: None,
            direction: Some(SortDirection::Desc),
        };
        let err = sort.validate().unwrap_err();
        assert!(err.to_string().contains("without a sort field"));
    }

    #[test]
    fn test_empty_sort_field_is_rejected() {
        let sort = SortOptions::desc("  ");
        assert!(matches!(sort.validate(), Err(DtrackError::Validation(_))));
    }

    #[test]
    fn test_list_params_flatten() {
        #[derive(Serialize)]
        struct Filter {
            #[serde(rename = "searchText", skip_serializing_if = "Option::is_none")]
            search_text: Option<String>,
            #[serde(rename = "onlyDirect", skip_serializing_if = "Option::is_none")]
            only_direct: Option<bool>,
        }

        let page = PageOptions::new(1, 10);
        let sort = SortOptions::desc("name");
        let filter = Filter {
            search_text: Some("log4j".to_string()),
            only_direct: None,
        };

        let params = ListParams::new(&page, &sort, &filter).unwrap();
        let serialized = serde_qs::to_string(&params).unwrap();

        assert!(serialized.contains("pageNumber=1"));
        assert!(serialized.contains("pageSize=10"));
        assert!(serialized.contains("sortName=name"));
        assert!(serialized.contains("sortOrder=desc"));
        assert!(serialized.contains("searchText=log4j"));
        assert!(!serialized.contains("onlyDirect"));
    }

    #[test]
    fn test_list_params_validate_before_building() {
        let page = PageOptions::new(0, 10);
        let sort = SortOptions::default();
        assert!(ListParams::new(&page, &sort, &NoFilter {}).is_err());
    }

    #[test]
    fn test_page_map() {
        let page = Page::new(vec![1, 2, 3], 30);
        let mapped = page.map(|x| x * 2);
        assert_eq!(mapped.items, vec![2, 4, 6]);
        assert_eq!(mapped.total_count, 30);
    }

    // -------------------------------------------------------------------------
    // Fetch-All Tests
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_fetch_all_concatenates_pages_in_order() {
        let pages = numbered_pages(25, 10);
        let calls = Cell::new(0);

        let items = fetch_all_with(10, &CancellationToken::new(), |po| {
            calls.set(calls.get() + 1);
            let page = pages[po.page_number as usize - 1].clone();
            async move { Ok(page) }
        })
        .await
        .unwrap();

        assert_eq!(items, (1..=25).collect::<Vec<_>>());
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_fetch_all_zero_total_stops_after_one_call() {
        let calls = Cell::new(0);

        let items: Vec<u32> = fetch_all(|_| {
            calls.set(calls.get() + 1);
            async { Ok(Page::empty()) }
        })
        .await
        .unwrap();

        assert!(items.is_empty());
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_fetch_all_error_on_second_page_is_returned() {
        let calls = Cell::new(0);

        let result = fetch_all_with(10, &CancellationToken::new(), |po| {
            calls.set(calls.get() + 1);
            async move {
                if po.page_number == 1 {
                    Ok(Page::new((1..=10).collect(), 25))
                } else {
                    Err(DtrackError::ApiError {
                        message: "Internal Server Error".to_string(),
                        status_code: Some(500),
                    })
                }
            }
        })
        .await;

        match result {
            Err(DtrackError::ApiError { status_code, .. }) => assert_eq!(status_code, Some(500)),
            other => panic!("Expected ApiError, got {other:?}"),
        }
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn test_fetch_all_zero_page_size_uses_default() {
        let requested = RefCell::new(Vec::new());

        let _: Vec<u32> = fetch_all_with(0, &CancellationToken::new(), |po| {
            requested.borrow_mut().push(po);
            async { Ok(Page::new(vec![1], 1)) }
        })
        .await
        .unwrap();

        assert_eq!(
            requested.into_inner(),
            vec![PageOptions::new(1, DEFAULT_PAGE_SIZE)]
        );
    }

    #[tokio::test]
    async fn test_fetch_all_stops_on_empty_page() {
        let calls = Cell::new(0);

        // Server claims 50 items but runs dry after the first page.
        let items = fetch_all_with(10, &CancellationToken::new(), |po| {
            calls.set(calls.get() + 1);
            async move {
                if po.page_number == 1 {
                    Ok(Page::new((1..=10).collect(), 50))
                } else {
                    Ok(Page::new(Vec::new(), 50))
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(items.len(), 10);
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn test_fetch_all_follows_shrinking_total() {
        let calls = Cell::new(0);

        let items = fetch_all_with(10, &CancellationToken::new(), |po| {
            calls.set(calls.get() + 1);
            async move {
                match po.page_number {
                    1 => Ok(Page::new((1..=10).collect(), 30)),
                    _ => Ok(Page::new((11..=20).collect(), 20)),
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(items.len(), 20);
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn test_fetch_all_cancelled_before_start() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let calls = Cell::new(0);

        let result: Result<Vec<u32>> = fetch_all_with(10, &cancel, |_| {
            calls.set(calls.get() + 1);
            async { Ok(Page::empty()) }
        })
        .await;

        assert!(matches!(result, Err(DtrackError::Cancelled)));
        assert_eq!(calls.get(), 0);
    }

    #[tokio::test]
    async fn test_fetch_all_cancelled_between_pages() {
        let cancel = CancellationToken::new();
        let calls = Cell::new(0);

        let result: Result<Vec<u32>> = fetch_all_with(10, &cancel, |_| {
            calls.set(calls.get() + 1);
            cancel.cancel();
            async { Ok(Page::new((1..=10).collect(), 100)) }
        })
        .await;

        assert!(matches!(result, Err(DtrackError::Cancelled)));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_fetch_all_cancels_in_flight_request() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let result: Result<Vec<u32>> = fetch_all_with(10, &cancel, |_| async {
            std::future::pending::<Result<Page<u32>>>().await
        })
        .await;

        assert!(matches!(result, Err(DtrackError::Cancelled)));
    }

    #[test]
    fn test_fetch_all_outside_async_test() {
        let pages = numbered_pages(5, 2);

        let items = tokio_test::block_on(fetch_all_with(2, &CancellationToken::new(), |po| {
            let page = pages[po.page_number as usize - 1].clone();
            async move { Ok(page) }
        }))
        .unwrap();

        assert_eq!(items, vec![1, 2, 3, 4, 5]);
    }
}
