//! Dependency-Track API client.
//!
//! Low-level HTTP client that handles authentication and raw requests.
//! Higher-level operations are implemented via traits on entity types.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::{DtrackError, Result};
use crate::pagination::Page;

const API_PREFIX: &str = "api/";
const API_KEY_HEADER: &str = "X-Api-Key";
const TOTAL_COUNT_HEADER: &str = "X-Total-Count";
const USER_AGENT: &str = concat!("dtrack/", env!("CARGO_PKG_VERSION"));

/// Low-level Dependency-Track API client.
///
/// Handles authentication and HTTP requests. Entity-specific operations
/// are implemented via the `Get`, `List`, `Create`, `Update` and `Delete`
/// traits on model types.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use dtrack::DtrackClient;
///
/// # fn example() -> dtrack::Result<()> {
/// // Create from environment variables
/// let client = DtrackClient::from_env()?;
///
/// // Or configure manually
/// let client = DtrackClient::new("odt_secret", "https://dtrack.example.com")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DtrackClient {
    http: Client,
    base_url: Arc<Url>,
    api_key: String,
}

impl std::fmt::Debug for DtrackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DtrackClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl DtrackClient {
    /// Create a client from environment variables.
    ///
    /// Uses `DTRACK_API_KEY` for authentication and `DTRACK_API_URL` for the
    /// server base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if either variable is not set.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("DTRACK_API_KEY").map_err(|_| {
            DtrackError::ConfigMissing("DTRACK_API_KEY environment variable not set".to_string())
        })?;
        let base_url = env::var("DTRACK_API_URL").map_err(|_| {
            DtrackError::ConfigMissing("DTRACK_API_URL environment variable not set".to_string())
        })?;

        Self::new(&api_key, &base_url)
    }

    /// Create a new client with the provided API key and base URL.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Dependency-Track API key
    /// * `base_url` - Server URL (e.g., `https://dtrack.example.com`); request
    ///   paths are resolved below `<base_url>/api/`
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(api_key: &str, base_url: &str) -> Result<Self> {
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(DtrackError::HttpError)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            api_key: api_key.to_string(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API path (e.g. `v1/project`) against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let url = self.base_url.join(API_PREFIX)?.join(path)?;
        Ok(url)
    }

    /// Make a GET request.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = self.endpoint(path)?;
        self.send(self.http.get(url)).await
    }

    /// Make a GET request with query parameters.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Response> {
        let url = self.endpoint(path)?;
        self.send(self.http.get(url).query(query)).await
    }

    /// Fetch one page of a listing endpoint.
    ///
    /// The body must be a JSON array of items and the response must carry
    /// the `X-Total-Count` header with the size of the whole result set.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_page<T, Q>(&self, path: &str, query: &Q) -> Result<Page<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.get_with_query(path, query).await?;
        let total_count = Self::total_count(&response)?;
        let items: Vec<T> = response.json().await.map_err(DtrackError::HttpError)?;

        tracing::debug!(items = items.len(), total_count, "Decoded page");
        Ok(Page::new(items, total_count))
    }

    /// Make a PUT request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        let url = self.endpoint(path)?;
        self.send(self.http.put(url).json(body)).await
    }

    /// Make a POST request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        let url = self.endpoint(path)?;
        self.send(self.http.post(url).json(body)).await
    }

    /// Make a DELETE request.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> Result<Response> {
        let url = self.endpoint(path)?;
        self.send(self.http.delete(url)).await
    }

    /// Attach the API key, send, and check the status.
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(DtrackError::HttpError)?;

        Self::check_response(response).await
    }

    /// Read the `X-Total-Count` header.
    fn total_count(response: &Response) -> Result<u64> {
        let header = response.headers().get(TOTAL_COUNT_HEADER).ok_or_else(|| {
            DtrackError::InvalidResponse(format!("missing {TOTAL_COUNT_HEADER} header"))
        })?;

        header
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .ok_or_else(|| {
                DtrackError::InvalidResponse(format!(
                    "unparseable {TOTAL_COUNT_HEADER} header: {header:?}"
                ))
            })
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(DtrackError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let message = Self::extract_error_message(response, status).await;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(DtrackError::Unauthorized {
                message,
                status_code: status.as_u16(),
            });
        }

        Err(DtrackError::ApiError {
            message,
            status_code: Some(status.as_u16()),
        })
    }

    /// Extract error message from a failed response.
    async fn extract_error_message(response: Response, status: StatusCode) -> String {
        let body = match response.text().await {
            Ok(b) => b,
            Err(_) => return format!("HTTP {status}"),
        };

        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
            if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
                return msg.to_string();
            }
            if let Some(err) = json.get("error").and_then(|m| m.as_str()) {
                return err.to_string();
            }
        }

        if body.trim().is_empty() {
            format!("HTTP {status}")
        } else {
            body
        }
    }
}
