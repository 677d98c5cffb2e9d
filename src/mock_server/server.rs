//! Mock Dependency-Track API server.
//!
//! Provides an axum-based HTTP server that simulates the Dependency-Track API.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers::{self, error_response, SharedState};
use super::state::MockState;

/// A mock Dependency-Track API server for testing.
///
/// The server runs in the background and can be used to test the client
/// against a realistic API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: SharedState,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    ///
    /// Useful when you want to control exactly what data is available.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "mock server stopped");
            }
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    ///
    /// Use this URL when creating a `DtrackClient` for testing.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> SharedState {
        self.state.clone()
    }

    /// Shutdown the server.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Default state with the common fixtures.
    fn default_state() -> MockState {
        Self::state_from_scenario(Fixtures::default_scenario())
    }

    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let mut state = MockState::new();

        for project in scenario.projects {
            state = state.with_project(project);
        }

        for (project_uuid, component) in scenario.components {
            state = state.with_component(&project_uuid, component);
        }

        for (component_uuid, properties) in scenario.properties {
            state = state.with_properties(&component_uuid, properties);
        }

        for (project_uuid, findings) in scenario.findings {
            state = state.with_findings(&project_uuid, findings);
        }

        state
    }

    /// Create the axum router with all routes.
    fn create_router(state: SharedState) -> Router {
        let api = Router::new()
            // Project routes
            .route(
                "/v1/project",
                get(handlers::list_projects)
                    .put(handlers::create_project)
                    .post(handlers::update_project),
            )
            .route("/v1/project/lookup", get(handlers::lookup_project))
            .route(
                "/v1/project/:uuid",
                get(handlers::get_project).delete(handlers::delete_project),
            )
            // Component routes
            .route("/v1/component", axum::routing::post(handlers::update_component))
            .route(
                "/v1/component/project/:uuid",
                get(handlers::list_components).put(handlers::create_component),
            )
            .route("/v1/component/hash/:hash", get(handlers::components_by_hash))
            .route("/v1/component/identity", get(handlers::components_by_identity))
            .route(
                "/v1/component/internal/identify",
                get(handlers::identify_internal),
            )
            .route(
                "/v1/component/:uuid",
                get(handlers::get_component).delete(handlers::delete_component),
            )
            .route(
                "/v1/component/:uuid/property",
                get(handlers::list_properties).put(handlers::create_property),
            )
            .route(
                "/v1/component/:uuid/property/:property_uuid",
                axum::routing::delete(handlers::delete_property),
            )
            // Finding routes
            .route("/v1/finding/project/:uuid", get(handlers::list_findings))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                require_api_key,
            ));

        Router::new()
            .nest("/api", api)
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Reject requests without the configured `X-Api-Key`.
async fn require_api_key(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Response {
    let required = state.read().await.required_token.clone();

    if let Some(token) = required {
        let presented = request
            .headers()
            .get("X-Api-Key")
            .and_then(|v| v.to_str().ok());
        if presented != Some(token.as_str()) {
            return error_response(StatusCode::UNAUTHORIZED, "Invalid or missing API key");
        }
    }

    next.run(request).await
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_server::fixtures::ACME_APP_UUID;
    use crate::{DtrackClient, DtrackError, Get, List, Project};

    #[tokio::test]
    async fn test_server_starts_and_responds() {
        let server = MockServer::start().await;

        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/health", server.url()))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "ok");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_get_project_with_client() {
        let server = MockServer::start().await;
        let client = DtrackClient::new("test-key", server.url()).unwrap();

        let project = Project::get(&client, ACME_APP_UUID.to_string())
            .await
            .expect("Failed to get project");

        assert_eq!(project.name, "acme-app");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_list_projects_reports_total() {
        let server = MockServer::start().await;
        let client = DtrackClient::new("test-key", server.url()).unwrap();

        let page = Project::list_page(
            &client,
            &Default::default(),
            crate::PageOptions::new(1, 1),
            &Default::default(),
        )
        .await
        .expect("Failed to list projects");

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_count, 2);
        assert_eq!(page.items[0].name, "acme-app");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_empty_server() {
        let server = MockServer::start_empty().await;
        let client = DtrackClient::new("test-key", server.url()).unwrap();

        let result = Project::get(&client, "nonexistent".to_string()).await;

        assert!(matches!(result, Err(DtrackError::NotFound { .. })));

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_required_token() {
        let state = MockState::new()
            .with_project(Fixtures::minimal_project("p-1", "locked", "1.0.0"))
            .with_required_token("secret");
        let server = MockServer::with_state(state).await;

        let wrong = DtrackClient::new("guess", server.url()).unwrap();
        let result = Project::get(&wrong, "p-1".to_string()).await;
        assert!(matches!(
            result,
            Err(DtrackError::Unauthorized {
                status_code: 401,
                ..
            })
        ));

        let right = DtrackClient::new("secret", server.url()).unwrap();
        let project = Project::get(&right, "p-1".to_string()).await.unwrap();
        assert_eq!(project.name, "locked");

        server.shutdown().await;
    }
}
