//! Mock Dependency-Track API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the
//! Dependency-Track REST API for integration and end-to-end testing. Unlike
//! wiremock which mocks at the HTTP level per-test, this server maintains
//! state across requests, so create/update/delete workflows can be exercised.
//! List endpoints honor `pageNumber`/`pageSize`/`sortName`/`sortOrder` and
//! report the total in `X-Total-Count`.
//!
//! # Example
//!
//! ```ignore
//! use dtrack::mock_server::{MockServer, ACME_APP_UUID};
//! use dtrack::{DtrackClient, Project, Get};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = DtrackClient::new("test-key", server.url()).unwrap();
//!
//!     // Server comes with default fixtures
//!     let project = Project::get(&client, ACME_APP_UUID.to_string()).await.unwrap();
//!     assert_eq!(project.name, "acme-app");
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{
    DefaultScenario, Fixtures, ACME_APP_UUID, LEGACY_PORTAL_UUID, LOG4J_SHA1, LOG4J_UUID,
};
pub use server::MockServer;
pub use state::MockState;
