//! Dependency-Track API client library.
//!
//! A Rust library for interacting with the Dependency-Track REST API using
//! a trait-based architecture where each operation (Get, List, Create,
//! Update, Delete) is defined as a trait that entity types implement.
//!
//! # Quick Start
//!
//! ```no_run
//! use dtrack::{DtrackClient, Finding, FindingFilterOptions, List, Project, PageOptions, SortOptions};
//!
//! #[tokio::main]
//! async fn main() -> dtrack::Result<()> {
//!     // Create client from environment variables
//!     let client = DtrackClient::from_env()?;
//!
//!     // One page of projects, sorted by name
//!     let page = Project::list_page(
//!         &client,
//!         &Default::default(),
//!         PageOptions::new(1, 25),
//!         &SortOptions::asc("name"),
//!     )
//!     .await?;
//!     println!("{} projects in total", page.total_count);
//!
//!     // Every finding of the first project, all pages
//!     if let Some(project) = page.items.first() {
//!         let query = (project.uuid.clone(), FindingFilterOptions::default());
//!         let sort = SortOptions::default();
//!         let findings =
//!             dtrack::fetch_all(|po| Finding::list_page(&client, &query, po, &sort)).await?;
//!         println!("Found {} findings", findings.len());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Pagination
//!
//! Listing endpoints return a [`Page`] carrying the server's total count.
//! [`fetch_all`] and [`List::list_all`] walk pages in order until that
//! total is reached; any error aborts the traversal and no partial result
//! is returned. [`fetch_all_with`] adds a page size and a
//! [`CancellationToken`](tokio_util::sync::CancellationToken).
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `DTRACK_API_KEY` (required) - Your Dependency-Track API key
//! - `DTRACK_API_URL` (required) - Server base URL (e.g., `https://dtrack.example.com`)

pub mod cli;
mod client;
mod error;
#[cfg(feature = "test-server")]
pub mod mock_server;
mod models;
pub mod output;
mod pagination;
mod traits;

// Re-export core types
pub use client::DtrackClient;
pub use error::{DtrackError, Result};
pub use pagination::{
    fetch_all, fetch_all_with, ListParams, NoFilter, Page, PageOptions, SortDirection,
    SortOptions, DEFAULT_PAGE_SIZE,
};

// Re-export output formatting
pub use output::PrettyPrint;

// Re-export traits
pub use traits::{Create, Delete, Get, List, Update};

// Re-export models
pub use models::{
    // Project types
    Project,
    ProjectFilterOptions,
    ProjectMetrics,
    ProjectProperty,
    Tag,
    // Component types
    Component,
    ComponentFilterOptions,
    ComponentIdentityQueryOptions,
    ComponentProperty,
    ComponentQuery,
    // Finding types
    AnalysisState,
    Cwe,
    Finding,
    FindingAnalysis,
    FindingAttribution,
    FindingComponent,
    FindingFilterOptions,
    FindingQuery,
    FindingVulnerability,
    Severity,
};

// Re-export convenience functions
pub use models::{get_projects, lookup_project};
pub use models::{
    create_property, delete_property, get_components, get_components_by_hash,
    get_components_by_identity, get_components_page, get_properties,
    identify_internal_components,
};
pub use models::{get_findings, get_findings_page};
