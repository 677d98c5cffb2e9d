//! Project endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::{error_response, not_found, PagingQuery, SharedState};
use crate::Project;

/// Query parameters for listing projects.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectsQuery {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_name: Option<String>,
    pub sort_order: Option<String>,
    pub name: Option<String>,
    pub exclude_inactive: Option<bool>,
    // Accepted for compatibility; the mock has no project hierarchy.
    #[allow(dead_code)]
    pub only_root: Option<bool>,
}

/// Query parameters for the project lookup.
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub name: String,
    pub version: Option<String>,
}

/// GET /api/v1/project/{uuid}
pub async fn get_project(State(state): State<SharedState>, Path(uuid): Path<String>) -> Response {
    let state = state.read().await;

    match state.get_project(&uuid) {
        Some(project) => (StatusCode::OK, Json(project.clone())).into_response(),
        None => not_found("Project", &uuid),
    }
}

/// GET /api/v1/project
pub async fn list_projects(
    State(state): State<SharedState>,
    Query(query): Query<ListProjectsQuery>,
) -> Response {
    let state = state.read().await;

    let projects = state.list_projects(
        query.name.as_deref(),
        query.exclude_inactive.unwrap_or(false),
    );

    PagingQuery {
        page_number: query.page_number,
        page_size: query.page_size,
        sort_name: query.sort_name,
        sort_order: query.sort_order,
    }
    .respond(projects)
}

/// GET /api/v1/project/lookup
pub async fn lookup_project(
    State(state): State<SharedState>,
    Query(query): Query<LookupQuery>,
) -> Response {
    let state = state.read().await;

    match state.lookup_project(&query.name, query.version.as_deref()) {
        Some(project) => (StatusCode::OK, Json(project.clone())).into_response(),
        None => not_found(
            "Project",
            &format!("{}@{}", query.name, query.version.unwrap_or_default()),
        ),
    }
}

/// PUT /api/v1/project
pub async fn create_project(
    State(state): State<SharedState>,
    Json(project): Json<Project>,
) -> Response {
    let mut state = state.write().await;

    match state.create_project(project) {
        Some(created) => (StatusCode::CREATED, Json(created)).into_response(),
        None => error_response(
            StatusCode::CONFLICT,
            "A project with the specified name and version already exists.",
        ),
    }
}

/// POST /api/v1/project
pub async fn update_project(
    State(state): State<SharedState>,
    Json(project): Json<Project>,
) -> Response {
    let uuid = project.uuid.clone();
    let mut state = state.write().await;

    match state.update_project(project) {
        Some(updated) => (StatusCode::OK, Json(updated)).into_response(),
        None => not_found("Project", &uuid),
    }
}

/// DELETE /api/v1/project/{uuid}
pub async fn delete_project(
    State(state): State<SharedState>,
    Path(uuid): Path<String>,
) -> Response {
    let mut state = state.write().await;

    if state.delete_project(&uuid) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found("Project", &uuid)
    }
}
