//! Component endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::{error_response, not_found, PagingQuery, SharedState};
use crate::{Component, ComponentIdentityQueryOptions, ComponentProperty};

/// Query parameters for listing the components of a project.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListComponentsQuery {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_name: Option<String>,
    pub sort_order: Option<String>,
    pub search_text: Option<String>,
    // Accepted for compatibility; the mock has no repository metadata
    // or dependency graph to evaluate these against.
    #[allow(dead_code)]
    pub only_outdated: Option<bool>,
    #[allow(dead_code)]
    pub only_direct: Option<bool>,
}

/// Query parameters for the identity search.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityQuery {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_name: Option<String>,
    pub sort_order: Option<String>,
    pub group: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
    pub purl: Option<String>,
    pub cpe: Option<String>,
    pub swid_tag_id: Option<String>,
    pub project: Option<String>,
}

/// GET /api/v1/component/{uuid}
pub async fn get_component(
    State(state): State<SharedState>,
    Path(uuid): Path<String>,
) -> Response {
    let state = state.read().await;

    match state.get_component(&uuid) {
        Some(component) => (StatusCode::OK, Json(component.clone())).into_response(),
        None => not_found("Component", &uuid),
    }
}

/// GET /api/v1/component/project/{uuid}
pub async fn list_components(
    State(state): State<SharedState>,
    Path(project_uuid): Path<String>,
    Query(query): Query<ListComponentsQuery>,
) -> Response {
    let state = state.read().await;

    if state.get_project(&project_uuid).is_none() {
        return not_found("Project", &project_uuid);
    }
    let components = state.list_components(&project_uuid, query.search_text.as_deref());

    PagingQuery {
        page_number: query.page_number,
        page_size: query.page_size,
        sort_name: query.sort_name,
        sort_order: query.sort_order,
    }
    .respond(components)
}

/// PUT /api/v1/component/project/{uuid}
pub async fn create_component(
    State(state): State<SharedState>,
    Path(project_uuid): Path<String>,
    Json(component): Json<Component>,
) -> Response {
    let mut state = state.write().await;

    match state.create_component(&project_uuid, component) {
        Some(created) => (StatusCode::CREATED, Json(created)).into_response(),
        None => not_found("Project", &project_uuid),
    }
}

/// POST /api/v1/component
pub async fn update_component(
    State(state): State<SharedState>,
    Json(component): Json<Component>,
) -> Response {
    let uuid = component.uuid.clone();
    let mut state = state.write().await;

    match state.update_component(component) {
        Some(updated) => (StatusCode::OK, Json(updated)).into_response(),
        None => not_found("Component", &uuid),
    }
}

/// DELETE /api/v1/component/{uuid}
pub async fn delete_component(
    State(state): State<SharedState>,
    Path(uuid): Path<String>,
) -> Response {
    let mut state = state.write().await;

    if state.delete_component(&uuid) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found("Component", &uuid)
    }
}

/// GET /api/v1/component/hash/{hash}
pub async fn components_by_hash(
    State(state): State<SharedState>,
    Path(hash): Path<String>,
    Query(paging): Query<PagingQuery>,
) -> Response {
    let state = state.read().await;
    paging.respond(state.components_by_hash(&hash))
}

/// GET /api/v1/component/identity
pub async fn components_by_identity(
    State(state): State<SharedState>,
    Query(query): Query<IdentityQuery>,
) -> Response {
    let identity = ComponentIdentityQueryOptions {
        group: query.group,
        name: query.name,
        version: query.version,
        purl: query.purl,
        cpe: query.cpe,
        swid_tag_id: query.swid_tag_id,
        project: query.project,
    };
    if identity.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "At least one identity criterion is required.",
        );
    }

    let state = state.read().await;
    PagingQuery {
        page_number: query.page_number,
        page_size: query.page_size,
        sort_name: query.sort_name,
        sort_order: query.sort_order,
    }
    .respond(state.components_by_identity(&identity))
}

/// GET /api/v1/component/internal/identify
pub async fn identify_internal(State(state): State<SharedState>) -> Response {
    let mut state = state.write().await;
    state.internal_identifications += 1;
    StatusCode::NO_CONTENT.into_response()
}

/// GET /api/v1/component/{uuid}/property
pub async fn list_properties(
    State(state): State<SharedState>,
    Path(uuid): Path<String>,
) -> Response {
    let state = state.read().await;

    if state.get_component(&uuid).is_none() {
        return not_found("Component", &uuid);
    }
    let properties = state.properties.get(&uuid).cloned().unwrap_or_default();
    (StatusCode::OK, Json(properties)).into_response()
}

/// PUT /api/v1/component/{uuid}/property
pub async fn create_property(
    State(state): State<SharedState>,
    Path(uuid): Path<String>,
    Json(property): Json<ComponentProperty>,
) -> Response {
    let mut state = state.write().await;

    match state.create_property(&uuid, property) {
        Some(created) => (StatusCode::CREATED, Json(created)).into_response(),
        None => not_found("Component", &uuid),
    }
}

/// DELETE /api/v1/component/{uuid}/property/{property_uuid}
pub async fn delete_property(
    State(state): State<SharedState>,
    Path((uuid, property_uuid)): Path<(String, String)>,
) -> Response {
    let mut state = state.write().await;

    if state.delete_property(&uuid, &property_uuid) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found("Property", &property_uuid)
    }
}
