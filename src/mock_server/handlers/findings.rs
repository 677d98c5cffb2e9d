//! Finding endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use serde::Deserialize;

use super::{not_found, PagingQuery, SharedState};

/// Query parameters for listing the findings of a project.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFindingsQuery {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_name: Option<String>,
    pub sort_order: Option<String>,
    pub suppressed: Option<bool>,
    pub source: Option<String>,
}

/// GET /api/v1/finding/project/{uuid}
pub async fn list_findings(
    State(state): State<SharedState>,
    Path(project_uuid): Path<String>,
    Query(query): Query<ListFindingsQuery>,
) -> Response {
    let state = state.read().await;

    if state.get_project(&project_uuid).is_none() {
        return not_found("Project", &project_uuid);
    }
    let findings = state.list_findings(
        &project_uuid,
        query.suppressed.unwrap_or(false),
        query.source.as_deref(),
    );

    PagingQuery {
        page_number: query.page_number,
        page_size: query.page_size,
        sort_name: query.sort_name,
        sort_order: query.sort_order,
    }
    .respond(findings)
}
