//! HTTP request handlers for the mock server.

pub mod components;
pub mod findings;
pub mod projects;

pub use components::*;
pub use findings::*;
pub use projects::*;

use std::cmp::Ordering;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;

/// State handle shared by every handler.
pub type SharedState = Arc<RwLock<MockState>>;

/// Header carrying the total number of matching items on list endpoints.
pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

/// Paging and sorting query parameters accepted by list endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagingQuery {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_name: Option<String>,
    pub sort_order: Option<String>,
}

impl PagingQuery {
    /// Sort, slice and serialize one page, with the total in the header.
    ///
    /// Without a page size the whole collection is returned.
    pub fn respond<T: Serialize + Clone>(&self, items: Vec<&T>) -> Response {
        let total = items.len();
        let mut items: Vec<T> = items.into_iter().cloned().collect();

        if let Some(ref field) = self.sort_name {
            items.sort_by(|a, b| compare_field(a, b, field));
            if self.sort_order.as_deref() == Some("desc") {
                items.reverse();
            }
        }

        let items = match self.page_size.filter(|size| *size > 0) {
            Some(size) => {
                let page = self.page_number.unwrap_or(1).max(1) as usize;
                let start = (page - 1) * size as usize;
                items.into_iter().skip(start).take(size as usize).collect()
            }
            None => items,
        };

        (
            StatusCode::OK,
            [(TOTAL_COUNT_HEADER, total.to_string())],
            Json(items),
        )
            .into_response()
    }
}

fn compare_field<T: Serialize>(a: &T, b: &T, field: &str) -> Ordering {
    let key = |item: &T| {
        serde_json::to_value(item)
            .ok()
            .and_then(|v| v.get(field).cloned())
            .map(|v| match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .unwrap_or_default()
    };
    key(a).cmp(&key(b))
}

/// JSON 404 body in the server's error shape.
pub fn not_found(entity: &str, id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": format!("{entity} not found"),
            "message": format!("No {} found with UUID: {}", entity.to_lowercase(), id)
        })),
    )
        .into_response()
}

/// JSON error body with an arbitrary status.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": message
        })),
    )
        .into_response()
}
