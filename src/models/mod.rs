//! Dependency-Track API model types.

mod component;
mod finding;
mod project;

pub use component::*;
pub use finding::*;
pub use project::*;

use crate::error::DtrackError;

/// Turn a 404 from a single-entity endpoint into [`DtrackError::NotFound`].
pub(crate) fn map_not_found(err: DtrackError, entity_type: &'static str, id: &str) -> DtrackError {
    match err {
        DtrackError::ApiError {
            status_code: Some(404),
            ..
        } => DtrackError::NotFound {
            entity_type,
            id: id.to_string(),
        },
        other => other,
    }
}
