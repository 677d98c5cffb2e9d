//! Get trait for fetching single entities.

use async_trait::async_trait;

use crate::client::DtrackClient;
use crate::error::Result;

/// Fetch a single entity by ID.
///
/// Implement this trait for entity types that can be fetched individually
/// by a unique identifier (a UUID for every Dependency-Track entity).
///
/// # Example
///
/// ```ignore
/// use dtrack::{DtrackClient, Project, Get};
///
/// let client = DtrackClient::from_env()?;
/// let project = Project::get(&client, "2d16089e-6d3a-437e-b334-f27eb2cbd7f4".to_string()).await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// The ID type for this entity.
    type Id;

    /// Fetch the entity by ID.
    ///
    /// # Errors
    ///
    /// Returns [`DtrackError::NotFound`](crate::DtrackError::NotFound) if the
    /// entity does not exist, or an error if the request fails.
    async fn get(client: &DtrackClient, id: Self::Id) -> Result<Self>;
}
