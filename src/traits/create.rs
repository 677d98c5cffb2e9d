//! Create trait for adding new entities.

use async_trait::async_trait;

use crate::client::DtrackClient;
use crate::error::Result;

/// Create a new entity.
///
/// # Example
///
/// ```ignore
/// use dtrack::{DtrackClient, Project, Create};
///
/// let client = DtrackClient::from_env()?;
/// let project = Project::create(&client, (), Project::new("my-app", "1.0.0")).await?;
/// ```
#[async_trait]
pub trait Create: Sized {
    /// The owner the entity is created under (`()` for top-level entities).
    type Parent: Send;

    /// Create the entity and return the server's copy, including its UUID.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the entity or the request fails.
    async fn create(client: &DtrackClient, parent: Self::Parent, entity: Self) -> Result<Self>;
}
