//! Update trait for modifying entities.

use async_trait::async_trait;

use crate::client::DtrackClient;
use crate::error::Result;

/// Update an existing entity.
///
/// Dependency-Track replaces the whole entity identified by the UUID carried
/// in the body, so the full updated value is sent.
///
/// # Example
///
/// ```ignore
/// use dtrack::{DtrackClient, Component, Get, Update};
///
/// let client = DtrackClient::from_env()?;
/// let mut component = Component::get(&client, uuid).await?;
/// component.version = "1.2.4".to_string();
/// let updated = Component::update(&client, component).await?;
/// ```
#[async_trait]
pub trait Update: Sized {
    /// Update the entity and return the updated version.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found or the request fails.
    async fn update(client: &DtrackClient, entity: Self) -> Result<Self>;
}
