//! Component model and trait implementations.


use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::DtrackClient;
use crate::error::{DtrackError, Result};
use crate::models::map_not_found;
use crate::models::project::Project;
use crate::pagination::{ListParams, NoFilter, Page, PageOptions, SortOptions};
use crate::traits::{Create, Delete, Get, List, Update};

/// A component of a Dependency-Track project.
///
/// Components are the packages, libraries and other artifacts listed in a
/// project's SBOM.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    /// The component UUID. Empty until the server has assigned one.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uuid: String,

    /// Component name.
    pub name: String,

    /// Component version.
    #[serde(default)]
    pub version: String,

    /// Group, namespace or vendor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Classifier (e.g., "LIBRARY", "APPLICATION", "FRAMEWORK").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,

    /// Package URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purl: Option<String>,

    /// CPE identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpe: Option<String>,

    /// SWID tag identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swid_tag_id: Option<String>,

    /// MD5 hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,

    /// SHA-1 hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,

    /// SHA-256 hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,

    /// Resolved license name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether the component was identified as internal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_internal: Option<bool>,

    /// The owning project (populated by the server on reads).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<Project>,
}

impl Component {
    /// A new, not yet persisted component.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        classifier: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            classifier: Some(classifier.into()),
            ..Default::default()
        }
    }

    /// `group:name@version`, leaving out the parts that are unset.
    pub fn coordinates(&self) -> String {
        let mut out = match self.group.as_deref() {
            Some(group) if !group.is_empty() => format!("{group}:{}", self.name),
            _ => self.name.clone(),
        };
        if !self.version.is_empty() {
            out.push('@');
            out.push_str(&self.version);
        }
        out
    }

    /// UUID of the owning project, if the server included it.
    pub fn project_uuid(&self) -> Option<&str> {
        self.project.as_ref().map(|p| p.uuid.as_str())
    }

    /// Whether the component is internal.
    pub fn is_internal(&self) -> bool {
        self.is_internal.unwrap_or(false)
    }

    /// Get the properties of this component.
    pub async fn properties(&self, client: &DtrackClient) -> Result<Vec<ComponentProperty>> {
        get_properties(client, &self.uuid).await
    }
}

/// A key/value property attached to a component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentProperty {
    /// The property UUID. Empty until the server has assigned one.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uuid: String,

    /// Property group.
    #[serde(rename = "groupName")]
    pub group: String,

    /// Property name.
    #[serde(rename = "propertyName")]
    pub name: String,

    /// Property value.
    #[serde(rename = "propertyValue", default)]
    pub value: String,

    /// Property type (e.g., "STRING", "INTEGER", "BOOLEAN").
    #[serde(rename = "propertyType")]
    pub property_type: String,

    /// Property description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl ComponentProperty {
    /// A new, not yet persisted property.
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
        property_type: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            value: value.into(),
            property_type: property_type.into(),
            ..Default::default()
        }
    }
}

/// Filter options for listing the components of a project.
///
/// All set fields must match (AND semantics, applied by the server).
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentFilterOptions {
    /// Only components with a newer version available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_outdated: Option<bool>,

    /// Only direct dependencies of the project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_direct: Option<bool>,

    /// Free-text search on name, group and version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_text: Option<String>,
}

/// Identity criteria for locating components across the portfolio.
///
/// Unset criteria are left out of the request. An explicitly empty string
/// is sent as-is, since the server treats it differently from absence.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentIdentityQueryOptions {
    /// Group, namespace or vendor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Component name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Component version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Package URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purl: Option<String>,

    /// CPE identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpe: Option<String>,

    /// SWID tag identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swid_tag_id: Option<String>,

    /// Restrict to one project (UUID).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

impl ComponentIdentityQueryOptions {
    /// Whether no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.group.is_none()
            && self.name.is_none()
            && self.version.is_none()
            && self.purl.is_none()
            && self.cpe.is_none()
            && self.swid_tag_id.is_none()
            && self.project.is_none()
    }
}

/// Query type for component listing (project UUID and filters).
pub type ComponentQuery = (String, ComponentFilterOptions);

#[async_trait]
impl Get for Component {
    type Id = String; // Component UUID

    #[tracing::instrument(skip(client))]
    async fn get(client: &DtrackClient, uuid: String) -> Result<Self> {
        let path = format!("v1/component/{}", urlencoding::encode(&uuid));

        let response = client
            .get(&path)
            .await
            .map_err(|e| map_not_found(e, "Component", &uuid))?;
        let component: Component = response.json().await.map_err(DtrackError::HttpError)?;
        Ok(component)
    }
}

#[async_trait]
impl List for Component {
    type Query = ComponentQuery; // (project_uuid, filters)

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &DtrackClient,
        query: &Self::Query,
        page: PageOptions,
        sort: &SortOptions,
    ) -> Result<Page<Self>> {
        let (project_uuid, filters) = query;
        if project_uuid.is_empty() {
            return Err(DtrackError::Validation(
                "project UUID is required to list components".to_string(),
            ));
        }
        let path = format!(
            "v1/component/project/{}",
            urlencoding::encode(project_uuid)
        );

        let params = ListParams::new(&page, sort, filters)?;
        client.get_page(&path, &params).await
    }
}

#[async_trait]
impl Create for Component {
    type Parent = String; // Project UUID

    #[tracing::instrument(skip(client, component), fields(name = %component.name))]
    async fn create(client: &DtrackClient, project_uuid: String, component: Self) -> Result<Self> {
        let path = format!(
            "v1/component/project/{}",
            urlencoding::encode(&project_uuid)
        );

        let response = client
            .put(&path, &component)
            .await
            .map_err(|e| map_not_found(e, "Project", &project_uuid))?;
        let created: Component = response.json().await.map_err(DtrackError::HttpError)?;
        Ok(created)
    }
}

#[async_trait]
impl Update for Component {
    #[tracing::instrument(skip(client, component), fields(uuid = %component.uuid))]
    async fn update(client: &DtrackClient, component: Self) -> Result<Self> {
        let uuid = component.uuid.clone();
        let response = client
            .post("v1/component", &component)
            .await
            .map_err(|e| map_not_found(e, "Component", &uuid))?;
        let updated: Component = response.json().await.map_err(DtrackError::HttpError)?;
        Ok(updated)
    }
}

#[async_trait]
impl Delete for Component {
    type Id = String;

    #[tracing::instrument(skip(client))]
    async fn delete(client: &DtrackClient, uuid: String) -> Result<()> {
        let path = format!("v1/component/{}", urlencoding::encode(&uuid));
        client
            .delete(&path)
            .await
            .map_err(|e| map_not_found(e, "Component", &uuid))?;
        Ok(())
    }
}

// Convenience functions for working with components

/// Fetch all components of a project.
///
/// # Example
///
/// ```ignore
/// use dtrack::{DtrackClient, get_components, ComponentFilterOptions};
///
/// let client = DtrackClient::from_env()?;
/// let components = get_components(
///     &client,
///     "2d16089e-6d3a-437e-b334-f27eb2cbd7f4",
///     ComponentFilterOptions { only_outdated: Some(true), ..Default::default() },
/// ).await?;
/// ```
pub async fn get_components(
    client: &DtrackClient,
    project_uuid: &str,
    filter: ComponentFilterOptions,
) -> Result<Vec<Component>> {
    Component::list_all(
        client,
        &(project_uuid.to_string(), filter),
        &SortOptions::default(),
    )
    .await
}

/// Fetch a single page of components of a project.
pub async fn get_components_page(
    client: &DtrackClient,
    project_uuid: &str,
    filter: ComponentFilterOptions,
    page: PageOptions,
    sort: &SortOptions,
) -> Result<Page<Component>> {
    Component::list_page(client, &(project_uuid.to_string(), filter), page, sort).await
}

/// Find components across the portfolio by hash (MD5, SHA-1, SHA-256, ...).
#[tracing::instrument(skip(client))]
pub async fn get_components_by_hash(
    client: &DtrackClient,
    hash: &str,
    page: PageOptions,
    sort: &SortOptions,
) -> Result<Page<Component>> {
    if hash.is_empty() {
        return Err(DtrackError::Validation("hash must not be empty".to_string()));
    }
    let path = format!("v1/component/hash/{}", urlencoding::encode(hash));

    let params = ListParams::new(&page, sort, &NoFilter {})?;
    client.get_page(&path, &params).await
}

/// Find components across the portfolio by identity.
///
/// # Example
///
/// ```ignore
/// use dtrack::{DtrackClient, get_components_by_identity, ComponentIdentityQueryOptions};
///
/// let client = DtrackClient::from_env()?;
/// let page = get_components_by_identity(
///     &client,
///     Default::default(),
///     &Default::default(),
///     &ComponentIdentityQueryOptions { name: Some("log4j-core".to_string()), ..Default::default() },
/// ).await?;
/// ```
#[tracing::instrument(skip(client))]
pub async fn get_components_by_identity(
    client: &DtrackClient,
    page: PageOptions,
    sort: &SortOptions,
    identity: &ComponentIdentityQueryOptions,
) -> Result<Page<Component>> {
    if identity.is_empty() {
        return Err(DtrackError::Validation(
            "at least one identity criterion is required".to_string(),
        ));
    }

    let params = ListParams::new(&page, sort, identity)?;
    client.get_page("v1/component/identity", &params).await
}

/// Ask the server to re-run internal component identification.
#[tracing::instrument(skip(client))]
pub async fn identify_internal_components(client: &DtrackClient) -> Result<()> {
    client.get("v1/component/internal/identify").await?;
    Ok(())
}

/// Fetch all properties of a component (this endpoint is not paginated).
#[tracing::instrument(skip(client))]
pub async fn get_properties(
    client: &DtrackClient,
    component_uuid: &str,
) -> Result<Vec<ComponentProperty>> {
    let path = format!(
        "v1/component/{}/property",
        urlencoding::encode(component_uuid)
    );

    let response = client
        .get(&path)
        .await
        .map_err(|e| map_not_found(e, "Component", component_uuid))?;
    let properties: Vec<ComponentProperty> =
        response.json().await.map_err(DtrackError::HttpError)?;
    Ok(properties)
}

/// Attach a new property to a component.
#[tracing::instrument(skip(client, property), fields(name = %property.name))]
pub async fn create_property(
    client: &DtrackClient,
    component_uuid: &str,
    property: ComponentProperty,
) -> Result<ComponentProperty> {
    let path = format!(
        "v1/component/{}/property",
        urlencoding::encode(component_uuid)
    );

    let response = client
        .put(&path, &property)
        .await
        .map_err(|e| map_not_found(e, "Component", component_uuid))?;
    let created: ComponentProperty = response.json().await.map_err(DtrackError::HttpError)?;
    Ok(created)
}

/// Remove a property from a component.
#[tracing::instrument(skip(client))]
pub async fn delete_property(
    client: &DtrackClient,
    component_uuid: &str,
    property_uuid: &str,
) -> Result<()> {
    let path = format!(
        "v1/component/{}/property/{}",
        urlencoding::encode(component_uuid),
        urlencoding::encode(property_uuid)
    );

    client
        .delete(&path)
        .await
        .map_err(|e| map_not_found(e, "ComponentProperty", property_uuid))?;
    Ok(())
}
