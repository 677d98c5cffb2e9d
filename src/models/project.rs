//! Project model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, TimestampMilliSeconds};

use crate::client::DtrackClient;
use crate::error::{DtrackError, Result};
use crate::models::map_not_found;
use crate::pagination::{ListParams, Page, PageOptions, SortOptions};
use crate::traits::{Create, Delete, Get, List, Update};

/// A Dependency-Track project.
///
/// Projects are the top-level containers in the portfolio. Each project
/// owns the components imported from its SBOMs and the findings raised
/// against them.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// The project UUID. Empty until the server has assigned one.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uuid: String,

    /// The project name.
    pub name: String,

    /// Project version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Project group or namespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Classifier (e.g., "APPLICATION", "LIBRARY", "CONTAINER").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,

    /// Package URL of the project itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purl: Option<String>,

    /// Whether the project is active.
    #[serde(default = "default_active")]
    pub active: bool,

    /// Project tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,

    /// Project properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<ProjectProperty>,

    /// When the last BOM was imported.
    #[serde_as(as = "Option<TimestampMilliSeconds<i64>>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_bom_import: Option<DateTime<Utc>>,

    /// Inherited risk score of the latest metrics run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_inherited_risk_score: Option<f64>,

    /// Vulnerability metrics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<ProjectMetrics>,
}

fn default_active() -> bool {
    true
}

/// A project tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name.
    pub name: String,
}

/// A key/value property attached to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProperty {
    /// Property group.
    pub group_name: String,
    /// Property name.
    pub property_name: String,
    /// Property value.
    #[serde(default)]
    pub property_value: Option<String>,
    /// Property type (e.g., "STRING", "BOOLEAN").
    pub property_type: String,
    /// Property description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Vulnerability counts for a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetrics {
    /// Critical severity vulnerabilities.
    #[serde(default)]
    pub critical: u32,
    /// High severity vulnerabilities.
    #[serde(default)]
    pub high: u32,
    /// Medium severity vulnerabilities.
    #[serde(default)]
    pub medium: u32,
    /// Low severity vulnerabilities.
    #[serde(default)]
    pub low: u32,
    /// Vulnerabilities without a severity.
    #[serde(default)]
    pub unassigned: u32,
    /// Total vulnerabilities.
    #[serde(default)]
    pub vulnerabilities: u32,
    /// Total findings (including suppressed).
    #[serde(default)]
    pub findings_total: u32,
    /// Inherited risk score.
    #[serde(default)]
    pub inherited_risk_score: f64,
}

impl Project {
    /// A new, not yet persisted project.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: Some(version.into()),
            active: true,
            ..Default::default()
        }
    }

    /// Whether the project has had at least one BOM imported.
    pub fn has_bom(&self) -> bool {
        self.last_bom_import.is_some()
    }

    /// Names of all tags.
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }

    /// Total vulnerability count, 0 if metrics are unavailable.
    pub fn vulnerability_count(&self) -> u32 {
        self.metrics.as_ref().map_or(0, |m| m.vulnerabilities)
    }

    /// Get all components of this project.
    pub async fn components(
        &self,
        client: &DtrackClient,
    ) -> Result<Vec<crate::models::component::Component>> {
        crate::models::component::get_components(
            client,
            &self.uuid,
            crate::models::component::ComponentFilterOptions::default(),
        )
        .await
    }

    /// Get all findings of this project.
    pub async fn findings(
        &self,
        client: &DtrackClient,
        filter: crate::models::finding::FindingFilterOptions,
    ) -> Result<Vec<crate::models::finding::Finding>> {
        crate::models::finding::get_findings(client, &self.uuid, filter).await
    }
}

/// Filter options for listing projects.
///
/// All set fields must match (AND semantics, applied by the server).
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFilterOptions {
    /// Only projects with exactly this name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Leave out inactive projects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_inactive: Option<bool>,

    /// Only projects without a parent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_root: Option<bool>,
}

#[async_trait]
impl Get for Project {
    type Id = String; // Project UUID

    #[tracing::instrument(skip(client))]
    async fn get(client: &DtrackClient, uuid: String) -> Result<Self> {
        let path = format!("v1/project/{}", urlencoding::encode(&uuid));

        let response = client
            .get(&path)
            .await
            .map_err(|e| map_not_found(e, "Project", &uuid))?;
        let project: Project = response.json().await.map_err(DtrackError::HttpError)?;
        Ok(project)
    }
}

#[async_trait]
impl List for Project {
    type Query = ProjectFilterOptions;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &DtrackClient,
        query: &Self::Query,
        page: PageOptions,
        sort: &SortOptions,
    ) -> Result<Page<Self>> {
        let params = ListParams::new(&page, sort, query)?;
        client.get_page("v1/project", &params).await
    }
}

#[async_trait]
impl Create for Project {
    type Parent = ();

    #[tracing::instrument(skip(client, project), fields(name = %project.name))]
    async fn create(client: &DtrackClient, _parent: (), project: Self) -> Result<Self> {
        let response = client.put("v1/project", &project).await?;
        let created: Project = response.json().await.map_err(DtrackError::HttpError)?;
        Ok(created)
    }
}

#[async_trait]
impl Update for Project {
    #[tracing::instrument(skip(client, project), fields(uuid = %project.uuid))]
    async fn update(client: &DtrackClient, project: Self) -> Result<Self> {
        let uuid = project.uuid.clone();
        let response = client
            .post("v1/project", &project)
            .await
            .map_err(|e| map_not_found(e, "Project", &uuid))?;
        let updated: Project = response.json().await.map_err(DtrackError::HttpError)?;
        Ok(updated)
    }
}

#[async_trait]
impl Delete for Project {
    type Id = String;

    #[tracing::instrument(skip(client))]
    async fn delete(client: &DtrackClient, uuid: String) -> Result<()> {
        let path = format!("v1/project/{}", urlencoding::encode(&uuid));
        client
            .delete(&path)
            .await
            .map_err(|e| map_not_found(e, "Project", &uuid))?;
        Ok(())
    }
}

// Convenience functions for working with projects

/// Look up a project by its exact name and version.
///
/// # Example
///
/// ```ignore
/// use dtrack::{DtrackClient, lookup_project};
///
/// let client = DtrackClient::from_env()?;
/// let project = lookup_project(&client, "my-app", "1.0.0").await?;
/// ```
#[tracing::instrument(skip(client))]
pub async fn lookup_project(client: &DtrackClient, name: &str, version: &str) -> Result<Project> {
    #[derive(Serialize)]
    struct LookupParams<'a> {
        name: &'a str,
        version: &'a str,
    }

    let response = client
        .get_with_query("v1/project/lookup", &LookupParams { name, version })
        .await
        .map_err(|e| map_not_found(e, "Project", &format!("{name}@{version}")))?;
    let project: Project = response.json().await.map_err(DtrackError::HttpError)?;
    Ok(project)
}

/// Fetch all projects matching the filter.
pub async fn get_projects(
    client: &DtrackClient,
    filter: ProjectFilterOptions,
) -> Result<Vec<Project>> {
    Project::list_all(client, &filter, &SortOptions::default()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_deserialize() {
        let json = r#"{
            "uuid": "2d16089e-6d3a-437e-b334-f27eb2cbd7f4",
            "name": "acme-app",
            "version": "1.0.0",
            "classifier": "APPLICATION",
            "active": true,
            "tags": [{"name": "prod"}, {"name": "web"}],
            "lastBomImport": 1700000000000,
            "lastInheritedRiskScore": 12.5,
            "metrics": {"critical": 1, "high": 2, "vulnerabilities": 3, "findingsTotal": 4}
        }"#;

        let project: Project = serde_json::from_str(json).expect("Failed to deserialize");

        assert_eq!(project.uuid, "2d16089e-6d3a-437e-b334-f27eb2cbd7f4");
        assert_eq!(project.name, "acme-app");
        assert_eq!(project.version.as_deref(), Some("1.0.0"));
        assert_eq!(project.tag_names(), vec!["prod", "web"]);
        assert!(project.has_bom());
        assert_eq!(
            project.last_bom_import.map(|t| t.timestamp()),
            Some(1_700_000_000)
        );
        assert_eq!(project.vulnerability_count(), 3);
    }

    #[test]
    fn test_project_deserialize_minimal() {
        let json = r#"{"uuid": "abc", "name": "minimal"}"#;
        let project: Project = serde_json::from_str(json).expect("Failed to deserialize");

        assert!(project.active);
        assert!(project.version.is_none());
        assert!(project.tags.is_empty());
        assert!(!project.has_bom());
        assert_eq!(project.vulnerability_count(), 0);
    }

    #[test]
    fn test_new_project_serializes_without_uuid() {
        let project = Project::new("fresh", "0.1.0");
        let value = serde_json::to_value(&project).unwrap();

        assert!(value.get("uuid").is_none());
        assert!(value.get("tags").is_none());
        assert_eq!(value["name"], "fresh");
        assert_eq!(value["version"], "0.1.0");
        assert_eq!(value["active"], true);
    }

    #[test]
    fn test_project_filter_default_is_empty() {
        let serialized = serde_qs::to_string(&ProjectFilterOptions::default()).unwrap();
        assert!(serialized.is_empty());
    }

    #[test]
    fn test_project_filter_serialize() {
        let filter = ProjectFilterOptions {
            name: Some("acme-app".to_string()),
            exclude_inactive: Some(true),
            only_root: None,
        };
        let serialized = serde_qs::to_string(&filter).unwrap();

        assert!(serialized.contains("name=acme-app"));
        assert!(serialized.contains("excludeInactive=true"));
        assert!(!serialized.contains("onlyRoot"));
    }
}
