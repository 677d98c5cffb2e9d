//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Dependency-Track server.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{Component, ComponentIdentityQueryOptions, ComponentProperty, Finding, Project};

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// Projects indexed by UUID.
    pub projects: HashMap<String, Project>,

    /// Components indexed by UUID. Each carries its owning project.
    pub components: HashMap<String, Component>,

    /// Component properties indexed by component UUID.
    pub properties: HashMap<String, Vec<ComponentProperty>>,

    /// Findings indexed by project UUID.
    pub findings: HashMap<String, Vec<Finding>>,

    /// Number of internal component identification runs requested.
    pub internal_identifications: u32,

    /// Optional API key. If set, requests must carry it in `X-Api-Key`.
    pub required_token: Option<String>,

    next_id: u64,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a project to the state.
    pub fn with_project(mut self, project: Project) -> Self {
        self.projects.insert(project.uuid.clone(), project);
        self
    }

    /// Add a component to a project.
    pub fn with_component(mut self, project_uuid: &str, mut component: Component) -> Self {
        component.project = self.project_stub(project_uuid);
        self.components.insert(component.uuid.clone(), component);
        self
    }

    /// Add properties for a component.
    pub fn with_properties(mut self, component_uuid: &str, props: Vec<ComponentProperty>) -> Self {
        self.properties.insert(component_uuid.to_string(), props);
        self
    }

    /// Add findings for a project.
    pub fn with_findings(mut self, project_uuid: &str, findings: Vec<Finding>) -> Self {
        self.findings.insert(project_uuid.to_string(), findings);
        self
    }

    /// Set the required API key.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    /// Hand out a fresh UUID-shaped identifier.
    pub fn next_uuid(&mut self) -> String {
        self.next_id += 1;
        format!("00000000-0000-4000-8000-{:012x}", self.next_id)
    }

    /// Get a project by UUID.
    pub fn get_project(&self, uuid: &str) -> Option<&Project> {
        self.projects.get(uuid)
    }

    /// Find a project by exact name and version.
    pub fn lookup_project(&self, name: &str, version: Option<&str>) -> Option<&Project> {
        self.projects
            .values()
            .find(|p| p.name == name && p.version.as_deref() == version)
    }

    /// List projects ordered by name, then version.
    pub fn list_projects(&self, name: Option<&str>, exclude_inactive: bool) -> Vec<&Project> {
        let mut projects: Vec<&Project> = self
            .projects
            .values()
            .filter(|p| name.map_or(true, |n| p.name == n))
            .filter(|p| !exclude_inactive || p.active)
            .collect();
        projects.sort_by(|a, b| (&a.name, &a.version).cmp(&(&b.name, &b.version)));
        projects
    }

    /// Insert a new project, assigning it a UUID.
    ///
    /// Returns `None` if a project with the same name and version exists.
    pub fn create_project(&mut self, mut project: Project) -> Option<Project> {
        if self
            .lookup_project(&project.name, project.version.as_deref())
            .is_some()
        {
            return None;
        }
        project.uuid = self.next_uuid();
        self.projects.insert(project.uuid.clone(), project.clone());
        Some(project)
    }

    /// Replace an existing project.
    pub fn update_project(&mut self, project: Project) -> Option<Project> {
        let slot = self.projects.get_mut(&project.uuid)?;
        *slot = project.clone();
        Some(project)
    }

    /// Remove a project together with its components and findings.
    pub fn delete_project(&mut self, uuid: &str) -> bool {
        if self.projects.remove(uuid).is_none() {
            return false;
        }
        let owned: Vec<String> = self
            .components
            .values()
            .filter(|c| c.project_uuid() == Some(uuid))
            .map(|c| c.uuid.clone())
            .collect();
        for component_uuid in owned {
            self.components.remove(&component_uuid);
            self.properties.remove(&component_uuid);
        }
        self.findings.remove(uuid);
        true
    }

    /// Get a component by UUID.
    pub fn get_component(&self, uuid: &str) -> Option<&Component> {
        self.components.get(uuid)
    }

    /// List the components of a project ordered by name, then version.
    ///
    /// `search` matches case-insensitively against group, name and version.
    pub fn list_components(&self, project_uuid: &str, search: Option<&str>) -> Vec<&Component> {
        let needle = search.map(str::to_lowercase);
        let mut components: Vec<&Component> = self
            .components
            .values()
            .filter(|c| c.project_uuid() == Some(project_uuid))
            .filter(|c| {
                needle.as_deref().map_or(true, |n| {
                    c.name.to_lowercase().contains(n)
                        || c.version.to_lowercase().contains(n)
                        || c.group
                            .as_deref()
                            .is_some_and(|g| g.to_lowercase().contains(n))
                })
            })
            .collect();
        sort_components(&mut components);
        components
    }

    /// Components carrying the given hash in any hash field.
    pub fn components_by_hash(&self, hash: &str) -> Vec<&Component> {
        let mut components: Vec<&Component> = self
            .components
            .values()
            .filter(|c| {
                [&c.md5, &c.sha1, &c.sha256]
                    .into_iter()
                    .any(|h| h.as_deref().is_some_and(|h| h.eq_ignore_ascii_case(hash)))
            })
            .collect();
        sort_components(&mut components);
        components
    }

    /// Components matching every set identity criterion.
    pub fn components_by_identity(
        &self,
        identity: &ComponentIdentityQueryOptions,
    ) -> Vec<&Component> {
        fn matches(criterion: &Option<String>, value: Option<&str>) -> bool {
            criterion
                .as_deref()
                .map_or(true, |want| value.unwrap_or("") == want)
        }

        let mut components: Vec<&Component> = self
            .components
            .values()
            .filter(|c| {
                matches(&identity.group, c.group.as_deref())
                    && matches(&identity.name, Some(c.name.as_str()))
                    && matches(&identity.version, Some(c.version.as_str()))
                    && matches(&identity.purl, c.purl.as_deref())
                    && matches(&identity.cpe, c.cpe.as_deref())
                    && matches(&identity.swid_tag_id, c.swid_tag_id.as_deref())
                    && matches(&identity.project, c.project_uuid())
            })
            .collect();
        sort_components(&mut components);
        components
    }

    /// Insert a new component into a project, assigning it a UUID.
    ///
    /// Returns `None` if the project does not exist.
    pub fn create_component(
        &mut self,
        project_uuid: &str,
        mut component: Component,
    ) -> Option<Component> {
        component.project = Some(self.project_stub(project_uuid)?);
        component.uuid = self.next_uuid();
        self.components
            .insert(component.uuid.clone(), component.clone());
        Some(component)
    }

    /// Replace an existing component, keeping its project.
    pub fn update_component(&mut self, mut component: Component) -> Option<Component> {
        let slot = self.components.get_mut(&component.uuid)?;
        component.project = slot.project.take();
        *slot = component.clone();
        Some(component)
    }

    /// Remove a component and its properties.
    pub fn delete_component(&mut self, uuid: &str) -> bool {
        self.properties.remove(uuid);
        self.components.remove(uuid).is_some()
    }

    /// Attach a property to a component, assigning it a UUID.
    ///
    /// Returns `None` if the component does not exist.
    pub fn create_property(
        &mut self,
        component_uuid: &str,
        mut property: ComponentProperty,
    ) -> Option<ComponentProperty> {
        if !self.components.contains_key(component_uuid) {
            return None;
        }
        property.uuid = self.next_uuid();
        self.properties
            .entry(component_uuid.to_string())
            .or_default()
            .push(property.clone());
        Some(property)
    }

    /// Remove a property from a component.
    pub fn delete_property(&mut self, component_uuid: &str, property_uuid: &str) -> bool {
        let Some(props) = self.properties.get_mut(component_uuid) else {
            return false;
        };
        let before = props.len();
        props.retain(|p| p.uuid != property_uuid);
        props.len() != before
    }

    /// Findings of a project, leaving out suppressed ones unless asked.
    pub fn list_findings(
        &self,
        project_uuid: &str,
        include_suppressed: bool,
        source: Option<&str>,
    ) -> Vec<&Finding> {
        self.findings
            .get(project_uuid)
            .map(|findings| {
                findings
                    .iter()
                    .filter(|f| include_suppressed || !f.is_suppressed())
                    .filter(|f| source.map_or(true, |s| f.vulnerability.source == s))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The trimmed-down project record the server embeds in components.
    fn project_stub(&self, project_uuid: &str) -> Option<Project> {
        self.projects.get(project_uuid).map(|p| Project {
            uuid: p.uuid.clone(),
            name: p.name.clone(),
            version: p.version.clone(),
            active: p.active,
            ..Default::default()
        })
    }
}

fn sort_components(components: &mut [&Component]) {
    components.sort_by(|a, b| (&a.name, &a.version, &a.uuid).cmp(&(&b.name, &b.version, &b.uuid)));
}
