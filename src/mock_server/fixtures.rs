//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use crate::{
    Component, ComponentProperty, Finding, FindingAnalysis, FindingComponent,
    FindingVulnerability, Project, ProjectMetrics, Severity,
};

/// UUID of the main project in the default scenario.
pub const ACME_APP_UUID: &str = "2d16089e-6d3a-437e-b334-f27eb2cbd7f4";

/// UUID of the inactive project in the default scenario.
pub const LEGACY_PORTAL_UUID: &str = "9a3b6ad0-87c1-4b2e-a51f-0c2d4e6f8a10";

/// UUID of the log4j component in the default scenario.
pub const LOG4J_UUID: &str = "c3f0e5a2-1b4d-4c6e-8f9a-0b1c2d3e4f50";

/// SHA-1 of the log4j component in the default scenario.
pub const LOG4J_SHA1: &str = "9141212b8507ab50a45525b545b39d224614528b";

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    // =========================================================================
    // Project Fixtures
    // =========================================================================

    /// Create a minimal project with required fields only.
    pub fn minimal_project(uuid: &str, name: &str, version: &str) -> Project {
        Project {
            uuid: uuid.to_string(),
            ..Project::new(name, version)
        }
    }

    /// Create a project with vulnerability metrics.
    pub fn project_with_metrics(
        uuid: &str,
        name: &str,
        critical: u32,
        high: u32,
        medium: u32,
        low: u32,
    ) -> Project {
        let mut project = Self::minimal_project(uuid, name, "1.0.0");
        project.classifier = Some("APPLICATION".to_string());
        project.metrics = Some(ProjectMetrics {
            critical,
            high,
            medium,
            low,
            vulnerabilities: critical + high + medium + low,
            findings_total: critical + high + medium + low,
            ..Default::default()
        });
        project
    }

    // =========================================================================
    // Component Fixtures
    // =========================================================================

    /// Create a library component.
    pub fn library(uuid: &str, name: &str, version: &str) -> Component {
        Component {
            uuid: uuid.to_string(),
            ..Component::new(name, version, "LIBRARY")
        }
    }

    /// Create an npm component with a package URL.
    pub fn npm_component(uuid: &str, name: &str, version: &str) -> Component {
        let mut component = Self::library(uuid, name, version);
        component.purl = Some(format!("pkg:npm/{}@{}", name, version));
        component
    }

    /// Create a maven component with a package URL.
    pub fn maven_component(uuid: &str, group: &str, name: &str, version: &str) -> Component {
        let mut component = Self::library(uuid, name, version);
        component.group = Some(group.to_string());
        component.purl = Some(format!("pkg:maven/{}/{}@{}", group, name, version));
        component
    }

    // =========================================================================
    // Finding Fixtures
    // =========================================================================

    /// Create a finding for a component.
    pub fn finding(component: &Component, vuln_id: &str, severity: Severity) -> Finding {
        Finding {
            component: FindingComponent {
                uuid: component.uuid.clone(),
                name: component.name.clone(),
                group: component.group.clone(),
                version: Some(component.version.clone()),
                purl: component.purl.clone(),
                latest_version: None,
                project: component.project_uuid().map(str::to_string),
            },
            vulnerability: FindingVulnerability {
                uuid: format!("vuln-{}", vuln_id.to_lowercase()),
                vuln_id: vuln_id.to_string(),
                source: if vuln_id.starts_with("GHSA") {
                    "GITHUB".to_string()
                } else {
                    "NVD".to_string()
                },
                title: None,
                severity,
                cvss_v2_base_score: None,
                cvss_v3_base_score: None,
                epss_score: None,
                epss_percentile: None,
                cwes: vec![],
                description: Some(format!("{} in {}", vuln_id, component.name)),
                recommendation: None,
            },
            analysis: FindingAnalysis::default(),
            attribution: None,
            matrix: None,
        }
    }

    /// Create a suppressed finding.
    pub fn suppressed_finding(component: &Component, vuln_id: &str, severity: Severity) -> Finding {
        let mut finding = Self::finding(component, vuln_id, severity);
        finding.analysis.is_suppressed = true;
        finding
    }

    // =========================================================================
    // Scenario Builders
    // =========================================================================

    /// Create a default set of test data for common scenarios.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario::new()
    }
}

/// A complete test scenario with related entities.
pub struct DefaultScenario {
    pub projects: Vec<Project>,
    pub components: Vec<(String, Component)>,
    pub properties: Vec<(String, Vec<ComponentProperty>)>,
    pub findings: Vec<(String, Vec<Finding>)>,
}

impl DefaultScenario {
    fn new() -> Self {
        let mut legacy = Fixtures::minimal_project(LEGACY_PORTAL_UUID, "legacy-portal", "0.9.0");
        legacy.active = false;

        let projects = vec![
            Fixtures::project_with_metrics(ACME_APP_UUID, "acme-app", 1, 0, 0, 1),
            legacy,
        ];

        let mut log4j = Fixtures::maven_component(
            LOG4J_UUID,
            "org.apache.logging.log4j",
            "log4j-core",
            "2.14.1",
        );
        log4j.sha1 = Some(LOG4J_SHA1.to_string());
        log4j.license = Some("Apache-2.0".to_string());

        let lodash =
            Fixtures::npm_component("c3f0e5a2-1b4d-4c6e-8f9a-0b1c2d3e4f51", "lodash", "4.17.20");
        let left_pad =
            Fixtures::npm_component("c3f0e5a2-1b4d-4c6e-8f9a-0b1c2d3e4f52", "left-pad", "1.3.0");

        let findings = vec![(
            ACME_APP_UUID.to_string(),
            vec![
                Fixtures::finding(&log4j, "CVE-2021-44228", Severity::Critical),
                Fixtures::suppressed_finding(&lodash, "GHSA-35jh-r3h4-6jhm", Severity::High),
                Fixtures::finding(&lodash, "CVE-2020-28500", Severity::Low),
            ],
        )];

        let properties = vec![(
            LOG4J_UUID.to_string(),
            vec![ComponentProperty {
                uuid: "e1d2c3b4-a596-4877-8695-a4b3c2d1e0f9".to_string(),
                ..ComponentProperty::new("internal", "owner", "platform-team", "STRING")
            }],
        )];

        let components = [log4j, lodash, left_pad]
            .into_iter()
            .map(|c| (ACME_APP_UUID.to_string(), c))
            .collect();

        Self {
            projects,
            components,
            properties,
            findings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_project() {
        let project = Fixtures::minimal_project("p-1", "acme-app", "1.0.0");
        assert_eq!(project.uuid, "p-1");
        assert_eq!(project.name, "acme-app");
        assert!(project.active);
    }

    #[test]
    fn test_project_with_metrics() {
        let project = Fixtures::project_with_metrics("p-1", "acme-app", 1, 2, 3, 4);
        let metrics = project.metrics.unwrap();
        assert_eq!(metrics.vulnerabilities, 10);
        assert_eq!(metrics.critical, 1);
        assert_eq!(metrics.low, 4);
    }

    #[test]
    fn test_finding_source_from_id() {
        let component = Fixtures::npm_component("c-1", "lodash", "4.17.20");
        assert_eq!(
            Fixtures::finding(&component, "GHSA-xxxx", Severity::High)
                .vulnerability
                .source,
            "GITHUB"
        );
        assert!(Fixtures::suppressed_finding(&component, "CVE-1", Severity::Low).is_suppressed());
    }

    #[test]
    fn test_default_scenario() {
        let scenario = Fixtures::default_scenario();
        assert_eq!(scenario.projects.len(), 2);
        assert_eq!(scenario.components.len(), 3);
        assert!(!scenario.properties.is_empty());
        assert_eq!(scenario.findings[0].1.len(), 3);
    }
}
