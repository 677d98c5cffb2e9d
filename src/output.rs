//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{Component, Finding, Project};

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Project {
    fn pretty_print(&self) -> String {
        let header = format!("Project: {}", self.uuid);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![header, divider, format!("Name:           {}", self.name)];

        if let Some(ref version) = self.version {
            lines.push(format!("Version:        {}", version));
        }

        if let Some(ref classifier) = self.classifier {
            lines.push(format!("Classifier:     {}", classifier));
        }

        lines.push(format!(
            "Active:         {}",
            if self.active { "yes" } else { "no" }
        ));

        if !self.tags.is_empty() {
            lines.push(format!("Tags:           {}", self.tag_names().join(", ")));
        }

        if let Some(ref metrics) = self.metrics {
            lines.push(format!(
                "Vulns:          {} ({} critical, {} high, {} medium, {} low)",
                metrics.vulnerabilities, metrics.critical, metrics.high, metrics.medium, metrics.low
            ));
        }

        if let Some(ref imported) = self.last_bom_import {
            lines.push(format!(
                "Last BOM:       {}",
                imported.format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Component {
    fn pretty_print(&self) -> String {
        let header = format!("Component: {}", self.uuid);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![header, divider, format!("Name:           {}", self.coordinates())];

        if let Some(ref classifier) = self.classifier {
            lines.push(format!("Classifier:     {}", classifier));
        }

        if let Some(ref purl) = self.purl {
            lines.push(format!("PURL:           {}", purl));
        }

        if let Some(ref license) = self.license {
            lines.push(format!("License:        {}", license));
        }

        for (label, hash) in [("MD5", &self.md5), ("SHA-1", &self.sha1), ("SHA-256", &self.sha256)] {
            if let Some(hash) = hash {
                lines.push(format!("{:<16}{}", format!("{label}:"), hash));
            }
        }

        if let Some(ref project) = self.project {
            lines.push(format!("Project:        {} ({})", project.name, project.uuid));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Finding {
    fn pretty_print(&self) -> String {
        let header = format!("Finding: {}", self.vulnerability.vuln_id);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![
            header,
            divider,
            format!("Source:         {}", self.vulnerability.source),
            format!("Severity:       {:?}", self.vulnerability.severity),
        ];

        if let Some(score) = self.vulnerability.cvss_v3_base_score {
            lines.push(format!("CVSS v3:        {:.1}", score));
        }

        let component = &self.component;
        let version = component.version.as_deref().unwrap_or("?");
        lines.push(format!("Component:      {}@{}", component.name, version));

        if let Some(ref latest) = component.latest_version {
            lines.push(format!("Latest:         {}", latest));
        }

        if let Some(state) = self.analysis.state {
            lines.push(format!("Analysis:       {:?}", state));
        }

        if self.analysis.is_suppressed {
            lines.push("Suppressed:     yes".to_string());
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_pretty_print_format() {
        let project: Project = serde_json::from_value(serde_json::json!({
            "uuid": "2d16089e-6d3a-437e-b334-f27eb2cbd7f4",
            "name": "acme-app",
            "version": "1.0.0"
        }))
        .unwrap();

        let output = project.pretty_print();
        assert!(output.starts_with("Project:"));
        assert!(output.contains("Name:"));
        assert!(output.contains("Version:        1.0.0"));
    }

    #[test]
    fn test_component_pretty_print_lists_hashes() {
        let mut component = Component::new("left-pad", "1.3.0", "LIBRARY");
        component.md5 = Some("0123456789abcdef0123456789abcdef".to_string());

        let output = component.pretty_print();
        assert!(output.contains("left-pad@1.3.0"));
        assert!(output.contains("MD5:            0123456789abcdef0123456789abcdef"));
        assert!(!output.contains("SHA-1"));
    }
}
