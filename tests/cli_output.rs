//! Tests for CLI output formatting.
//!
//! Covers JSON output with `--json` and the pretty-print default.

use dtrack::{Component, Finding, PrettyPrint, Project};

// ============================================================================
// JSON Output Tests
// ============================================================================

#[test]
fn test_json_flag_outputs_valid_json() {
    let project = make_test_project();
    let json_output = serde_json::to_string_pretty(&project).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&json_output).unwrap();
    assert!(parsed.is_object());
    assert_eq!(parsed["name"], "acme-app");
}

#[test]
fn test_json_flag_for_list_outputs_array() {
    let projects = vec![make_test_project(), make_test_project()];
    let json_output = serde_json::to_string_pretty(&projects).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&json_output).unwrap();
    assert!(parsed.is_array());
    assert_eq!(parsed.as_array().unwrap().len(), 2);
}

#[test]
fn test_json_output_keeps_wire_names() {
    let project = make_test_project();
    let parsed = serde_json::to_value(&project).unwrap();

    assert!(parsed.get("uuid").is_some());
    assert!(parsed.get("lastBomImport").is_some());
    assert_eq!(parsed["lastBomImport"], 1_700_000_000_000_i64);
}

// ============================================================================
// Pretty-Print Tests
// ============================================================================

#[test]
fn test_default_output_is_not_json() {
    let project = make_test_project();
    let pretty_output = project.pretty_print();

    let parse_result: Result<serde_json::Value, _> = serde_json::from_str(&pretty_output);
    assert!(
        parse_result.is_err(),
        "Default output should NOT be valid JSON"
    );
}

#[test]
fn test_project_pretty_print_shows_key_fields() {
    let project = make_test_project();
    let output = project.pretty_print();

    assert!(output.contains("2d16089e-6d3a-437e-b334-f27eb2cbd7f4"), "Should show UUID");
    assert!(output.contains("acme-app"), "Should show name");
    assert!(output.contains("3 critical"), "Should show metrics");
    assert!(output.contains("2023-11-14"), "Should show BOM import date");
}

#[test]
fn test_component_pretty_print_shows_coordinates() {
    let component: Component = serde_json::from_value(serde_json::json!({
        "uuid": "c-1",
        "name": "log4j-core",
        "group": "org.apache.logging.log4j",
        "version": "2.14.1",
        "purl": "pkg:maven/org.apache.logging.log4j/log4j-core@2.14.1",
        "project": {"uuid": "p-1", "name": "acme-app"}
    }))
    .unwrap();
    let output = component.pretty_print();

    assert!(output.contains("org.apache.logging.log4j:log4j-core@2.14.1"));
    assert!(output.contains("PURL"));
    assert!(output.contains("acme-app (p-1)"));
}

#[test]
fn test_finding_pretty_print_shows_severity() {
    let finding: Finding = serde_json::from_value(serde_json::json!({
        "component": {"uuid": "c-1", "name": "log4j-core", "version": "2.14.1"},
        "vulnerability": {
            "uuid": "v-1",
            "vulnId": "CVE-2021-44228",
            "source": "NVD",
            "severity": "CRITICAL",
            "cvssV3BaseScore": 10.0
        },
        "analysis": {"state": "EXPLOITABLE", "isSuppressed": false}
    }))
    .unwrap();
    let output = finding.pretty_print();

    assert!(output.starts_with("Finding: CVE-2021-44228"));
    assert!(output.contains("Severity:       Critical"));
    assert!(output.contains("CVSS v3:        10.0"));
    assert!(output.contains("log4j-core@2.14.1"));
    assert!(output.contains("Exploitable"));
    assert!(!output.contains("Suppressed"));
}

#[test]
fn test_list_pretty_print_is_table() {
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct TestRow {
        name: String,
        version: String,
    }

    let rows = vec![
        TestRow {
            name: "left-pad".to_string(),
            version: "1.3.0".to_string(),
        },
        TestRow {
            name: "lodash".to_string(),
            version: "4.17.20".to_string(),
        },
    ];

    let table_output = Table::new(rows).to_string();

    assert!(table_output.contains("name"), "Should have column headers");
    assert!(table_output.contains("version"), "Should have column headers");
}

// ============================================================================
// Test Helpers
// ============================================================================

fn make_test_project() -> Project {
    serde_json::from_value(serde_json::json!({
        "uuid": "2d16089e-6d3a-437e-b334-f27eb2cbd7f4",
        "name": "acme-app",
        "version": "1.0.0",
        "active": true,
        "lastBomImport": 1_700_000_000_000_i64,
        "metrics": {
            "critical": 3,
            "high": 1,
            "medium": 0,
            "low": 2,
            "vulnerabilities": 6
        }
    }))
    .unwrap()
}
