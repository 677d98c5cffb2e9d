//! Finding model and trait implementations.
//!
//! A finding ties one vulnerability to one component of a project, together
//! with the analysis decision recorded for it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, TimestampMilliSeconds};

use crate::client::DtrackClient;
use crate::error::{DtrackError, Result};
use crate::pagination::{ListParams, Page, PageOptions, SortOptions};
use crate::traits::List;

// =============================================================================
// MODEL
// =============================================================================

/// A vulnerability finding on a project component.
///
/// # Example
///
/// ```ignore
/// use dtrack::{DtrackClient, get_findings, FindingFilterOptions};
///
/// let client = DtrackClient::from_env()?;
/// let findings = get_findings(&client, project_uuid, FindingFilterOptions::default()).await?;
///
/// for finding in findings.iter().filter(|f| f.is_critical()) {
///     println!("{} in {}", finding.vulnerability.vuln_id, finding.component.name);
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// The affected component.
    pub component: FindingComponent,

    /// The vulnerability.
    pub vulnerability: FindingVulnerability,

    /// Analysis decision, if any.
    #[serde(default)]
    pub analysis: FindingAnalysis,

    /// How the vulnerability was attributed to the component.
    #[serde(default)]
    pub attribution: Option<FindingAttribution>,

    /// `project:component:vulnerability` UUID triple identifying the finding.
    #[serde(default)]
    pub matrix: Option<String>,
}

impl Finding {
    /// Severity of the vulnerability.
    pub fn severity(&self) -> Severity {
        self.vulnerability.severity
    }

    /// Whether the vulnerability is rated critical.
    pub fn is_critical(&self) -> bool {
        self.vulnerability.severity == Severity::Critical
    }

    /// Whether the finding has been suppressed.
    pub fn is_suppressed(&self) -> bool {
        self.analysis.is_suppressed
    }
}

/// Component part of a finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindingComponent {
    /// Component UUID.
    pub uuid: String,
    /// Component name.
    pub name: String,
    /// Group, namespace or vendor.
    #[serde(default)]
    pub group: Option<String>,
    /// Component version.
    #[serde(default)]
    pub version: Option<String>,
    /// Package URL.
    #[serde(default)]
    pub purl: Option<String>,
    /// Newest known version, when the repository metadata is available.
    #[serde(default)]
    pub latest_version: Option<String>,
    /// UUID of the owning project.
    #[serde(default)]
    pub project: Option<String>,
}

/// Vulnerability part of a finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindingVulnerability {
    /// Vulnerability UUID.
    pub uuid: String,
    /// Identifier within its source (e.g., "CVE-2021-44228").
    pub vuln_id: String,
    /// Source database (e.g., "NVD", "GITHUB", "OSV").
    pub source: String,
    /// Title.
    #[serde(default)]
    pub title: Option<String>,
    /// Severity rating.
    #[serde(default)]
    pub severity: Severity,
    /// CVSS v2 base score.
    #[serde(default, rename = "cvssV2BaseScore")]
    pub cvss_v2_base_score: Option<f64>,
    /// CVSS v3 base score.
    #[serde(default, rename = "cvssV3BaseScore")]
    pub cvss_v3_base_score: Option<f64>,
    /// EPSS score.
    #[serde(default)]
    pub epss_score: Option<f64>,
    /// EPSS percentile.
    #[serde(default)]
    pub epss_percentile: Option<f64>,
    /// CWE classifications.
    #[serde(default)]
    pub cwes: Vec<Cwe>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Recommended remediation.
    #[serde(default)]
    pub recommendation: Option<String>,
}

/// A CWE classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cwe {
    /// Numeric CWE identifier.
    pub cwe_id: u32,
    /// CWE name.
    pub name: String,
}

/// Vulnerability severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Critical.
    Critical,
    /// High.
    High,
    /// Medium.
    Medium,
    /// Low.
    Low,
    /// Informational.
    Info,
    /// Not yet rated.
    #[default]
    Unassigned,
    /// Unknown severity value.
    #[serde(other)]
    Unknown,
}

/// Analysis decision recorded for a finding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindingAnalysis {
    /// Analysis state.
    #[serde(default)]
    pub state: Option<AnalysisState>,
    /// Whether the finding is suppressed.
    #[serde(default)]
    pub is_suppressed: bool,
}

/// Analysis state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisState {
    /// No decision yet.
    NotSet,
    /// Confirmed exploitable.
    Exploitable,
    /// Under investigation.
    InTriage,
    /// Resolved.
    Resolved,
    /// Not a real finding.
    FalsePositive,
    /// The component is not affected.
    NotAffected,
    /// Unknown state value.
    #[serde(other)]
    Unknown,
}

/// Attribution of a finding.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindingAttribution {
    /// Analyzer that produced the finding (e.g., "INTERNAL_ANALYZER").
    #[serde(default)]
    pub analyzer_identity: Option<String>,
    /// When the finding was attributed.
    #[serde_as(as = "Option<TimestampMilliSeconds<i64>>")]
    #[serde(default)]
    pub attributed_on: Option<DateTime<Utc>>,
    /// Identifier the analyzer used, if different from the vulnerability ID.
    #[serde(default)]
    pub alternate_identifier: Option<String>,
    /// Reference URL from the analyzer.
    #[serde(default)]
    pub reference_url: Option<String>,
}

// =============================================================================
// QUERY
// =============================================================================

/// Filter options for listing findings of a project.
///
/// All set fields must match (AND semantics, applied by the server).
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindingFilterOptions {
    /// Include suppressed findings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suppressed: Option<bool>,

    /// Only findings from this vulnerability source (e.g., "NVD").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Query type for finding listing (project UUID and filters).
pub type FindingQuery = (String, FindingFilterOptions);

#[async_trait]
impl List for Finding {
    type Query = FindingQuery; // (project_uuid, filters)

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
                "project UUID is required to list findings".to_string(),
            ));
        }
        let path = format!("v1/finding/project/{}", urlencoding::encode(project_uuid));

        let params = ListParams::new(&page, sort, filters)?;
        client.get_page(&path, &params).await
    }
}

// =============================================================================
// CONVENIENCE FUNCTIONS
// =============================================================================

/// Fetch all findings of a project.
///
/// # Example
///
/// ```ignore
/// use dtrack::{DtrackClient, get_findings, FindingFilterOptions};
///
/// let client = DtrackClient::from_env()?;
/// let findings = get_findings(
///     &client,
///     "2d16089e-6d3a-437e-b334-f27eb2cbd7f4",
///     FindingFilterOptions { suppressed: Some(false), ..Default::default() },
/// ).await?;
/// ```
pub async fn get_findings(
    client: &DtrackClient,
    project_uuid: &str,
    filter: FindingFilterOptions,
) -> Result<Vec<Finding>> {
    Finding::list_all(
        client,
        &(project_uuid.to_string(), filter),
        &SortOptions::default(),
    )
    .await
}

/// Fetch a single page of findings of a project.
pub async fn get_findings_page(
    client: &DtrackClient,
    project_uuid: &str,
    filter: FindingFilterOptions,
    page: PageOptions,
    sort: &SortOptions,
) -> Result<Page<Finding>> {
    Finding::list_page(client, &(project_uuid.to_string(), filter), page, sort).await
}

#[cfg(test)]
mod tests {
    use super::*;

    const FINDING_JSON: &str = r#"{
        "component": {
            "uuid": "c-1",
            "name": "log4j-core",
            "group": "org.apache.logging.log4j",
            "version": "2.14.1",
            "purl": "pkg:maven/org.apache.logging.log4j/log4j-core@2.14.1",
            "latestVersion": "2.23.1",
            "project": "p-1"
        },
        "vulnerability": {
            "uuid": "v-1",
            "vulnId": "CVE-2021-44228",
            "source": "NVD",
            "title": "Log4Shell",
            "severity": "CRITICAL",
            "cvssV3BaseScore": 10.0,
            "epssScore": 0.97,
            "cwes": [{"cweId": 502, "name": "Deserialization of Untrusted Data"}]
        },
        "analysis": {"state": "IN_TRIAGE", "isSuppressed": false},
        "attribution": {"analyzerIdentity": "INTERNAL_ANALYZER", "attributedOn": 1639000000000},
        "matrix": "p-1:c-1:v-1"
    }"#;

    #[test]
    fn test_finding_deserialize() {
        let finding: Finding = serde_json::from_str(FINDING_JSON).expect("Failed to deserialize");

        assert_eq!(finding.component.name, "log4j-core");
        assert_eq!(finding.vulnerability.vuln_id, "CVE-2021-44228");
        assert_eq!(finding.vulnerability.cvss_v3_base_score, Some(10.0));
        assert_eq!(finding.vulnerability.cwes[0].cwe_id, 502);
        assert!(finding.is_critical());
        assert!(!finding.is_suppressed());
        assert_eq!(finding.analysis.state, Some(AnalysisState::InTriage));
        assert_eq!(
            finding
                .attribution
                .as_ref()
                .and_then(|a| a.attributed_on)
                .map(|t| t.timestamp()),
            Some(1_639_000_000)
        );
    }

    #[test]
    fn test_finding_deserialize_minimal() {
        let json = r#"{
            "component": {"uuid": "c-1", "name": "left-pad"},
            "vulnerability": {"uuid": "v-1", "vulnId": "GHSA-xxxx", "source": "GITHUB"}
        }"#;
        let finding: Finding = serde_json::from_str(json).expect("Failed to deserialize");

        assert_eq!(finding.severity(), Severity::Unassigned);
        assert!(finding.analysis.state.is_none());
        assert!(finding.attribution.is_none());
    }

    #[test]
    fn test_unknown_severity_and_state() {
        assert_eq!(
            serde_json::from_str::<Severity>("\"SEVERE\"").unwrap(),
            Severity::Unknown
        );
        assert_eq!(
            serde_json::from_str::<AnalysisState>("\"WONT_FIX\"").unwrap(),
            AnalysisState::Unknown
        );
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical < Severity::High);
        assert!(Severity::Low < Severity::Unassigned);
    }

    #[test]
    fn test_finding_filter_serialize() {
        let filter = FindingFilterOptions {
            suppressed: Some(true),
            source: Some("NVD".to_string()),
        };
        let serialized = serde_qs::to_string(&filter).unwrap();

        assert!(serialized.contains("suppressed=true"));
        assert!(serialized.contains("source=NVD"));
        assert!(serde_qs::to_string(&FindingFilterOptions::default())
            .unwrap()
            .is_empty());
    }
}
