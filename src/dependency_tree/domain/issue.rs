use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Name used for components whose license is not known.
pub const UNKNOWN_LICENSE: &str = "Unknown";

/// Issue severity, ordered from harmless to worst.
///
/// `Normal` stands for "no issue at all" and exists so that clean components
/// can be selected or hidden by the severity filter like any other level.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum Severity {
    #[default]
    Normal,
    Unknown,
    Information,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 7] = [
        Severity::Normal,
        Severity::Unknown,
        Severity::Information,
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Normal => "Normal",
            Severity::Unknown => "Unknown",
            Severity::Information => "Information",
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" | "none" => Ok(Severity::Normal),
            "unknown" => Ok(Severity::Unknown),
            "information" | "info" => Ok(Severity::Information),
            "low" => Ok(Severity::Low),
            "medium" | "moderate" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            _ => Err(format!(
                "Invalid severity: '{}'. Expected one of: normal, unknown, information, low, medium, high, critical",
                s
            )),
        }
    }
}

impl TryFrom<String> for Severity {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Severity> for String {
    fn from(value: Severity) -> Self {
        value.as_str().to_string()
    }
}

/// A known issue (vulnerability or policy violation) attached to a component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    id: String,
    severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    fixed_versions: Vec<String>,
}

impl Issue {
    pub fn new(id: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: id.into(),
            severity,
            summary: None,
            fixed_versions: Vec::new(),
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_fixed_versions(mut self, fixed_versions: Vec<String>) -> Self {
        self.fixed_versions = fixed_versions;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn fixed_versions(&self) -> &[String] {
        &self.fixed_versions
    }
}

// Worst issues sort first so sets iterate in display order.
impl Ord for Issue {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .severity
            .cmp(&self.severity)
            .then_with(|| self.id.cmp(&other.id))
            .then_with(|| self.summary.cmp(&other.summary))
            .then_with(|| self.fixed_versions.cmp(&other.fixed_versions))
    }
}

impl PartialOrd for Issue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A license declared for a component.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct License {
    name: String,
}

impl License {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Dependency scope as reported by `npm ls --long`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Production,
    Development,
    Optional,
    Peer,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Production => "production",
            Scope::Development => "development",
            Scope::Optional => "optional",
            Scope::Peer => "peer",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(Scope::Production),
            "development" | "dev" => Ok(Scope::Development),
            "optional" => Ok(Scope::Optional),
            "peer" => Ok(Scope::Peer),
            _ => Err(format!(
                "Invalid scope: '{}'. Expected one of: production, development, optional, peer",
                s
            )),
        }
    }
}

/// Issues and licenses returned by the lookup service for one component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentIssues {
    #[serde(default)]
    pub issues: BTreeSet<Issue>,
    #[serde(default)]
    pub licenses: BTreeSet<License>,
}

impl ComponentIssues {
    pub fn new(issues: BTreeSet<Issue>, licenses: BTreeSet<License>) -> Self {
        Self { issues, licenses }
    }
}

/// Roll-up of the issues found in a subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSummary {
    top_severity: Severity,
    issue_count: usize,
}

impl IssueSummary {
    pub fn new(top_severity: Severity, issue_count: usize) -> Self {
        Self {
            top_severity,
            issue_count,
        }
    }

    /// Summarizes a set of distinct issue severities.
    pub fn from_severities<'a>(severities: impl IntoIterator<Item = &'a Severity>) -> Self {
        let mut summary = Self::default();
        for severity in severities {
            summary.issue_count += 1;
            summary.top_severity = summary.top_severity.max(*severity);
        }
        summary
    }

    pub fn top_severity(&self) -> Severity {
        self.top_severity
    }

    pub fn issue_count(&self) -> usize {
        self.issue_count
    }

    pub fn has_issues(&self) -> bool {
        self.issue_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Low > Severity::Information);
        assert!(Severity::Unknown > Severity::Normal);
        assert_eq!(Severity::default(), Severity::Normal);
    }

    #[test]
    fn test_severity_from_str_case_insensitive() {
        assert_eq!("HIGH".parse::<Severity>().unwrap(), Severity::High);
        assert_eq!("moderate".parse::<Severity>().unwrap(), Severity::Medium);
        assert_eq!(" info ".parse::<Severity>().unwrap(), Severity::Information);
        assert!("severe".parse::<Severity>().is_err());
    }

    #[test]
    fn test_severity_serde_roundtrip_uses_names() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"Critical\"");
        let parsed: Severity = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(parsed, Severity::Low);
    }

    #[test]
    fn test_issue_ordering_worst_first() {
        let mut issues = BTreeSet::new();
        issues.insert(Issue::new("XRAY-2", Severity::Low));
        issues.insert(Issue::new("XRAY-1", Severity::Critical));
        issues.insert(Issue::new("XRAY-3", Severity::Low));

        let ids: Vec<&str> = issues.iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec!["XRAY-1", "XRAY-2", "XRAY-3"]);
    }

    #[test]
    fn test_issue_deserialize() {
        let issue: Issue = serde_json::from_str(
            r#"{"id":"CVE-2021-23337","severity":"high","summary":"Command injection","fixedVersions":["4.17.21"]}"#,
        )
        .unwrap();
        assert_eq!(issue.id(), "CVE-2021-23337");
        assert_eq!(issue.severity(), Severity::High);
        assert_eq!(issue.summary(), Some("Command injection"));
        assert_eq!(issue.fixed_versions(), &["4.17.21".to_string()]);
    }

    #[test]
    fn test_scope_from_str() {
        assert_eq!("dev".parse::<Scope>().unwrap(), Scope::Development);
        assert_eq!("Production".parse::<Scope>().unwrap(), Scope::Production);
        assert!("runtime".parse::<Scope>().is_err());
    }

    #[test]
    fn test_component_issues_defaults() {
        let parsed: ComponentIssues = serde_json::from_str("{}").unwrap();
        assert!(parsed.issues.is_empty());
        assert!(parsed.licenses.is_empty());

        let parsed: ComponentIssues = serde_json::from_str(r#"{"licenses":["MIT"]}"#).unwrap();
        assert!(parsed.licenses.contains(&License::new("MIT")));
    }

    #[test]
    fn test_issue_summary_from_severities() {
        let severities = [Severity::Low, Severity::High, Severity::Medium];
        let summary = IssueSummary::from_severities(severities.iter());
        assert_eq!(summary.top_severity(), Severity::High);
        assert_eq!(summary.issue_count(), 3);
        assert!(summary.has_issues());

        let empty = IssueSummary::from_severities(std::iter::empty());
        assert_eq!(empty, IssueSummary::default());
        assert!(!empty.has_issues());
    }
}
