use crate::dependency_tree::domain::{ProjectKey, ScanMetadata};
use crate::dependency_tree::services::{CompositeTree, ScanWarning};

/// How the scan of one project ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectScanStatus {
    /// The tree was built, annotated and published
    Succeeded {
        /// Non-fatal problems, e.g. `npm ls` reporting missing packages
        warnings: Vec<ScanWarning>,
        /// Nodes in the unfiltered tree
        component_count: usize,
        /// Distinct issues in the unfiltered tree
        issue_count: usize,
    },
    /// The scan failed; the previously published tree is left untouched
    Failed { message: String, cause: String },
    /// The scan was cancelled before publishing anything
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectScanReport {
    pub key: ProjectKey,
    pub status: ProjectScanStatus,
}

impl ProjectScanReport {
    pub fn new(key: ProjectKey, status: ProjectScanStatus) -> Self {
        Self { key, status }
    }
}

/// ScanResponse - Internal response DTO from the project scan use case
///
/// Carries one report per requested project, in request order, and the
/// filtered composite tree as published after every scan finished.
#[derive(Debug, Clone)]
pub struct ScanResponse {
    pub reports: Vec<ProjectScanReport>,
    pub composite: CompositeTree,
    pub metadata: ScanMetadata,
}

impl ScanResponse {
    pub fn new(reports: Vec<ProjectScanReport>, composite: CompositeTree, metadata: ScanMetadata) -> Self {
        Self {
            reports,
            composite,
            metadata,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.reports
            .iter()
            .any(|report| matches!(report.status, ProjectScanStatus::Failed { .. }))
    }

    /// Whether the filtered composite tree still shows any issue.
    pub fn has_issues(&self) -> bool {
        self.composite
            .projects()
            .iter()
            .any(|project| project.summary().has_issues())
    }
}
