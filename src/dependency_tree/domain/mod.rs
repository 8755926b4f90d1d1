pub mod dependency_node;
pub mod issue;
pub mod listing;
pub mod navigation;
pub mod project;
pub mod scan_metadata;

pub use dependency_node::{DependencyNode, GeneralInfo, NPM_PKG_TYPE};
pub use issue::{ComponentIssues, Issue, IssueSummary, License, Scope, Severity, UNKNOWN_LICENSE};
pub use listing::{ListingEntry, NpmListing};
pub use navigation::{Excludable, NavigationRegistry, NavigationTarget, NodePath};
pub use project::{ProjectKey, ProjectSpec, ProjectsMap};
pub use scan_metadata::ScanMetadata;
