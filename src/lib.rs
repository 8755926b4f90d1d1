//! npm-tree-scan - dependency tree engine for npm projects
//!
//! This library builds dependency trees from `npm ls` listings, annotates
//! them with known issues, derives filtered views and merges the views of
//! several projects into one composite tree. It can also tell where a
//! (possibly transitive) component is declared and whether that
//! declaration can be removed.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`dependency_tree`): Pure business logic and domain models
//! - **Application Layer** (`application`): Use cases and the results tree
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use npm_tree_scan::prelude::*;
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<()> {
//! let results = Arc::new(ResultsTree::new(FilterManager::default()));
//! let use_case = ScanProjectsUseCase::new(
//!     ListingFileReader::new(),
//!     (),
//!     PackageJsonLocator::new(),
//!     StderrProgressReporter::new(),
//!     Arc::clone(&results),
//! );
//!
//! let project = ProjectSpec::new(
//!     ProjectKey::new("shop"),
//!     PathBuf::from("shop"),
//!     vec![PathBuf::from("shop")],
//! );
//! let request = ScanRequest::new(vec![project], FilterSettings::default());
//! let response = use_case.execute(request, CancellationToken::new()).await?;
//!
//! let output = TextTreeFormatter::new(false).format(&response.composite, &response.metadata)?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod dependency_tree;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        find_application_dirs, FileSystemWriter, ListingFileReader, PackageJsonEditor,
        PackageJsonLocator, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{JsonTreeFormatter, TextTreeFormatter};
    pub use crate::adapters::outbound::issues::{CachingIssueRepository, JsonIssueRepository};
    pub use crate::adapters::outbound::npm::NpmCliLister;
    pub use crate::application::dto::{
        OutputFormat, ProjectScanReport, ProjectScanStatus, ScanRequest, ScanResponse,
    };
    pub use crate::application::results_tree::ResultsTree;
    pub use crate::application::use_cases::ScanProjectsUseCase;
    pub use crate::dependency_tree::domain::{
        ComponentIssues, DependencyNode, Excludable, GeneralInfo, Issue, License, NavigationTarget,
        NodePath, NpmListing, ProjectKey, ProjectSpec, ScanMetadata, Scope, Severity,
    };
    pub use crate::dependency_tree::policies::ExclusionPolicy;
    pub use crate::dependency_tree::services::{
        CompositeTree, FilterManager, FilterSettings, NodeActions, ScanCollector, ScanWarning,
        TreeBuilder,
    };
    pub use crate::ports::outbound::{
        DescriptorEditor, IssueRepository, ManifestLocator, OutputPresenter, PackageLister,
        ProgressReporter, TreeFormatter,
    };
    pub use crate::shared::Result;
}
