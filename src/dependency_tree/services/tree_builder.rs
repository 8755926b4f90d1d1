use crate::dependency_tree::domain::{
    DependencyNode, GeneralInfo, ListingEntry, NpmListing, ProjectSpec, NPM_PKG_TYPE,
};
use crate::ports::outbound::PackageLister;
use crate::shared::error::{ScanFailure, TreeScanError};
use crate::shared::Result;
use anyhow::Context;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

/// Appended to the label of a module whose listing reported problems.
pub const MISSING_INFORMATION_MARKER: &str = " (Missing Information)";

/// Non-fatal problem found while building a module tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    pub app_dir: PathBuf,
    pub message: String,
    pub details: String,
}

/// Module root built from one application directory.
#[derive(Debug, Clone)]
pub struct ModuleBuild {
    pub root: DependencyNode,
    pub warnings: Vec<ScanWarning>,
}

/// Tree of a whole project.
#[derive(Debug, Clone)]
pub struct ProjectBuild {
    pub tree: DependencyNode,
    pub warnings: Vec<ScanWarning>,
}

#[derive(Debug, Clone)]
pub enum BuildOutcome {
    Built(ProjectBuild),
    /// The caller cancelled the scan; nothing was built.
    Cancelled,
}

/// TreeBuilder turns npm listings into dependency trees.
///
/// Building is a pure depth-first recursion: every call returns a freshly
/// built subtree instead of attaching to a parent passed by reference.
pub struct TreeBuilder;

impl TreeBuilder {
    /// Deepest nesting followed before a branch is cut off.
    const MAX_RECURSION_DEPTH: usize = 100;

    /// Builds the tree of every application directory of a project.
    ///
    /// Cancellation is checked before each application directory is listed.
    /// A cancelled build returns [`BuildOutcome::Cancelled`] and no tree; any
    /// other failure aborts the whole project.
    pub fn build_project<L: PackageLister + ?Sized>(
        project: &ProjectSpec,
        lister: &L,
        cancel: &CancellationToken,
    ) -> std::result::Result<BuildOutcome, ScanFailure> {
        let mut modules = Vec::with_capacity(project.app_dirs.len());
        let mut warnings = Vec::new();

        for app_dir in &project.app_dirs {
            if cancel.is_cancelled() {
                tracing::info!(project = %project.key, "scan cancelled");
                return Ok(BuildOutcome::Cancelled);
            }

            let module = lister
                .list(app_dir)
                .with_context(|| format!("Failed to list dependencies of {}", app_dir.display()))
                .and_then(|listing| Self::build_module(app_dir, &listing))
                .map_err(|e| ScanFailure::from_error(project.key.as_str(), &e))?;

            tracing::debug!(
                project = %project.key,
                app_dir = %app_dir.display(),
                nodes = module.root.subtree_size(),
                "module tree built"
            );
            warnings.extend(module.warnings);
            modules.push(module.root);
        }

        let tree = Self::assemble_project(project, modules);
        Ok(BuildOutcome::Built(ProjectBuild { tree, warnings }))
    }

    /// Builds the module root for one application directory.
    ///
    /// # Errors
    /// Returns [`TreeScanError::MalformedListing`] when the listing lacks a
    /// name or version for the application itself.
    pub fn build_module(app_dir: &Path, listing: &NpmListing) -> Result<ModuleBuild> {
        let name = listing.name().ok_or_else(|| TreeScanError::MalformedListing {
            app_dir: app_dir.to_path_buf(),
            reason: "listing has no \"name\" field".to_string(),
        })?;
        let version = listing.version().ok_or_else(|| TreeScanError::MalformedListing {
            app_dir: app_dir.to_path_buf(),
            reason: "listing has no \"version\" field".to_string(),
        })?;

        let mut label = name.to_string();
        let mut warnings = Vec::new();
        if let Some(problems) = listing.problems() {
            label.push_str(MISSING_INFORMATION_MARKER);
            tracing::warn!(app_dir = %app_dir.display(), "npm ls reported problems");
            warnings.push(ScanWarning {
                app_dir: app_dir.to_path_buf(),
                message: "npm ls command result had errors".to_string(),
                details: problems,
            });
        }

        let general_info = GeneralInfo::new(format!("{}:{}", name, version), NPM_PKG_TYPE, app_dir);
        let mut root = DependencyNode::module_root(label, general_info);
        for child in Self::build_children(listing.dependencies(), 0) {
            root.add_child(child);
        }

        Ok(ModuleBuild { root, warnings })
    }

    /// Builds the subtree of one `dependencies` entry.
    ///
    /// Returns `None` when the entry has no resolved version; such entries
    /// are omitted together with everything below them.
    pub fn build_subtree(artifact_id: &str, entry: &Value) -> Option<DependencyNode> {
        Self::build_entry(artifact_id, entry, 0)
    }

    /// `artifactId:version`, or `None` when the version is missing.
    pub fn component_id(artifact_id: &str, entry: &Value) -> Option<String> {
        ListingEntry::new(entry)
            .version()
            .map(|version| format!("{}:{}", artifact_id, version))
    }

    fn build_entry(artifact_id: &str, entry: &Value, depth: usize) -> Option<DependencyNode> {
        let component_id = Self::component_id(artifact_id, entry)?;
        let listing_entry = ListingEntry::new(entry);

        let mut node = DependencyNode::component(component_id)
            .with_scopes([listing_entry.scope()])
            .with_licenses(listing_entry.license());
        for child in Self::build_children(listing_entry.dependencies(), depth + 1) {
            node.add_child(child);
        }
        Some(node)
    }

    fn build_children(dependencies: Option<&Map<String, Value>>, depth: usize) -> Vec<DependencyNode> {
        let Some(dependencies) = dependencies else {
            return Vec::new();
        };

        if depth >= Self::MAX_RECURSION_DEPTH {
            tracing::warn!(
                max_depth = Self::MAX_RECURSION_DEPTH,
                "maximum dependency depth reached, branch truncated"
            );
            return Vec::new();
        }

        dependencies
            .iter()
            .filter_map(|(artifact_id, entry)| Self::build_entry(artifact_id, entry, depth))
            .collect()
    }

    /// A project with one application directory is represented by that
    /// module root; several module roots are grouped under a project root.
    fn assemble_project(project: &ProjectSpec, mut modules: Vec<DependencyNode>) -> DependencyNode {
        if modules.len() == 1 {
            if let Some(module) = modules.pop() {
                return module;
            }
        }

        let general_info = GeneralInfo::new(project.key.as_str(), NPM_PKG_TYPE, &project.base_dir);
        let mut root = DependencyNode::module_root(project.key.as_str(), general_info);
        for module in modules {
            root.children_mut().push(module);
        }
        root
    }
}
