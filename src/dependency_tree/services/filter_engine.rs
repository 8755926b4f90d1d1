use super::filters::{ComponentNameFilter, LicenseFilter, ScopeFilter, SeverityFilter, TreeFilter};
use crate::dependency_tree::domain::{DependencyNode, Scope, Severity};
use crate::shared::Result;
use std::collections::BTreeSet;

/// User selection from which the active filters are built.
///
/// An empty selection disables the corresponding filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSettings {
    pub severities: BTreeSet<Severity>,
    pub licenses: BTreeSet<String>,
    pub scopes: BTreeSet<Scope>,
    pub exclude_components: Vec<String>,
}

/// FilterManager derives filtered views of dependency trees.
#[derive(Debug, Default)]
pub struct FilterManager {
    filters: Vec<Box<dyn TreeFilter>>,
    name_filter: Option<ComponentNameFilter>,
}

impl FilterManager {
    pub fn new(filters: Vec<Box<dyn TreeFilter>>) -> Self {
        Self {
            filters,
            name_filter: None,
        }
    }

    /// Builds the filter chain for `settings`.
    ///
    /// # Errors
    /// Returns an error if an exclusion pattern is invalid.
    pub fn from_settings(settings: &FilterSettings) -> Result<Self> {
        let mut filters: Vec<Box<dyn TreeFilter>> = Vec::new();
        if !settings.severities.is_empty() {
            filters.push(Box::new(SeverityFilter::new(settings.severities.iter().copied())));
        }
        if !settings.licenses.is_empty() {
            filters.push(Box::new(LicenseFilter::new(settings.licenses.iter().cloned())));
        }
        if !settings.scopes.is_empty() {
            filters.push(Box::new(ScopeFilter::new(settings.scopes.iter().copied())));
        }

        let name_filter = if settings.exclude_components.is_empty() {
            None
        } else {
            Some(ComponentNameFilter::new(settings.exclude_components.clone())?)
        };

        Ok(Self {
            filters,
            name_filter,
        })
    }

    pub fn filter_count(&self) -> usize {
        self.filters.len() + usize::from(self.name_filter.is_some())
    }

    /// Exclusion patterns that have not matched any component yet.
    pub fn unmatched_patterns(&self) -> Vec<String> {
        self.name_filter
            .as_ref()
            .map(ComponentNameFilter::get_unmatched_patterns)
            .unwrap_or_default()
    }

    /// Returns a filtered copy of `root`; `root` itself is never modified.
    ///
    /// A node is kept when every filter accepts it, or when one of its
    /// descendants is kept. Nodes kept only to connect a descendant to the
    /// root do not contribute their own issues. A component matching an
    /// exclusion pattern is dropped with its whole subtree. The root is
    /// always kept.
    /// Issue summaries of the copy are recomputed from scratch.
    pub fn apply_filters(&self, root: &DependencyNode) -> DependencyNode {
        let mut filtered = if self.filter_count() == 0 {
            root.clone()
        } else {
            let mut copy = self.keep(root);
            for child in root.children() {
                if let Some(kept) = self.filter_subtree(child) {
                    copy.children_mut().push(kept);
                }
            }
            copy
        };
        filtered.refresh_summary();
        filtered
    }

    fn filter_subtree(&self, node: &DependencyNode) -> Option<DependencyNode> {
        if let Some(name_filter) = &self.name_filter {
            if !name_filter.accepts_node(node) {
                return None;
            }
        }

        let children: Vec<DependencyNode> = node
            .children()
            .iter()
            .filter_map(|child| self.filter_subtree(child))
            .collect();

        let mut copy = if self.accepts(node) {
            self.keep(node)
        } else if !children.is_empty() {
            let mut connector = node.detached();
            connector.set_issues(BTreeSet::new());
            connector
        } else {
            return None;
        };

        copy.children_mut().extend(children);
        Some(copy)
    }

    fn accepts(&self, node: &DependencyNode) -> bool {
        self.filters.iter().all(|filter| filter.accepts_node(node))
    }

    /// Childless copy of an accepted node, keeping only accepted issues.
    fn keep(&self, node: &DependencyNode) -> DependencyNode {
        let mut copy = node.detached();
        let issues = node
            .issues()
            .iter()
            .filter(|issue| self.filters.iter().all(|filter| filter.accepts_issue(issue)))
            .cloned()
            .collect();
        copy.set_issues(issues);
        copy
    }
}
