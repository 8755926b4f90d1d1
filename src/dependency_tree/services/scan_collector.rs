use crate::dependency_tree::domain::{ComponentIssues, DependencyNode};
use std::collections::{BTreeSet, HashMap};

/// Scheme prefix of submitted npm component ids.
pub const NPM_PREFIX: &str = "npm://";

/// ScanCollector gathers the component ids of a tree for an issue lookup
/// and merges the lookup results back onto the tree.
pub struct ScanCollector;

impl ScanCollector {
    /// Collects `npm://name:version` for every versioned node of the tree.
    ///
    /// Project roots and the anonymous wrapper carry no version and are not
    /// submitted.
    pub fn collect(tree: &DependencyNode) -> BTreeSet<String> {
        let mut ids = BTreeSet::new();
        tree.visit(&mut |node| {
            if node.version().is_some() {
                ids.insert(Self::submission_id(node));
            }
        });
        ids
    }

    /// Attaches lookup results to every node of the tree and refreshes the
    /// issue summaries.
    ///
    /// Nodes without a matching result end up with no issues. Licenses are
    /// only replaced when the result carries some, so licenses read from the
    /// listing survive a lookup that knows none. Running the merge again with
    /// the same results leaves the tree unchanged.
    pub fn merge(tree: &mut DependencyNode, results: &HashMap<String, ComponentIssues>) {
        let mut matched = 0usize;
        tree.visit_mut(&mut |node| match results.get(&Self::submission_id(node)) {
            Some(result) => {
                matched += 1;
                node.set_issues(result.issues.clone());
                if !result.licenses.is_empty() {
                    node.set_licenses(result.licenses.clone());
                }
            }
            None => node.set_issues(BTreeSet::new()),
        });
        tree.refresh_summary();

        tracing::debug!(
            results = results.len(),
            matched,
            "lookup results merged into tree"
        );
    }

    /// Id under which a node is submitted for lookup.
    pub fn submission_id(node: &DependencyNode) -> String {
        format!("{}{}", NPM_PREFIX, node.component_id())
    }
}
