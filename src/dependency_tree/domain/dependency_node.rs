use super::issue::{Issue, IssueSummary, License, Scope, Severity};
use super::navigation::NodePath;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// Package type tag for npm components.
pub const NPM_PKG_TYPE: &str = "npm";

/// Identity of a scanned project or application directory.
///
/// Only module roots carry general info; it is what the merger compares
/// when deciding whether two trees describe the same project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralInfo {
    component_id: String,
    pkg_type: String,
    path: PathBuf,
}

impl GeneralInfo {
    pub fn new(component_id: impl Into<String>, pkg_type: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            component_id: component_id.into(),
            pkg_type: pkg_type.into(),
            path: path.into(),
        }
    }

    pub fn component_id(&self) -> &str {
        &self.component_id
    }

    pub fn pkg_type(&self) -> &str {
        &self.pkg_type
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// One resolved component in a dependency tree.
///
/// Children keep the declaration order of the manifest listing and a
/// component id appears at most once among siblings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyNode {
    component_id: String,
    pkg_type: String,
    label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    general_info: Option<GeneralInfo>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    issues: BTreeSet<Issue>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    licenses: BTreeSet<License>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    scopes: BTreeSet<Scope>,
    summary: IssueSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<DependencyNode>,
}

impl DependencyNode {
    /// Creates an ordinary dependency node for `name:version`.
    pub fn component(component_id: impl Into<String>) -> Self {
        let component_id = component_id.into();
        Self {
            label: component_id.clone(),
            component_id,
            pkg_type: NPM_PKG_TYPE.to_string(),
            ..Self::default()
        }
    }

    /// Creates a module root. Its component id is taken from the general info.
    pub fn module_root(label: impl Into<String>, general_info: GeneralInfo) -> Self {
        Self {
            component_id: general_info.component_id().to_string(),
            pkg_type: general_info.pkg_type().to_string(),
            label: label.into(),
            general_info: Some(general_info),
            ..Self::default()
        }
    }

    /// Creates the anonymous parent used to hold several project roots.
    pub fn wrapper() -> Self {
        Self::default()
    }

    pub fn with_scopes(mut self, scopes: impl IntoIterator<Item = Scope>) -> Self {
        self.scopes = scopes.into_iter().collect();
        self
    }

    pub fn with_licenses(mut self, licenses: impl IntoIterator<Item = License>) -> Self {
        self.licenses = licenses.into_iter().collect();
        self
    }

    pub fn with_issues(mut self, issues: impl IntoIterator<Item = Issue>) -> Self {
        self.issues = issues.into_iter().collect();
        self
    }

    pub fn component_id(&self) -> &str {
        &self.component_id
    }

    /// Package name part of the component id (`@scope/pkg` for `@scope/pkg:1.0.0`).
    pub fn name(&self) -> &str {
        self.component_id
            .rsplit_once(':')
            .map(|(name, _)| name)
            .unwrap_or(&self.component_id)
    }

    /// Version part of the component id, if there is one.
    pub fn version(&self) -> Option<&str> {
        self.component_id
            .rsplit_once(':')
            .map(|(_, version)| version)
            .filter(|version| !version.is_empty())
    }

    pub fn pkg_type(&self) -> &str {
        &self.pkg_type
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn general_info(&self) -> Option<&GeneralInfo> {
        self.general_info.as_ref()
    }

    pub fn is_module_root(&self) -> bool {
        self.general_info.is_some()
    }

    pub fn is_wrapper(&self) -> bool {
        self.general_info.is_none() && self.component_id.is_empty()
    }

    pub fn children(&self) -> &[DependencyNode] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<DependencyNode> {
        &mut self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Appends a child unless a sibling with the same component id exists.
    ///
    /// Returns `false` when the child was dropped as a duplicate.
    pub fn add_child(&mut self, child: DependencyNode) -> bool {
        if self
            .children
            .iter()
            .any(|sibling| sibling.component_id == child.component_id)
        {
            return false;
        }
        self.children.push(child);
        true
    }

    pub fn issues(&self) -> &BTreeSet<Issue> {
        &self.issues
    }

    pub fn set_issues(&mut self, issues: BTreeSet<Issue>) {
        self.issues = issues;
    }

    pub fn licenses(&self) -> &BTreeSet<License> {
        &self.licenses
    }

    pub fn set_licenses(&mut self, licenses: BTreeSet<License>) {
        self.licenses = licenses;
    }

    pub fn scopes(&self) -> &BTreeSet<Scope> {
        &self.scopes
    }

    pub fn summary(&self) -> IssueSummary {
        self.summary
    }

    /// Copy of this node without children.
    pub fn detached(&self) -> Self {
        Self {
            component_id: self.component_id.clone(),
            pkg_type: self.pkg_type.clone(),
            label: self.label.clone(),
            general_info: self.general_info.clone(),
            issues: self.issues.clone(),
            licenses: self.licenses.clone(),
            scopes: self.scopes.clone(),
            summary: self.summary,
            children: Vec::new(),
        }
    }

    /// Recomputes the issue summary of every node in this subtree from scratch.
    ///
    /// A node's summary covers its own issues plus those of its descendants,
    /// counting each issue id once.
    pub fn refresh_summary(&mut self) -> IssueSummary {
        self.rollup();
        self.summary
    }

    fn rollup(&mut self) -> HashMap<String, Severity> {
        let mut seen: HashMap<String, Severity> = self
            .issues
            .iter()
            .map(|issue| (issue.id().to_string(), issue.severity()))
            .collect();

        for child in &mut self.children {
            for (id, severity) in child.rollup() {
                let entry = seen.entry(id).or_insert(severity);
                *entry = (*entry).max(severity);
            }
        }

        self.summary = IssueSummary::from_severities(seen.values());
        seen
    }

    /// Node reached by following `path` from this node.
    pub fn node_at(&self, path: &NodePath) -> Option<&DependencyNode> {
        path.indices()
            .iter()
            .try_fold(self, |node, &index| node.children.get(index))
    }

    /// Nodes from this node down to the node at `path`, both ends included.
    pub fn ancestor_chain(&self, path: &NodePath) -> Option<Vec<&DependencyNode>> {
        let mut chain = Vec::with_capacity(path.len() + 1);
        let mut current = self;
        chain.push(current);
        for &index in path.indices() {
            current = current.children.get(index)?;
            chain.push(current);
        }
        Some(chain)
    }

    /// Depth-first search for the first node with the given component id.
    pub fn find_path(&self, component_id: &str) -> Option<NodePath> {
        self.find_path_where(&|node: &DependencyNode| node.component_id == component_id)
    }

    /// Depth-first search for the first node matching `predicate`.
    pub fn find_path_where(&self, predicate: &impl Fn(&DependencyNode) -> bool) -> Option<NodePath> {
        if predicate(self) {
            return Some(NodePath::root());
        }
        self.children.iter().enumerate().find_map(|(index, child)| {
            child
                .find_path_where(predicate)
                .map(|path| path.prepended(index))
        })
    }

    /// Visits every node of the subtree in depth-first pre-order.
    pub fn visit<'a>(&'a self, visitor: &mut impl FnMut(&'a DependencyNode)) {
        visitor(self);
        for child in &self.children {
            child.visit(visitor);
        }
    }

    pub(crate) fn visit_mut(&mut self, visitor: &mut impl FnMut(&mut DependencyNode)) {
        visitor(self);
        for child in &mut self.children {
            child.visit_mut(visitor);
        }
    }

    /// Number of nodes in this subtree, including this node.
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(|c| c.subtree_size()).sum::<usize>()
    }

    /// Module roots contained in this subtree, outermost first.
    pub fn module_roots(&self) -> Vec<&DependencyNode> {
        let mut roots = Vec::new();
        self.visit(&mut |node| {
            if node.is_module_root() {
                roots.push(node);
            }
        });
        roots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(name: &str) -> DependencyNode {
        DependencyNode::module_root(
            name,
            GeneralInfo::new(format!("{}:1.0.0", name), NPM_PKG_TYPE, format!("/work/{}", name)),
        )
    }

    #[test]
    fn test_component_node_fields() {
        let node = DependencyNode::component("lodash:4.17.21");
        assert_eq!(node.component_id(), "lodash:4.17.21");
        assert_eq!(node.name(), "lodash");
        assert_eq!(node.version(), Some("4.17.21"));
        assert_eq!(node.pkg_type(), NPM_PKG_TYPE);
        assert_eq!(node.label(), "lodash:4.17.21");
        assert!(!node.is_module_root());
        assert!(!node.is_wrapper());
    }

    #[test]
    fn test_scoped_package_name() {
        let node = DependencyNode::component("@types/node:20.1.0");
        assert_eq!(node.name(), "@types/node");
        assert_eq!(node.version(), Some("20.1.0"));
    }

    #[test]
    fn test_module_root_uses_general_info() {
        let root = module("app");
        assert!(root.is_module_root());
        assert_eq!(root.component_id(), "app:1.0.0");
        assert_eq!(root.general_info().unwrap().path(), Path::new("/work/app"));
    }

    #[test]
    fn test_wrapper_is_anonymous() {
        let wrapper = DependencyNode::wrapper();
        assert!(wrapper.is_wrapper());
        assert!(!wrapper.is_module_root());
        assert_eq!(wrapper.version(), None);
    }

    #[test]
    fn test_add_child_deduplicates_siblings() {
        let mut root = module("app");
        assert!(root.add_child(DependencyNode::component("a:1.0.0")));
        assert!(root.add_child(DependencyNode::component("b:1.0.0")));
        assert!(!root.add_child(DependencyNode::component("a:1.0.0")));

        let ids: Vec<&str> = root.children().iter().map(|c| c.component_id()).collect();
        assert_eq!(ids, vec!["a:1.0.0", "b:1.0.0"]);
    }

    #[test]
    fn test_refresh_summary_counts_distinct_issues() {
        let mut leaf = DependencyNode::component("b:2.0.0").with_issues([
            Issue::new("XRAY-1", Severity::High),
            Issue::new("XRAY-2", Severity::Low),
        ]);
        leaf.refresh_summary();

        let mut mid = DependencyNode::component("a:1.0.0")
            .with_issues([Issue::new("XRAY-1", Severity::High)]);
        mid.add_child(leaf);

        let mut root = module("app");
        root.add_child(mid);

        let summary = root.refresh_summary();
        assert_eq!(summary.issue_count(), 2);
        assert_eq!(summary.top_severity(), Severity::High);
        assert_eq!(root.children()[0].summary().issue_count(), 2);
        assert_eq!(root.children()[0].children()[0].summary().issue_count(), 2);
    }

    #[test]
    fn test_refresh_summary_without_issues_is_default() {
        let mut root = module("app");
        root.add_child(DependencyNode::component("a:1.0.0"));
        assert_eq!(root.refresh_summary(), IssueSummary::default());
    }

    #[test]
    fn test_node_at_and_ancestor_chain() {
        let mut a = DependencyNode::component("a:1.0.0");
        a.add_child(DependencyNode::component("b:2.0.0"));
        let mut root = module("app");
        root.add_child(DependencyNode::component("x:1.0.0"));
        root.add_child(a);

        let path = NodePath::new(vec![1, 0]);
        assert_eq!(root.node_at(&path).unwrap().component_id(), "b:2.0.0");

        let chain = root.ancestor_chain(&path).unwrap();
        let ids: Vec<&str> = chain.iter().map(|n| n.component_id()).collect();
        assert_eq!(ids, vec!["app:1.0.0", "a:1.0.0", "b:2.0.0"]);

        assert!(root.node_at(&NodePath::new(vec![5])).is_none());
        assert!(root.ancestor_chain(&NodePath::new(vec![1, 3])).is_none());
    }

    #[test]
    fn test_find_path() {
        let mut a = DependencyNode::component("a:1.0.0");
        a.add_child(DependencyNode::component("b:2.0.0"));
        let mut root = module("app");
        root.add_child(DependencyNode::component("x:1.0.0"));
        root.add_child(a);

        assert_eq!(root.find_path("b:2.0.0"), Some(NodePath::new(vec![1, 0])));
        assert_eq!(root.find_path("app:1.0.0"), Some(NodePath::root()));
        assert_eq!(root.find_path("missing:0.0.1"), None);
        assert_eq!(
            root.find_path_where(&|node: &DependencyNode| node.name() == "b"),
            Some(NodePath::new(vec![1, 0]))
        );
    }

    #[test]
    fn test_subtree_size_and_module_roots() {
        let mut wrapper = DependencyNode::wrapper();
        let mut first = module("first");
        first.add_child(DependencyNode::component("a:1.0.0"));
        wrapper.children_mut().push(first);
        wrapper.children_mut().push(module("second"));

        assert_eq!(wrapper.subtree_size(), 4);
        let ids: Vec<&str> = wrapper
            .module_roots()
            .iter()
            .map(|n| n.component_id())
            .collect();
        assert_eq!(ids, vec!["first:1.0.0", "second:1.0.0"]);
    }

    #[test]
    fn test_detached_drops_children_only() {
        let mut root = module("app").with_licenses([License::new("MIT")]);
        root.add_child(DependencyNode::component("a:1.0.0"));
        let copy = root.detached();
        assert_eq!(copy.child_count(), 0);
        assert_eq!(copy.licenses(), root.licenses());
        assert_eq!(copy.general_info(), root.general_info());
    }
}
