use crate::dependency_tree::domain::{DependencyNode, Excludable, NavigationTarget, NPM_PKG_TYPE};

/// ExclusionPolicy decides whether a declaration can be removed to drop a
/// component from the build.
///
/// Rules:
/// 1. Module roots are never excluded, and never act as the affected node
/// 2. Both nodes must be npm components
/// 3. The declaration must live in a `package.json`
/// 4. The declaration must name the affected node's package
pub struct ExclusionPolicy;

impl ExclusionPolicy {
    const DESCRIPTOR_FILE_NAME: &'static str = "package.json";

    /// Checks the node-level rules (1 and 2)
    ///
    /// # Arguments
    /// * `node` - The selected component
    /// * `affected` - The directly declared component that pulls `node` in
    ///   (`node` itself when it is declared directly)
    pub fn is_excludable(node: &DependencyNode, affected: &DependencyNode) -> bool {
        !node.is_module_root()
            && !affected.is_module_root()
            && node.pkg_type() == NPM_PKG_TYPE
            && affected.pkg_type() == NPM_PKG_TYPE
    }

    /// Returns the exclusion action for one declaration, or `None` when the
    /// triple is not eligible
    pub fn get_excludable(
        node: &DependencyNode,
        affected: &DependencyNode,
        target: &NavigationTarget,
    ) -> Option<Excludable> {
        if !Self::is_excludable(node, affected) {
            return None;
        }

        let is_manifest = target
            .descriptor()
            .file_name()
            .is_some_and(|name| name == Self::DESCRIPTOR_FILE_NAME);
        if !is_manifest || target.element() != affected.name() {
            return None;
        }

        Some(Excludable::new(
            node.component_id(),
            affected.component_id(),
            target.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency_tree::domain::GeneralInfo;

    fn target(element: &str) -> NavigationTarget {
        NavigationTarget::new("/work/app/package.json", 12, element)
    }

    #[test]
    fn test_direct_dependency_is_excludable() {
        let express = DependencyNode::component("express:4.18.2");
        let excludable = ExclusionPolicy::get_excludable(&express, &express, &target("express")).unwrap();
        assert_eq!(excludable.node_to_exclude(), "express:4.18.2");
        assert_eq!(excludable.affected_node(), "express:4.18.2");
        assert!(!excludable.is_transitive());
    }

    #[test]
    fn test_transitive_dependency_excluded_through_parent() {
        let qs = DependencyNode::component("qs:6.11.0");
        let express = DependencyNode::component("express:4.18.2");
        let excludable = ExclusionPolicy::get_excludable(&qs, &express, &target("express")).unwrap();
        assert_eq!(excludable.node_to_exclude(), "qs:6.11.0");
        assert_eq!(excludable.affected_node(), "express:4.18.2");
        assert!(excludable.is_transitive());
    }

    #[test]
    fn test_scoped_package_name_matches_element() {
        let node = DependencyNode::component("@babel/core:7.23.0");
        assert!(ExclusionPolicy::get_excludable(&node, &node, &target("@babel/core")).is_some());
    }

    #[test]
    fn test_module_root_is_not_excludable() {
        let root = DependencyNode::module_root("app", GeneralInfo::new("app:1.0.0", NPM_PKG_TYPE, "/work/app"));
        let express = DependencyNode::component("express:4.18.2");
        assert!(!ExclusionPolicy::is_excludable(&root, &express));
        assert!(!ExclusionPolicy::is_excludable(&express, &root));
        assert!(ExclusionPolicy::get_excludable(&express, &root, &target("app")).is_none());
    }

    #[test]
    fn test_element_must_name_affected_node() {
        let express = DependencyNode::component("express:4.18.2");
        assert!(ExclusionPolicy::get_excludable(&express, &express, &target("lodash")).is_none());
    }

    #[test]
    fn test_descriptor_must_be_package_json() {
        let express = DependencyNode::component("express:4.18.2");
        let lock = NavigationTarget::new("/work/app/package-lock.json", 40, "express");
        assert!(ExclusionPolicy::get_excludable(&express, &express, &lock).is_none());
    }
}
