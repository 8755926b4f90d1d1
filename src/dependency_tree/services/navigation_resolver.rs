use crate::dependency_tree::domain::{
    DependencyNode, Excludable, NavigationRegistry, NavigationTarget, NodePath,
};
use crate::dependency_tree::policies::ExclusionPolicy;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

/// Jump to a declaration of the selected component (or of the direct
/// dependency that pulls it in).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationAction {
    pub target: NavigationTarget,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExclusionAction {
    pub excludable: Excludable,
    pub label: String,
}

/// Everything that can be done with a selected node, as plain data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeActions {
    pub selected: Option<String>,
    /// Directly declared component the actions apply to.
    pub affected: Option<String>,
    pub navigation: Vec<NavigationAction>,
    pub exclusions: Vec<ExclusionAction>,
}

impl NodeActions {
    pub fn is_empty(&self) -> bool {
        self.navigation.is_empty() && self.exclusions.is_empty()
    }
}

/// NavigationResolver finds where a selected component is declared and
/// which of those declarations can be removed.
pub struct NavigationResolver<'a> {
    registry: &'a NavigationRegistry,
    base_path: &'a Path,
}

impl<'a> NavigationResolver<'a> {
    /// `base_path` is the directory labels are made relative to.
    pub fn new(registry: &'a NavigationRegistry, base_path: &'a Path) -> Self {
        Self {
            registry,
            base_path,
        }
    }

    /// Resolves the actions for the node at `path` below `root`.
    ///
    /// A component declared directly in a module's manifest yields its own
    /// declarations. Otherwise the nearest ancestor that is declared directly
    /// is used, so a transitive component can be dropped through the direct
    /// dependency that pulls it in. No declared ancestor means no actions.
    pub fn resolve(&self, root: &DependencyNode, path: &NodePath) -> NodeActions {
        let Some(chain) = root.ancestor_chain(path) else {
            tracing::warn!(path = %path, "selected node not found in tree");
            return NodeActions::default();
        };
        let Some(&selected) = chain.last() else {
            return NodeActions::default();
        };

        let mut actions = NodeActions {
            selected: Some(selected.component_id().to_string()),
            ..NodeActions::default()
        };

        let Some((affected, targets)) = self.navigable_ancestor(&chain) else {
            tracing::debug!(
                component = selected.component_id(),
                "no declared ancestor, no actions available"
            );
            return actions;
        };

        actions.affected = Some(affected.component_id().to_string());
        for target in targets {
            let label = self.location_label(target);
            if let Some(excludable) = ExclusionPolicy::get_excludable(selected, affected, target) {
                actions.exclusions.push(ExclusionAction {
                    excludable,
                    label: label.clone(),
                });
            }
            actions.navigation.push(NavigationAction {
                target: target.clone(),
                label,
            });
        }
        actions
    }

    /// Closest node of the chain, starting at the selection, whose parent is
    /// a module root that declares it.
    fn navigable_ancestor<'n>(
        &self,
        chain: &[&'n DependencyNode],
    ) -> Option<(&'n DependencyNode, &'a BTreeSet<NavigationTarget>)> {
        let registry: &'a NavigationRegistry = self.registry;
        chain.windows(2).rev().find_map(|pair| {
            let (parent, node) = (pair[0], pair[1]);
            if node.is_module_root() {
                return None;
            }
            let module = parent.general_info()?;
            registry
                .targets(module, node.component_id())
                .map(|targets| (node, targets))
        })
    }

    /// `"<manifest path relative to base> <one-based line>"`.
    fn location_label(&self, target: &NavigationTarget) -> String {
        let descriptor = target.descriptor();
        let shown = match descriptor.strip_prefix(self.base_path) {
            Ok(relative) if !relative.as_os_str().is_empty() => relative.display().to_string(),
            _ => {
                tracing::warn!(
                    descriptor = %descriptor.display(),
                    base = %self.base_path.display(),
                    "could not relativize manifest path"
                );
                descriptor
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| descriptor.display().to_string())
            }
        };
        format!("{} {}", shown, target.line() + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency_tree::domain::{GeneralInfo, NPM_PKG_TYPE};
    use std::path::PathBuf;

    /// app (module root at /work/shop/app)
    /// ├── express:4.18.2
    /// │   └── body-parser:1.20.1
    /// │       └── qs:6.11.0
    /// └── lodash:4.17.21
    fn tree() -> DependencyNode {
        let mut body_parser = DependencyNode::component("body-parser:1.20.1");
        body_parser.add_child(DependencyNode::component("qs:6.11.0"));
        let mut express = DependencyNode::component("express:4.18.2");
        express.add_child(body_parser);

        let mut root = DependencyNode::module_root("app", module());
        root.add_child(express);
        root.add_child(DependencyNode::component("lodash:4.17.21"));
        root
    }

    fn module() -> GeneralInfo {
        GeneralInfo::new("app:1.0.0", NPM_PKG_TYPE, "/work/shop/app")
    }

    fn manifest() -> PathBuf {
        PathBuf::from("/work/shop/app/package.json")
    }

    fn registry() -> NavigationRegistry {
        let mut registry = NavigationRegistry::new();
        registry.register(&module(), "express:4.18.2", NavigationTarget::new(manifest(), 5, "express"));
        registry.register(&module(), "lodash:4.17.21", NavigationTarget::new(manifest(), 6, "lodash"));
        registry
    }

    #[test]
    fn test_direct_dependency_resolves_own_declaration() {
        let registry = registry();
        let resolver = NavigationResolver::new(&registry, Path::new("/work/shop"));

        let actions = resolver.resolve(&tree(), &NodePath::new(vec![1]));
        assert_eq!(actions.selected.as_deref(), Some("lodash:4.17.21"));
        assert_eq!(actions.affected.as_deref(), Some("lodash:4.17.21"));
        assert_eq!(actions.navigation.len(), 1);
        assert_eq!(actions.navigation[0].label, "app/package.json 7");
        assert_eq!(actions.exclusions.len(), 1);
        assert!(!actions.exclusions[0].excludable.is_transitive());
    }

    #[test]
    fn test_transitive_dependency_resolves_navigable_parent() {
        let registry = registry();
        let resolver = NavigationResolver::new(&registry, Path::new("/work/shop"));

        let actions = resolver.resolve(&tree(), &NodePath::new(vec![0, 0, 0]));
        assert_eq!(actions.selected.as_deref(), Some("qs:6.11.0"));
        assert_eq!(actions.affected.as_deref(), Some("express:4.18.2"));
        assert_eq!(actions.navigation[0].target.element(), "express");
        assert_eq!(actions.navigation[0].label, "app/package.json 6");

        let excludable = &actions.exclusions[0].excludable;
        assert_eq!(excludable.node_to_exclude(), "qs:6.11.0");
        assert_eq!(excludable.affected_node(), "express:4.18.2");
    }

    #[test]
    fn test_every_declaration_is_offered() {
        let mut registry = registry();
        registry.register(
            &module(),
            "express:4.18.2",
            NavigationTarget::new(manifest(), 14, "express"),
        );
        let resolver = NavigationResolver::new(&registry, Path::new("/work/shop"));

        let actions = resolver.resolve(&tree(), &NodePath::new(vec![0]));
        let labels: Vec<&str> = actions.navigation.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["app/package.json 6", "app/package.json 15"]);
        assert_eq!(actions.exclusions.len(), 2);
    }

    #[test]
    fn test_module_root_has_no_actions() {
        let registry = registry();
        let resolver = NavigationResolver::new(&registry, Path::new("/work/shop"));

        let actions = resolver.resolve(&tree(), &NodePath::root());
        assert_eq!(actions.selected.as_deref(), Some("app:1.0.0"));
        assert!(actions.affected.is_none());
        assert!(actions.is_empty());
    }

    #[test]
    fn test_undeclared_chain_has_no_actions() {
        let registry = NavigationRegistry::new();
        let resolver = NavigationResolver::new(&registry, Path::new("/work/shop"));

        let actions = resolver.resolve(&tree(), &NodePath::new(vec![0, 0]));
        assert!(actions.is_empty());
        assert!(actions.affected.is_none());
    }

    #[test]
    fn test_ineligible_declaration_is_navigation_only() {
        let mut registry = NavigationRegistry::new();
        registry.register(
            &module(),
            "lodash:4.17.21",
            NavigationTarget::new("/work/shop/app/package-lock.json", 30, "lodash"),
        );
        let resolver = NavigationResolver::new(&registry, Path::new("/work/shop"));

        let actions = resolver.resolve(&tree(), &NodePath::new(vec![1]));
        assert_eq!(actions.navigation.len(), 1);
        assert!(actions.exclusions.is_empty());
    }

    #[test]
    fn test_label_falls_back_to_file_name_outside_base() {
        let registry = registry();
        let resolver = NavigationResolver::new(&registry, Path::new("/elsewhere"));

        let actions = resolver.resolve(&tree(), &NodePath::new(vec![1]));
        assert_eq!(actions.navigation[0].label, "package.json 7");
    }

    #[test]
    fn test_invalid_path_has_no_actions() {
        let registry = registry();
        let resolver = NavigationResolver::new(&registry, Path::new("/work/shop"));

        let actions = resolver.resolve(&tree(), &NodePath::new(vec![9]));
        assert_eq!(actions, NodeActions::default());
    }

    #[test]
    fn test_resolves_inside_composite_wrapper() {
        let mut wrapper = DependencyNode::wrapper();
        wrapper.children_mut().push(DependencyNode::module_root(
            "other",
            GeneralInfo::new("other:1.0.0", NPM_PKG_TYPE, "/work/other"),
        ));
        wrapper.children_mut().push(tree());
        let registry = registry();
        let resolver = NavigationResolver::new(&registry, Path::new("/work"));

        let actions = resolver.resolve(&wrapper, &NodePath::new(vec![1, 0, 0]));
        assert_eq!(actions.affected.as_deref(), Some("express:4.18.2"));
        assert_eq!(actions.navigation[0].label, "shop/app/package.json 6");
    }
}
