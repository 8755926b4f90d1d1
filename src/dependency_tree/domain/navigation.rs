use super::dependency_node::GeneralInfo;
use crate::ports::outbound::DescriptorEditor;
use crate::shared::Result;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

/// Position of a node in a tree, as child indices from the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn prepended(mut self, index: usize) -> Self {
        self.0.insert(0, index);
        self
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "/{}", parts.join("/"))
    }
}

/// A dependency declaration in a manifest file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationTarget {
    descriptor: PathBuf,
    /// Zero-based line of the declaration.
    line: usize,
    /// Package name as declared at that line.
    element: String,
}

impl NavigationTarget {
    pub fn new(descriptor: impl Into<PathBuf>, line: usize, element: impl Into<String>) -> Self {
        Self {
            descriptor: descriptor.into(),
            line,
            element: element.into(),
        }
    }

    pub fn descriptor(&self) -> &Path {
        &self.descriptor
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn element(&self) -> &str {
        &self.element
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DeclarationKey {
    module_id: String,
    module_path: PathBuf,
    component_id: String,
}

/// Where each direct dependency of a module is declared.
///
/// Only direct dependencies are registered; a transitive component is never
/// declared in a manifest of the project.
#[derive(Debug, Clone, Default)]
pub struct NavigationRegistry {
    targets: HashMap<DeclarationKey, BTreeSet<NavigationTarget>>,
}

impl NavigationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, module: &GeneralInfo, component_id: &str, target: NavigationTarget) {
        self.targets
            .entry(Self::key(module, component_id))
            .or_default()
            .insert(target);
    }

    /// Declarations of `component_id` as a direct dependency of `module`.
    pub fn targets(&self, module: &GeneralInfo, component_id: &str) -> Option<&BTreeSet<NavigationTarget>> {
        self.targets
            .get(&Self::key(module, component_id))
            .filter(|targets| !targets.is_empty())
    }

    /// Drops every declaration registered for `module`, ahead of a re-scan.
    pub fn clear_module(&mut self, module: &GeneralInfo) {
        self.targets.retain(|key, _| {
            key.module_id != module.component_id() || key.module_path != module.path()
        });
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    fn key(module: &GeneralInfo, component_id: &str) -> DeclarationKey {
        DeclarationKey {
            module_id: module.component_id().to_string(),
            module_path: module.path().to_path_buf(),
            component_id: component_id.to_string(),
        }
    }
}

/// A declaration that can be removed from the build.
///
/// `node_to_exclude` is the selected component; `affected_node` is the direct
/// dependency whose declaration at `target` pulls it in (the same component
/// when the selection is itself declared).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Excludable {
    node_to_exclude: String,
    affected_node: String,
    target: NavigationTarget,
}

impl Excludable {
    pub fn new(node_to_exclude: impl Into<String>, affected_node: impl Into<String>, target: NavigationTarget) -> Self {
        Self {
            node_to_exclude: node_to_exclude.into(),
            affected_node: affected_node.into(),
            target,
        }
    }

    pub fn node_to_exclude(&self) -> &str {
        &self.node_to_exclude
    }

    pub fn affected_node(&self) -> &str {
        &self.affected_node
    }

    pub fn target(&self) -> &NavigationTarget {
        &self.target
    }

    pub fn is_transitive(&self) -> bool {
        self.node_to_exclude != self.affected_node
    }

    /// Removes the declaration at the target location.
    pub fn exclude(&self, editor: &dyn DescriptorEditor) -> Result<()> {
        editor.remove_declaration(&self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn module() -> GeneralInfo {
        GeneralInfo::new("app:1.0.0", "npm", "/work/app")
    }

    #[test]
    fn test_node_path_building() {
        let path = NodePath::root().child(2).child(0);
        assert_eq!(path.indices(), &[2, 0]);
        assert_eq!(path.len(), 2);
        assert!(!path.is_root());
        assert_eq!(path.clone().prepended(1).indices(), &[1, 2, 0]);
        assert_eq!(path.to_string(), "/2/0");
        assert_eq!(NodePath::root().to_string(), "/");
    }

    #[test]
    fn test_registry_register_and_lookup() {
        let mut registry = NavigationRegistry::new();
        let target = NavigationTarget::new("/work/app/package.json", 7, "lodash");
        registry.register(&module(), "lodash:4.17.21", target.clone());
        registry.register(&module(), "lodash:4.17.21", target.clone());

        let targets = registry.targets(&module(), "lodash:4.17.21").unwrap();
        assert_eq!(targets.len(), 1);
        assert!(targets.contains(&target));
        assert!(registry.targets(&module(), "express:4.18.2").is_none());
    }

    #[test]
    fn test_registry_is_keyed_by_module() {
        let mut registry = NavigationRegistry::new();
        let other = GeneralInfo::new("app:1.0.0", "npm", "/work/other");
        registry.register(&module(), "a:1.0.0", NavigationTarget::new("/work/app/package.json", 3, "a"));

        assert!(registry.targets(&other, "a:1.0.0").is_none());

        registry.register(&other, "a:1.0.0", NavigationTarget::new("/work/other/package.json", 4, "a"));
        registry.clear_module(&module());
        assert!(registry.targets(&module(), "a:1.0.0").is_none());
        assert!(registry.targets(&other, "a:1.0.0").is_some());
        assert_eq!(registry.len(), 1);

        registry.clear();
        assert!(registry.is_empty());
    }

    struct RecordingEditor {
        removed: Mutex<Vec<NavigationTarget>>,
    }

    impl DescriptorEditor for RecordingEditor {
        fn remove_declaration(&self, target: &NavigationTarget) -> Result<()> {
            self.removed.lock().unwrap().push(target.clone());
            Ok(())
        }
    }

    #[test]
    fn test_excludable_delegates_to_editor() {
        let target = NavigationTarget::new("/work/app/package.json", 5, "express");
        let excludable = Excludable::new("qs:6.11.0", "express:4.18.2", target.clone());
        assert!(excludable.is_transitive());

        let editor = RecordingEditor {
            removed: Mutex::new(Vec::new()),
        };
        excludable.exclude(&editor).unwrap();
        assert_eq!(editor.removed.lock().unwrap().as_slice(), &[target]);
    }
}
