use super::dependency_node::DependencyNode;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Stable identifier of a scanned project.
///
/// A name rather than a path: two directories may normalize to the same
/// path string, two projects never share a name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProjectKey(String);

impl ProjectKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A project to scan: its key, its base directory and the npm application
/// directories (each holding a package.json) that belong to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSpec {
    pub key: ProjectKey,
    pub base_dir: PathBuf,
    pub app_dirs: Vec<PathBuf>,
}

impl ProjectSpec {
    pub fn new(key: ProjectKey, base_dir: PathBuf, app_dirs: Vec<PathBuf>) -> Self {
        Self {
            key,
            base_dir,
            app_dirs,
        }
    }
}

/// Latest unfiltered tree of every scanned project.
#[derive(Debug, Clone, Default)]
pub struct ProjectsMap {
    projects: BTreeMap<ProjectKey, DependencyNode>,
}

impl ProjectsMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the tree of a project, replacing the result of an earlier scan.
    pub fn put(&mut self, key: ProjectKey, tree: DependencyNode) -> Option<DependencyNode> {
        self.projects.insert(key, tree)
    }

    pub fn get(&self, key: &ProjectKey) -> Option<&DependencyNode> {
        self.projects.get(key)
    }

    pub fn remove(&mut self, key: &ProjectKey) -> Option<DependencyNode> {
        self.projects.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &ProjectKey> {
        self.projects.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProjectKey, &DependencyNode)> {
        self.projects.iter()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}
