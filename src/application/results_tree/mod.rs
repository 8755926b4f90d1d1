//! Results of every scanned project and the filtered composite view built
//! from them.

mod composite_actor;

pub use composite_actor::CompositeTreeHandle;

use crate::dependency_tree::domain::{
    DependencyNode, GeneralInfo, NavigationRegistry, NavigationTarget, NodePath, ProjectKey,
    ProjectsMap,
};
use crate::dependency_tree::services::{
    CompositeTree, FilterManager, NavigationResolver, NodeActions,
};
use crate::ports::outbound::ManifestLocator;
use crate::shared::Result;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio_util::sync::CancellationToken;

/// Where the direct dependencies of one module are declared, as
/// `(component id, target)` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDeclarations {
    pub module: GeneralInfo,
    pub declarations: Vec<(String, NavigationTarget)>,
}

/// ResultsTree keeps the latest unfiltered tree of each project and
/// publishes filtered copies of them into the composite tree.
///
/// Must be created inside a tokio runtime: the composite tree lives in its
/// own task, see [`CompositeTreeHandle`].
///
/// Every update of the stored projects or the filters runs under `publishing`
/// until its merge into the composite tree has completed, so the composite
/// always shows the filtered copy of what is stored.
pub struct ResultsTree {
    publishing: tokio::sync::Mutex<()>,
    projects: Mutex<ProjectsMap>,
    filters: RwLock<FilterManager>,
    navigation: RwLock<NavigationRegistry>,
    composite: CompositeTreeHandle,
}

impl ResultsTree {
    pub fn new(filters: FilterManager) -> Self {
        Self {
            publishing: tokio::sync::Mutex::new(()),
            projects: Mutex::new(ProjectsMap::new()),
            filters: RwLock::new(filters),
            navigation: RwLock::new(NavigationRegistry::new()),
            composite: CompositeTreeHandle::spawn(),
        }
    }

    /// Stores the tree of a freshly scanned project and publishes its
    /// filtered copy.
    ///
    /// Cancellation is checked before filtering and again before the tree is
    /// stored and merged. Returns `false` when the scan was cancelled; the
    /// stored and published state is then left as it was.
    pub async fn add_scan_results(
        &self,
        key: ProjectKey,
        tree: DependencyNode,
        cancel: &CancellationToken,
    ) -> Result<bool> {
        let _publishing = self.publishing.lock().await;
        if cancel.is_cancelled() {
            return Ok(false);
        }
        let filtered = self.read_filters().apply_filters(&tree);
        if cancel.is_cancelled() {
            return Ok(false);
        }

        self.lock_projects().put(key.clone(), tree);
        self.composite.merge(filtered).await?;
        tracing::info!(project = %key, "scan results published");
        Ok(true)
    }

    /// Re-publishes one project with the current filters.
    pub async fn apply_filters(&self, key: &ProjectKey) -> Result<()> {
        let _publishing = self.publishing.lock().await;
        self.republish(key).await
    }

    pub async fn apply_filters_for_all_projects(&self) -> Result<()> {
        let _publishing = self.publishing.lock().await;
        self.republish_all().await
    }

    /// Replaces the active filters and re-publishes every project.
    pub async fn set_filters(&self, filters: FilterManager) -> Result<()> {
        let _publishing = self.publishing.lock().await;
        *self.write_filters() = filters;
        self.republish_all().await
    }

    /// Latest unfiltered tree stored for `key`.
    pub fn project(&self, key: &ProjectKey) -> Option<DependencyNode> {
        self.lock_projects().get(key).cloned()
    }

    /// Exclusion patterns of the active filters that matched nothing so far.
    pub fn unmatched_patterns(&self) -> Vec<String> {
        self.read_filters().unmatched_patterns()
    }

    /// Drops a project from the stored results and the composite tree.
    pub async fn remove_project(&self, key: &ProjectKey) -> Result<bool> {
        let _publishing = self.publishing.lock().await;
        let removed = self.lock_projects().remove(key);
        let Some(tree) = removed else {
            return Ok(false);
        };
        {
            let mut navigation = self.write_navigation();
            for module in tree.module_roots() {
                if let Some(info) = module.general_info() {
                    navigation.clear_module(info);
                }
            }
        }
        self.composite.remove(tree.detached()).await
    }

    /// Forgets every project, declaration and published tree.
    pub async fn reset(&self) -> Result<()> {
        let _publishing = self.publishing.lock().await;
        *self.lock_projects() = ProjectsMap::new();
        self.write_navigation().clear();
        self.composite.reset().await
    }

    pub async fn snapshot(&self) -> Result<CompositeTree> {
        self.composite.snapshot().await
    }

    /// Reads the manifests of the modules of `tree` and pairs each declared
    /// package name with the direct dependency it declares.
    ///
    /// Touches no shared state, so it can run on the blocking pool. A
    /// manifest that cannot be read is logged and yields no declarations.
    pub fn locate_declarations<M: ManifestLocator + ?Sized>(
        tree: &DependencyNode,
        locator: &M,
    ) -> Vec<ModuleDeclarations> {
        let mut located = Vec::new();

        for module in tree.module_roots() {
            let Some(info) = module.general_info() else {
                continue;
            };
            // Roots grouping several modules declare nothing themselves.
            if module.children().iter().any(DependencyNode::is_module_root) {
                continue;
            }

            let targets = match locator.locate(info.path()) {
                Ok(targets) => targets,
                Err(e) => {
                    tracing::warn!(
                        module = info.component_id(),
                        path = %info.path().display(),
                        error = %e,
                        "could not locate dependency declarations"
                    );
                    Vec::new()
                }
            };

            let mut declarations = Vec::new();
            for target in targets {
                for child in module.children() {
                    if child.name() == target.element() {
                        declarations.push((child.component_id().to_string(), target.clone()));
                    }
                }
            }
            located.push(ModuleDeclarations {
                module: info.clone(),
                declarations,
            });
        }

        located
    }

    /// Records located declarations, replacing what was recorded for the
    /// same modules before. Returns the number of declarations recorded.
    pub fn register_declarations(&self, located: Vec<ModuleDeclarations>) -> usize {
        let mut registered = 0;
        let mut navigation = self.write_navigation();

        for ModuleDeclarations { module, declarations } in located {
            navigation.clear_module(&module);
            for (component_id, target) in declarations {
                navigation.register(&module, &component_id, target);
                registered += 1;
            }
        }

        tracing::debug!(registered, "dependency declarations registered");
        registered
    }

    async fn republish(&self, key: &ProjectKey) -> Result<()> {
        let stored = self.lock_projects().get(key).cloned();
        let Some(tree) = stored else {
            tracing::debug!(project = %key, "no scan results to filter");
            return Ok(());
        };
        let filtered = self.read_filters().apply_filters(&tree);
        self.composite.merge(filtered).await
    }

    async fn republish_all(&self) -> Result<()> {
        let keys: Vec<ProjectKey> = self.lock_projects().keys().cloned().collect();
        for key in &keys {
            self.republish(key).await?;
        }
        Ok(())
    }

    /// Path of the first published node whose component id or package name
    /// equals `query`.
    pub async fn find_node(&self, query: &str) -> Result<Option<NodePath>> {
        let snapshot = self.snapshot().await?;
        Ok(snapshot.root().and_then(|root| {
            root.find_path_where(&|node: &DependencyNode| {
                node.version().is_some() && (node.component_id() == query || node.name() == query)
            })
        }))
    }

    /// Navigation and exclusion actions for the published node at `path`.
    ///
    /// Labels show manifest paths relative to `base_path`.
    pub async fn node_actions(&self, path: &NodePath, base_path: &Path) -> Result<NodeActions> {
        let snapshot = self.snapshot().await?;
        let Some(root) = snapshot.root() else {
            return Ok(NodeActions::default());
        };
        let navigation = self.read_navigation();
        Ok(NavigationResolver::new(&navigation, base_path).resolve(root, path))
    }

    fn lock_projects(&self) -> MutexGuard<'_, ProjectsMap> {
        self.projects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read_filters(&self) -> RwLockReadGuard<'_, FilterManager> {
        self.filters
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_filters(&self) -> RwLockWriteGuard<'_, FilterManager> {
        self.filters
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read_navigation(&self) -> RwLockReadGuard<'_, NavigationRegistry> {
        self.navigation
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_navigation(&self) -> RwLockWriteGuard<'_, NavigationRegistry> {
        self.navigation
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
