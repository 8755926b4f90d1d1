use crate::dependency_tree::domain::NavigationTarget;
use crate::shared::Result;
use std::path::Path;

/// ManifestLocator port for finding dependency declarations in a module's manifest
pub trait ManifestLocator: Send + Sync {
    /// Returns one target per dependency declaration found in the manifest
    /// of the module rooted at `module_dir`, in file order. The target's
    /// element is the declared package name.
    ///
    /// # Errors
    /// Returns an error if the manifest cannot be read
    fn locate(&self, module_dir: &Path) -> Result<Vec<NavigationTarget>>;
}
