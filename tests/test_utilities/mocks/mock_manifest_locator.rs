use npm_tree_scan::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Mock ManifestLocator with fixed declarations per module directory
///
/// Modules without registered declarations have none.
#[derive(Default)]
pub struct MockManifestLocator {
    declarations: HashMap<PathBuf, Vec<NavigationTarget>>,
}

impl MockManifestLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `element` at zero-based `line` of `module_dir/package.json`
    pub fn with_declaration(mut self, module_dir: impl Into<PathBuf>, line: usize, element: &str) -> Self {
        let module_dir = module_dir.into();
        let target = NavigationTarget::new(module_dir.join("package.json"), line, element);
        self.declarations.entry(module_dir).or_default().push(target);
        self
    }
}

impl ManifestLocator for MockManifestLocator {
    fn locate(&self, module_dir: &Path) -> Result<Vec<NavigationTarget>> {
        Ok(self.declarations.get(module_dir).cloned().unwrap_or_default())
    }
}
