use crate::dependency_tree::domain::NpmListing;
use crate::shared::Result;
use std::path::Path;

/// PackageLister port for obtaining the resolved dependency listing of an
/// application directory (the output of `npm ls --json --all --long`).
///
/// Implementations may block on process or file I/O; callers run them off
/// the async executor.
pub trait PackageLister: Send + Sync {
    /// Lists the dependencies installed for the application in `app_dir`
    ///
    /// # Arguments
    /// * `app_dir` - Directory containing the application's package.json
    ///
    /// # Errors
    /// Returns an error if the listing cannot be produced or is not valid JSON
    fn list(&self, app_dir: &Path) -> Result<NpmListing>;
}

impl<T: PackageLister + ?Sized> PackageLister for Box<T> {
    fn list(&self, app_dir: &Path) -> Result<NpmListing> {
        (**self).list(app_dir)
    }
}
