use crate::dependency_tree::domain::NavigationTarget;
use crate::shared::Result;

/// DescriptorEditor port for removing a dependency declaration from a manifest
pub trait DescriptorEditor {
    /// Removes the declaration at `target`
    ///
    /// # Errors
    /// Returns an error if the manifest changed since the target was located
    /// (the line no longer declares `target.element()`), or on I/O failure
    fn remove_declaration(&self, target: &NavigationTarget) -> Result<()>;
}
