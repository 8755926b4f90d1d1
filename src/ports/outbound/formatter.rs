use crate::dependency_tree::domain::ScanMetadata;
use crate::dependency_tree::services::{CompositeTree, NodeActions};
use crate::shared::Result;

/// TreeFormatter port for rendering the composite tree
pub trait TreeFormatter {
    /// Formats the composite tree together with the scan metadata
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format(&self, tree: &CompositeTree, metadata: &ScanMetadata) -> Result<String>;

    /// Formats the navigation and exclusion candidates of a located component
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format_actions(&self, actions: &NodeActions) -> Result<String>;
}
