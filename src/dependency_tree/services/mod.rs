mod filter_engine;
mod filters;
mod navigation_resolver;
mod scan_collector;
mod tree_builder;
mod tree_merger;

pub use filter_engine::{FilterManager, FilterSettings};
pub use filters::{ComponentNameFilter, LicenseFilter, ScopeFilter, SeverityFilter, TreeFilter};
pub use navigation_resolver::{ExclusionAction, NavigationAction, NavigationResolver, NodeActions};
pub use scan_collector::{ScanCollector, NPM_PREFIX};
pub use tree_builder::{
    BuildOutcome, ModuleBuild, ProjectBuild, ScanWarning, TreeBuilder, MISSING_INFORMATION_MARKER,
};
pub use tree_merger::{are_root_nodes_equal, CompositeTree};
