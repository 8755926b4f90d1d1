use crate::dependency_tree::domain::ProjectSpec;
use crate::dependency_tree::services::FilterSettings;

/// ScanRequest - Internal request DTO for the project scan use case
#[derive(Debug, Clone, Default)]
pub struct ScanRequest {
    /// Projects to scan concurrently
    pub projects: Vec<ProjectSpec>,
    /// Filters applied to every project before it is merged
    pub filters: FilterSettings,
}

impl ScanRequest {
    pub fn new(projects: Vec<ProjectSpec>, filters: FilterSettings) -> Self {
        Self { projects, filters }
    }
}
