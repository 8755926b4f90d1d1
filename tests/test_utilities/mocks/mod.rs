/// Mock implementations for testing
mod mock_issue_repository;
mod mock_manifest_locator;
mod mock_package_lister;
mod mock_progress_reporter;

pub use mock_issue_repository::MockIssueRepository;
pub use mock_manifest_locator::MockManifestLocator;
pub use mock_package_lister::MockPackageLister;
pub use mock_progress_reporter::MockProgressReporter;
