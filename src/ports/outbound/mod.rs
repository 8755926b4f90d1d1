/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (npm, file system, console, etc.).
pub mod descriptor_editor;
pub mod formatter;
pub mod issue_repository;
pub mod manifest_locator;
pub mod output_presenter;
pub mod package_lister;
pub mod progress_reporter;

pub use descriptor_editor::DescriptorEditor;
pub use formatter::TreeFormatter;
pub use issue_repository::IssueRepository;
pub use manifest_locator::ManifestLocator;
pub use output_presenter::OutputPresenter;
pub use package_lister::PackageLister;
pub use progress_reporter::ProgressReporter;
