/// Filesystem adapters for listings, manifests and output files
mod app_dir_finder;
mod file_writer;
mod listing_reader;
mod package_json_editor;
mod package_json_locator;

pub use app_dir_finder::find_application_dirs;
pub use file_writer::{FileSystemWriter, StdoutPresenter};
pub use listing_reader::{ListingFileReader, LISTING_FILE_NAME};
pub use package_json_editor::PackageJsonEditor;
pub use package_json_locator::{PackageJsonLocator, MANIFEST_FILE_NAME};
