use crate::shared::error::TreeScanError;
use crate::shared::Result;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Deepest directory level searched for application directories.
const MAX_SEARCH_DEPTH: usize = 8;

/// Finds every npm application directory (a directory holding a
/// package.json) under `project_dir`, in sorted path order
///
/// Installed packages under `node_modules` and hidden directories are not
/// searched.
///
/// # Errors
/// Returns [`TreeScanError::InvalidProjectPath`] when `project_dir` is not a
/// directory.
pub fn find_application_dirs(project_dir: &Path) -> Result<Vec<PathBuf>> {
    if !project_dir.is_dir() {
        return Err(TreeScanError::InvalidProjectPath {
            path: project_dir.to_path_buf(),
            reason: "not a directory".to_string(),
        }
        .into());
    }

    let mut app_dirs: Vec<PathBuf> = WalkDir::new(project_dir)
        .max_depth(MAX_SEARCH_DEPTH)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_ignored(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == "package.json")
        .filter_map(|entry| entry.path().parent().map(Path::to_path_buf))
        .collect();

    app_dirs.sort();
    tracing::debug!(
        project = %project_dir.display(),
        count = app_dirs.len(),
        "application directories found"
    );
    Ok(app_dirs)
}

fn is_ignored(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name == "node_modules" || name.starts_with('.'))
        .unwrap_or(false)
}
