use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Largest manifest or listing file we are willing to load (50 MB).
/// `npm ls --all --long` output for big monorepos stays well below this.
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Reads a text file after checking that it is a regular file, not a
/// symbolic link, and not larger than [`MAX_FILE_SIZE`].
///
/// # Arguments
/// * `path` - File to read
/// * `description` - Human readable name used in error messages (e.g. "package.json")
///
/// # Errors
/// Returns an error if the metadata cannot be read, the path is a symlink or
/// not a regular file, the file is too large, or reading fails.
pub fn read_regular_file(path: &Path, description: &str) -> Result<String> {
    ensure_regular_file(path, description)?;

    fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {} {}: {}", description, path.display(), e))
}

/// Checks that `path` names a regular, reasonably sized file that is not a symlink.
pub fn ensure_regular_file(path: &Path, description: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to read {} metadata for {}: {}",
            description,
            path.display(),
            e
        )
    })?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. For security reasons, symbolic links are not allowed.",
            path.display()
        );
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    if metadata.len() > MAX_FILE_SIZE {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            metadata.len(),
            MAX_FILE_SIZE
        );
    }

    Ok(())
}

/// Rewrites an existing file in place. The target must pass the same checks
/// as [`read_regular_file`], so edits never follow a symlink out of the project.
pub fn rewrite_regular_file(path: &Path, description: &str, content: &str) -> Result<()> {
    ensure_regular_file(path, description)?;

    fs::write(path, content)
        .map_err(|e| anyhow::anyhow!("Failed to write {} {}: {}", description, path.display(), e))
}
