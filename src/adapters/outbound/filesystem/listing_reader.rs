use crate::dependency_tree::domain::NpmListing;
use crate::ports::outbound::PackageLister;
use crate::shared::error::TreeScanError;
use crate::shared::fs_guard::read_regular_file;
use crate::shared::Result;
use std::path::Path;

/// File name of a captured `npm ls --json --all --long` output.
pub const LISTING_FILE_NAME: &str = "npm-ls.json";

/// ListingFileReader adapter that reads a captured listing stored next to
/// the application's package.json
///
/// Lets a scan run on a machine without npm, or against a listing captured
/// in CI.
pub struct ListingFileReader;

impl ListingFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ListingFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageLister for ListingFileReader {
    fn list(&self, app_dir: &Path) -> Result<NpmListing> {
        let path = app_dir.join(LISTING_FILE_NAME);
        if !path.exists() {
            return Err(TreeScanError::ListingNotFound {
                path,
                suggestion: format!(
                    "Run `npm ls --json --all --long > {}` in {}, or pass --use-npm to invoke npm directly",
                    LISTING_FILE_NAME,
                    app_dir.display()
                ),
            }
            .into());
        }

        let content = read_regular_file(&path, LISTING_FILE_NAME)?;
        NpmListing::from_json(&content).map_err(|e| {
            TreeScanError::ListingParseError {
                path: path.clone(),
                details: e.to_string(),
            }
            .into()
        })
    }
}
