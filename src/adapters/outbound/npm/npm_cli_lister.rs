use crate::dependency_tree::domain::NpmListing;
use crate::ports::outbound::PackageLister;
use crate::shared::error::TreeScanError;
use crate::shared::Result;
use anyhow::Context;
use std::path::Path;
use std::process::{Command, Stdio};

#[cfg(windows)]
const NPM_BINARY: &str = "npm.cmd";
#[cfg(not(windows))]
const NPM_BINARY: &str = "npm";

/// NpmCliLister adapter that runs `npm ls --json --all --long` in the
/// application directory
///
/// npm exits non-zero when the installed tree has problems (missing or
/// invalid packages) but still prints a complete listing with a `problems`
/// array, so stdout is parsed whatever the exit status is. Only an empty or
/// non-JSON stdout is an error.
pub struct NpmCliLister;

impl NpmCliLister {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NpmCliLister {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageLister for NpmCliLister {
    fn list(&self, app_dir: &Path) -> Result<NpmListing> {
        tracing::debug!(app_dir = %app_dir.display(), "running npm ls");

        let output = Command::new(NPM_BINARY)
            .args(["ls", "--json", "--all", "--long"])
            .current_dir(app_dir)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to run `npm ls` in {}", app_dir.display()))?;

        if !output.status.success() {
            tracing::debug!(
                app_dir = %app_dir.display(),
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "npm ls exited with a failure status"
            );
        }

        parse_listing(app_dir, &output.stdout, &output.stderr, &output.status.to_string())
    }
}

/// Parses what `npm ls` printed, whatever its exit status was.
fn parse_listing(app_dir: &Path, stdout: &[u8], stderr: &[u8], status: &str) -> Result<NpmListing> {
    let stdout = String::from_utf8_lossy(stdout);
    if stdout.trim().is_empty() {
        anyhow::bail!(
            "`npm ls` printed nothing in {} ({}): {}",
            app_dir.display(),
            status,
            String::from_utf8_lossy(stderr).trim()
        );
    }

    NpmListing::from_json(&stdout).map_err(|e| {
        TreeScanError::ListingParseError {
            path: app_dir.to_path_buf(),
            details: e.to_string(),
        }
        .into()
    })
}

/// Whether an `npm` executable can be started
pub fn is_npm_installed() -> bool {
    Command::new(NPM_BINARY)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
