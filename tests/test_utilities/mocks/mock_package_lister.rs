use npm_tree_scan::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock PackageLister serving `npm ls` output per application directory
///
/// Clones share the call counter.
#[derive(Default, Clone)]
pub struct MockPackageLister {
    listings: HashMap<PathBuf, std::result::Result<String, String>>,
    calls: Arc<AtomicUsize>,
}

impl MockPackageLister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `listing_json` for `app_dir`
    pub fn with_listing(mut self, app_dir: impl Into<PathBuf>, listing_json: &str) -> Self {
        self.listings
            .insert(app_dir.into(), Ok(listing_json.to_string()));
        self
    }

    /// Makes listing `app_dir` fail like a crashed npm process
    pub fn with_failure(mut self, app_dir: impl Into<PathBuf>, message: &str) -> Self {
        self.listings.insert(app_dir.into(), Err(message.to_string()));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PackageLister for MockPackageLister {
    fn list(&self, app_dir: &Path) -> Result<NpmListing> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.listings.get(app_dir) {
            Some(Ok(json)) => Ok(NpmListing::from_json(json)?),
            Some(Err(message)) => anyhow::bail!("{}", message),
            None => anyhow::bail!("no listing for {}", app_dir.display()),
        }
    }
}
