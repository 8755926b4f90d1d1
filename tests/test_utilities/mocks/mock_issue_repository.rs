use async_trait::async_trait;
use npm_tree_scan::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

/// Mock IssueRepository answering from an in-memory table
///
/// Clones share the request log.
#[derive(Default, Clone)]
pub struct MockIssueRepository {
    entries: HashMap<String, ComponentIssues>,
    should_fail: bool,
    requested: Arc<Mutex<Vec<BTreeSet<String>>>>,
}

impl MockIssueRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one issue for `component_id` (`name:version`, without prefix)
    pub fn with_issue(mut self, component_id: &str, issue_id: &str, severity: Severity) -> Self {
        self.entries
            .entry(format!("npm://{}", component_id))
            .or_default()
            .issues
            .insert(Issue::new(issue_id, severity));
        self
    }

    pub fn with_license(mut self, component_id: &str, license: &str) -> Self {
        self.entries
            .entry(format!("npm://{}", component_id))
            .or_default()
            .licenses
            .insert(License::new(license));
        self
    }

    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Component id sets of every lookup so far
    pub fn requests(&self) -> Vec<BTreeSet<String>> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl IssueRepository for MockIssueRepository {
    async fn fetch_issues(
        &self,
        component_ids: &BTreeSet<String>,
    ) -> Result<HashMap<String, ComponentIssues>> {
        self.requested.lock().unwrap().push(component_ids.clone());
        if self.should_fail {
            anyhow::bail!("lookup service unavailable");
        }
        Ok(component_ids
            .iter()
            .filter_map(|id| self.entries.get(id).map(|found| (id.clone(), found.clone())))
            .collect())
    }
}
