use crate::dependency_tree::domain::ComponentIssues;
use crate::ports::outbound::IssueRepository;
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// CachingIssueRepository wraps an IssueRepository and adds in-memory caching.
///
/// This adapter implements the decorator pattern so re-scans of a project
/// (or scans of projects sharing components) only submit ids that were not
/// looked up before. Ids the inner repository reported nothing for are
/// cached as clean. The cache is thread-safe and shared by concurrent scans.
pub struct CachingIssueRepository<R: IssueRepository> {
    inner: R,
    cache: Arc<DashMap<String, Option<ComponentIssues>>>,
}

impl<R: IssueRepository> CachingIssueRepository<R> {
    /// Creates a new caching repository wrapping the given inner repository
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: Arc::new(DashMap::new()),
        }
    }

    /// Returns the current cache size (for testing/monitoring)
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[async_trait]
impl<R: IssueRepository> IssueRepository for CachingIssueRepository<R> {
    async fn fetch_issues(
        &self,
        component_ids: &BTreeSet<String>,
    ) -> Result<HashMap<String, ComponentIssues>> {
        let mut results = HashMap::new();
        let mut missing = BTreeSet::new();

        for id in component_ids {
            match self.cache.get(id) {
                Some(cached) => {
                    if let Some(issues) = cached.value() {
                        results.insert(id.clone(), issues.clone());
                    }
                }
                None => {
                    missing.insert(id.clone());
                }
            }
        }

        tracing::debug!(
            requested = component_ids.len(),
            cached = component_ids.len() - missing.len(),
            "issue lookup"
        );

        if missing.is_empty() {
            return Ok(results);
        }

        let mut fetched = self.inner.fetch_issues(&missing).await?;
        for id in missing {
            let entry = fetched.remove(&id);
            if let Some(issues) = &entry {
                results.insert(id.clone(), issues.clone());
            }
            self.cache.insert(id, entry);
        }

        Ok(results)
    }
}
