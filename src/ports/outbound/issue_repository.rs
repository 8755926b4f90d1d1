use crate::dependency_tree::domain::ComponentIssues;
use crate::shared::Result;
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};

/// IssueRepository port for looking up known issues of components
///
/// Component ids are submitted with their scheme prefix
/// (`npm://name:version`). Ids missing from the returned map have no
/// known issues.
#[async_trait]
pub trait IssueRepository: Send + Sync {
    /// Fetches issues and licenses for a batch of component ids
    ///
    /// # Errors
    /// Returns an error if the lookup source cannot be queried
    async fn fetch_issues(
        &self,
        component_ids: &BTreeSet<String>,
    ) -> Result<HashMap<String, ComponentIssues>>;
}

/// No lookup configured: every component is reported clean.
#[async_trait]
impl IssueRepository for () {
    async fn fetch_issues(
        &self,
        _component_ids: &BTreeSet<String>,
    ) -> Result<HashMap<String, ComponentIssues>> {
        Ok(HashMap::new())
    }
}

#[async_trait]
impl<T: IssueRepository + ?Sized> IssueRepository for Box<T> {
    async fn fetch_issues(
        &self,
        component_ids: &BTreeSet<String>,
    ) -> Result<HashMap<String, ComponentIssues>> {
        (**self).fetch_issues(component_ids).await
    }
}
