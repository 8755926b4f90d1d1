use crate::dependency_tree::domain::ComponentIssues;
use crate::dependency_tree::services::NPM_PREFIX;
use crate::ports::outbound::IssueRepository;
use crate::shared::error::TreeScanError;
use crate::shared::fs_guard::read_regular_file;
use crate::shared::Result;
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// JsonIssueRepository adapter serving lookup results exported to a JSON file
///
/// The file maps component ids to their issues and licenses:
///
/// ```json
/// {
///   "npm://lodash:4.17.20": {
///     "issues": [{ "id": "CVE-2021-23337", "severity": "High" }],
///     "licenses": ["MIT"]
///   }
/// }
/// ```
///
/// Keys may omit the `npm://` prefix.
#[derive(Debug)]
pub struct JsonIssueRepository {
    entries: HashMap<String, ComponentIssues>,
}

impl JsonIssueRepository {
    pub fn new(entries: HashMap<String, ComponentIssues>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(id, issues)| (Self::normalize(&id), issues))
            .collect();
        Self { entries }
    }

    /// Loads the repository from an exported results file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid export
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = read_regular_file(path, "issues file").map_err(|e| TreeScanError::FileReadError {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;
        Self::from_json(&content).map_err(|e| {
            TreeScanError::Validation {
                message: format!("Invalid issues file {}: {}", path.display(), e),
            }
            .into()
        })
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<HashMap<String, ComponentIssues>>(content).map(Self::new)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn normalize(id: &str) -> String {
        if id.starts_with(NPM_PREFIX) {
            id.to_string()
        } else {
            format!("{}{}", NPM_PREFIX, id)
        }
    }
}

#[async_trait]
impl IssueRepository for JsonIssueRepository {
    async fn fetch_issues(
        &self,
        component_ids: &BTreeSet<String>,
    ) -> Result<HashMap<String, ComponentIssues>> {
        Ok(component_ids
            .iter()
            .filter_map(|id| self.entries.get(id).map(|issues| (id.clone(), issues.clone())))
            .collect())
    }
}
