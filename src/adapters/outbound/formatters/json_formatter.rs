use crate::dependency_tree::domain::ScanMetadata;
use crate::dependency_tree::services::{CompositeTree, NodeActions};
use crate::ports::outbound::TreeFormatter;
use crate::shared::Result;
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    metadata: &'a ScanMetadata,
    tree: &'a CompositeTree,
}

/// JsonTreeFormatter adapter serializing the composite tree and scan metadata
pub struct JsonTreeFormatter;

impl JsonTreeFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonTreeFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeFormatter for JsonTreeFormatter {
    fn format(&self, tree: &CompositeTree, metadata: &ScanMetadata) -> Result<String> {
        let mut json = serde_json::to_string_pretty(&JsonReport { metadata, tree })
            .map_err(|e| anyhow::anyhow!("Failed to serialize tree to JSON: {}", e))?;
        json.push('\n');
        Ok(json)
    }

    fn format_actions(&self, actions: &NodeActions) -> Result<String> {
        let mut json = serde_json::to_string_pretty(actions)
            .map_err(|e| anyhow::anyhow!("Failed to serialize actions to JSON: {}", e))?;
        json.push('\n');
        Ok(json)
    }
}
