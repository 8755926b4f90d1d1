//! Typed access to the JSON printed by `npm ls --json --all --long`.
//!
//! The document is kept as a `serde_json::Value` so that unexpected shapes
//! degrade to "field absent" instead of failing the whole parse. Key order
//! of `dependencies` objects is the declaration order (serde_json is built
//! with `preserve_order`).

use super::issue::{License, Scope};
use serde_json::{Map, Value};

/// Top-level listing of one application directory.
#[derive(Debug, Clone, PartialEq)]
pub struct NpmListing(Value);

impl NpmListing {
    pub fn new(document: Value) -> Self {
        Self(document)
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content).map(Self)
    }

    pub fn name(&self) -> Option<&str> {
        non_blank_str(self.0.get("name"))
    }

    pub fn version(&self) -> Option<&str> {
        non_blank_str(self.0.get("version"))
    }

    /// Problems reported by npm (missing or invalid packages), rendered as text.
    pub fn problems(&self) -> Option<String> {
        match self.0.get("problems")? {
            Value::Null => None,
            Value::Array(items) => Some(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn dependencies(&self) -> Option<&Map<String, Value>> {
        self.0.get("dependencies").and_then(Value::as_object)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// One entry of a `dependencies` object.
#[derive(Debug, Clone, Copy)]
pub struct ListingEntry<'a>(&'a Value);

impl<'a> ListingEntry<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self(value)
    }

    /// Resolved version; `None` when npm could not resolve the package.
    pub fn version(&self) -> Option<&'a str> {
        non_blank_str(self.0.get("version"))
    }

    pub fn dependencies(&self) -> Option<&'a Map<String, Value>> {
        self.0.get("dependencies").and_then(Value::as_object)
    }

    /// Scope derived from the `dev`, `optional` and `peer` flags of `--long` output.
    pub fn scope(&self) -> Scope {
        let flag = |name: &str| self.0.get(name).and_then(Value::as_bool).unwrap_or(false);
        if flag("dev") {
            Scope::Development
        } else if flag("peer") {
            Scope::Peer
        } else if flag("optional") {
            Scope::Optional
        } else {
            Scope::Production
        }
    }

    /// License declared in the package's own package.json, when listed.
    pub fn license(&self) -> Option<License> {
        non_blank_str(self.0.get("license")).map(License::new)
    }
}

fn non_blank_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_listing_accessors() {
        let listing = NpmListing::new(json!({
            "name": "app",
            "version": "1.0.0",
            "dependencies": { "lodash": { "version": "4.17.21" } }
        }));
        assert_eq!(listing.name(), Some("app"));
        assert_eq!(listing.version(), Some("1.0.0"));
        assert!(listing.problems().is_none());
        assert_eq!(listing.dependencies().unwrap().len(), 1);
    }

    #[test]
    fn test_problems_rendered_as_lines() {
        let listing = NpmListing::new(json!({
            "name": "app",
            "version": "1.0.0",
            "problems": ["missing: react@^18, required by app", "invalid: lodash@3"]
        }));
        assert_eq!(
            listing.problems().unwrap(),
            "missing: react@^18, required by app\ninvalid: lodash@3"
        );
    }

    #[test]
    fn test_dependency_order_is_preserved() {
        let listing =
            NpmListing::from_json(r#"{"name":"app","version":"1.0.0","dependencies":{"zod":{"version":"3.0.0"},"axios":{"version":"1.6.0"},"mime":{"version":"3.0.0"}}}"#)
                .unwrap();
        let keys: Vec<&String> = listing.dependencies().unwrap().keys().collect();
        assert_eq!(keys, vec!["zod", "axios", "mime"]);
    }

    #[test]
    fn test_entry_version_blank_or_non_string_is_absent() {
        let blank = json!({ "version": "  " });
        let number = json!({ "version": 3 });
        let missing = json!({ "dependencies": {} });
        assert!(ListingEntry::new(&blank).version().is_none());
        assert!(ListingEntry::new(&number).version().is_none());
        assert!(ListingEntry::new(&missing).version().is_none());
    }

    #[test]
    fn test_entry_scope_flags() {
        assert_eq!(ListingEntry::new(&json!({})).scope(), Scope::Production);
        assert_eq!(ListingEntry::new(&json!({"dev": true})).scope(), Scope::Development);
        assert_eq!(ListingEntry::new(&json!({"optional": true})).scope(), Scope::Optional);
        assert_eq!(ListingEntry::new(&json!({"peer": true})).scope(), Scope::Peer);
        assert_eq!(ListingEntry::new(&json!({"dev": false})).scope(), Scope::Production);
    }

    #[test]
    fn test_entry_license() {
        let entry = json!({ "version": "1.0.0", "license": "MIT" });
        assert_eq!(ListingEntry::new(&entry).license(), Some(License::new("MIT")));
        assert!(ListingEntry::new(&json!({})).license().is_none());
    }
}
