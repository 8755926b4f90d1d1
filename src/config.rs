//! Configuration file support for npm-tree-scan.
//!
//! Provides YAML-based configuration through `npm-tree-scan.config.yml`
//! files, including data structures, file loading, and validation.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::application::dto::OutputFormat;
use crate::dependency_tree::domain::{Scope, Severity};
use crate::dependency_tree::services::FilterSettings;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "npm-tree-scan.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub format: Option<String>,
    pub severities: Option<Vec<String>>,
    pub licenses: Option<Vec<String>>,
    pub scopes: Option<Vec<String>>,
    pub exclude_components: Option<Vec<String>>,
    /// Relative paths are resolved against the directory holding the config.
    pub issues_file: Option<PathBuf>,
    pub fail_on_issues: Option<bool>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

impl ConfigFile {
    pub fn output_format(&self) -> Result<Option<OutputFormat>> {
        self.format
            .as_deref()
            .map(|format| OutputFormat::from_str(format).map_err(|e| invalid("format", e)))
            .transpose()
    }

    /// Filter selection configured in the file; absent lists stay empty.
    pub fn filter_settings(&self) -> Result<FilterSettings> {
        let severities = parse_all::<Severity>("severities", self.severities.as_deref())?;
        let scopes = parse_all::<Scope>("scopes", self.scopes.as_deref())?;
        Ok(FilterSettings {
            severities: severities.into_iter().collect(),
            licenses: self.licenses.iter().flatten().cloned().collect(),
            scopes: scopes.into_iter().collect(),
            exclude_components: self.exclude_components.clone().unwrap_or_default(),
        })
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let mut config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    if let (Some(issues_file), Some(dir)) = (config.issues_file.as_ref(), path.parent()) {
        if issues_file.is_relative() {
            config.issues_file = Some(dir.join(issues_file));
        }
    }

    tracing::debug!(path = %path.display(), "config file loaded");
    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    config.output_format()?;
    config.filter_settings()?;

    if let Some(ref patterns) = config.exclude_components {
        for (i, pattern) in patterns.iter().enumerate() {
            if pattern.trim().is_empty() {
                bail!(
                    "Invalid config: exclude_components[{}] must not be empty.\n\n\
                     💡 Hint: Each entry is a package name pattern (e.g., \"@types/*\").",
                    i
                );
            }
        }
    }
    Ok(())
}

fn parse_all<T: FromStr<Err = String>>(field: &str, values: Option<&[String]>) -> Result<Vec<T>> {
    values
        .unwrap_or_default()
        .iter()
        .map(|value| T::from_str(value).map_err(|e| invalid(field, e)))
        .collect()
}

fn invalid(field: &str, reason: String) -> anyhow::Error {
    anyhow::anyhow!(
        "Invalid config: {}: {}\n\n💡 Hint: Fix the value in {} or remove the field.",
        field,
        reason,
        CONFIG_FILENAME
    )
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}
