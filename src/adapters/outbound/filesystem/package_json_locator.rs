use crate::dependency_tree::domain::NavigationTarget;
use crate::ports::outbound::ManifestLocator;
use crate::shared::fs_guard::read_regular_file;
use crate::shared::Result;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

pub const MANIFEST_FILE_NAME: &str = "package.json";

/// Opening line of a dependency section, e.g. `"devDependencies": {`.
static SECTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*"(dependencies|devDependencies|optionalDependencies|peerDependencies)"\s*:\s*\{"#)
        .expect("Invalid section regex")
});

/// One `"name": "range"` declaration.
static ENTRY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*"([^"]+)"\s*:"#).expect("Invalid entry regex"));

/// JSON string literals, removed before counting braces.
static STRING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(?:[^"\\]|\\.)*""#).expect("Invalid string regex"));

/// PackageJsonLocator adapter that finds dependency declarations in a
/// module's package.json
///
/// Works line by line on the raw text so that each declaration keeps the
/// line number it has in the file. Only the four dependency sections are
/// considered; `"name"` or `"scripts"` entries are never reported.
pub struct PackageJsonLocator;

impl PackageJsonLocator {
    pub fn new() -> Self {
        Self
    }

    /// Declarations found in package.json `content`, in file order
    pub fn declarations(manifest: &Path, content: &str) -> Vec<NavigationTarget> {
        let mut targets = Vec::new();
        let mut depth: i64 = 0;

        for (line_number, line) in content.lines().enumerate() {
            if depth == 0 {
                if SECTION_PATTERN.is_match(line) {
                    let (open, close) = brace_balance(line);
                    depth = open - close;
                }
                continue;
            }

            if depth == 1 {
                if let Some(name) = declared_name(line) {
                    targets.push(NavigationTarget::new(manifest, line_number, name));
                }
            }

            let (open, close) = brace_balance(line);
            depth = (depth + open - close).max(0);
        }

        targets
    }
}

impl Default for PackageJsonLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestLocator for PackageJsonLocator {
    fn locate(&self, module_dir: &Path) -> Result<Vec<NavigationTarget>> {
        let manifest = module_dir.join(MANIFEST_FILE_NAME);
        let content = read_regular_file(&manifest, MANIFEST_FILE_NAME)?;
        Ok(Self::declarations(&manifest, &content))
    }
}

/// Package name declared on `line`, if the line is a `"name": ...` entry.
pub(super) fn declared_name(line: &str) -> Option<&str> {
    ENTRY_PATTERN
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

pub(super) fn brace_balance(line: &str) -> (i64, i64) {
    let stripped = STRING_PATTERN.replace_all(line, "");
    let open = stripped.matches('{').count() as i64;
    let close = stripped.matches('}').count() as i64;
    (open, close)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"{
  "name": "app",
  "version": "1.0.0",
  "scripts": {
    "test": "jest"
  },
  "dependencies": {
    "express": "^4.18.2",
    "@babel/core": "7.23.0"
  },
  "devDependencies": {
    "jest": "^29.7.0"
  },
  "peerDependencies": {},
  "optionalDependencies": { "fsevents": "2.3.3" }
}
"#;

    fn elements(targets: &[NavigationTarget]) -> Vec<(&str, usize)> {
        targets.iter().map(|t| (t.element(), t.line())).collect()
    }

    #[test]
    fn test_declarations_with_zero_based_lines() {
        let targets = PackageJsonLocator::declarations(Path::new("/work/app/package.json"), MANIFEST);
        assert_eq!(
            elements(&targets),
            vec![("express", 7), ("@babel/core", 8), ("jest", 11)]
        );
        assert_eq!(targets[0].descriptor(), Path::new("/work/app/package.json"));
    }

    #[test]
    fn test_scripts_and_metadata_are_ignored() {
        let targets = PackageJsonLocator::declarations(Path::new("package.json"), MANIFEST);
        assert!(targets.iter().all(|t| t.element() != "test" && t.element() != "name"));
    }

    #[test]
    fn test_nested_objects_inside_section_do_not_end_it() {
        let content = r#"{
  "dependencies": {
    "a": "1.0.0",
    "weird": { "version": "1.0.0" },
    "b": "2.0.0"
  }
}"#;
        let targets = PackageJsonLocator::declarations(Path::new("package.json"), content);
        assert_eq!(elements(&targets), vec![("a", 2), ("weird", 3), ("b", 4)]);
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let content = "{\n  \"dependencies\": {\n    \"tpl\": \"github:user/repo#{branch}\",\n    \"b\": \"1.0.0\"\n  }\n}";
        let targets = PackageJsonLocator::declarations(Path::new("package.json"), content);
        assert_eq!(elements(&targets), vec![("tpl", 2), ("b", 3)]);
    }

    #[test]
    fn test_locate_reads_manifest() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(MANIFEST_FILE_NAME), MANIFEST).unwrap();

        let targets = PackageJsonLocator::new().locate(temp_dir.path()).unwrap();
        assert_eq!(targets.len(), 3);
        assert_eq!(targets[0].descriptor(), temp_dir.path().join("package.json"));
    }

    #[test]
    fn test_locate_missing_manifest_fails() {
        let temp_dir = TempDir::new().unwrap();
        assert!(PackageJsonLocator::new().locate(temp_dir.path()).is_err());
    }
}
