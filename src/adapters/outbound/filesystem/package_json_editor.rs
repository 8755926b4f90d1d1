use super::package_json_locator::{brace_balance, declared_name};
use crate::dependency_tree::domain::NavigationTarget;
use crate::ports::outbound::DescriptorEditor;
use crate::shared::error::TreeScanError;
use crate::shared::fs_guard::{read_regular_file, rewrite_regular_file};
use crate::shared::Result;

/// PackageJsonEditor adapter that removes a dependency declaration from a
/// package.json
///
/// The declaration line is deleted and, when it was the last entry of its
/// section, the trailing comma of the previous entry is dropped so the file
/// stays valid JSON. The rest of the file, line terminators included, is left
/// byte for byte unchanged. Declarations whose value continues on the next
/// lines are refused.
pub struct PackageJsonEditor;

impl PackageJsonEditor {
    pub fn new() -> Self {
        Self
    }

    /// Returns `content` without the declaration at `target`
    ///
    /// # Errors
    /// Returns an error when the line no longer declares `target.element()`
    /// or when the declared value does not close on the same line.
    pub fn remove_from(content: &str, target: &NavigationTarget) -> Result<String> {
        let mut lines: Vec<&str> = content.split_inclusive('\n').collect();
        let line = target.line();

        let declared = lines.get(line).and_then(|l| declared_name(l));
        if declared != Some(target.element()) {
            return Err(TreeScanError::Validation {
                message: format!(
                    "{} line {} does not declare '{}'; the manifest changed since it was scanned",
                    target.descriptor().display(),
                    line + 1,
                    target.element()
                ),
            }
            .into());
        }

        let (open, close) = brace_balance(lines[line]);
        if open != close {
            return Err(TreeScanError::Validation {
                message: format!(
                    "The declaration of '{}' at {} line {} spans several lines; remove it by hand",
                    target.element(),
                    target.descriptor().display(),
                    line + 1
                ),
            }
            .into());
        }

        let removed = lines.remove(line);
        let mut output: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        if !removed.trim_end().ends_with(',') {
            if let Some(previous) = lines[..line].iter().rposition(|l| !l.trim().is_empty()) {
                let (body, terminator) = split_terminator(lines[previous]);
                if let Some(without_comma) = body.trim_end().strip_suffix(',') {
                    output[previous] = format!("{}{}", without_comma, terminator);
                }
            }
        }

        Ok(output.concat())
    }
}

/// Splits `line` into its text and its `\n` or `\r\n` terminator.
fn split_terminator(line: &str) -> (&str, &str) {
    let body = line.trim_end_matches(['\r', '\n']);
    (body, &line[body.len()..])
}

impl Default for PackageJsonEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptorEditor for PackageJsonEditor {
    fn remove_declaration(&self, target: &NavigationTarget) -> Result<()> {
        let path = target.descriptor();
        let content = read_regular_file(path, "package.json")?;
        let updated = Self::remove_from(&content, target)?;
        rewrite_regular_file(path, "package.json", &updated)?;

        tracing::info!(
            manifest = %path.display(),
            line = target.line() + 1,
            package = target.element(),
            "dependency declaration removed"
        );
        Ok(())
    }
}
