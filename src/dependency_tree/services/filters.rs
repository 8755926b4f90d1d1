use crate::dependency_tree::domain::{DependencyNode, Issue, Scope, Severity, UNKNOWN_LICENSE};
use crate::shared::Result;
use std::collections::BTreeSet;
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};

/// Maximum number of exclude patterns to prevent DoS attacks
const MAX_EXCLUDE_PATTERNS: usize = 64;

/// Maximum length of a single exclude pattern to prevent DoS attacks
const MAX_PATTERN_LENGTH: usize = 255;

/// A predicate over tree nodes.
///
/// The filter engine keeps a node when every active filter accepts it.
/// Filters that classify individual issues also prune the issue set of the
/// nodes they keep.
pub trait TreeFilter: Send + Sync + Debug {
    fn accepts_node(&self, node: &DependencyNode) -> bool;

    fn accepts_issue(&self, _issue: &Issue) -> bool {
        true
    }
}

/// Keeps nodes carrying at least one issue of a selected severity.
///
/// Issue-free nodes count as `Normal`.
#[derive(Debug, Clone)]
pub struct SeverityFilter {
    selected: BTreeSet<Severity>,
}

impl SeverityFilter {
    pub fn new(selected: impl IntoIterator<Item = Severity>) -> Self {
        Self {
            selected: selected.into_iter().collect(),
        }
    }
}

impl TreeFilter for SeverityFilter {
    fn accepts_node(&self, node: &DependencyNode) -> bool {
        if node.issues().is_empty() {
            return self.selected.contains(&Severity::Normal);
        }
        node.issues().iter().any(|issue| self.accepts_issue(issue))
    }

    fn accepts_issue(&self, issue: &Issue) -> bool {
        self.selected.contains(&issue.severity())
    }
}

/// Keeps nodes with at least one selected license.
///
/// Nodes without a known license are matched against [`UNKNOWN_LICENSE`].
#[derive(Debug, Clone)]
pub struct LicenseFilter {
    selected: BTreeSet<String>,
}

impl LicenseFilter {
    pub fn new<S: Into<String>>(selected: impl IntoIterator<Item = S>) -> Self {
        Self {
            selected: selected.into_iter().map(Into::into).collect(),
        }
    }
}

impl TreeFilter for LicenseFilter {
    fn accepts_node(&self, node: &DependencyNode) -> bool {
        if node.licenses().is_empty() {
            return self.selected.contains(UNKNOWN_LICENSE);
        }
        node.licenses()
            .iter()
            .any(|license| self.selected.contains(license.name()))
    }
}

/// Keeps nodes declared in a selected scope. Nodes without scope
/// information (module roots) always pass.
#[derive(Debug, Clone)]
pub struct ScopeFilter {
    selected: BTreeSet<Scope>,
}

impl ScopeFilter {
    pub fn new(selected: impl IntoIterator<Item = Scope>) -> Self {
        Self {
            selected: selected.into_iter().collect(),
        }
    }
}

impl TreeFilter for ScopeFilter {
    fn accepts_node(&self, node: &DependencyNode) -> bool {
        node.scopes().is_empty() || node.scopes().iter().any(|s| self.selected.contains(s))
    }
}

/// ComponentNameFilter - Hides components whose package name matches an
/// exclusion pattern
///
/// Supports wildcard patterns using '*' to match zero or more characters.
/// Patterns are case-sensitive and validated against a character whitelist.
#[derive(Debug)]
pub struct ComponentNameFilter {
    patterns: Vec<ExcludePattern>,
}

impl ComponentNameFilter {
    /// Creates a new ComponentNameFilter from raw pattern strings
    ///
    /// # Errors
    /// - Too many patterns (> MAX_EXCLUDE_PATTERNS)
    /// - Invalid pattern format (length, characters)
    pub fn new(patterns: Vec<String>) -> Result<Self> {
        if patterns.len() > MAX_EXCLUDE_PATTERNS {
            anyhow::bail!(
                "Too many exclusion patterns: {} (maximum: {})",
                patterns.len(),
                MAX_EXCLUDE_PATTERNS
            );
        }

        let patterns = patterns
            .into_iter()
            .map(ExcludePattern::new)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    fn matches(&self, package_name: &str) -> bool {
        // Every pattern is evaluated so unmatched-pattern tracking stays accurate.
        self.patterns
            .iter()
            .fold(false, |found, p| p.matches(package_name) || found)
    }

    /// Patterns that have not matched any component so far
    pub fn get_unmatched_patterns(&self) -> Vec<String> {
        self.patterns
            .iter()
            .filter(|p| !p.matched.load(Ordering::Relaxed))
            .map(|p| p.original.clone())
            .collect()
    }
}

impl TreeFilter for ComponentNameFilter {
    fn accepts_node(&self, node: &DependencyNode) -> bool {
        node.is_module_root() || !self.matches(node.name())
    }
}

/// Represents a single exclusion pattern with its compiled matcher
#[derive(Debug)]
struct ExcludePattern {
    original: String,
    matcher: PatternMatcher,
    matched: AtomicBool,
}

impl ExcludePattern {
    fn new(pattern: String) -> Result<Self> {
        validate_pattern(&pattern)?;

        let matcher = compile_pattern(&pattern);

        Ok(Self {
            original: pattern,
            matcher,
            matched: AtomicBool::new(false),
        })
    }

    fn matches(&self, package_name: &str) -> bool {
        let is_match = self.matcher.matches(package_name);
        if is_match {
            self.matched.store(true, Ordering::Relaxed);
        }
        is_match
    }
}

/// Pattern matcher types for efficient matching
#[derive(Debug)]
enum PatternMatcher {
    /// Exact match: "package-name"
    Exact(String),
    /// Leading wildcard: "*-suffix"
    EndsWith(String),
    /// Trailing wildcard: "@scope/*"
    StartsWith(String),
    /// Contains wildcard: "*middle*"
    Contains(String),
    /// Wildcards between fixed parts: "pre*fix*suf"
    Parts {
        parts: Vec<String>,
        anchored_start: bool,
        anchored_end: bool,
    },
}

impl PatternMatcher {
    fn matches(&self, package_name: &str) -> bool {
        match self {
            PatternMatcher::Exact(s) => package_name == s,
            PatternMatcher::EndsWith(suffix) => package_name.ends_with(suffix.as_str()),
            PatternMatcher::StartsWith(prefix) => package_name.starts_with(prefix.as_str()),
            PatternMatcher::Contains(middle) => package_name.contains(middle.as_str()),
            PatternMatcher::Parts {
                parts,
                anchored_start,
                anchored_end,
            } => {
                let mut rest = package_name;
                for (index, part) in parts.iter().enumerate() {
                    if index == 0 && *anchored_start {
                        match rest.strip_prefix(part.as_str()) {
                            Some(stripped) => rest = stripped,
                            None => return false,
                        }
                        continue;
                    }
                    match rest.find(part.as_str()) {
                        Some(pos) => rest = &rest[pos + part.len()..],
                        None => return false,
                    }
                }
                match (parts.last(), *anchored_end) {
                    (Some(last), true) => rest.is_empty() || package_name.ends_with(last.as_str()),
                    _ => true,
                }
            }
        }
    }
}

/// Validates a pattern string
fn validate_pattern(pattern: &str) -> Result<()> {
    if pattern.is_empty() {
        anyhow::bail!("Exclusion pattern cannot be empty");
    }

    if pattern.len() > MAX_PATTERN_LENGTH {
        anyhow::bail!(
            "Exclusion pattern is too long: '{}' ({} chars). Maximum: {} chars",
            pattern,
            pattern.len(),
            MAX_PATTERN_LENGTH
        );
    }

    for ch in pattern.chars() {
        if !is_valid_pattern_char(ch) {
            anyhow::bail!(
                "Exclusion pattern contains invalid character '{}' in pattern '{}'. \
                 Only alphanumeric, hyphens, underscores, dots, '@', '/', and asterisks (*) are allowed.",
                ch,
                pattern
            );
        }
    }

    if pattern.chars().all(|c| c == '*') {
        anyhow::bail!(
            "Exclusion pattern cannot contain only wildcards: '{}'",
            pattern
        );
    }

    Ok(())
}

/// npm package names may carry a scope (`@scope/name`).
fn is_valid_pattern_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '@' | '/' | '*')
}

fn compile_pattern(pattern: &str) -> PatternMatcher {
    let wildcard_count = pattern.matches('*').count();
    let starts = pattern.starts_with('*');
    let ends = pattern.ends_with('*');

    match wildcard_count {
        0 => PatternMatcher::Exact(pattern.to_string()),
        1 if starts => PatternMatcher::EndsWith(pattern[1..].to_string()),
        1 if ends => PatternMatcher::StartsWith(pattern[..pattern.len() - 1].to_string()),
        2 if starts && ends => PatternMatcher::Contains(pattern[1..pattern.len() - 1].to_string()),
        _ => PatternMatcher::Parts {
            parts: pattern
                .split('*')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            anchored_start: !starts,
            anchored_end: !ends,
        },
    }
}
