use crate::dependency_tree::domain::{DependencyNode, ScanMetadata, Scope, Severity};
use crate::dependency_tree::services::{CompositeTree, NodeActions};
use crate::ports::outbound::TreeFormatter;
use crate::shared::Result;
use owo_colors::OwoColorize;

/// TextTreeFormatter adapter rendering the composite tree as an indented
/// tree, one component per line
///
/// ```text
/// app:1.0.0 [2 issues, top: High]
/// ├── express:4.18.2 [1 issue, top: High]
/// │   └── qs:6.11.0 (CVE-2022-24999 High)
/// └── jest:29.7.0 {development}
/// ```
pub struct TextTreeFormatter {
    colored: bool,
}

impl TextTreeFormatter {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    fn render_node(&self, output: &mut String, node: &DependencyNode, prefix: &str, connector: &str) {
        output.push_str(prefix);
        output.push_str(connector);
        output.push_str(&self.node_line(node));
        output.push('\n');

        let child_prefix = match connector {
            "├── " => format!("{}│   ", prefix),
            "└── " => format!("{}    ", prefix),
            _ => prefix.to_string(),
        };
        let count = node.child_count();
        for (index, child) in node.children().iter().enumerate() {
            let connector = if index + 1 == count { "└── " } else { "├── " };
            self.render_node(output, child, &child_prefix, connector);
        }
    }

    fn node_line(&self, node: &DependencyNode) -> String {
        let mut line = if node.is_module_root() {
            self.emphasize(node.label())
        } else {
            node.label().to_string()
        };

        let scopes: Vec<&str> = node
            .scopes()
            .iter()
            .filter(|scope| **scope != Scope::Production)
            .map(Scope::as_str)
            .collect();
        if !scopes.is_empty() {
            line.push_str(&format!(" {{{}}}", scopes.join(", ")));
        }

        let summary = node.summary();
        if summary.has_issues() {
            let noun = if summary.issue_count() == 1 { "issue" } else { "issues" };
            line.push_str(&format!(
                " [{} {}, top: {}]",
                summary.issue_count(),
                noun,
                self.paint(summary.top_severity(), summary.top_severity().as_str())
            ));
        }

        if !node.issues().is_empty() {
            let own: Vec<String> = node
                .issues()
                .iter()
                .map(|issue| {
                    let text = format!("{} {}", issue.id(), issue.severity());
                    self.paint(issue.severity(), &text)
                })
                .collect();
            line.push_str(&format!(" ({})", own.join(", ")));
        }
        line
    }

    fn emphasize(&self, text: &str) -> String {
        if self.colored {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint(&self, severity: Severity, text: &str) -> String {
        if !self.colored {
            return text.to_string();
        }
        match severity {
            Severity::Critical => text.red().bold().to_string(),
            Severity::High => text.red().to_string(),
            Severity::Medium => text.yellow().to_string(),
            Severity::Low => text.blue().to_string(),
            _ => text.to_string(),
        }
    }
}

impl TreeFormatter for TextTreeFormatter {
    fn format(&self, tree: &CompositeTree, metadata: &ScanMetadata) -> Result<String> {
        let mut output = format!(
            "# {} {} ({})\n",
            metadata.tool_name(),
            metadata.tool_version(),
            metadata.timestamp()
        );

        let projects = tree.projects();
        if projects.is_empty() {
            output.push_str("No projects scanned.\n");
            return Ok(output);
        }

        for project in projects {
            output.push('\n');
            self.render_node(&mut output, project, "", "");
        }
        Ok(output)
    }

    fn format_actions(&self, actions: &NodeActions) -> Result<String> {
        let Some(selected) = actions.selected.as_deref() else {
            return Ok("Component not found in the scanned projects.\n".to_string());
        };

        let mut output = format!("{}\n", self.emphasize(selected));
        match actions.affected.as_deref() {
            None => {
                output.push_str("  No declaration found in any package.json.\n");
                return Ok(output);
            }
            Some(affected) if affected != selected => {
                output.push_str(&format!("  Pulled in by: {}\n", affected));
            }
            Some(_) => {}
        }

        output.push_str("  Declared at:\n");
        for action in &actions.navigation {
            output.push_str(&format!("    {}\n", action.label));
        }

        if actions.exclusions.is_empty() {
            output.push_str("  No removable declaration.\n");
        } else {
            output.push_str("  Removable declarations:\n");
            for action in &actions.exclusions {
                output.push_str(&format!(
                    "    remove '{}' at {}\n",
                    action.excludable.target().element(),
                    action.label
                ));
            }
        }
        Ok(output)
    }
}
