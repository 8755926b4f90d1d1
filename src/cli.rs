use clap::Parser;
use npm_tree_scan::application::dto::OutputFormat;
use npm_tree_scan::dependency_tree::domain::{Scope, Severity};
use std::path::PathBuf;

/// Build, filter and merge vulnerability-annotated dependency trees of npm projects
#[derive(Parser, Debug)]
#[command(name = "npm-tree-scan")]
#[command(version)]
#[command(
    about = "Build, filter and merge vulnerability-annotated dependency trees of npm projects",
    long_about = None
)]
pub struct Args {
    /// Project directories to scan (defaults to the current directory)
    /// Can be specified multiple times: -p web -p api
    #[arg(short, long = "path", value_name = "DIR")]
    pub paths: Vec<PathBuf>,

    /// Output format: text or json [default: text]
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON file with known issues per component, keyed by npm://name:version
    #[arg(short, long, value_name = "FILE")]
    pub issues: Option<PathBuf>,

    /// Only show components with these severities (normal selects clean components)
    #[arg(long = "severity", value_name = "LEVEL", value_delimiter = ',')]
    pub severities: Vec<Severity>,

    /// Only show components with these licenses (Unknown selects unlicensed components)
    #[arg(long = "license", value_name = "NAME", value_delimiter = ',')]
    pub licenses: Vec<String>,

    /// Only show components with these scopes: production, development, optional, peer
    #[arg(long = "scope", value_name = "SCOPE", value_delimiter = ',')]
    pub scopes: Vec<Scope>,

    /// Hide components matching patterns, with their dependencies (supports wildcards: *)
    /// Can be specified multiple times: -e "eslint" -e "@types/*"
    #[arg(short, long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Show where a component (name or name:version) is declared instead of the tree
    #[arg(long, value_name = "COMPONENT")]
    pub locate: Option<String>,

    /// Remove the package.json declaration that pulls in the located component
    #[arg(long, requires = "locate")]
    pub remove_declaration: bool,

    /// Run `npm ls` instead of reading npm-ls.json captured next to each package.json
    #[arg(long)]
    pub use_npm: bool,

    /// Exit with code 1 if the filtered tree still contains issues
    #[arg(long)]
    pub fail_on_issues: bool,

    /// Path to a config file (defaults to npm-tree-scan.config.yml in the first project)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Diagnostic log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Project directories, defaulting to the current directory.
    pub fn project_paths(&self) -> Vec<PathBuf> {
        if self.paths.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            self.paths.clone()
        }
    }
}
