mod cli;

use anyhow::Context;
use cli::Args;
use npm_tree_scan::adapters::outbound::console::StderrProgressReporter;
use npm_tree_scan::adapters::outbound::filesystem::{
    find_application_dirs, ListingFileReader, PackageJsonEditor, PackageJsonLocator,
};
use npm_tree_scan::adapters::outbound::issues::{CachingIssueRepository, JsonIssueRepository};
use npm_tree_scan::adapters::outbound::npm::{is_npm_installed, NpmCliLister};
use npm_tree_scan::application::dto::{OutputFormat, ScanRequest, ScanResponse};
use npm_tree_scan::application::factories::{FormatterFactory, PresenterFactory, PresenterType};
use npm_tree_scan::application::results_tree::ResultsTree;
use npm_tree_scan::application::use_cases::ScanProjectsUseCase;
use npm_tree_scan::config::{discover_config, load_config_from_path, ConfigFile};
use npm_tree_scan::dependency_tree::domain::{ProjectKey, ProjectSpec};
use npm_tree_scan::dependency_tree::services::{FilterManager, FilterSettings, NodeActions};
use npm_tree_scan::ports::outbound::{IssueRepository, PackageLister, TreeFormatter};
use npm_tree_scan::shared::error::{ExitCode, TreeScanError};
use npm_tree_scan::shared::Result;
use std::collections::HashSet;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Args::parse_args();
    init_tracing(&args.log_level);

    match run(args).await {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

/// Diagnostics go to stderr so they never mix with the rendered tree.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run(args: Args) -> Result<ExitCode> {
    // Validate project directories
    let project_dirs = args
        .project_paths()
        .iter()
        .map(|path| validate_project_path(path))
        .collect::<Result<Vec<_>>>()?;

    // Merge config file and command line
    let config = load_config(&args, project_dirs.first())?;
    let options = ScanOptions::resolve(&args, config.as_ref())?;

    // Create adapters (Dependency Injection)
    let projects = build_project_specs(&project_dirs)?;
    let lister = create_lister(args.use_npm)?;
    let issue_repository = create_issue_repository(options.issues_file.as_deref())?;
    let results = Arc::new(ResultsTree::new(FilterManager::default()));

    // Create use case with injected dependencies
    let use_case = ScanProjectsUseCase::new(
        lister,
        issue_repository,
        PackageJsonLocator::new(),
        StderrProgressReporter::new(),
        Arc::clone(&results),
    );

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, cancelling scans");
            interrupt.cancel();
        }
    });

    // Execute use case
    let request = ScanRequest::new(projects, options.filters.clone());
    let response = use_case.execute(request, cancel).await?;

    // Format and present output
    let colored = !args.no_color && args.output.is_none() && std::io::stdout().is_terminal();
    let formatter = FormatterFactory::create(options.format, colored);
    let output = match args.locate.as_deref() {
        Some(query) => {
            locate(&results, formatter.as_ref(), query, args.remove_declaration).await?
        }
        None => {
            eprintln!("{}", FormatterFactory::progress_message(options.format));
            formatter.format(&response.composite, &response.metadata)?
        }
    };
    PresenterFactory::create(PresenterType::from_output(args.output.clone())).present(&output)?;

    Ok(exit_code(&response, options.fail_on_issues))
}

/// Effective options after merging the config file into the command line.
#[derive(Debug, Clone, PartialEq)]
struct ScanOptions {
    format: OutputFormat,
    filters: FilterSettings,
    issues_file: Option<PathBuf>,
    fail_on_issues: bool,
}

impl ScanOptions {
    /// Command line values win; a filter list given on the command line
    /// replaces the configured one. Exclude patterns from both are combined.
    fn resolve(args: &Args, config: Option<&ConfigFile>) -> Result<Self> {
        let (config_format, configured) = match config {
            Some(config) => (config.output_format()?, config.filter_settings()?),
            None => (None, FilterSettings::default()),
        };

        let mut exclude_components = configured.exclude_components;
        for pattern in &args.exclude {
            if !exclude_components.contains(pattern) {
                exclude_components.push(pattern.clone());
            }
        }

        let filters = FilterSettings {
            severities: if args.severities.is_empty() {
                configured.severities
            } else {
                args.severities.iter().copied().collect()
            },
            licenses: if args.licenses.is_empty() {
                configured.licenses
            } else {
                args.licenses.iter().cloned().collect()
            },
            scopes: if args.scopes.is_empty() {
                configured.scopes
            } else {
                args.scopes.iter().copied().collect()
            },
            exclude_components,
        };

        Ok(Self {
            format: args.format.or(config_format).unwrap_or_default(),
            filters,
            issues_file: args
                .issues
                .clone()
                .or_else(|| config.and_then(|c| c.issues_file.clone())),
            fail_on_issues: args.fail_on_issues
                || config.and_then(|c| c.fail_on_issues).unwrap_or(false),
        })
    }
}

fn load_config(args: &Args, first_project: Option<&PathBuf>) -> Result<Option<ConfigFile>> {
    if let Some(path) = &args.config {
        return load_config_from_path(path).map(Some);
    }
    match first_project {
        Some(dir) => discover_config(dir),
        None => Ok(None),
    }
}

/// Each project directory becomes one project, keyed by its directory name.
fn build_project_specs(project_dirs: &[PathBuf]) -> Result<Vec<ProjectSpec>> {
    let mut names = HashSet::new();
    project_dirs
        .iter()
        .map(|dir| -> Result<ProjectSpec> {
            let name = dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| dir.display().to_string());
            if !names.insert(name.clone()) {
                return Err(TreeScanError::Validation {
                    message: format!(
                        "Two project directories are named '{}'. Project names must be unique.",
                        name
                    ),
                }
                .into());
            }

            let app_dirs = find_application_dirs(dir)?;
            if app_dirs.is_empty() {
                return Err(TreeScanError::InvalidProjectPath {
                    path: dir.clone(),
                    reason: "No package.json found in the directory or below it".to_string(),
                }
                .into());
            }
            tracing::debug!(project = %name, apps = app_dirs.len(), "application directories found");
            Ok(ProjectSpec::new(ProjectKey::new(name), dir.clone(), app_dirs))
        })
        .collect()
}

fn create_lister(use_npm: bool) -> Result<Box<dyn PackageLister>> {
    if !use_npm {
        return Ok(Box::new(ListingFileReader::new()));
    }
    if !is_npm_installed() {
        anyhow::bail!(
            "npm was not found on PATH.\n\n💡 Hint: Install Node.js, or capture the listing with \
             `npm ls --json --all --long > npm-ls.json` and run without --use-npm"
        );
    }
    Ok(Box::new(NpmCliLister::new()))
}

fn create_issue_repository(issues_file: Option<&Path>) -> Result<Box<dyn IssueRepository>> {
    match issues_file {
        Some(path) => {
            let repository = JsonIssueRepository::from_path(path)?;
            tracing::debug!(path = %path.display(), components = repository.len(), "issues file loaded");
            Ok(Box::new(CachingIssueRepository::new(repository)))
        }
        None => Ok(Box::new(())),
    }
}

/// Resolves the actions for `query` and optionally removes the first
/// removable declaration.
async fn locate(
    results: &ResultsTree,
    formatter: &dyn TreeFormatter,
    query: &str,
    remove_declaration: bool,
) -> Result<String> {
    let base_path = std::env::current_dir()
        .and_then(|dir| dir.canonicalize())
        .context("Failed to resolve the current directory")?;

    let actions = match results.find_node(query).await? {
        Some(path) => results.node_actions(&path, &base_path).await?,
        None => NodeActions::default(),
    };

    if remove_declaration {
        let Some(exclusion) = actions.exclusions.first() else {
            return Err(TreeScanError::Validation {
                message: format!("No removable package.json declaration found for '{}'", query),
            }
            .into());
        };
        exclusion.excludable.exclude(&PackageJsonEditor::new())?;
        eprintln!(
            "🗑️  Removed '{}' from {}",
            exclusion.excludable.target().element(),
            exclusion.label
        );
    }

    formatter.format_actions(&actions)
}

fn exit_code(response: &ScanResponse, fail_on_issues: bool) -> ExitCode {
    if response.has_failures() {
        ExitCode::ApplicationError
    } else if fail_on_issues && response.has_issues() {
        ExitCode::IssuesDetected
    } else {
        ExitCode::Success
    }
}

/// Checks a project directory and returns its canonical path.
fn validate_project_path(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(TreeScanError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Directory does not exist".to_string(),
        }
        .into());
    }

    // Security check: Reject symbolic links for project paths
    let metadata =
        std::fs::symlink_metadata(path).map_err(|e| TreeScanError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: format!("Failed to read path metadata: {}", e),
        })?;

    if metadata.is_symlink() {
        return Err(TreeScanError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Security: Project path is a symbolic link. For security reasons, symbolic links are not allowed.".to_string(),
        }
        .into());
    }

    if !path.is_dir() {
        return Err(TreeScanError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Not a directory".to_string(),
        }
        .into());
    }

    path.canonicalize().map_err(|e| {
        TreeScanError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: format!("Failed to canonicalize path: {}", e),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use npm_tree_scan::dependency_tree::domain::{Scope, Severity};
    use std::fs;
    use tempfile::TempDir;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["npm-tree-scan"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    fn config(yaml: &str) -> ConfigFile {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, yaml).unwrap();
        load_config_from_path(&path).unwrap()
    }

    #[test]
    fn test_validate_project_path_valid_directory() {
        let temp_dir = TempDir::new().unwrap();
        let resolved = validate_project_path(temp_dir.path()).unwrap();
        assert!(resolved.is_absolute());
    }

    #[test]
    fn test_validate_project_path_nonexistent() {
        let err = validate_project_path(Path::new("/nonexistent/path/that/does/not/exist"))
            .unwrap_err();
        assert!(format!("{}", err).contains("Directory does not exist"));
    }

    #[test]
    fn test_validate_project_path_file_not_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("package.json");
        fs::write(&file_path, "{}").unwrap();

        let err = validate_project_path(&file_path).unwrap_err();
        assert!(format!("{}", err).contains("Not a directory"));
    }

    #[test]
    fn test_options_without_config() {
        let options = ScanOptions::resolve(&args(&["--severity", "high", "-e", "eslint"]), None).unwrap();
        assert_eq!(options.format, OutputFormat::Text);
        assert_eq!(
            options.filters.severities.into_iter().collect::<Vec<_>>(),
            vec![Severity::High]
        );
        assert_eq!(options.filters.exclude_components, vec!["eslint"]);
        assert!(!options.fail_on_issues);
        assert!(options.issues_file.is_none());
    }

    #[test]
    fn test_command_line_overrides_config() {
        let config = config(
            "format: json\nseverities: [critical]\nscopes: [development]\nexclude_components: [eslint]\nfail_on_issues: true\n",
        );
        let options = ScanOptions::resolve(
            &args(&["-f", "text", "--severity", "low", "-e", "@types/*", "-e", "eslint"]),
            Some(&config),
        )
        .unwrap();

        assert_eq!(options.format, OutputFormat::Text);
        assert_eq!(
            options.filters.severities.into_iter().collect::<Vec<_>>(),
            vec![Severity::Low]
        );
        assert!(options.filters.scopes.contains(&Scope::Development));
        assert_eq!(options.filters.exclude_components, vec!["eslint", "@types/*"]);
        assert!(options.fail_on_issues);
    }

    #[test]
    fn test_build_project_specs() {
        let temp_dir = TempDir::new().unwrap();
        let shop = temp_dir.path().join("shop");
        fs::create_dir_all(shop.join("web")).unwrap();
        fs::create_dir_all(shop.join("api")).unwrap();
        fs::write(shop.join("web").join("package.json"), "{}").unwrap();
        fs::write(shop.join("api").join("package.json"), "{}").unwrap();

        let specs = build_project_specs(&[shop.clone()]).unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].key.as_str(), "shop");
        assert_eq!(specs[0].app_dirs, vec![shop.join("api"), shop.join("web")]);
    }

    #[test]
    fn test_build_project_specs_rejects_duplicate_names() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let a = first.path().join("app");
        let b = second.path().join("app");
        for dir in [&a, &b] {
            fs::create_dir_all(dir).unwrap();
            fs::write(dir.join("package.json"), "{}").unwrap();
        }

        let err = build_project_specs(&[a, b]).unwrap_err();
        assert!(format!("{}", err).contains("must be unique"));
    }

    #[test]
    fn test_build_project_specs_requires_package_json() {
        let temp_dir = TempDir::new().unwrap();
        let err = build_project_specs(&[temp_dir.path().to_path_buf()]).unwrap_err();
        assert!(format!("{}", err).contains("No package.json"));
    }
}
