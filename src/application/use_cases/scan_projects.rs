use crate::application::dto::{
    ProjectScanReport, ProjectScanStatus, ScanRequest, ScanResponse,
};
use crate::application::results_tree::ResultsTree;
use crate::dependency_tree::domain::{ProjectSpec, ScanMetadata};
use crate::dependency_tree::services::{
    BuildOutcome, FilterManager, ProjectBuild, ScanCollector, TreeBuilder,
};
use crate::ports::outbound::{IssueRepository, ManifestLocator, PackageLister, ProgressReporter};
use crate::shared::error::ScanFailure;
use crate::shared::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// ScanProjectsUseCase - Core use case for scanning npm projects
///
/// Every project is scanned in its own task: the listing and tree build run
/// on the blocking pool, then the tree is annotated with known issues, its
/// declarations are recorded for navigation and its filtered copy is merged
/// into the composite tree held by [`ResultsTree`].
///
/// # Type Parameters
/// * `L` - PackageLister implementation
/// * `R` - IssueRepository implementation
/// * `M` - ManifestLocator implementation
/// * `P` - ProgressReporter implementation
pub struct ScanProjectsUseCase<L, R, M, P> {
    lister: Arc<L>,
    issue_repository: Arc<R>,
    manifest_locator: Arc<M>,
    progress_reporter: Arc<P>,
    results: Arc<ResultsTree>,
}

impl<L, R, M, P> ScanProjectsUseCase<L, R, M, P>
where
    L: PackageLister + 'static,
    R: IssueRepository + 'static,
    M: ManifestLocator + 'static,
    P: ProgressReporter + 'static,
{
    /// Creates a new ScanProjectsUseCase with injected dependencies
    pub fn new(
        lister: L,
        issue_repository: R,
        manifest_locator: M,
        progress_reporter: P,
        results: Arc<ResultsTree>,
    ) -> Self {
        Self {
            lister: Arc::new(lister),
            issue_repository: Arc::new(issue_repository),
            manifest_locator: Arc::new(manifest_locator),
            progress_reporter: Arc::new(progress_reporter),
            results,
        }
    }

    /// Executes the scan use case
    ///
    /// # Arguments
    /// * `request` - Projects to scan and the filters to publish them with
    /// * `cancel` - Token that stops every scan still in progress
    ///
    /// # Returns
    /// ScanResponse with one report per project and the published composite tree
    ///
    /// # Errors
    /// Returns an error if the filters are invalid or the composite tree
    /// cannot be read. Failures of single projects are reported in the
    /// response instead.
    pub async fn execute(&self, request: ScanRequest, cancel: CancellationToken) -> Result<ScanResponse> {
        // Step 1: Activate the requested filters
        let filters = FilterManager::from_settings(&request.filters)?;
        self.results.set_filters(filters).await?;

        let total = request.projects.len();
        self.progress_reporter
            .report(&format!("🔍 Scanning {} project(s)...", total));

        // Step 2: Scan every project concurrently
        let completed = Arc::new(AtomicUsize::new(0));
        let tasks = request.projects.into_iter().map(|project| {
            let key = project.key.clone();
            let scan = self.spawn_scan(project, cancel.clone(), Arc::clone(&completed), total);
            async move {
                let status = match scan.await {
                    Ok(status) => status,
                    Err(e) => ProjectScanStatus::Failed {
                        message: "Scan task terminated unexpectedly".to_string(),
                        cause: e.to_string(),
                    },
                };
                ProjectScanReport::new(key, status)
            }
        });
        let reports = futures::future::join_all(tasks).await;

        // Step 3: Report outcome
        self.report_outcome(&reports);

        // Step 4: Build response from the published composite tree
        let composite = self.results.snapshot().await?;
        Ok(ScanResponse::new(reports, composite, ScanMetadata::generate()))
    }

    fn spawn_scan(
        &self,
        project: ProjectSpec,
        cancel: CancellationToken,
        completed: Arc<AtomicUsize>,
        total: usize,
    ) -> tokio::task::JoinHandle<ProjectScanStatus> {
        let lister = Arc::clone(&self.lister);
        let issue_repository = Arc::clone(&self.issue_repository);
        let manifest_locator = Arc::clone(&self.manifest_locator);
        let progress_reporter = Arc::clone(&self.progress_reporter);
        let results = Arc::clone(&self.results);

        tokio::spawn(async move {
            let key = project.key.clone();
            let status = scan_project(
                project,
                lister,
                issue_repository.as_ref(),
                manifest_locator,
                results.as_ref(),
                &cancel,
            )
            .await;

            let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
            progress_reporter.report_progress(done, total, Some(key.as_str()));
            status
        })
    }

    fn report_outcome(&self, reports: &[ProjectScanReport]) {
        let mut succeeded = 0;
        for report in reports {
            match &report.status {
                ProjectScanStatus::Succeeded { warnings, .. } => {
                    succeeded += 1;
                    for warning in warnings {
                        self.progress_reporter.report_error(&format!(
                            "⚠️  Warning: {} in {}: {}",
                            warning.message,
                            warning.app_dir.display(),
                            warning.details
                        ));
                    }
                }
                ProjectScanStatus::Failed { message, cause } => {
                    self.progress_reporter.report_error(&format!(
                        "❌ Scan of '{}' failed: {}\n   Caused by: {}",
                        report.key, message, cause
                    ));
                }
                ProjectScanStatus::Cancelled => {
                    self.progress_reporter
                        .report(&format!("ℹ️  Scan of '{}' was cancelled", report.key));
                }
            }
        }

        for pattern in self.results.unmatched_patterns() {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: Exclude pattern '{}' did not match any dependencies.",
                pattern
            ));
        }

        self.progress_reporter.report_completion(&format!(
            "✅ Scanned {}/{} project(s)",
            succeeded,
            reports.len()
        ));
    }
}

/// Scan of one project, from listing to publication.
async fn scan_project<L, R, M>(
    project: ProjectSpec,
    lister: Arc<L>,
    issue_repository: &R,
    manifest_locator: Arc<M>,
    results: &ResultsTree,
    cancel: &CancellationToken,
) -> ProjectScanStatus
where
    L: PackageLister + 'static,
    R: IssueRepository + ?Sized,
    M: ManifestLocator + 'static,
{
    let key = project.key.clone();

    let build = {
        let cancel = cancel.clone();
        tokio::task::spawn_blocking(move || TreeBuilder::build_project(&project, lister.as_ref(), &cancel))
            .await
    };
    let ProjectBuild { mut tree, warnings } = match build {
        Ok(Ok(BuildOutcome::Built(build))) => build,
        Ok(Ok(BuildOutcome::Cancelled)) => return ProjectScanStatus::Cancelled,
        Ok(Err(failure)) => return failed(failure),
        Err(e) => {
            return ProjectScanStatus::Failed {
                message: format!("Tree build of '{}' did not complete", key),
                cause: e.to_string(),
            }
        }
    };

    let component_ids = ScanCollector::collect(&tree);
    tracing::debug!(project = %key, components = component_ids.len(), "looking up issues");
    match issue_repository.fetch_issues(&component_ids).await {
        Ok(found) => ScanCollector::merge(&mut tree, &found),
        Err(e) => {
            let e = e.context(format!("Issue lookup for '{}' failed", key));
            return failed(ScanFailure::from_error(key.as_str(), &e));
        }
    }

    let located = tokio::task::spawn_blocking(move || {
        let located = ResultsTree::locate_declarations(&tree, manifest_locator.as_ref());
        (tree, located)
    })
    .await;
    let tree = match located {
        Ok((tree, located)) => {
            results.register_declarations(located);
            tree
        }
        Err(e) => {
            return ProjectScanStatus::Failed {
                message: format!("Locating declarations of '{}' did not complete", key),
                cause: e.to_string(),
            }
        }
    };

    let component_count = tree.subtree_size();
    let issue_count = tree.summary().issue_count();
    match results.add_scan_results(key.clone(), tree, cancel).await {
        Ok(true) => ProjectScanStatus::Succeeded {
            warnings,
            component_count,
            issue_count,
        },
        Ok(false) => {
            tracing::info!(project = %key, "scan cancelled before publishing");
            ProjectScanStatus::Cancelled
        }
        Err(e) => failed(ScanFailure::from_error(key.as_str(), &e)),
    }
}

fn failed(failure: ScanFailure) -> ProjectScanStatus {
    tracing::warn!(
        project = %failure.project,
        message = %failure.message,
        cause = %failure.cause,
        "project scan failed"
    );
    ProjectScanStatus::Failed {
        message: failure.message,
        cause: failure.cause,
    }
}
