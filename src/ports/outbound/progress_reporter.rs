/// ProgressReporter port for reporting scan progress to the user
///
/// Scans of several projects run concurrently, so implementations must be
/// shareable across tasks.
pub trait ProgressReporter: Send + Sync {
    /// Reports a progress message
    fn report(&self, message: &str);

    /// Reports how many of `total` projects have finished
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports an error or warning message
    fn report_error(&self, message: &str);

    /// Reports completion of an operation
    fn report_completion(&self, message: &str);
}
