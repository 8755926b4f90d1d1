use crate::adapters::outbound::formatters::{JsonTreeFormatter, TextTreeFormatter};
use crate::application::dto::OutputFormat;
use crate::ports::outbound::TreeFormatter;

/// Factory for creating tree formatters
///
/// This factory encapsulates the creation logic for different formatter implementations,
/// following the Factory Pattern. It belongs in the application layer as it orchestrates
/// the selection of infrastructure adapters based on application needs.
pub struct FormatterFactory;

impl FormatterFactory {
    /// Creates a formatter instance for the specified output format
    ///
    /// # Arguments
    /// * `format` - The output format to create a formatter for
    /// * `colored` - Whether the text format may use terminal colours
    ///
    /// # Examples
    /// ```
    /// use npm_tree_scan::application::dto::OutputFormat;
    /// use npm_tree_scan::application::factories::FormatterFactory;
    ///
    /// let formatter = FormatterFactory::create(OutputFormat::Json, false);
    /// ```
    pub fn create(format: OutputFormat, colored: bool) -> Box<dyn TreeFormatter> {
        match format {
            OutputFormat::Text => Box::new(TextTreeFormatter::new(colored)),
            OutputFormat::Json => Box::new(JsonTreeFormatter::new()),
        }
    }

    /// Returns the progress message for the specified output format
    ///
    /// # Examples
    /// ```
    /// use npm_tree_scan::application::dto::OutputFormat;
    /// use npm_tree_scan::application::factories::FormatterFactory;
    ///
    /// let message = FormatterFactory::progress_message(OutputFormat::Json);
    /// assert_eq!(message, "📝 Generating JSON tree output...");
    /// ```
    pub fn progress_message(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Text => "📝 Generating dependency tree output...",
            OutputFormat::Json => "📝 Generating JSON tree output...",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency_tree::domain::ScanMetadata;
    use crate::dependency_tree::services::CompositeTree;

    #[test]
    fn test_create_formatters_render_empty_tree() {
        let metadata = ScanMetadata::generate();
        let text = FormatterFactory::create(OutputFormat::Text, false)
            .format(&CompositeTree::Empty, &metadata)
            .unwrap();
        assert!(text.contains("No projects scanned."));

        let json = FormatterFactory::create(OutputFormat::Json, false)
            .format(&CompositeTree::Empty, &metadata)
            .unwrap();
        assert!(json.trim_start().starts_with('{'));
    }

    #[test]
    fn test_progress_message_text() {
        let message = FormatterFactory::progress_message(OutputFormat::Text);
        assert_eq!(message, "📝 Generating dependency tree output...");
    }

    #[test]
    fn test_progress_message_json() {
        let message = FormatterFactory::progress_message(OutputFormat::Json);
        assert_eq!(message, "📝 Generating JSON tree output...");
    }
}
