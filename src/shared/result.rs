/// Type alias for Result with anyhow::Error as the error type.
/// Used everywhere outside of the typed scan-failure boundary.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
