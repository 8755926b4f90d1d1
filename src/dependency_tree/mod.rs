//! Dependency tree engine: the domain model, the pure services that build,
//! annotate, filter and merge trees, and the exclusion policy.
pub mod domain;
pub mod policies;
pub mod services;
