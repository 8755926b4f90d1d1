/// Issue lookup adapters
mod caching_issue_repository;
mod json_issue_repository;

pub use caching_issue_repository::CachingIssueRepository;
pub use json_issue_repository::JsonIssueRepository;
