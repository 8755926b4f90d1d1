/// Use cases module containing application business logic orchestration
mod scan_projects;

pub use scan_projects::ScanProjectsUseCase;
