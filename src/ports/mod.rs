/// Ports module defining interfaces for hexagonal architecture
///
/// The engine only talks to the outside world (npm, the issue lookup
/// service, manifests on disk, the console) through the outbound ports.
pub mod outbound;
