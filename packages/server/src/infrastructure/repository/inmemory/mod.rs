mod session;
mod snapshot;

pub use session::InMemorySessionRepository;
pub use snapshot::InMemorySnapshotRepository;
