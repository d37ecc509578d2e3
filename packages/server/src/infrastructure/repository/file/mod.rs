mod snapshot;

pub use snapshot::FileSnapshotRepository;
