// Public API exports
pub mod assigner;
pub mod config;
pub mod dummy;
pub mod export;
pub mod partition;
pub mod record;
pub mod verify;

// Re-export main types for convenience
pub use partition::{partition, target_sizes, Group, GroupId, Partition, PartitionError};

pub use assigner::{assign, AssignConfig, AssignError, Assignment, GroupAssignment, Level};

pub use record::{load_items, parse_items, Item, ItemId, LoadError};

pub use verify::{verify, SizeStats, VerificationReport, VerifyConfig};

pub use config::RunConfig;

pub use export::{read_export, write_export, AssignmentExport, OutputRow, RunManifest};
