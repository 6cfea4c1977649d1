use thiserror::Error;

use crate::assigner::config::Level;
use crate::partition::PartitionError;
use crate::record::ItemId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignError {
    #[error("Invalid {level} group count: {count} (must be at least 1)")]
    InvalidGroupCount { level: Level, count: u32 },

    #[error("Duplicate item id: {0}")]
    DuplicateItem(ItemId),

    #[error("Partition failed: {0}")]
    Partition(#[from] PartitionError),
}
