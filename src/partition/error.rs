use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PartitionError {
    #[error("Invalid group count: {0} (must be at least 1)")]
    InvalidGroupCount(u32),
}
