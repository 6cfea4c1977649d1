mod balanced;
mod error;
mod types;


pub use balanced::{partition, target_sizes};
pub use error::PartitionError;
pub use types::{Group, GroupId, Partition};
