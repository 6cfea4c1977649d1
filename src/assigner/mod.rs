mod config;
mod error;
mod stratified;
mod types;

#[cfg(test)]
mod tests;

pub use config::{AssignConfig, Level};
pub use error::AssignError;
pub use stratified::assign;
pub use types::{Assignment, GroupAssignment};
