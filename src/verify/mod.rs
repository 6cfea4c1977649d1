//! Post-hoc diagnostics for an [`Assignment`](crate::assigner::Assignment).
//!
//! Nothing here feeds back into the assigner. Tolerances and thresholds only
//! decide which groups get flagged in the report.

mod check;
mod config;
mod report;
mod stats;


pub use check::verify;
pub use config::VerifyConfig;
pub use report::{InnerGroupCheck, InnerLevelReport, OuterGroupCheck, VerificationReport};
pub use stats::{max_deviation, proportions, SizeStats};
