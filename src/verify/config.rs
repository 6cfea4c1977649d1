use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// Max proportion deviation of an outer group from the global mix
    pub outer_tolerance: f64,
    /// Max deviation of an inner group from its outer group, per inner attribute
    pub inner_tolerances: (f64, f64),
    /// Outer group sizes count as even below this standard deviation
    pub outer_size_std_threshold: f64,
    /// Inner group sizes count as even below this standard deviation
    pub inner_size_std_threshold: f64,
    /// Flagged inner groups printed per outer group
    pub max_flagged_shown: usize,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            outer_tolerance: 0.01,
            inner_tolerances: (0.15, 0.20),
            outer_size_std_threshold: 2.0,
            inner_size_std_threshold: 1.0,
            max_flagged_shown: 3,
        }
    }
}
