use serde::{Deserialize, Serialize};
use std::fmt;

use crate::assigner::error::AssignError;

/// Which of the two nested partitions a value refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Outer,
    Inner,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Outer => f.write_str("outer"),
            Level::Inner => f.write_str("inner"),
        }
    }
}

/// Stratifying attributes and group counts for one assignment run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignConfig {
    /// Attribute balanced across outer groups
    pub outer_attribute: String,
    pub outer_group_count: u32,
    /// Attribute pair balanced jointly across inner groups
    pub inner_attributes: (String, String),
    /// Inner groups per outer group
    pub inner_group_count: u32,
}

impl AssignConfig {
    pub fn new(
        outer_attribute: impl Into<String>,
        outer_group_count: u32,
        inner_attributes: (impl Into<String>, impl Into<String>),
        inner_group_count: u32,
    ) -> Self {
        Self {
            outer_attribute: outer_attribute.into(),
            outer_group_count,
            inner_attributes: (inner_attributes.0.into(), inner_attributes.1.into()),
            inner_group_count,
        }
    }

    pub fn validate(&self) -> Result<(), AssignError> {
        if self.outer_group_count < 1 {
            return Err(AssignError::InvalidGroupCount {
                level: Level::Outer,
                count: self.outer_group_count,
            });
        }
        if self.inner_group_count < 1 {
            return Err(AssignError::InvalidGroupCount {
                level: Level::Inner,
                count: self.inner_group_count,
            });
        }
        Ok(())
    }
}

impl Default for AssignConfig {
    fn default() -> Self {
        Self::new("fakultas", 5, ("jenis kelamin", "jalur masuk"), 25)
    }
}
