use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::partition::GroupId;
use crate::verify::stats::SizeStats;

#[derive(Debug, Clone, Serialize)]
pub struct OuterGroupCheck {
    pub outer_group: GroupId,
    pub size: usize,
    pub proportions: BTreeMap<String, f64>,
    pub deviation: f64,
    pub flagged: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct InnerGroupCheck {
    pub inner_group: GroupId,
    pub size: usize,
    pub first_proportions: BTreeMap<String, f64>,
    pub second_proportions: BTreeMap<String, f64>,
    pub first_deviation: f64,
    pub second_deviation: f64,
    pub flagged: bool,
}

/// Inner-level diagnostics for one outer group
#[derive(Debug, Clone, Serialize)]
pub struct InnerLevelReport {
    pub outer_group: GroupId,
    pub size: usize,
    pub first_target: BTreeMap<String, f64>,
    pub second_target: BTreeMap<String, f64>,
    /// Non-empty inner groups only
    pub inner_groups: Vec<InnerGroupCheck>,
    pub flagged_count: usize,
    pub sizes: Option<SizeStats>,
    pub sizes_even: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub outer_attribute: String,
    pub inner_attributes: (String, String),
    pub global_proportions: BTreeMap<String, f64>,
    pub outer_groups: Vec<OuterGroupCheck>,
    pub outer_sizes: Option<SizeStats>,
    pub outer_sizes_even: bool,
    pub outer_balanced: bool,
    pub inner: Vec<InnerLevelReport>,
    pub inner_balanced: bool,
    /// Mean of the per-outer-group inner size standard deviations
    pub mean_inner_std_dev: Option<f64>,
    pub skipped: usize,
    #[serde(skip)]
    pub(crate) max_flagged_shown: usize,
}

fn write_shares(
    f: &mut fmt::Formatter<'_>,
    indent: &str,
    shares: &BTreeMap<String, f64>,
) -> fmt::Result {
    for (value, share) in shares {
        writeln!(f, "{indent}{value:<16} {:>6.2}%", share * 100.0)?;
    }
    Ok(())
}

fn inline_shares(shares: &BTreeMap<String, f64>) -> String {
    shares
        .iter()
        .map(|(value, share)| format!("{value}: {:.1}%", share * 100.0))
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_size_line(
    f: &mut fmt::Formatter<'_>,
    indent: &str,
    label: &str,
    s: &SizeStats,
) -> fmt::Result {
    writeln!(
        f,
        "{indent}{label}: min={}, max={}, mean={:.2}, std_dev={:.2}",
        s.min, s.max, s.mean, s.std_dev
    )
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Group Verification ===")?;
        if self.skipped > 0 {
            writeln!(f, "Skipped items (missing attributes): {}", self.skipped)?;
        }

        writeln!(f, "\n1. Outer groups by '{}'", self.outer_attribute)?;
        writeln!(f, "   Global proportions (target):")?;
        write_shares(f, "     ", &self.global_proportions)?;

        for group in &self.outer_groups {
            writeln!(f, "\n   Outer group {} (total {}):", group.outer_group, group.size)?;
            write_shares(f, "     ", &group.proportions)?;
            if group.flagged {
                writeln!(
                    f,
                    "     * deviates from global mix by {:.2}%",
                    group.deviation * 100.0
                )?;
            }
        }

        if self.outer_balanced {
            writeln!(f, "\n   ==> Outer groups match the global mix.")?;
        } else {
            writeln!(f, "\n   ==> Some outer groups deviate from the global mix.")?;
            writeln!(f, "       (expected when strata do not divide evenly)")?;
        }
        if let Some(sizes) = &self.outer_sizes {
            write_size_line(f, "   ", "Outer group sizes", sizes)?;
            if self.outer_sizes_even {
                writeln!(f, "   ==> Outer group sizes are even.")?;
            } else {
                writeln!(f, "   ==> Outer group sizes vary.")?;
            }
        }

        let (first, second) = &self.inner_attributes;
        writeln!(f, "\n2. Inner groups by '{first}' x '{second}'")?;
        for level in &self.inner {
            writeln!(f, "\n   --- Outer group {} ---", level.outer_group)?;
            if level.size == 0 {
                writeln!(f, "      Outer group is empty.")?;
                continue;
            }
            writeln!(f, "      Target '{first}':")?;
            write_shares(f, "        ", &level.first_target)?;
            writeln!(f, "      Target '{second}':")?;
            write_shares(f, "        ", &level.second_target)?;

            for (shown, group) in level.inner_groups.iter().filter(|g| g.flagged).enumerate() {
                if shown == self.max_flagged_shown {
                    writeln!(f, "      * (further flagged inner groups not shown)")?;
                    break;
                }
                writeln!(
                    f,
                    "      * Inner group {} (total {}) deviates:",
                    group.inner_group, group.size
                )?;
                writeln!(f, "         -> {first}: {}", inline_shares(&group.first_proportions))?;
                writeln!(f, "         -> {second}: {}", inline_shares(&group.second_proportions))?;
            }

            if level.flagged_count == 0 {
                writeln!(f, "      ==> Inner groups match the outer group mix.")?;
            } else {
                writeln!(
                    f,
                    "      ==> {} inner group(s) deviate from the outer group mix.",
                    level.flagged_count
                )?;
            }

            match (&level.sizes, level.sizes_even) {
                (Some(sizes), Some(even)) => {
                    write_size_line(f, "      ", "Inner group sizes", sizes)?;
                    if even {
                        writeln!(f, "      ==> Inner group sizes are even.")?;
                    } else {
                        writeln!(f, "      ==> Inner group sizes vary.")?;
                    }
                }
                _ => writeln!(f, "      No inner group has members.")?,
            }
        }

        writeln!(f)?;
        if self.inner_balanced {
            writeln!(f, "Inner group proportions hold in every outer group.")?;
        } else {
            writeln!(f, "Some inner groups deviate beyond tolerance.")?;
        }
        if let Some(mean) = self.mean_inner_std_dev {
            writeln!(f, "Mean inner group size std_dev across outer groups: {mean:.2}")?;
        }
        Ok(())
    }
}
