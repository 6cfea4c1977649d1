use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

use crate::assigner::{AssignConfig, Assignment};
use crate::partition::GroupId;
use crate::record::Item;
use crate::verify::{
    config::VerifyConfig,
    report::{InnerGroupCheck, InnerLevelReport, OuterGroupCheck, VerificationReport},
    stats::{max_deviation, proportions, SizeStats},
};

/// Compare group composition against the population and the enclosing
/// outer group.
///
/// Outer groups are checked against the global share of each outer-attribute
/// value. Each non-empty inner group is checked against its outer group,
/// using only the values that actually occur in the inner group.
pub fn verify(
    items: &[Item],
    assignment: &Assignment,
    assign: &AssignConfig,
    config: &VerifyConfig,
) -> VerificationReport {
    let by_id: HashMap<&str, &Item> = items.iter().map(|i| (i.id.as_str(), i)).collect();
    let outer_attr = assign.outer_attribute.as_str();
    let (first_attr, second_attr) = (
        assign.inner_attributes.0.as_str(),
        assign.inner_attributes.1.as_str(),
    );

    let global_proportions = proportions(items.iter().filter_map(|i| i.attribute(outer_attr)));

    let mut placed: BTreeMap<GroupId, Vec<Placed<'_>>> = BTreeMap::new();
    for record in &assignment.records {
        if let Some(&item) = by_id.get(record.item_id.as_str()) {
            placed
                .entry(record.outer_group)
                .or_default()
                .push((record.inner_group, item));
        }
    }

    let mut outer_groups = Vec::new();
    let mut inner = Vec::new();
    for outer_group in 1..=assignment.outer_group_count {
        let group_placed = placed.get(&outer_group).map(Vec::as_slice).unwrap_or_default();
        let members: Vec<&Item> = group_placed.iter().map(|&(_, item)| item).collect();

        let shares = proportions(members.iter().filter_map(|i| i.attribute(outer_attr)));
        let deviation = max_deviation(&shares, &global_proportions)
            .max(max_deviation(&global_proportions, &shares));
        outer_groups.push(OuterGroupCheck {
            outer_group,
            size: members.len(),
            proportions: shares,
            deviation,
            flagged: deviation > config.outer_tolerance,
        });

        inner.push(check_inner(
            outer_group,
            &members,
            group_placed,
            (first_attr, second_attr),
            config,
        ));
    }

    let outer_sizes = SizeStats::from_sizes(&assignment.outer_sizes());
    let outer_sizes_even = outer_sizes
        .map(|s| s.std_dev < config.outer_size_std_threshold)
        .unwrap_or(true);

    let inner_std_devs: Vec<f64> = inner
        .iter()
        .filter_map(|level| level.sizes.map(|s| s.std_dev))
        .collect();
    let mean_inner_std_dev = if inner_std_devs.is_empty() {
        None
    } else {
        Some(inner_std_devs.iter().sum::<f64>() / inner_std_devs.len() as f64)
    };

    let report = VerificationReport {
        outer_attribute: assign.outer_attribute.clone(),
        inner_attributes: assign.inner_attributes.clone(),
        global_proportions,
        outer_balanced: outer_groups.iter().all(|g| !g.flagged),
        outer_groups,
        outer_sizes,
        outer_sizes_even,
        inner_balanced: inner.iter().all(|level| level.flagged_count == 0),
        inner,
        mean_inner_std_dev,
        skipped: assignment.skipped(),
        max_flagged_shown: config.max_flagged_shown,
    };

    info!(
        outer_balanced = report.outer_balanced,
        inner_balanced = report.inner_balanced,
        "Verification complete"
    );
    report
}

/// An outer group member with its inner group, if it has one
type Placed<'a> = (Option<GroupId>, &'a Item);

fn check_inner(
    outer_group: GroupId,
    members: &[&Item],
    placed: &[Placed<'_>],
    (first_attr, second_attr): (&str, &str),
    config: &VerifyConfig,
) -> InnerLevelReport {
    let first_target = proportions(members.iter().filter_map(|i| i.attribute(first_attr)));
    let second_target = proportions(members.iter().filter_map(|i| i.attribute(second_attr)));

    let mut by_inner: BTreeMap<GroupId, Vec<&Item>> = BTreeMap::new();
    for &(inner_group, item) in placed {
        if let Some(inner_group) = inner_group {
            by_inner.entry(inner_group).or_default().push(item);
        }
    }

    let mut inner_groups = Vec::new();
    for (inner_group, group) in by_inner {
        let first_proportions = proportions(group.iter().filter_map(|i| i.attribute(first_attr)));
        let second_proportions =
            proportions(group.iter().filter_map(|i| i.attribute(second_attr)));
        let first_deviation = max_deviation(&first_proportions, &first_target);
        let second_deviation = max_deviation(&second_proportions, &second_target);
        let flagged = first_deviation > config.inner_tolerances.0
            || second_deviation > config.inner_tolerances.1;

        if flagged {
            debug!(
                outer_group,
                inner_group,
                first_deviation,
                second_deviation,
                "Inner group flagged"
            );
        }

        inner_groups.push(InnerGroupCheck {
            inner_group,
            size: group.len(),
            first_proportions,
            second_proportions,
            first_deviation,
            second_deviation,
            flagged,
        });
    }

    let sizes: Vec<usize> = inner_groups.iter().map(|g| g.size).collect();
    let size_stats = SizeStats::from_sizes(&sizes);

    InnerLevelReport {
        outer_group,
        size: members.len(),
        first_target,
        second_target,
        flagged_count: inner_groups.iter().filter(|g| g.flagged).count(),
        inner_groups,
        sizes: size_stats,
        sizes_even: size_stats.map(|s| s.std_dev < config.inner_size_std_threshold),
    }
}
