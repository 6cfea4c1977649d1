use rand::Rng;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::assigner::{
    config::AssignConfig,
    error::AssignError,
    types::{Assignment, GroupAssignment},
};
use crate::partition::{partition, GroupId};
use crate::record::{Item, ItemId};

/// Items bucketed by a stratum key, plus the items the key could not be read for
struct Strata<'a, K> {
    buckets: BTreeMap<K, Vec<&'a Item>>,
    missing: Vec<&'a Item>,
}

fn stratify<'a, K, I, F>(items: I, key: F) -> Strata<'a, K>
where
    K: Ord,
    I: IntoIterator<Item = &'a Item>,
    F: Fn(&'a Item) -> Option<K>,
{
    let mut buckets: BTreeMap<K, Vec<&'a Item>> = BTreeMap::new();
    let mut missing = Vec::new();

    for item in items {
        match key(item) {
            Some(k) => buckets.entry(k).or_default().push(item),
            None => missing.push(item),
        }
    }

    Strata { buckets, missing }
}

/// Assign every item an outer group balanced per outer-attribute value, then
/// an inner group balanced per inner-attribute pair within its outer group.
///
/// Each stratum is partitioned on its own, so balance holds per stratum and
/// each stratum keeps its share in every group. Strata are visited in key
/// order, which makes the result a pure function of the input order and the
/// state of `rng`.
pub fn assign<R: Rng + ?Sized>(
    items: &[Item],
    config: &AssignConfig,
    rng: &mut R,
) -> Result<Assignment, AssignError> {
    config.validate()?;
    check_unique_ids(items)?;

    info!(
        items = items.len(),
        attribute = %config.outer_attribute,
        groups = config.outer_group_count,
        "Partitioning outer groups"
    );
    let (outer, unassigned) = assign_outer(items, config, rng)?;

    info!(
        attributes = ?config.inner_attributes,
        groups = config.inner_group_count,
        "Partitioning inner groups"
    );
    let (inner, inner_unassigned) = assign_inner(items, &outer, config, rng)?;

    let records: Vec<GroupAssignment> = items
        .iter()
        .filter_map(|item| {
            let outer_group = *outer.get(item.id.as_str())?;
            Some(GroupAssignment {
                item_id: item.id.clone(),
                outer_group,
                inner_group: inner.get(item.id.as_str()).copied(),
            })
        })
        .collect();

    info!(
        assigned = records.len(),
        unassigned = unassigned.len(),
        inner_unassigned = inner_unassigned.len(),
        "Assignment complete"
    );

    Ok(Assignment {
        records,
        unassigned,
        inner_unassigned,
        outer_group_count: config.outer_group_count,
        inner_group_count: config.inner_group_count,
    })
}

fn check_unique_ids(items: &[Item]) -> Result<(), AssignError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.id.as_str()) {
            return Err(AssignError::DuplicateItem(item.id.clone()));
        }
    }
    Ok(())
}

fn assign_outer<'a, R: Rng + ?Sized>(
    items: &'a [Item],
    config: &AssignConfig,
    rng: &mut R,
) -> Result<(HashMap<&'a str, GroupId>, Vec<ItemId>), AssignError> {
    let attribute = config.outer_attribute.as_str();
    let strata = stratify(items, |item| item.attribute(attribute));

    if !strata.missing.is_empty() {
        warn!(
            count = strata.missing.len(),
            attribute,
            "Skipping items without outer attribute"
        );
    }

    let mut outer = HashMap::with_capacity(items.len());
    for (value, members) in &strata.buckets {
        let split = partition(members, config.outer_group_count, rng)?;
        debug!(
            stratum = %value,
            size = members.len(),
            sizes = ?split.sizes(),
            "Outer stratum split"
        );

        outer.extend(split.iter().map(|(group, &item)| (item.id.as_str(), group)));
    }

    let unassigned = strata.missing.iter().map(|item| item.id.clone()).collect();
    Ok((outer, unassigned))
}

fn assign_inner<'a, R: Rng + ?Sized>(
    items: &'a [Item],
    outer: &HashMap<&'a str, GroupId>,
    config: &AssignConfig,
    rng: &mut R,
) -> Result<(HashMap<&'a str, GroupId>, Vec<ItemId>), AssignError> {
    let (first, second) = (
        config.inner_attributes.0.as_str(),
        config.inner_attributes.1.as_str(),
    );

    let mut by_outer: BTreeMap<GroupId, Vec<&'a Item>> = BTreeMap::new();
    for item in items {
        if let Some(&outer_group) = outer.get(item.id.as_str()) {
            by_outer.entry(outer_group).or_default().push(item);
        }
    }

    let mut inner = HashMap::with_capacity(outer.len());
    let mut inner_unassigned = Vec::new();

    for (outer_group, members) in by_outer {
        let strata = stratify(members, |item| {
            Some((item.attribute(first)?, item.attribute(second)?))
        });

        if !strata.missing.is_empty() {
            warn!(
                outer_group,
                count = strata.missing.len(),
                "Skipping inner assignment for items without inner attributes"
            );
            inner_unassigned.extend(strata.missing.iter().map(|item| item.id.clone()));
        }

        for ((a, b), stratum) in &strata.buckets {
            let split = partition(stratum, config.inner_group_count, rng)?;
            debug!(
                outer_group,
                stratum = %format!("{a} / {b}"),
                size = stratum.len(),
                "Inner stratum split"
            );

            inner.extend(split.iter().map(|(group, &item)| (item.id.as_str(), group)));
        }
    }

    Ok((inner, inner_unassigned))
}
