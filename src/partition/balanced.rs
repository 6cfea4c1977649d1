use rand::{seq::SliceRandom, Rng};

use crate::partition::{
    error::PartitionError,
    types::{Group, GroupId, Partition},
};

/// Target sizes for splitting `item_count` items over `group_count` groups:
/// `remainder` groups of `base + 1` followed by the rest at `base`.
pub fn target_sizes(item_count: usize, group_count: u32) -> Vec<usize> {
    let groups = group_count as usize;
    if groups == 0 {
        return vec![];
    }

    let base = item_count / groups;
    let remainder = item_count % groups;

    let mut sizes = vec![base + 1; remainder];
    sizes.resize(groups, base);
    sizes
}

/// Split `items` into `group_count` groups whose sizes differ by at most one.
///
/// Which group gets a larger share and which items land where are both drawn
/// from `rng`: the size list is shuffled first, then a copy of the items, and
/// the shuffled items are dealt out in contiguous runs. Group ids follow the
/// order the shuffled sizes are consumed, starting at 1.
pub fn partition<T, R>(
    items: &[T],
    group_count: u32,
    rng: &mut R,
) -> Result<Partition<T>, PartitionError>
where
    T: Clone,
    R: Rng + ?Sized,
{
    if group_count < 1 {
        return Err(PartitionError::InvalidGroupCount(group_count));
    }

    // 1. Sizes, shuffled so the +1 groups are not always the low numbers
    let mut sizes = target_sizes(items.len(), group_count);
    sizes.shuffle(rng);

    // 2. Item order
    let mut shuffled = items.to_vec();
    shuffled.shuffle(rng);

    // 3. Deal out contiguous runs
    let mut groups = Vec::with_capacity(sizes.len());
    let mut remaining = shuffled.into_iter();
    for (idx, size) in sizes.into_iter().enumerate() {
        groups.push(Group {
            id: (idx + 1) as GroupId,
            members: remaining.by_ref().take(size).collect(),
        });
    }

    Ok(Partition { groups })
}
