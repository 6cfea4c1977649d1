use std::collections::BTreeMap;

/// 1-based group number
pub type GroupId = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<T> {
    pub id: GroupId,
    pub members: Vec<T>,
}

/// Result of one balanced partition call.
///
/// Always holds exactly `group_count` groups, numbered `1..=group_count`,
/// some of which may be empty when there are fewer items than groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition<T> {
    pub groups: Vec<Group<T>>,
}

impl<T> Partition<T> {
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of members per group, indexed by `id - 1`
    pub fn sizes(&self) -> Vec<usize> {
        self.groups.iter().map(|g| g.members.len()).collect()
    }

    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|g| g.members.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    /// Iterate `(group_id, member)` pairs in group order
    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &T)> {
        self.groups
            .iter()
            .flat_map(|g| g.members.iter().map(move |m| (g.id, m)))
    }
}

impl<T: PartialEq> Partition<T> {
    pub fn group_of(&self, item: &T) -> Option<GroupId> {
        self.groups
            .iter()
            .find(|g| g.members.contains(item))
            .map(|g| g.id)
    }
}

impl<T: Ord> Partition<T> {
    /// Flatten into an item -> group mapping
    pub fn into_mapping(self) -> BTreeMap<T, GroupId> {
        self.groups
            .into_iter()
            .flat_map(|g| {
                let id = g.id;
                g.members.into_iter().map(move |m| (m, id))
            })
            .collect()
    }
}
