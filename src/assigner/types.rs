use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::partition::GroupId;
use crate::record::ItemId;

/// Group placement of a single item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupAssignment {
    pub item_id: ItemId,
    pub outer_group: GroupId,
    /// Local to `outer_group`; `None` when an inner attribute is missing
    pub inner_group: Option<GroupId>,
}

/// Output of one stratified assignment run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Assigned items, in input order
    pub records: Vec<GroupAssignment>,
    /// Items skipped for a missing outer attribute
    pub unassigned: Vec<ItemId>,
    /// Items with an outer group but a missing inner attribute
    pub inner_unassigned: Vec<ItemId>,
    pub outer_group_count: u32,
    pub inner_group_count: u32,
}

impl Assignment {
    /// Linear scan over `records`; use [`Assignment::index`] for repeated lookups
    pub fn get(&self, item_id: &str) -> Option<&GroupAssignment> {
        self.records.iter().find(|r| r.item_id == item_id)
    }

    /// Records keyed by item id
    pub fn index(&self) -> HashMap<&str, &GroupAssignment> {
        self.records
            .iter()
            .map(|r| (r.item_id.as_str(), r))
            .collect()
    }

    /// Items placed in `outer_group`, in input order
    pub fn outer_members(&self, outer_group: GroupId) -> impl Iterator<Item = &GroupAssignment> {
        self.records
            .iter()
            .filter(move |r| r.outer_group == outer_group)
    }

    /// Size of each outer group, indexed by `id - 1`
    pub fn outer_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.outer_group_count as usize];
        for record in &self.records {
            let idx = (record.outer_group as usize).checked_sub(1);
            if let Some(slot) = idx.and_then(|i| sizes.get_mut(i)) {
                *slot += 1;
            }
        }
        sizes
    }

    /// Size of each inner group inside `outer_group`, indexed by `id - 1`
    pub fn inner_sizes(&self, outer_group: GroupId) -> Vec<usize> {
        let mut sizes = vec![0; self.inner_group_count as usize];
        for inner in self.outer_members(outer_group).filter_map(|r| r.inner_group) {
            let idx = (inner as usize).checked_sub(1);
            if let Some(slot) = idx.and_then(|i| sizes.get_mut(i)) {
                *slot += 1;
            }
        }
        sizes
    }

    pub fn assigned_count(&self) -> usize {
        self.records.len()
    }

    /// Items that did not receive a full (outer, inner) placement
    pub fn skipped(&self) -> usize {
        self.unassigned.len() + self.inner_unassigned.len()
    }
}
