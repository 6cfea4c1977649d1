use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::assigner::{Assignment, GroupAssignment};
use crate::partition::GroupId;
use crate::record::{Item, ItemId};

/// One exported line: the input record plus its placement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    pub id: ItemId,
    pub attributes: BTreeMap<String, String>,
    pub outer_group: Option<GroupId>,
    pub inner_group: Option<GroupId>,
}

/// Join items with their placement, sorted by outer group, inner group and
/// id. Rows without a group sort after the placed ones.
pub fn build_rows(items: &[Item], assignment: &Assignment) -> Vec<OutputRow> {
    let placed: HashMap<&str, &GroupAssignment> = assignment
        .records
        .iter()
        .map(|r| (r.item_id.as_str(), r))
        .collect();

    let mut rows: Vec<OutputRow> = items
        .iter()
        .map(|item| {
            let record = placed.get(item.id.as_str());
            OutputRow {
                id: item.id.clone(),
                attributes: item.attributes.clone(),
                outer_group: record.map(|r| r.outer_group),
                inner_group: record.and_then(|r| r.inner_group),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        let key = |r: &OutputRow| {
            (
                r.outer_group.is_none(),
                r.outer_group,
                r.inner_group.is_none(),
                r.inner_group,
            )
        };
        key(a).cmp(&key(b)).then_with(|| a.id.cmp(&b.id))
    });
    rows
}

/// Split exported rows back into items and an [`Assignment`]
pub fn rows_into_parts(
    rows: Vec<OutputRow>,
    outer_group_count: u32,
    inner_group_count: u32,
) -> (Vec<Item>, Assignment) {
    let mut items = Vec::with_capacity(rows.len());
    let mut records = Vec::with_capacity(rows.len());
    let mut unassigned = Vec::new();
    let mut inner_unassigned = Vec::new();

    for row in rows {
        match row.outer_group {
            Some(outer_group) => {
                if row.inner_group.is_none() {
                    inner_unassigned.push(row.id.clone());
                }
                records.push(GroupAssignment {
                    item_id: row.id.clone(),
                    outer_group,
                    inner_group: row.inner_group,
                });
            }
            None => unassigned.push(row.id.clone()),
        }
        items.push(Item {
            id: row.id,
            attributes: row.attributes,
        });
    }

    let assignment = Assignment {
        records,
        unassigned,
        inner_unassigned,
        outer_group_count,
        inner_group_count,
    };
    (items, assignment)
}
