//! Representative points of groups.

use std::collections::BTreeMap;

use super::types::{Bounds, GroupCenters, GroupId, GroupMap, Groups};

/// Bounding box of every group in the map.
pub fn group_bounds(map: &GroupMap) -> BTreeMap<GroupId, Bounds> {
    let mut bounds: BTreeMap<GroupId, Bounds> = BTreeMap::new();
    for (x, y, id) in map.iter() {
        bounds
            .entry(id)
            .and_modify(|b| b.include(x, y))
            .or_insert_with(|| Bounds::point(x, y));
    }
    bounds
}

/// Center of each group's bounding box.
///
/// This is the integer midpoint of the box, not the centroid of the member
/// cells, and may fall outside the group for concave shapes. It is only used
/// to place markers.
pub fn group_centers(groups: &Groups) -> GroupCenters {
    group_bounds(&groups.groups)
        .into_iter()
        .map(|(id, bounds)| (id, bounds.center()))
        .collect()
}
