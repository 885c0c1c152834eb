//! Group data model.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::world::base_category;

/// Identifier of a structure group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u32);

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category of each live group.
pub type GroupDefs = BTreeMap<GroupId, String>;

/// Representative point of each group: `{id: [x, y]}`.
pub type GroupCenters = BTreeMap<GroupId, (u32, u32)>;

type SparseGroupMap = BTreeMap<u32, BTreeMap<u32, GroupId>>;

/// Group membership of the clustered cells.
///
/// Stored densely for the scan passes; serialized sparse as
/// `{x: {y: group_id}}` with only clustered cells present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SparseGroupMap", into = "SparseGroupMap")]
pub struct GroupMap {
    world_size: u32,
    cells: Vec<Option<GroupId>>,
}

impl GroupMap {
    /// Create a map without any clustered cell.
    pub fn new(world_size: u32) -> Self {
        let side = world_size as usize;
        Self {
            world_size,
            cells: vec![None; side * side],
        }
    }

    /// Side length of the covered grid.
    pub fn world_size(&self) -> u32 {
        self.world_size
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.world_size && y < self.world_size)
            .then(|| y as usize * self.world_size as usize + x as usize)
    }

    /// Group of the cell, `None` for unclustered or out-of-range cells.
    pub fn get(&self, x: u32, y: u32) -> Option<GroupId> {
        self.index(x, y).and_then(|i| self.cells[i])
    }

    /// Assign a cell to a group. Out-of-range cells are ignored.
    pub fn set(&mut self, x: u32, y: u32, id: GroupId) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = Some(id);
        }
    }

    /// Move every cell of group `old` to group `new`.
    ///
    /// Scans the whole map; returns the number of cells moved.
    pub fn replace(&mut self, old: GroupId, new: GroupId) -> usize {
        let mut moved = 0;
        for cell in self.cells.iter_mut().filter(|cell| **cell == Some(old)) {
            *cell = Some(new);
            moved += 1;
        }
        moved
    }

    /// All clustered cells as `(x, y, id)`, ordered by `y` then `x`.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, GroupId)> + '_ {
        let side = self.world_size as usize;
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.map(|id| ((i % side) as u32, (i / side) as u32, id))
        })
    }

    /// Number of clustered cells.
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// True when no cell is clustered.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}

impl From<SparseGroupMap> for GroupMap {
    fn from(sparse: SparseGroupMap) -> Self {
        let extent = sparse
            .iter()
            .flat_map(|(&x, column)| column.keys().map(move |&y| x.max(y) + 1))
            .max()
            .unwrap_or(0);

        let mut map = GroupMap::new(extent);
        for (x, column) in sparse {
            for (y, id) in column {
                map.set(x, y, id);
            }
        }
        map
    }
}

impl From<GroupMap> for SparseGroupMap {
    fn from(map: GroupMap) -> Self {
        let mut sparse = SparseGroupMap::new();
        for (x, y, id) in map.iter() {
            sparse.entry(x).or_default().insert(y, id);
        }
        sparse
    }
}

/// Result of the clustering passes, the `groups.json` artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Groups {
    pub groups: GroupMap,
    pub defs: GroupDefs,
}

impl Groups {
    /// Category of the group at `(x, y)`.
    pub fn category_at(&self, x: u32, y: u32) -> Option<&str> {
        self.groups
            .get(x, y)
            .and_then(|id| self.defs.get(&id))
            .map(String::as_str)
    }
}

/// Inclusive bounding box of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl Bounds {
    /// Box covering a single cell.
    pub fn point(x: u32, y: u32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    /// Grow the box to cover `(x, y)`.
    pub fn include(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Integer midpoint of the box. Not necessarily a member cell.
    pub fn center(&self) -> (u32, u32) {
        (
            (self.min_x + self.max_x) / 2,
            (self.min_y + self.max_y) / 2,
        )
    }

    /// True when `(x, y)` lies inside the box.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }
}

/// Default categories that are never grouped, mostly because there is no
/// marker for them.
pub const DEFAULT_BLACKLIST: &[&str] = &["river", "meadow", "crops", "orchard", "pasture", "road"];

/// Categories excluded from clustering.
///
/// An entry matches the category itself and any `<material>_<entry>`
/// variant, so `road` also covers `stone_road` and `other_road`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blacklist(BTreeSet<String>);

impl Default for Blacklist {
    fn default() -> Self {
        Self(DEFAULT_BLACKLIST.iter().map(|s| s.to_string()).collect())
    }
}

impl Blacklist {
    /// Blacklist without entries.
    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    /// Parse a comma separated list.
    pub fn from_list(list: &str) -> Self {
        Self(
            list.split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// True when the category, ignoring adjacency suffixes, is excluded.
    pub fn contains(&self, category: &str) -> bool {
        let base = base_category(category);
        if self.0.contains(base) {
            return true;
        }
        base.rsplit_once('_')
            .is_some_and(|(_, last)| self.0.contains(last))
    }

    /// Entries in sorted order.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_map_replace() {
        let mut map = GroupMap::new(3);
        map.set(0, 0, GroupId(1));
        map.set(2, 2, GroupId(1));
        map.set(1, 1, GroupId(2));

        assert_eq!(map.replace(GroupId(1), GroupId(2)), 2);
        assert_eq!(map.get(0, 0), Some(GroupId(2)));
        assert_eq!(map.get(2, 2), Some(GroupId(2)));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_group_map_out_of_range() {
        let mut map = GroupMap::new(2);
        map.set(5, 0, GroupId(1));
        assert!(map.is_empty());
        assert_eq!(map.get(5, 0), None);
    }

    #[test]
    fn test_groups_json_layout() {
        let mut map = GroupMap::new(4);
        map.set(3, 1, GroupId(0));
        let mut defs = GroupDefs::new();
        defs.insert(GroupId(0), "village".to_string());
        let groups = Groups { groups: map, defs };

        let json = serde_json::to_string(&groups).unwrap();
        assert_eq!(json, r#"{"groups":{"3":{"1":0}},"defs":{"0":"village"}}"#);

        let parsed: Groups = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.groups.get(3, 1), Some(GroupId(0)));
        assert_eq!(parsed.category_at(3, 1), Some("village"));
        assert_eq!(parsed.category_at(0, 0), None);
    }

    #[test]
    fn test_centers_json_layout() {
        let mut centers = GroupCenters::new();
        centers.insert(GroupId(4), (12, 11));
        let json = serde_json::to_string(&centers).unwrap();
        assert_eq!(json, r#"{"4":[12,11]}"#);
    }

    #[test]
    fn test_bounds_center_uses_floor() {
        let mut bounds = Bounds::point(0, 0);
        bounds.include(3, 3);
        assert_eq!(bounds.center(), (1, 1));
        assert!(bounds.contains(3, 0));
        assert!(!bounds.contains(4, 0));
    }

    #[test]
    fn test_blacklist_matches_material_variants() {
        let blacklist = Blacklist::default();
        assert!(blacklist.contains("river"));
        assert!(blacklist.contains("stone_road"));
        assert!(blacklist.contains("other_road_ns"));
        assert!(!blacklist.contains("village"));
        assert!(!blacklist.contains("stone_wall"));
    }

    #[test]
    fn test_blacklist_from_list() {
        let blacklist = Blacklist::from_list(" lake, ,tunnel ");
        assert_eq!(blacklist.entries().collect::<Vec<_>>(), vec!["lake", "tunnel"]);
    }
}
