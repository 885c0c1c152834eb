//! Two-pass adjacency clustering.
//!
//! Both passes scan the grid column by column (`x` outer, `y` inner) and only
//! look at the three forward neighbours of each cell: right `(x+1, y)`,
//! below `(x, y+1)` and right-below `(x+1, y+1)`. The left and upper
//! neighbours were already visited at that point.
//!
//! 1. **Seeding**: every unassigned, non-blacklisted cell opens a new group.
//!    The cell's group is then written onto each forward neighbour with the
//!    same category, which both seeds and grows groups in a single sweep.
//! 2. **Merging**: forward neighbours that ended up in different groups of
//!    the same category are merged by rewriting every occurrence of the
//!    neighbour's id in the whole map.
//!
//! Cells touching only along the anti-diagonal (`(x+1, y-1)`) are never
//! compared and stay in separate groups.
//!
//! The merge rewrite is a full map scan, so a world with many merge events
//! costs up to `O(world_size³)`. This is the hot path for large worlds.

use std::collections::BTreeSet;

use tracing::{debug, trace};

use super::types::{Blacklist, GroupDefs, GroupId, GroupMap, Groups};
use crate::world::{base_category, CategoryGrid};

/// Forward neighbours of `(x, y)` that lie inside the world.
fn forward_neighbours(x: u32, y: u32, world_size: u32) -> impl Iterator<Item = (u32, u32)> {
    let has_right = x + 1 < world_size;
    let has_below = y + 1 < world_size;
    [
        has_right.then_some((x + 1, y)),
        has_below.then_some((x, y + 1)),
        (has_right && has_below).then_some((x + 1, y + 1)),
    ]
    .into_iter()
    .flatten()
}

/// Cluster contiguous cells of the same category into groups.
///
/// Categories are compared without their adjacency suffix, so
/// `village_ns` and `village_e` join the same group. Blacklisted and empty
/// cells are never clustered.
///
/// # Panics
///
/// Panics if the merge pass meets a group id without a definition. The two
/// passes keep the map and the definitions in sync, so this indicates a bug.
pub fn make_groups<G>(grid: &G, blacklist: &Blacklist) -> Groups
where
    G: CategoryGrid + ?Sized,
{
    let world_size = grid.world_size();
    let category_at = |x: u32, y: u32| grid.category(x, y).map(base_category);

    let mut groups = GroupMap::new(world_size);
    let mut defs = GroupDefs::new();
    let mut next_id = 0u32;

    // Seeding pass
    for x in 0..world_size {
        for y in 0..world_size {
            let Some(category) = category_at(x, y) else {
                continue;
            };
            if blacklist.contains(category) {
                continue;
            }

            let current = match groups.get(x, y) {
                Some(id) => id,
                None => {
                    let id = GroupId(next_id);
                    next_id += 1;
                    defs.insert(id, category.to_string());
                    groups.set(x, y, id);
                    id
                }
            };

            for (nx, ny) in forward_neighbours(x, y, world_size) {
                if category_at(nx, ny) == Some(category) {
                    groups.set(nx, ny, current);
                }
            }
        }
    }

    let seeded = defs.len();

    // Merge pass
    let mut merges = 0usize;
    for x in 0..world_size {
        for y in 0..world_size {
            let Some(current) = groups.get(x, y) else {
                continue;
            };

            for (nx, ny) in forward_neighbours(x, y, world_size) {
                let Some(neighbour) = groups.get(nx, ny) else {
                    continue;
                };
                if neighbour == current {
                    continue;
                }

                if definition(&defs, current) == definition(&defs, neighbour) {
                    let moved = groups.replace(neighbour, current);
                    defs.remove(&neighbour);
                    merges += 1;
                    trace!(from = %neighbour, into = %current, cells = moved, "Merged groups");
                }
            }
        }
    }

    // Ids overwritten during seeding can be left without any cell.
    let live: BTreeSet<GroupId> = groups.iter().map(|(_, _, id)| id).collect();
    let before = defs.len();
    defs.retain(|id, _| live.contains(id));

    debug!(
        world_size,
        seeded,
        merges,
        orphaned = before - defs.len(),
        groups = defs.len(),
        "Grouped structures"
    );

    Groups { groups, defs }
}

fn definition(defs: &GroupDefs, id: GroupId) -> &str {
    match defs.get(&id) {
        Some(category) => category,
        None => panic!("group {} is referenced in the group map but has no definition", id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{StructureOverlay, WorldGrid};
    use std::collections::BTreeMap;

    fn grid_from_rows(rows: &[&str]) -> WorldGrid {
        let size = rows.len() as u32;
        WorldGrid::from_fn(size, |x, y| {
            match rows[y as usize].as_bytes()[x as usize] {
                b'V' => "village",
                b'C' => "castle",
                b'R' => "river",
                _ => "",
            }
        })
    }

    fn cells_by_group(groups: &Groups) -> BTreeMap<GroupId, Vec<(u32, u32)>> {
        let mut result: BTreeMap<GroupId, Vec<(u32, u32)>> = BTreeMap::new();
        for (x, y, id) in groups.groups.iter() {
            result.entry(id).or_default().push((x, y));
        }
        result
    }

    #[test]
    fn test_uniform_world_is_one_group() {
        let grid = WorldGrid::filled(4, "forest");
        let groups = make_groups(&grid, &Blacklist::default());

        assert_eq!(groups.defs.len(), 1);
        assert_eq!(groups.defs.values().next().unwrap(), "forest");
        assert_eq!(groups.groups.len(), 16);
    }

    #[test]
    fn test_blacklisted_and_empty_cells_are_skipped() {
        let grid = grid_from_rows(&["RR.", "R..", "..."]);
        let groups = make_groups(&grid, &Blacklist::default());

        assert!(groups.defs.is_empty());
        assert!(groups.groups.is_empty());
    }

    #[test]
    fn test_separate_blobs_are_separate_groups() {
        let grid = grid_from_rows(&["VV...", "VV...", ".....", "...CC", "...CC"]);
        let groups = make_groups(&grid, &Blacklist::default());

        assert_eq!(groups.defs.len(), 2);
        assert_eq!(groups.category_at(0, 0), Some("village"));
        assert_eq!(groups.category_at(4, 4), Some("castle"));
        assert_ne!(groups.groups.get(0, 0), groups.groups.get(4, 4));
    }

    #[test]
    fn test_same_category_blobs_apart_stay_apart() {
        let grid = grid_from_rows(&["V.V", "...", "V.V"]);
        let groups = make_groups(&grid, &Blacklist::default());
        assert_eq!(groups.defs.len(), 4);
    }

    #[test]
    fn test_u_shape_is_merged() {
        // The two arms are seeded independently and only meet at the bottom.
        let grid = grid_from_rows(&["V.V", "V.V", "VVV"]);
        let groups = make_groups(&grid, &Blacklist::default());

        assert_eq!(groups.defs.len(), 1);
        let by_group = cells_by_group(&groups);
        assert_eq!(by_group.values().next().unwrap().len(), 7);
    }

    #[test]
    fn test_main_diagonal_connects() {
        let grid = grid_from_rows(&["V..", ".V.", "..V"]);
        let groups = make_groups(&grid, &Blacklist::default());
        assert_eq!(groups.defs.len(), 1);
    }

    #[test]
    fn test_anti_diagonal_does_not_connect() {
        let grid = grid_from_rows(&[".V", "V."]);
        let groups = make_groups(&grid, &Blacklist::default());
        assert_eq!(groups.defs.len(), 2);
    }

    #[test]
    fn test_different_categories_touching() {
        let grid = grid_from_rows(&["VC", "VC"]);
        let groups = make_groups(&grid, &Blacklist::default());

        assert_eq!(groups.defs.len(), 2);
        assert_eq!(groups.groups.get(0, 0), groups.groups.get(0, 1));
        assert_eq!(groups.groups.get(1, 0), groups.groups.get(1, 1));
    }

    #[test]
    fn test_adjacency_suffixes_are_ignored() {
        let overlay = StructureOverlay::new(3)
            .with(0, 0, "village_e")
            .with(1, 0, "village_w")
            .with(1, 1, "village_n");
        let groups = make_groups(&overlay, &Blacklist::default());

        assert_eq!(groups.defs.len(), 1);
        assert_eq!(groups.defs.values().next().unwrap(), "village");
        assert_eq!(groups.groups.len(), 3);
    }

    #[test]
    fn test_every_live_id_has_a_definition() {
        let grid = grid_from_rows(&["VVCV", "CVCV", "VVVV", "C.CC"]);
        let groups = make_groups(&grid, &Blacklist::default());

        for (_, _, id) in groups.groups.iter() {
            assert!(groups.defs.contains_key(&id), "group {} has no definition", id);
        }
        for id in groups.defs.keys() {
            assert!(groups.groups.iter().any(|(_, _, g)| g == *id), "group {} is empty", id);
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Any axis-aligned rectangle of one category becomes exactly one
            /// group covering all of its cells.
            #[test]
            fn test_rectangle_is_single_group(
                size in 2u32..12,
                x0 in 0u32..12,
                y0 in 0u32..12,
                w in 1u32..12,
                h in 1u32..12,
            ) {
                let x0 = x0 % size;
                let y0 = y0 % size;
                let x1 = (x0 + w - 1).min(size - 1);
                let y1 = (y0 + h - 1).min(size - 1);

                let grid = WorldGrid::from_fn(size, |x, y| {
                    if (x0..=x1).contains(&x) && (y0..=y1).contains(&y) { "castle" } else { "" }
                });
                let groups = make_groups(&grid, &Blacklist::default());

                prop_assert_eq!(groups.defs.len(), 1);
                prop_assert_eq!(groups.groups.len() as u32, (x1 - x0 + 1) * (y1 - y0 + 1));
            }

            /// No two touching groups (orthogonally or along the main
            /// diagonal) share a category after merging.
            #[test]
            fn test_touching_groups_differ_in_category(
                cells in proptest::collection::vec(0u8..3, 36)
            ) {
                let grid = WorldGrid::from_fn(6, |x, y| {
                    match cells[(y * 6 + x) as usize] {
                        0 => "",
                        1 => "village",
                        _ => "castle",
                    }
                });
                let groups = make_groups(&grid, &Blacklist::default());

                for (x, y, id) in groups.groups.iter() {
                    for (nx, ny) in forward_neighbours(x, y, 6) {
                        if let Some(other) = groups.groups.get(nx, ny) {
                            if other != id {
                                prop_assert_ne!(&groups.defs[&id], &groups.defs[&other]);
                            }
                        }
                    }
                }
            }
        }
    }
}
