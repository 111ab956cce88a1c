// Reachability estimation over 4-connected free space

use std::collections::VecDeque;

use crate::grid::{Grid, Occupancy};
use crate::types::Coord;

/// Number of distinct cells reachable from `start` without crossing `occupied`,
/// counting `start` itself.
///
/// Works on a private copy of the occupancy so the caller's snapshot is untouched.
/// `start` may itself be occupied (an opponent head, for example).
pub fn reachable_area(grid: &Grid, occupied: &Occupancy, start: Coord) -> usize {
    let mut visited = occupied.clone();
    visited.insert(start);

    let mut queue = VecDeque::new();
    queue.push_back(start);
    let mut count = 1;

    while let Some(current) = queue.pop_front() {
        for next in grid.neighbors(&current, &visited) {
            visited.insert(next);
            queue.push_back(next);
            count += 1;
        }
    }

    count
}

/// Largest [`reachable_area`] among the open neighbors of `coord`, or 0 when boxed in
pub fn best_neighbor_area(grid: &Grid, occupied: &Occupancy, coord: &Coord) -> usize {
    grid.neighbors(coord, occupied)
        .into_iter()
        .map(|n| reachable_area(grid, occupied, n))
        .max()
        .unwrap_or(0)
}
