// Bounded breadth-first distance search
//
// Finds the shortest path from a start cell to the nearest of a set of
// targets. Targets may sit on occupied cells (an opponent head) and are
// still reported; occupied cells are never expanded through.

use std::collections::{HashSet, VecDeque};

use crate::grid::{Grid, Occupancy};
use crate::types::{Battlesnake, Coord};

/// Rivals that may claim a target before the mover gets there
#[derive(Debug, Clone)]
pub struct Contest<'s> {
    pub rivals: Vec<&'s Battlesnake>,
    pub mover_len: usize,
}

impl<'s> Contest<'s> {
    pub fn new(rivals: Vec<&'s Battlesnake>, mover_len: usize) -> Self {
        Contest { rivals, mover_len }
    }

    /// True when no rival reaches `target` within `distance` moves.
    /// A shorter rival loses a tie, so it needs one move less.
    fn mover_wins(&self, grid: &Grid, occupied: &Occupancy, target: Coord, distance: usize) -> bool {
        let goal: HashSet<Coord> = [target].into_iter().collect();

        !self.rivals.iter().any(|rival| {
            let limit = if rival.declared_len() < self.mover_len {
                match distance.checked_sub(1) {
                    Some(limit) => limit,
                    None => return false,
                }
            } else {
                distance
            };
            distance_to(grid, occupied, &goal, rival.body[0], limit, None).is_some()
        })
    }
}

/// Shortest distance from `start` to any cell in `targets`, searching at most
/// `max_depth` steps. `None` means no target is reachable within the cutoff
/// (or every reachable one is won by a rival under `contest`).
pub fn distance_to(
    grid: &Grid,
    occupied: &Occupancy,
    targets: &HashSet<Coord>,
    start: Coord,
    max_depth: usize,
    contest: Option<&Contest>,
) -> Option<usize> {
    let accepts = |cell: Coord, distance: usize| match contest {
        Some(c) => c.mover_wins(grid, occupied, cell, distance),
        None => true,
    };

    if targets.is_empty() {
        return None;
    }
    if targets.contains(&start) && accepts(start, 0) {
        return Some(0);
    }

    let mut visited = occupied.clone();
    visited.insert(start);
    let mut judged: HashSet<Coord> = HashSet::new();

    let mut queue = VecDeque::new();
    queue.push_back((start, 0));

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }

        for next in grid.adjacent(&current) {
            let distance = depth + 1;

            if targets.contains(&next) && judged.insert(next) && accepts(next, distance) {
                return Some(distance);
            }

            if visited.insert(next) {
                queue.push_back((next, distance));
            }
        }
    }

    None
}
