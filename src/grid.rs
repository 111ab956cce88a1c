// Per-turn board snapshot and occupancy sets
//
// A Grid is built once per request and never mutated. Every evaluation
// step derives its own Occupancy from it; simulated moves copy the set
// before inserting so alternative candidates never see each other's cells.

use std::collections::HashSet;

use crate::error::EngineError;
use crate::types::{Battlesnake, Board, Coord, Direction};

/// Which tail segments are treated as free when building occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailPolicy {
    /// Drop a snake's tail only when it is about to vacate (not growing)
    Vacating,
    /// Drop every snake's tail
    AllFree,
}

/// Set of blocked cells for one evaluation step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Occupancy {
    cells: HashSet<Coord>,
}

impl Occupancy {
    pub fn new() -> Self {
        Occupancy::default()
    }

    pub fn contains(&self, coord: &Coord) -> bool {
        self.cells.contains(coord)
    }

    pub fn insert(&mut self, coord: Coord) -> bool {
        self.cells.insert(coord)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Copy of this set with one more blocked cell
    pub fn with(&self, coord: Coord) -> Occupancy {
        let mut next = self.clone();
        next.insert(coord);
        next
    }
}

impl FromIterator<Coord> for Occupancy {
    fn from_iter<I: IntoIterator<Item = Coord>>(iter: I) -> Self {
        Occupancy {
            cells: iter.into_iter().collect(),
        }
    }
}

impl Extend<Coord> for Occupancy {
    fn extend<I: IntoIterator<Item = Coord>>(&mut self, iter: I) {
        self.cells.extend(iter);
    }
}

/// Immutable view of one turn: bounds, food, hazards, snakes and which one is ours
#[derive(Debug)]
pub struct Grid<'a> {
    pub width: i32,
    pub height: i32,
    pub food: HashSet<Coord>,
    pub hazards: HashSet<Coord>,
    pub snakes: &'a [Battlesnake],
    you: usize,
    avoid_hazards: bool,
}

impl<'a> Grid<'a> {
    /// Validates the request and builds the snapshot.
    /// `you_id` must name a snake with a non-empty body on the board.
    pub fn new(board: &'a Board, you_id: &str, avoid_hazards: bool) -> Result<Self, EngineError> {
        if board.width <= 0 || board.height <= 0 {
            return Err(EngineError::InvalidDimensions {
                width: board.width,
                height: board.height,
            });
        }

        let you = board
            .snakes
            .iter()
            .position(|s| s.id == you_id)
            .ok_or_else(|| EngineError::MissingSnake(you_id.to_string()))?;

        if let Some(empty) = board.snakes.iter().find(|s| s.body.is_empty()) {
            return Err(EngineError::EmptyBody(empty.id.clone()));
        }

        Ok(Grid {
            width: board.width,
            height: board.height,
            food: board.food.iter().copied().collect(),
            hazards: board.hazards.iter().copied().collect(),
            snakes: &board.snakes,
            you,
            avoid_hazards,
        })
    }

    pub fn you(&self) -> &'a Battlesnake {
        &self.snakes[self.you]
    }

    pub fn head(&self) -> Coord {
        self.you().body[0]
    }

    /// Every snake except ours
    pub fn opponents(&self) -> impl Iterator<Item = &'a Battlesnake> + '_ {
        let you = self.you;
        self.snakes
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != you)
            .map(|(_, s)| s)
    }

    /// In-bounds cardinal neighbors of `coord`, ignoring occupancy
    pub fn adjacent(&self, coord: &Coord) -> impl Iterator<Item = Coord> {
        let (coord, width, height) = (*coord, self.width, self.height);
        Direction::all()
            .into_iter()
            .map(move |dir| dir.apply(&coord))
            .filter(move |next| next.x >= 0 && next.x < width && next.y >= 0 && next.y < height)
    }

    /// In-bounds cardinal neighbors of `coord` not in `occupied`.
    /// Order is always up, down, left, right.
    pub fn neighbors(&self, coord: &Coord, occupied: &Occupancy) -> Vec<Coord> {
        self.adjacent(coord)
            .filter(|next| !occupied.contains(next))
            .collect()
    }

    /// Blocked cells for this turn under the given tail policy
    pub fn occupancy(&self, tails: TailPolicy) -> Occupancy {
        self.occupancy_with_vacated(tails, None)
    }

    /// Like [`Grid::occupancy`], additionally freeing the tail end of one snake.
    /// `vacated` is `(snake index, segments)`.
    pub fn occupancy_with_vacated(
        &self,
        tails: TailPolicy,
        vacated: Option<(usize, usize)>,
    ) -> Occupancy {
        let mut occupied = Occupancy::new();

        for (i, snake) in self.snakes.iter().enumerate() {
            let mut drop = match tails {
                TailPolicy::AllFree => 1,
                TailPolicy::Vacating if snake.tail_vacates() => 1,
                TailPolicy::Vacating => 0,
            };
            if let Some((index, segments)) = vacated {
                if index == i {
                    drop = drop.max(segments);
                }
            }
            // The head never vacates
            let keep = snake.body.len().saturating_sub(drop).max(1);
            occupied.extend(snake.body[..keep].iter().copied());
        }

        if self.avoid_hazards {
            occupied.extend(self.hazards.iter().copied());
        }

        occupied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake(id: &str, body: &[(i32, i32)], length: i32) -> Battlesnake {
        let body: Vec<Coord> = body.iter().map(|&(x, y)| Coord::new(x, y)).collect();
        Battlesnake {
            id: id.to_string(),
            name: id.to_string(),
            health: 80,
            head: body[0],
            body,
            length,
            latency: "0".to_string(),
            shout: None,
        }
    }

    fn board(snakes: Vec<Battlesnake>) -> Board {
        Board {
            width: 7,
            height: 7,
            food: vec![],
            snakes,
            hazards: vec![Coord::new(0, 0)],
        }
    }

    #[test]
    fn test_rejects_non_positive_dimensions() {
        let mut b = board(vec![snake("me", &[(3, 3)], 1)]);
        b.width = 0;
        assert_eq!(
            Grid::new(&b, "me", true).unwrap_err(),
            EngineError::InvalidDimensions { width: 0, height: 7 }
        );
    }

    #[test]
    fn test_rejects_missing_snake() {
        let b = board(vec![snake("other", &[(3, 3)], 1)]);
        assert_eq!(
            Grid::new(&b, "me", true).unwrap_err(),
            EngineError::MissingSnake("me".to_string())
        );
    }

    #[test]
    fn test_neighbors_are_ordered_and_filtered() {
        let b = board(vec![snake("me", &[(0, 1), (0, 2)], 2)]);
        let grid = Grid::new(&b, "me", true).unwrap();
        let occupied = grid.occupancy(TailPolicy::Vacating);

        // (0, 2) is our tail and vacates; (0, 0) is a hazard; x = -1 is off board
        assert_eq!(
            grid.neighbors(&Coord::new(0, 1), &occupied),
            vec![Coord::new(0, 2), Coord::new(1, 1)]
        );
        assert_eq!(
            grid.neighbors(&Coord::new(0, 1), &Occupancy::new()),
            vec![Coord::new(0, 2), Coord::new(0, 0), Coord::new(1, 1)]
        );
    }

    #[test]
    fn test_growing_snake_keeps_tail() {
        let b = board(vec![
            snake("me", &[(3, 3), (3, 2), (3, 1)], 3),
            snake("fed", &[(5, 3), (5, 2)], 3),
        ]);
        let grid = Grid::new(&b, "me", false).unwrap();

        let strict = grid.occupancy(TailPolicy::Vacating);
        assert!(!strict.contains(&Coord::new(3, 1)));
        assert!(strict.contains(&Coord::new(5, 2)));
        assert!(!strict.contains(&Coord::new(0, 0)));

        let relaxed = grid.occupancy(TailPolicy::AllFree);
        assert!(!relaxed.contains(&Coord::new(5, 2)));
        assert!(relaxed.contains(&Coord::new(5, 3)));
    }

    #[test]
    fn test_vacated_segments_never_free_the_head() {
        let b = board(vec![snake("me", &[(3, 3), (3, 2), (3, 1)], 3)]);
        let grid = Grid::new(&b, "me", false).unwrap();
        let occupied = grid.occupancy_with_vacated(TailPolicy::Vacating, Some((0, 10)));
        assert_eq!(occupied.len(), 1);
        assert!(occupied.contains(&Coord::new(3, 3)));
    }

    #[test]
    fn test_with_copies_instead_of_mutating() {
        let base: Occupancy = [Coord::new(1, 1)].into_iter().collect();
        let moved = base.with(Coord::new(2, 2));
        assert_eq!(base.len(), 1);
        assert_eq!(moved.len(), 2);
    }

    #[test]
    fn test_opponents_skip_you() {
        let b = board(vec![
            snake("a", &[(1, 3)], 1),
            snake("me", &[(3, 3)], 1),
            snake("b", &[(5, 3)], 1),
        ]);
        let grid = Grid::new(&b, "me", true).unwrap();
        let ids: Vec<&str> = grid.opponents().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(grid.head(), Coord::new(3, 3));
    }
}
