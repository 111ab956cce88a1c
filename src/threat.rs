// Adversarial checks on a single candidate cell
//
// Head-to-head: which opponents could also move into the candidate next turn.
// Confinement: whether taking the candidate squeezes an opponent's living
// space below its own length without boxing ourselves in.

use crate::flood_fill::{best_neighbor_area, reachable_area};
use crate::grid::{Grid, Occupancy};
use crate::types::{Battlesnake, Coord};

/// Outcome of a possible head-to-head on a candidate cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// No opponent head is next to the cell
    Clear,
    /// Every opponent that can reach the cell is strictly shorter
    Winning,
    /// Some opponent that can reach the cell is at least as long as us
    Losing,
}

/// Opponents whose head is one step from `candidate`, ignoring occupancy
pub fn colliding_snakes<'s>(grid: &Grid<'s>, candidate: &Coord) -> Vec<&'s Battlesnake> {
    let reach: Vec<Coord> = grid.neighbors(candidate, &Occupancy::new());
    grid.opponents()
        .filter(|s| reach.contains(&s.body[0]))
        .collect()
}

pub fn classify(rivals: &[&Battlesnake], mover_len: usize) -> Collision {
    if rivals.is_empty() {
        Collision::Clear
    } else if rivals.iter().any(|r| r.declared_len() >= mover_len) {
        Collision::Losing
    } else {
        Collision::Winning
    }
}

pub fn collision_at(grid: &Grid, candidate: &Coord) -> Collision {
    classify(&colliding_snakes(grid, candidate), grid.you().declared_len())
}

/// Opponent living space measured once per turn, before any simulated move
#[derive(Debug)]
pub struct ConfinementCheck<'s> {
    baseline: Vec<(&'s Battlesnake, usize)>,
}

impl<'s> ConfinementCheck<'s> {
    pub fn new(grid: &Grid<'s>, occupied: &Occupancy) -> Self {
        let baseline = grid
            .opponents()
            .map(|s| (s, reachable_area(grid, occupied, s.body[0])))
            .collect();
        ConfinementCheck { baseline }
    }

    /// First opponent whose space shrinks below its length once `candidate` is taken
    pub fn strangled(
        &self,
        grid: &Grid,
        occupied: &Occupancy,
        candidate: Coord,
    ) -> Option<&'s Battlesnake> {
        let simulated = occupied.with(candidate);

        self.baseline.iter().find_map(|&(snake, before)| {
            let after = reachable_area(grid, &simulated, snake.body[0]);
            (after < before && after < snake.declared_len()).then_some(snake)
        })
    }

    /// Like [`ConfinementCheck::strangled`], but only when we keep more room
    /// than our own length after the move.
    pub fn confining_move(
        &self,
        grid: &Grid,
        occupied: &Occupancy,
        candidate: Coord,
    ) -> Option<&'s Battlesnake> {
        let victim = self.strangled(grid, occupied, candidate)?;
        let own_space = best_neighbor_area(grid, &occupied.with(candidate), &candidate);
        (own_space > grid.you().declared_len()).then_some(victim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TailPolicy;
    use crate::types::Board;

    fn snake(id: &str, body: &[(i32, i32)], length: i32) -> Battlesnake {
        let body: Vec<Coord> = body.iter().map(|&(x, y)| Coord::new(x, y)).collect();
        Battlesnake {
            id: id.to_string(),
            name: id.to_string(),
            health: 100,
            head: body[0],
            length,
            body,
            latency: String::new(),
            shout: None,
        }
    }

    fn board(width: i32, height: i32, snakes: Vec<Battlesnake>) -> Board {
        Board {
            width,
            height,
            food: vec![],
            snakes,
            hazards: vec![],
        }
    }

    #[test]
    fn test_collision_classification() {
        let b = board(
            7,
            7,
            vec![
                snake("me", &[(3, 3), (3, 2), (3, 1)], 3),
                snake("small", &[(5, 3), (5, 2)], 2),
                snake("big", &[(1, 4), (0, 4), (0, 3), (0, 2)], 4),
            ],
        );
        let grid = Grid::new(&b, "me", true).unwrap();

        assert_eq!(collision_at(&grid, &Coord::new(4, 3)), Collision::Winning);
        assert_eq!(collision_at(&grid, &Coord::new(2, 3)), Collision::Clear);
        assert_eq!(collision_at(&grid, &Coord::new(1, 3)), Collision::Losing);
        assert_eq!(collision_at(&grid, &Coord::new(3, 4)), Collision::Clear);

        let rivals = colliding_snakes(&grid, &Coord::new(4, 3));
        assert_eq!(rivals.len(), 1);
        assert_eq!(rivals[0].id, "small");
    }

    #[test]
    fn test_equal_length_rival_is_losing() {
        let b = board(
            7,
            7,
            vec![
                snake("me", &[(3, 3), (3, 2)], 2),
                snake("twin", &[(5, 3), (5, 2)], 2),
            ],
        );
        let grid = Grid::new(&b, "me", true).unwrap();
        assert_eq!(collision_at(&grid, &Coord::new(4, 3)), Collision::Losing);
    }

    #[test]
    fn test_sealing_a_corridor_strangles_opponent() {
        // 5x3 board. The opponent sits in a dead-end pocket on the left whose
        // only exit is (1,1); we are long enough to live on the right side.
        //
        // y=2  # # # . .
        // y=1  p . m m m
        // y=0  # # # . .
        let walls = snake("walls", &[(2, 2), (1, 2), (0, 2), (0, 0), (1, 0), (2, 0)], 7);
        let prey = snake("prey", &[(0, 1)], 4);
        let me = snake("me", &[(2, 1), (3, 1), (4, 1)], 3);
        let b = board(5, 3, vec![me, prey, walls]);
        let grid = Grid::new(&b, "me", true).unwrap();
        let occupied = grid.occupancy(TailPolicy::Vacating);

        let check = ConfinementCheck::new(&grid, &occupied);
        let victim = check.strangled(&grid, &occupied, Coord::new(1, 1));
        assert_eq!(victim.map(|s| s.id.as_str()), Some("prey"));
    }

    #[test]
    fn test_confinement_rejected_when_suicidal() {
        // Same pocket, but taking (1,1) would leave us with no way out
        let walls = snake(
            "walls",
            &[(3, 0), (3, 2), (2, 2), (1, 2), (0, 2), (0, 0), (1, 0), (2, 0), (4, 0)],
            10,
        );
        let prey = snake("prey", &[(0, 1)], 4);
        let me = snake("me", &[(2, 1), (3, 1), (4, 1)], 3);
        let b = board(5, 3, vec![me, prey, walls]);
        let grid = Grid::new(&b, "me", true).unwrap();
        let occupied = grid.occupancy(TailPolicy::Vacating);

        let check = ConfinementCheck::new(&grid, &occupied);
        assert!(check.strangled(&grid, &occupied, Coord::new(1, 1)).is_some());
        assert!(check.confining_move(&grid, &occupied, Coord::new(1, 1)).is_none());
    }

    #[test]
    fn test_no_confinement_on_open_board() {
        let b = board(
            7,
            7,
            vec![
                snake("me", &[(3, 3), (3, 2), (3, 1)], 3),
                snake("them", &[(5, 3), (5, 2)], 2),
            ],
        );
        let grid = Grid::new(&b, "me", true).unwrap();
        let occupied = grid.occupancy(TailPolicy::Vacating);
        let check = ConfinementCheck::new(&grid, &occupied);
        assert!(check.confining_move(&grid, &occupied, Coord::new(3, 4)).is_none());
    }
}
