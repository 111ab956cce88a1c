// Per-turn move selection
//
// Stages run in a fixed order and the first one that commits wins:
//   1. occupancy (tails that vacate are free, hazards optionally blocked)
//   2. candidates (relaxed to "every tail is free" when boxed in)
//   3. pursuit of the last, shorter opponent
//   4. per-candidate scoring: head-to-head, confinement, space, food, exits
//   5. narrow-space check against tails that open up soon
//   6. fallbacks that always yield a direction

use log::{debug, info};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::{Config, TieBreak};
use crate::distance::{distance_to, Contest};
use crate::error::EngineError;
use crate::flood_fill::reachable_area;
use crate::grid::{Grid, Occupancy, TailPolicy};
use crate::threat::{collision_at, Collision, ConfinementCheck};
use crate::types::{Board, Coord, Direction};

/// The policy stage that committed to a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Pursuit,
    Confinement,
    FoodAdjacent,
    HeadToHead,
    Space,
    NarrowSpace,
    RelaxedFallback,
    Default,
}

impl Stage {
    /// Cosmetic annotation sent back with the move
    pub fn shout(&self) -> &'static str {
        match self {
            Stage::Pursuit => "Here I come!",
            Stage::Confinement => "Closing the door.",
            Stage::FoodAdjacent => "Snack time.",
            Stage::HeadToHead => "Bring it on.",
            Stage::Space => "Stretching out.",
            Stage::NarrowSpace => "Waiting for a gap.",
            Stage::RelaxedFallback => "Squeezing through.",
            Stage::Default => "Nowhere to go.",
        }
    }
}

/// A committed move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub direction: Direction,
    /// Cell the head moves onto; `None` for the fixed default
    pub target: Option<Coord>,
    pub stage: Stage,
}

impl Decision {
    /// Fixed direction used when nothing better is known
    pub fn fallback(direction: Direction) -> Self {
        Decision {
            direction,
            target: None,
            stage: Stage::Default,
        }
    }

    fn toward(head: Coord, cell: Coord, stage: Stage) -> Self {
        Decision {
            direction: Direction::between(&head, &cell),
            target: Some(cell),
            stage,
        }
    }
}

/// Three-key score of a candidate: space, then food distance, then exits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scored {
    cell: Coord,
    space: usize,
    food: Option<usize>,
    exits: usize,
}

impl Scored {
    /// Keys compared in priority order; an exact tie falls through to the next
    fn compare(&self, other: &Scored) -> std::cmp::Ordering {
        use std::cmp::Ordering;

        self.space
            .cmp(&other.space)
            .then_with(|| match (self.food, other.food) {
                (Some(a), Some(b)) => b.cmp(&a),
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                (None, None) => Ordering::Equal,
            })
            .then_with(|| self.exits.cmp(&other.exits))
    }
}

/// Result of the per-candidate pass
enum Evaluation {
    /// A candidate committed on its own (confinement, adjacent food)
    Decided(Coord, Stage),
    /// Best scored candidate plus every candidate that survived the collision check
    Ranked {
        best: Scored,
        stage: Stage,
        survivors: Vec<Coord>,
    },
    Exhausted,
}

/// Stateless move picker; one call per turn
pub struct DecisionEngine<'c> {
    config: &'c Config,
}

impl<'c> DecisionEngine<'c> {
    pub fn new(config: &'c Config) -> Self {
        DecisionEngine { config }
    }

    /// Picks a move for the snake `you_id` on `board`.
    ///
    /// Fails only on malformed input; a boxed-in snake still gets a direction.
    /// `rng` is consulted only when the configured tie-break is random.
    pub fn decide<R: Rng + ?Sized>(
        &self,
        board: &Board,
        you_id: &str,
        rng: &mut R,
    ) -> Result<Decision, EngineError> {
        let grid = Grid::new(board, you_id, self.config.strategy.avoid_hazards)?;
        Ok(self.decide_on(&grid, rng))
    }

    fn decide_on<R: Rng + ?Sized>(&self, grid: &Grid, rng: &mut R) -> Decision {
        let head = grid.head();

        let mut tails = TailPolicy::Vacating;
        let mut occupied = grid.occupancy(tails);
        let mut candidates = grid.neighbors(&head, &occupied);

        if candidates.is_empty() {
            debug!("No open neighbors, assuming every tail vacates");
            tails = TailPolicy::AllFree;
            occupied = grid.occupancy(tails);
            candidates = grid.neighbors(&head, &occupied);
        }

        if candidates.is_empty() {
            info!("Fully enclosed at {}", head);
            return self.default_decision();
        }

        if let Some(cell) = self.pursue(grid, &occupied, &candidates) {
            return Decision::toward(head, cell, Stage::Pursuit);
        }

        match self.evaluate(grid, &occupied, &candidates, rng) {
            Evaluation::Decided(cell, stage) => Decision::toward(head, cell, stage),
            Evaluation::Ranked {
                best,
                stage,
                survivors,
            } => match self.escape_narrow_space(grid, &occupied, tails, &best, &survivors) {
                Some(cell) => Decision::toward(head, cell, Stage::NarrowSpace),
                None => Decision::toward(head, best.cell, stage),
            },
            Evaluation::Exhausted => self.relaxed_fallback(grid, rng),
        }
    }

    /// Chase the only opponent's head when we are longer and healthy
    fn pursue(&self, grid: &Grid, occupied: &Occupancy, candidates: &[Coord]) -> Option<Coord> {
        let me = grid.you();
        let mut opponents = grid.opponents();
        let prey = match (opponents.next(), opponents.next()) {
            (Some(prey), None) => prey,
            _ => return None,
        };

        if me.declared_len() <= prey.declared_len()
            || me.health <= self.config.strategy.pursuit_min_health
            || candidates.iter().any(|c| grid.hazards.contains(c))
        {
            return None;
        }

        let prey_head = prey.body[0];
        let target = HashSet::from([prey_head]);
        let mut best: Option<(Coord, usize)> = None;

        for &cell in candidates {
            let moved = occupied.with(cell);

            // A single exit is a chokepoint; only worth it when the prey is right there
            if grid.neighbors(&cell, &moved).len() <= 1 && !prey_head.is_adjacent(&cell) {
                debug!("Pursuit: skipping chokepoint {}", cell);
                continue;
            }

            let distance = distance_to(
                grid,
                &moved,
                &target,
                cell,
                self.config.search.pursuit_search_depth,
                None,
            );
            if let Some(d) = distance {
                if best.map_or(true, |(_, shortest)| d < shortest) {
                    best = Some((cell, d));
                }
            }
        }

        if let Some((cell, d)) = best {
            info!("Pursuing {} via {} ({} away)", prey.id, cell, d);
        }
        best.map(|(cell, _)| cell)
    }

    fn evaluate<R: Rng + ?Sized>(
        &self,
        grid: &Grid,
        occupied: &Occupancy,
        candidates: &[Coord],
        rng: &mut R,
    ) -> Evaluation {
        let my_len = grid.you().declared_len();
        let confinement = ConfinementCheck::new(grid, occupied);
        let contest = Contest::new(grid.opponents().collect(), my_len);
        // Food under a blocked cell (a hazard when hazards are walls) can never be eaten
        let edible: HashSet<Coord> = grid
            .food
            .iter()
            .copied()
            .filter(|f| !occupied.contains(f))
            .collect();

        let mut best: Option<Scored> = None;
        let mut locked = false;
        let mut ties = 1;
        let mut survivors = Vec::with_capacity(candidates.len());

        for &cell in candidates {
            let moved = occupied.with(cell);
            let space = reachable_area(grid, occupied, cell);
            let exits = grid.neighbors(&cell, &moved).len();

            match collision_at(grid, &cell) {
                Collision::Losing => {
                    debug!("{}: losing head-to-head", cell);
                    continue;
                }
                Collision::Winning => {
                    if space <= my_len {
                        debug!("{}: winnable head-to-head but only {} space", cell, space);
                        continue;
                    }
                    survivors.push(cell);
                    let replace = match best {
                        Some(current) if locked => space > current.space,
                        _ => true,
                    };
                    if replace {
                        debug!("{}: locking in winnable head-to-head ({} space)", cell, space);
                        best = Some(Scored {
                            cell,
                            space,
                            food: None,
                            exits,
                        });
                        locked = true;
                    }
                    continue;
                }
                Collision::Clear => survivors.push(cell),
            }

            if let Some(victim) = confinement.confining_move(grid, occupied, cell) {
                info!("{}: confines {}", cell, victim.id);
                return Evaluation::Decided(cell, Stage::Confinement);
            }

            if locked {
                continue;
            }

            let food = distance_to(
                grid,
                &moved,
                &edible,
                cell,
                self.config.search.food_search_depth,
                Some(&contest),
            );

            if space > my_len + 1 && food == Some(1) {
                debug!("{}: food next door with {} space", cell, space);
                return Evaluation::Decided(cell, Stage::FoodAdjacent);
            }

            let scored = Scored {
                cell,
                space,
                food,
                exits,
            };
            debug!("{}: {:?}", cell, scored);

            match best.map(|current| scored.compare(&current)) {
                None | Some(std::cmp::Ordering::Greater) => {
                    best = Some(scored);
                    ties = 1;
                }
                Some(std::cmp::Ordering::Equal)
                    if self.config.strategy.tie_break == TieBreak::Random =>
                {
                    // Reservoir pick keeps every tied candidate equally likely
                    ties += 1;
                    if rng.random_ratio(1, ties) {
                        best = Some(scored);
                    }
                }
                _ => {}
            }
        }

        match best {
            Some(best) => Evaluation::Ranked {
                best,
                stage: if locked { Stage::HeadToHead } else { Stage::Space },
                survivors,
            },
            None => Evaluation::Exhausted,
        }
    }

    /// When the best room is tight, look for the soonest tail that opens more of
    /// it and move as far from that cell as possible, keeping to stable room.
    fn escape_narrow_space(
        &self,
        grid: &Grid,
        occupied: &Occupancy,
        tails: TailPolicy,
        best: &Scored,
        survivors: &[Coord],
    ) -> Option<Coord> {
        if best.space >= 2 * grid.you().declared_len() {
            return None;
        }

        let opening = self.find_opening(grid, tails, best)?;
        debug!("Narrow space ({}), {} opens soonest", best.space, opening);

        let target = HashSet::from([opening]);
        let mut farthest: Option<(Coord, usize)> = None;

        for &cell in survivors {
            let distance = distance_to(
                grid,
                &occupied.with(cell),
                &target,
                cell,
                self.config.search.opening_search_depth,
                None,
            );
            if let Some(d) = distance {
                if farthest.map_or(true, |(_, longest)| d > longest) {
                    farthest = Some((cell, d));
                }
            }
        }

        farthest.map(|(cell, _)| cell)
    }

    /// Cell whose vacating grows the space around `best` beyond its current size,
    /// searching by number of segments shed, then by snake order.
    fn find_opening(&self, grid: &Grid, tails: TailPolicy, best: &Scored) -> Option<Coord> {
        let longest = grid.snakes.iter().map(|s| s.body.len()).max().unwrap_or(0);

        for segments in 1..longest {
            for (index, snake) in grid.snakes.iter().enumerate() {
                let len = snake.body.len();
                if segments >= len {
                    continue;
                }
                let already_free = tails == TailPolicy::AllFree || snake.tail_vacates();
                if segments == 1 && already_free {
                    continue;
                }

                let opened = grid.occupancy_with_vacated(tails, Some((index, segments)));
                if reachable_area(grid, &opened, best.cell) > best.space {
                    return Some(snake.body[len - segments]);
                }
            }
        }

        None
    }

    /// Best-space neighbor when every tail is assumed to move
    fn relaxed_fallback<R: Rng + ?Sized>(&self, grid: &Grid, rng: &mut R) -> Decision {
        let head = grid.head();
        let occupied = grid.occupancy(TailPolicy::AllFree);

        let options: Vec<(Coord, usize)> = grid
            .neighbors(&head, &occupied)
            .into_iter()
            .map(|cell| (cell, reachable_area(grid, &occupied, cell)))
            .collect();

        let Some(top) = options.iter().map(|&(_, space)| space).max() else {
            return self.default_decision();
        };
        let tied: Vec<Coord> = options
            .iter()
            .filter(|&&(_, space)| space == top)
            .map(|&(cell, _)| cell)
            .collect();

        let pick = match self.config.strategy.tie_break {
            TieBreak::Ordered => tied.first().copied(),
            TieBreak::Random => tied.choose(rng).copied(),
        };

        match pick {
            Some(cell) => {
                info!("No safe candidate, falling back to {}", cell);
                Decision::toward(head, cell, Stage::RelaxedFallback)
            }
            None => self.default_decision(),
        }
    }

    fn default_decision(&self) -> Decision {
        Decision::fallback(self.config.strategy.fallback_direction)
    }
}
