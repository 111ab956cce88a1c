// Replay module for analyzing historical game states and debugging decision-making
//
// This module provides functionality to:
// 1. Parse JSONL debug logs
// 2. Re-run the decision engine on historical boards
// 3. Compare logged vs replayed moves
// 4. Generate analysis reports

use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::config::Config;
use crate::debug_logger::LogEntry;
use crate::decision::{DecisionEngine, Stage};
use crate::error::ReplayError;
use crate::types::Direction;

/// Result of replaying a single turn
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub turn: i32,
    pub original_move: Direction,
    pub replayed_move: Direction,
    pub matches: bool,
    pub original_stage: Option<Stage>,
    pub replayed_stage: Stage,
    pub computation_time_us: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default, PartialEq)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing debug logs
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
}

impl ReplayEngine {
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine { config, verbose }
    }

    /// Loads all log entries from a JSONL file, skipping blank lines
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, ReplayError> {
        let reader = BufReader::new(File::open(log_path.as_ref())?);
        let mut entries = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let entry: LogEntry = serde_json::from_str(&line).map_err(|source| ReplayError::Json {
                line: index + 1,
                source,
            })?;
            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Re-runs the engine on one logged board.
    ///
    /// The RNG is seeded from the turn number so a random tie-break replays
    /// the same way every time.
    pub fn replay_entry(&self, entry: &LogEntry) -> Result<ReplayResult, ReplayError> {
        let start_time = Instant::now();
        let mut rng = StdRng::seed_from_u64(entry.turn as u64);

        let decision = DecisionEngine::new(&self.config).decide(&entry.board, &entry.you_id, &mut rng)?;

        let result = ReplayResult {
            turn: entry.turn,
            original_move: entry.chosen_move,
            replayed_move: decision.direction,
            matches: entry.chosen_move == decision.direction,
            original_stage: entry.stage,
            replayed_stage: decision.stage,
            computation_time_us: start_time.elapsed().as_micros(),
        };

        if self.verbose {
            if result.matches {
                info!(
                    "Turn {}: MATCH - {} ({:?})",
                    result.turn, result.replayed_move, result.replayed_stage
                );
            } else {
                warn!(
                    "Turn {}: MISMATCH - Original: {}, Replayed: {} ({:?})",
                    result.turn, result.original_move, result.replayed_move, result.replayed_stage
                );
            }
        }

        Ok(result)
    }

    /// Replays every entry in parallel; entries that fail are reported and skipped.
    /// Results come back in log order.
    pub fn replay_all(&self, entries: &[LogEntry]) -> Vec<ReplayResult> {
        entries
            .par_iter()
            .filter_map(|entry| match self.replay_entry(entry) {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", entry.turn, e);
                    None
                }
            })
            .collect()
    }

    /// Replays specific turns; a turn missing from the log is an error
    pub fn replay_turns(
        &self,
        entries: &[LogEntry],
        turn_numbers: &[i32],
    ) -> Result<Vec<ReplayResult>, ReplayError> {
        let selected = turn_numbers
            .iter()
            .map(|turn| {
                entries
                    .iter()
                    .find(|e| e.turn == *turn)
                    .cloned()
                    .ok_or(ReplayError::TurnNotFound(*turn))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.replay_all(&selected))
    }

    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches: total_turns - matches,
            match_rate,
        }
    }

    /// Prints a summary followed by every mismatch
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Turns:    {}", stats.total_turns);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let avg_time = results
                .iter()
                .map(|r| r.computation_time_us as f64)
                .sum::<f64>()
                / results.len() as f64;
            println!("Average Computation Time:   {:.1}us\n", avg_time);
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "Turn {}: {} → {} (logged stage: {:?}, replayed stage: {:?})",
                    result.turn,
                    result.original_move,
                    result.replayed_move,
                    result.original_stage,
                    result.replayed_stage
                );
            }
            println!();
        }
    }

    /// Checks that the logged move for each turn is one of the acceptable moves
    pub fn validate_expected_moves(
        &self,
        entries: &[LogEntry],
        expected_moves: &[(i32, Vec<Direction>)],
    ) -> Result<(), ReplayError> {
        for (turn, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn)
                .ok_or(ReplayError::TurnNotFound(*turn))?;

            if !acceptable.contains(&entry.chosen_move) {
                return Err(ReplayError::UnexpectedMove {
                    turn: *turn,
                    expected: acceptable.clone(),
                    actual: entry.chosen_move,
                });
            }
        }

        Ok(())
    }
}
