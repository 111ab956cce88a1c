// Welcome to
// __________         __    __  .__                               __
// \______   \_____ _/  |__/  |_|  |   ____   ______ ____ _____  |  | __ ____
//  |    |  _/\__  \\   __\   __\  | _/ __ \ /  ___//    \\__  \ |  |/ // __ \
//  |    |   \ / __ \|  |  |  | |  |_\  ___/ \___ \|   |  \/ __ \|    <\  ___/
//  |________/(______/__|  |__| |____/\_____>______>___|__(______/__|__\\_____>
//
// The Bot owns static configuration and exposes one method per API endpoint.
// Move selection itself lives in `decision`; this file only wires it up.

use log::{error, info, warn};
use serde_json::{json, Value};
use std::time::Instant;

use crate::config::Config;
use crate::debug_logger::{DebugLogger, LogEntry};
use crate::decision::{Decision, DecisionEngine};
use crate::error::EngineError;
use crate::types::{Battlesnake, Board, Game};

/// Battlesnake Bot with OOP-style API
/// Takes static configuration dependencies and exposes methods corresponding to API endpoints
pub struct Bot {
    config: Config,
    logger: DebugLogger,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        Self::with_logger(config, DebugLogger::disabled())
    }

    /// Creates a Bot that records every decision to `logger`
    pub fn with_logger(config: Config, logger: DebugLogger) -> Self {
        Bot { config, logger }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns bot metadata and appearance
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        let appearance = &self.config.appearance;
        json!({
            "apiversion": "1",
            "author": appearance.author,
            "color": appearance.color,
            "head": appearance.head,
            "tail": appearance.tail,
            "version": appearance.version,
        })
    }

    /// Called when a game starts
    /// Corresponds to POST /start endpoint
    pub fn start(&self, game: &Game, _turn: &i32, board: &Board, _you: &Battlesnake) {
        info!(
            "GAME START {} ({}x{}, {} snakes)",
            game.id,
            board.width,
            board.height,
            board.snakes.len()
        );
    }

    /// Called when a game ends
    /// Corresponds to POST /end endpoint
    pub fn end(&self, game: &Game, turn: &i32, _board: &Board, _you: &Battlesnake) {
        info!("GAME OVER {} after {} turns", game.id, turn);
    }

    /// Computes and returns the next move
    /// Corresponds to POST /move endpoint
    ///
    /// The decision is CPU-bound, so it runs on tokio's blocking pool rather
    /// than on the async executor. Every request works on its own copy of
    /// the board; nothing is shared between turns.
    ///
    /// # Returns
    /// * `Ok(Value)` - `{"move": ..., "shout": ...}`
    /// * `Err(EngineError)` - the request did not describe a valid board
    pub async fn get_move(
        &self,
        game: &Game,
        turn: &i32,
        board: &Board,
        you: &Battlesnake,
    ) -> Result<Value, EngineError> {
        let start_time = Instant::now();

        info!("Turn {}: Computing move", turn);

        let board_owned = board.clone();
        let you_id = you.id.clone();
        let config = self.config.clone();

        let outcome = tokio::task::spawn_blocking(move || {
            let mut rng = rand::rng();
            DecisionEngine::new(&config).decide(&board_owned, &you_id, &mut rng)
        })
        .await;

        let decision = match outcome {
            Ok(Ok(decision)) => decision,
            Ok(Err(e)) => {
                warn!("Turn {}: rejecting request: {}", turn, e);
                return Err(e);
            }
            Err(e) => {
                error!("Turn {}: decision worker failed: {}", turn, e);
                Decision::fallback(self.config.strategy.fallback_direction)
            }
        };

        info!(
            "Turn {}: Chose {} ({:?}, time: {}ms)",
            turn,
            decision.direction,
            decision.stage,
            start_time.elapsed().as_millis()
        );

        if self.logger.is_enabled() {
            self.logger
                .log_move(LogEntry::new(*turn, &game.id, &you.id, board.clone(), &decision));
        }

        Ok(json!({
            "move": decision.direction.as_str(),
            "shout": decision.stage.shout(),
        }))
    }
}
