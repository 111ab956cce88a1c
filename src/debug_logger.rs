// Debug logging module for asynchronous game state logging
//
// This module provides fire-and-forget async logging to avoid blocking
// the main request/response cycle. Each turn's state is written to a JSONL file
// that the replay tool can read back.

use log::error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::decision::{Decision, Stage};
use crate::types::{Board, Direction};

/// One line of the turn log
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub turn: i32,
    pub game_id: String,
    pub you_id: String,
    pub chosen_move: Direction,
    #[serde(default)]
    pub stage: Option<Stage>,
    pub board: Board,
    pub timestamp: String,
}

impl LogEntry {
    pub fn new(turn: i32, game_id: &str, you_id: &str, board: Board, decision: &Decision) -> Self {
        LogEntry {
            turn,
            game_id: game_id.to_string(),
            you_id: you_id.to_string(),
            chosen_move: decision.direction,
            stage: Some(decision.stage),
            board,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Shared debug logger state
/// Uses Arc<Mutex<File>> to allow concurrent async writes from multiple tasks
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Creates a new debug logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                log::info!("Debug logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Logs a move decision asynchronously (fire-and-forget)
    /// This spawns a tokio task that writes to the file without blocking
    pub fn log_move(&self, entry: LogEntry) {
        if !self.enabled {
            return;
        }

        let file_handle = self.file.clone();
        tokio::spawn(async move {
            Self::write_entry(file_handle, entry).await;
        });
    }

    /// Appends one entry and flushes
    async fn write_entry(file_handle: Arc<Mutex<Option<File>>>, entry: LogEntry) {
        let mut file_guard = file_handle.lock().await;

        let Some(file) = file_guard.as_mut() else {
            return;
        };

        match serde_json::to_string(&entry) {
            Ok(json_line) => {
                let line_with_newline = format!("{}\n", json_line);
                if let Err(e) = file.write_all(line_with_newline.as_bytes()).await {
                    error!("Failed to write debug log entry: {}", e);
                } else if let Err(e) = file.flush().await {
                    error!("Failed to flush debug log: {}", e);
                }
            }
            Err(e) => {
                error!("Failed to serialize debug log entry: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coord;

    fn entry() -> LogEntry {
        let board = Board {
            width: 3,
            height: 3,
            food: vec![],
            snakes: vec![],
            hazards: vec![],
        };
        let decision = Decision {
            direction: Direction::Left,
            target: Some(Coord::new(0, 1)),
            stage: Stage::Space,
        };
        LogEntry::new(4, "game", "me", board, &decision)
    }

    #[test]
    fn test_entry_round_trips_through_json() {
        let line = serde_json::to_string(&entry()).unwrap();
        assert!(line.contains("\"chosen_move\":\"left\""));
        assert!(line.contains("\"stage\":\"space\""));

        let parsed: LogEntry = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed.turn, 4);
        assert_eq!(parsed.stage, Some(Stage::Space));
    }

    #[tokio::test]
    async fn test_enabled_logger_writes_jsonl() {
        let path = std::env::temp_dir().join(format!("debug_logger_test_{}.jsonl", std::process::id()));
        let path_str = path.to_string_lossy().to_string();

        let logger = DebugLogger::new(true, &path_str).await;
        assert!(logger.is_enabled());

        DebugLogger::write_entry(logger.file.clone(), entry()).await;
        DebugLogger::write_entry(logger.file.clone(), entry()).await;

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_disabled_logger_is_noop() {
        let logger = DebugLogger::disabled();
        assert!(!logger.is_enabled());
        // No runtime needed: nothing is spawned when disabled
        logger.log_move(entry());
    }
}
