// Library exports for the Battlesnake bot
// This allows the replay tool and integration tests to use the core decision logic

pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod decision;
pub mod distance;
pub mod error;
pub mod flood_fill;
pub mod grid;
pub mod replay;
pub mod threat;
pub mod types;
