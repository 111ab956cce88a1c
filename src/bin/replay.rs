// Standalone replay tool for analyzing Battlesnake debug logs
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                  Replay all turns
//   --turns <turn1,turn2>  Replay specific turns (comma-separated)
//   --validate <T:M,...>   Check logged moves against expectations
//   --verbose              Show detailed output for each turn
//   --config <path>        Path to Snake.toml (default: Snake.toml)

use std::env;
use std::process;

use strangler_snake::config::Config;
use strangler_snake::replay::ReplayEngine;
use strangler_snake::types::Direction;

enum Mode {
    All,
    Turns(Vec<i32>),
    Validate(Vec<(i32, Vec<Direction>)>),
}

fn print_usage() {
    eprintln!("Battlesnake Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                   Replay all turns in the log");
    eprintln!("  --turns <T1,T2,...>     Replay specific turns (comma-separated)");
    eprintln!("  --validate <T:M,...>    Validate expected moves (format: turn:move,...)");
    eprintln!("  --verbose               Show detailed output for each turn");
    eprintln!("  --config <path>         Path to Snake.toml (default: Snake.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  replay battlesnake_debug.jsonl --all");
    eprintln!("  replay battlesnake_debug.jsonl --turns 5,10,15");
    eprintln!("  replay battlesnake_debug.jsonl --validate 5:up,10:right|down");
}

fn parse_turns(s: &str) -> Result<Vec<i32>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<i32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", t, e))
        })
        .collect()
}

/// `turn:move` pairs; several acceptable moves are separated by '|'
fn parse_expected_moves(s: &str) -> Result<Vec<(i32, Vec<Direction>)>, String> {
    s.split(',')
        .map(|pair| {
            let (turn, moves) = pair
                .trim()
                .split_once(':')
                .ok_or_else(|| format!("Invalid format '{}'. Expected 'turn:move'", pair))?;

            let turn = turn
                .parse::<i32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", turn, e))?;

            let moves = moves
                .split('|')
                .map(|m| m.trim().parse::<Direction>())
                .collect::<Result<Vec<_>, _>>()?;

            Ok((turn, moves))
        })
        .collect()
}

fn fail(message: String) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let wants_help = args.iter().any(|a| a == "--help");

    if args.len() < 2 || wants_help {
        print_usage();
        process::exit(if wants_help { 0 } else { 1 });
    }

    let log_file = &args[1];
    let mut config_path = "Snake.toml".to_string();
    let mut verbose = false;
    let mut mode = None;

    let mut rest = args[2..].iter();
    while let Some(arg) = rest.next() {
        let mut value = |flag: &str| {
            rest.next()
                .cloned()
                .unwrap_or_else(|| fail(format!("{} requires an argument", flag)))
        };

        match arg.as_str() {
            "--all" => mode = Some(Mode::All),
            "--turns" => {
                let turns = parse_turns(&value("--turns")).unwrap_or_else(|e| fail(e));
                mode = Some(Mode::Turns(turns));
            }
            "--validate" => {
                let expected = parse_expected_moves(&value("--validate")).unwrap_or_else(|e| fail(e));
                mode = Some(Mode::Validate(expected));
            }
            "--config" => config_path = value("--config"),
            "--verbose" => verbose = true,
            other => {
                print_usage();
                fail(format!("Unknown option '{}'", other));
            }
        }
    }

    let Some(mode) = mode else {
        print_usage();
        fail("Must specify --all, --turns, or --validate".to_string());
    };

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    println!("Loaded configuration from: {}", config_path);
    println!("Replay log file: {}", log_file);
    println!();

    let engine = ReplayEngine::new(config, verbose);

    let entries = engine
        .load_log_file(log_file)
        .unwrap_or_else(|e| fail(format!("loading log file: {}", e)));

    if entries.is_empty() {
        fail("Log file is empty".to_string());
    }

    println!("Loaded {} log entries\n", entries.len());

    match mode {
        Mode::All => {
            println!("Replaying all {} turns...\n", entries.len());
            let results = engine.replay_all(&entries);
            engine.print_report(&results);
        }
        Mode::Turns(turns) => {
            println!("Replaying {} specific turn(s)...\n", turns.len());
            match engine.replay_turns(&entries, &turns) {
                Ok(results) => engine.print_report(&results),
                Err(e) => fail(format!("during replay: {}", e)),
            }
        }
        Mode::Validate(expected) => {
            println!("Validating {} expected move(s)...\n", expected.len());
            match engine.validate_expected_moves(&entries, &expected) {
                Ok(()) => println!("✓ All expected moves validated successfully!"),
                Err(e) => {
                    eprintln!("✗ Validation failed: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}
