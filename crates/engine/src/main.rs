// Headless driver: executes JSON commands from stdin against a harness.
// One command or command-array per line; one JSON response per line.

use std::io::BufRead;

use playscape_engine_lib::command::{execute_json, execute_json_batch};
use playscape_engine_lib::harness::TestHarness;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "playscape_engine=info".into()),
        )
        .init();

    let mut harness = TestHarness::new();

    if let Some(path) = parse_project_arg() {
        match std::fs::read_to_string(&path) {
            Ok(json) => match harness.load_project_json(&json) {
                Ok(()) => tracing::info!(
                    "loaded project from {path} ({} entities)",
                    harness.entity_count()
                ),
                Err(e) => tracing::error!("failed to load project {path}: {e}"),
            },
            Err(e) => tracing::error!("failed to read project file {path}: {e}"),
        }
    }

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("stdin read failed: {e}");
                break;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let output = if trimmed.starts_with('[') {
            execute_json_batch(&mut harness, trimmed)
                .map(|responses| serde_json::to_string(&responses).unwrap_or_default())
        } else {
            execute_json(&mut harness, trimmed)
                .map(|response| serde_json::to_string(&response).unwrap_or_default())
        };

        match output {
            Ok(json) => println!("{json}"),
            Err(e) => println!("{{\"success\": false, \"error\": {:?}}}", e),
        }
    }
}

fn parse_project_arg() -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--project" && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
        i += 1;
    }
    None
}
