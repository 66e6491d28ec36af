use ahash::AHashMap;
use clap::Parser;
use kumiko::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Instant;
use tracing::{Level, info, warn};

// --- Script Format ---
// A replay script is a JSON array of canvas commands. A `create` step may name
// the node it creates with `"as"`, and later steps can use that name wherever
// a node id is expected.

#[derive(Deserialize)]
struct ScriptStep {
    #[serde(rename = "as", default)]
    alias: Option<String>,
    #[serde(flatten)]
    command: CanvasCommand,
}

#[derive(Serialize)]
struct Rejection {
    step: usize,
    error: String,
}

#[derive(Serialize)]
struct ReplayReport {
    outcomes: Vec<CommandOutcome>,
    rejections: Vec<Rejection>,
    snapshot: CanvasSnapshot,
}

/// Replays canvas editing commands and prints the resulting graph snapshot
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the JSON command script
    script_path: String,

    /// Optional layout configuration JSON (probe size, container floor, padding)
    #[arg(short, long)]
    config: Option<String>,

    /// Optional handle table JSON replacing the built-in one
    #[arg(long)]
    handles: Option<String>,

    /// Only connect array ports to array ports and scalar ports to scalar ports
    #[arg(long)]
    strict_ports: bool,

    /// Pretty-print the JSON report
    #[arg(short, long)]
    pretty: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let total_start = Instant::now();

    // --- 1. Canvas Setup ---
    let mut builder = Canvas::builder();
    if let Some(path) = &cli.config {
        let config = LayoutConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load layout config: {}", e)));
        builder = builder.with_config(config);
    }
    if let Some(path) = &cli.handles {
        let registry = HandleRegistry::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load handle table: {}", e)));
        builder = builder.with_handle_registry(registry);
    }
    if cli.strict_ports {
        builder = builder.with_compatibility(ArityMatch);
    }
    let mut canvas = builder.build();

    // --- 2. Script Loading ---
    let script_json = fs::read_to_string(&cli.script_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read script file '{}': {}",
            &cli.script_path, e
        ))
    });
    let steps: Vec<ScriptStep> = serde_json::from_str(&script_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse script JSON: {}", e)));
    info!(steps = steps.len(), path = %cli.script_path, "loaded script");

    // --- 3. Replay ---
    let replay_start = Instant::now();
    let report = replay(&mut canvas, steps);
    info!(
        applied = report.outcomes.len(),
        rejected = report.rejections.len(),
        elapsed = ?replay_start.elapsed(),
        "replay finished"
    );

    // --- 4. Output ---
    let output = if cli.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize report: {}", e)));
    println!("{}", output);

    info!(elapsed = ?total_start.elapsed(), "done");
}

fn replay(canvas: &mut Canvas, steps: Vec<ScriptStep>) -> ReplayReport {
    let mut aliases: AHashMap<String, NodeId> = AHashMap::new();
    let mut outcomes = Vec::new();
    let mut rejections = Vec::new();

    for (step, ScriptStep { alias, command }) in steps.into_iter().enumerate() {
        let command = resolve_aliases(command, &aliases);
        match canvas.apply(command) {
            Ok(outcome) => {
                if let (Some(alias), CommandOutcome::Created { node_id }) = (alias, &outcome) {
                    aliases.insert(alias, node_id.clone());
                }
                outcomes.push(outcome);
            }
            Err(e) => {
                warn!(step, error = %e, "command rejected");
                rejections.push(Rejection {
                    step,
                    error: e.to_string(),
                });
            }
        }
    }

    ReplayReport {
        outcomes,
        rejections,
        snapshot: canvas.snapshot(),
    }
}

/// Swaps script aliases for the ids the canvas actually assigned.
fn resolve_aliases(command: CanvasCommand, aliases: &AHashMap<String, NodeId>) -> CanvasCommand {
    let lookup = |id: NodeId| aliases.get(id.as_str()).cloned().unwrap_or(id);
    match command {
        CanvasCommand::Connect(mut request) => {
            request.source = lookup(request.source);
            request.target = lookup(request.target);
            CanvasCommand::Connect(request)
        }
        CanvasCommand::Reposition(mut request) => {
            request.node_id = lookup(request.node_id);
            CanvasCommand::Reposition(request)
        }
        CanvasCommand::Remove(mut request) => {
            request.node_id = lookup(request.node_id);
            CanvasCommand::Remove(request)
        }
        create @ CanvasCommand::Create(_) => create,
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
