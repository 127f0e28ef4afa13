//! Courtside Replay CLI
//!
//! Replay the scripted game under a virtual clock, check its invariants,
//! export timelines, or watch it play out live.

use anyhow::{bail, Context, Result};
use clap::Parser;
use courtside_core::{GameFixture, GameStatus, MockGameProjector, ProjectorConfig};
use courtside_env::{CourtsideContext, TokioContext};
use courtside_sim::scenarios::ScenarioId;
use courtside_sim::{ScenarioResult, ScenarioRunner, SimContext};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Courtside deterministic replay CLI
#[derive(Parser, Debug)]
#[command(name = "courtside-sim")]
#[command(about = "Replay and check the Courtside mock game projector", long_about = None)]
struct Args {
    /// Master seed for determinism (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Number of consecutive seeds to run (for CI mode)
    #[arg(long, default_value = "1")]
    seeds: usize,

    /// Scenario to run (full_period, reset_mid_game, clock_expiry, random_jumps, recent_window, concurrent_readers, all)
    #[arg(short = 'S', long, default_value = "all")]
    scenario: String,

    /// Virtual seconds per tick
    #[arg(short, long, default_value = "1")]
    tick: u64,

    /// Period length in seconds
    #[arg(short, long, default_value = "720")]
    period: u32,

    /// Game fixture JSON (defaults to the built-in LAL @ POR quarter)
    #[arg(short, long)]
    fixture: Option<String>,

    /// Export the replay timeline to a JSON file
    #[arg(long)]
    export: Option<String>,

    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,

    /// Watch the game play out in real time instead of running scenarios
    #[arg(long)]
    live: bool,

    /// Game seconds per real second in live mode
    #[arg(long, default_value = "1.0")]
    speed: f64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { "debug" } else { "info" };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let fixture = match &args.fixture {
        Some(path) => GameFixture::from_json_file(path)
            .with_context(|| format!("Failed to load fixture {}", path))?,
        None => GameFixture::lal_at_por(),
    };

    if args.live {
        let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
        return runtime.block_on(watch_live(&fixture, args.period, args.speed));
    }

    if !args.json {
        info!("Courtside Replay Simulator v0.1.0");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    // Parse scenarios
    let scenarios: Vec<ScenarioId> = if args.scenario == "all" {
        ScenarioId::all()
    } else {
        match args.scenario.parse() {
            Ok(id) => vec![id],
            Err(e) => {
                let names: Vec<&str> = ScenarioId::all().iter().map(|s| s.name()).collect();
                bail!("{} (available: {}, all)", e, names.join(", "));
            }
        }
    };

    // Determine base seed
    let base_seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    } else {
        args.seed
    };

    // Handle --export mode
    if let Some(export_path) = &args.export {
        if scenarios.len() > 1 {
            bail!("--export only supports a single scenario, not 'all'");
        }

        let runner = ScenarioRunner::new(base_seed)
            .with_tick(args.tick)
            .with_period(args.period)
            .with_fixture(fixture);
        let (result, export) = runner.run_recorded(scenarios[0]);

        export
            .write_to_file(export_path)
            .with_context(|| format!("Failed to write export {}", export_path))?;
        info!("Exported {} frames to {}", export.frames.len(), export_path);

        if !result.passed {
            error!(
                "✗ {} FAILED: {}",
                result.scenario.name(),
                result.failure_reason.as_deref().unwrap_or("unknown")
            );
            if !args.json {
                result.report.print();
            }
            std::process::exit(1);
        }
        info!("✓ {} (seed={}) PASSED", result.scenario.name(), base_seed);
        return Ok(());
    }

    // Run replays
    let mut all_results: Vec<ScenarioResult> = Vec::new();

    for seed_offset in 0..args.seeds {
        let seed = base_seed.wrapping_add(seed_offset as u64);

        let runner = ScenarioRunner::new(seed)
            .with_tick(args.tick)
            .with_period(args.period)
            .with_fixture(fixture.clone());

        for scenario in &scenarios {
            let result = runner.run(*scenario);

            if !args.json {
                if result.passed {
                    info!("✓ {} (seed={}) PASSED", scenario.name(), seed);
                } else {
                    error!(
                        "✗ {} (seed={}) FAILED: {}",
                        scenario.name(),
                        seed,
                        result.failure_reason.as_deref().unwrap_or("unknown")
                    );
                    result.report.print();
                }
            }

            all_results.push(result);
        }
    }

    // Summary
    let total = all_results.len();
    let failed_count = all_results.iter().filter(|r| !r.passed).count();
    let passed = total - failed_count;

    if args.json {
        // JSON output for CI parsing
        let summary = serde_json::json!({
            "total": total,
            "passed": passed,
            "failed": failed_count,
            "results": all_results,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        info!("");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        if failed_count == 0 {
            info!("✅ All {} scenario runs passed!", total);
        } else {
            error!("❌ {}/{} scenario runs failed!", failed_count, total);

            for result in all_results.iter().filter(|r| !r.passed) {
                error!(
                    "  - {} seed={}: {}",
                    result.scenario.name(),
                    result.seed,
                    result.failure_reason.as_deref().unwrap_or("unknown")
                );
            }
        }
    }

    // Exit with proper code for CI
    if failed_count > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Plays the game out against real time, printing plays as they happen.
///
/// Real time is paced by `TokioContext`; the projector reads a virtual clock
/// that moves `speed` game seconds per real second.
async fn watch_live(fixture: &GameFixture, period: u32, speed: f64) -> Result<()> {
    if !speed.is_finite() || speed <= 0.0 {
        bail!("--speed must be a positive number, got {}", speed);
    }

    let pacer = TokioContext::shared();
    let game_clock = SimContext::shared(0);
    let config = ProjectorConfig::default().with_period_length(period);
    let projector = MockGameProjector::from_fixture(fixture, Arc::clone(&game_clock), config);
    let game_id = projector.game().game_id.clone();

    let game = projector.game();
    info!(
        "Watching {} @ {} ({}x speed)",
        game.away.abbreviation, game.home.abbreviation, speed
    );

    let tick = Duration::from_millis(250);
    let mut printed = 0usize;
    loop {
        let feed = projector.play_by_play(&game_id);
        for entry in feed.iter().skip(printed) {
            println!(
                "[{}] {:<4} {:<70} {:>3}-{:<3}",
                entry.clock,
                game.team(entry.team).abbreviation,
                entry.description,
                entry.home_score,
                entry.away_score
            );
        }
        printed = feed.len();

        let details = projector.game_details(&game_id);
        if details.status == GameStatus::Final {
            info!(
                "Final: {} {} - {} {}",
                details.home_team, details.home_score, details.away_score, details.away_team
            );
            return Ok(());
        }

        pacer.sleep(tick).await;
        game_clock.advance_time(tick.mul_f64(speed));
    }
}
