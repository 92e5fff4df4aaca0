//! Headless Battle Tower simulator.
//!
//! Loads content from `VALE_CONTENT_DIR`, plays a seeded tower run with the
//! auto planner against scripted enemies, logs the battle through `tracing`
//! (stderr) and prints the run report as JSON (stdout).
mod config;
mod runner;

use anyhow::{Result, bail};
use config::SimConfig;
use runner::{RunReport, TowerSimulation};
use vale_content::{ContentFactory, validate_party};

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    dotenvy::dotenv().ok();

    setup_logging();

    let config = SimConfig::from_env();
    tracing::info!(
        content_dir = %config.content_dir.display(),
        seed = config.seed,
        difficulty = %config.difficulty,
        "starting tower simulation"
    );

    let bundle = ContentFactory::new(&config.content_dir).load_bundle()?;

    let issues = validate_party(&bundle.content, &config.party);
    if !issues.is_empty() {
        for issue in &issues {
            tracing::error!("{issue}");
        }
        bail!("invalid party: {} issue(s)", issues.len());
    }

    let sim = TowerSimulation::new(&bundle.content, bundle.config.battle.clone());
    let mut team = sim.build_team(&config.party)?;
    let run = sim.run(
        config.seed,
        config.difficulty,
        bundle.floors,
        bundle.config.tower,
        &mut team,
    )?;

    tracing::info!(
        completed = run.is_completed(),
        failed = run.is_failed(),
        highest_floor = run.stats().highest_floor,
        "tower simulation finished"
    );

    let report = RunReport::new(&run, &team);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Logs to stderr so stdout carries only the report.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
