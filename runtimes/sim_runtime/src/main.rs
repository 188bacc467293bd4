// Sim Runtime - headless locomotion runtime for scripted playthroughs
//
// Drives a VR character through a small demo level with recorded-style input
// tracks (walk, teleport, climb) and prints a JSON summary of each run. Set
// LOCOMOTION_LOG (e.g. "climb=debug,teleport=info") to see per-system logs.

mod level;
mod report;
mod scenario;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use engine::Time;
use locomotion::{LocalPlayerController, LocomotionConfig, VRCharacter};
use serde_json::json;
use tracing::info;

use crate::{
    report::{FrameSnapshot, ScenarioSummary, SummaryBuilder},
    scenario::Scenario,
};

const VIEWPORT: (u32, u32) = (1832, 1920);

#[derive(Parser)]
#[command(name = "sim_runtime")]
#[command(about = "Headless runtime that plays scripted VR locomotion scenarios")]
struct Args {
    /// Locomotion config file (defaults to ./locomotion.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scenario to play
    #[arg(short, long, value_enum, default_value = "all")]
    scenario: Scenario,

    /// Number of frames to simulate per scenario
    #[arg(short, long, default_value = "240")]
    frames: u32,

    /// Duration of one frame (e.g. "11ms" for 90Hz)
    #[arg(long, default_value = "11ms", value_parser = humantime::parse_duration)]
    frame_time: Duration,

    /// Print a JSON snapshot after every frame
    #[arg(long)]
    trace_frames: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    engine::logging::init_logging("LOCOMOTION_LOG");

    let config = LocomotionConfig::load(args.config.as_deref())
        .context("Failed to load locomotion config")?;

    let mut summaries = Vec::new();
    for scenario in args.scenario.expand() {
        info!("Playing scenario {:?} for {} frames", scenario, args.frames);
        summaries.push(run_scenario(scenario, &config, &args)?);
    }

    let output = serde_json::to_string_pretty(&json!({ "scenarios": summaries }))
        .context("Failed to serialize summary")?;
    println!("{}", output);
    Ok(())
}

fn run_scenario(
    scenario: Scenario,
    config: &LocomotionConfig,
    args: &Args,
) -> Result<ScenarioSummary> {
    let level = level::build().context("Failed to build demo level")?;

    let spawn = scenario.spawn_location();
    let mut character = VRCharacter::new(config.clone(), spawn);
    character.possess(Box::new(LocalPlayerController::new("sim", VIEWPORT)));
    character.begin_play();

    let mut summary = SummaryBuilder::new(scenario, character.location());
    let mut time = Time::new();
    for frame in 0..args.frames {
        time = time.advance(args.frame_time);
        let input = scenario.input_at(frame);
        character.tick(&time, &input, &level.world, &level.nav);
        summary.record(character.location());

        if args.trace_frames {
            let snapshot = FrameSnapshot::capture(frame, &time, &character);
            println!("{}", serde_json::to_string(&snapshot)?);
        }
    }

    let summary = summary.finish(
        character.movement_mode(),
        character.teleport().path_renderer().pool_size(),
    );
    info!(
        "Scenario {:?} finished at {:?} ({:?})",
        scenario, summary.end, summary.final_mode
    );
    Ok(summary)
}
