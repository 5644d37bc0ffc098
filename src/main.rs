//! Breakout Core headless runner
//!
//! Plays the simulation with the autopilot at a fixed timestep and logs what
//! happens.

use std::path::PathBuf;
use std::process::ExitCode;

use breakout_core::consts::TICKS_PER_SECOND;
use breakout_core::platform::Autopilot;
use breakout_core::sim::{GameEvent, GamePhase, GameState, tick};
use breakout_core::{BoardConfig, PaddleZones};
use clap::Parser;

const DEFAULT_MAX_TICKS: u64 = 60 * 60 * TICKS_PER_SECOND as u64;

#[derive(Parser, Debug)]
#[command(name = "breakout-core")]
#[command(about = "Headless deterministic brick-breaker run driven by the autopilot")]
struct Args {
    /// Seed for the launch RNG
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,
    /// JSON board config; missing fields take the classic defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Stop after this many ticks even if the game is still running
    #[arg(long, default_value_t = DEFAULT_MAX_TICKS)]
    max_ticks: u64,
    /// Override the paddle zone split (wide, thirds)
    #[arg(long, value_parser = parse_zones)]
    zones: Option<PaddleZones>,
}

fn parse_zones(s: &str) -> Result<PaddleZones, String> {
    PaddleZones::from_str(s).ok_or_else(|| format!("unknown paddle zones '{s}'"))
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    log::info!("Breakout Core (headless) starting...");

    let mut config = match &args.config {
        Some(path) => match BoardConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("Failed to load {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => BoardConfig::default(),
    };
    if let Some(zones) = args.zones {
        config.paddle_zones = zones;
    }

    let mut state = match GameState::new(config, args.seed) {
        Ok(state) => state,
        Err(err) => {
            log::error!("Invalid board config: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut pilot = Autopilot::new(state.config());
    log::info!(
        "Seed {}, paddle zones {}, {} lives",
        state.seed(),
        state.config().paddle_zones.as_str(),
        state.lives()
    );

    let mut ticks = 0u64;
    while ticks < args.max_ticks && !state.is_game_over() {
        // The autopilot serves every ball itself
        if state.phase() == GamePhase::Stopped {
            state.start_pressed();
        }

        pilot.observe(&state);
        tick(&mut state, &mut pilot);
        ticks += 1;

        for event in state.events() {
            match event {
                GameEvent::BrickDestroyed { .. } | GameEvent::PaddleHit { .. } => {
                    log::trace!("tick {ticks}: {event:?}")
                }
                _ => log::debug!("tick {ticks}: {event:?}"),
            }
        }
    }

    let bricks = state.brick_grid_snapshot().present_count();
    log::info!(
        "Finished after {} ticks ({:.1}s): score {}, high score {}, lives {}, {} bricks left",
        ticks,
        ticks as f64 / f64::from(TICKS_PER_SECOND),
        state.score(),
        state.high_score(),
        state.lives(),
        bricks
    );
    println!(
        "seed={} ticks={} score={} high_score={} game_over={}",
        state.seed(),
        ticks,
        state.score(),
        state.high_score(),
        state.is_game_over()
    );
    ExitCode::SUCCESS
}
