//! Pixel Heist headless driver
//!
//! Loads a level and plays it with a scripted thief for a fixed amount of
//! simulated time, logging what the guards do.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use glam::Vec2;

use pixel_heist::consts::*;
use pixel_heist::sim::{GuardState, HeistPhase, HeistState, TickInput, tick};
use pixel_heist::{Level, Tuning};

/// Run a heist level without a window
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Level file
    #[arg(short, long, default_value = "levels/vault.json")]
    level: PathBuf,

    /// RNG seed
    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    /// Simulated seconds to run before giving up
    #[arg(long, default_value_t = 120.0)]
    seconds: f32,

    /// Optional tuning overrides (JSON)
    #[arg(short, long)]
    tuning: Option<PathBuf>,
}

/// Frame time the driver pretends to render at
const FRAME_DT: f32 = 1.0 / 45.0;

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let level = match Level::load(&args.level) {
        Ok(level) => level,
        Err(e) => {
            log::error!("Failed to load {}: {}", args.level.display(), e);
            return ExitCode::FAILURE;
        }
    };
    let tuning = args
        .tuning
        .as_deref()
        .map(Tuning::load_or_default)
        .unwrap_or_default();

    let mut state = HeistState::new(level, tuning, args.seed);
    let mut input = TickInput {
        toggle_crouch: true,
        ..Default::default()
    };
    let mut accumulator = 0.0;
    let mut elapsed = 0.0;
    let mut alerted = false;

    while elapsed < args.seconds && state.phase == HeistPhase::Playing {
        elapsed += FRAME_DT;
        accumulator += FRAME_DT;

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            script(&state, &mut input);
            tick(&mut state, &input, SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            input.toggle_crouch = false;
            input.toggle_run = false;
        }

        let now_alerted = state.any_alerted();
        if now_alerted != alerted {
            alerted = now_alerted;
            if alerted {
                log::warn!("Spotted at {:.1}s", elapsed);
            } else {
                log::info!("Guards lost track at {:.1}s", elapsed);
            }
        }
    }

    for guard in &state.guards {
        log::info!(
            "guard {}: {:?} at ({:.0}, {:.0}), suspicion {:.0}",
            guard.id,
            guard.state,
            guard.pos().x,
            guard.pos().y,
            guard.suspicion
        );
    }
    let searching = state
        .guards
        .iter()
        .filter(|g| g.state == GuardState::Searching)
        .count();
    log::info!(
        "{:?} after {:.1}s: stole {} of {} ({} guards still searching)",
        state.phase,
        elapsed,
        state.loot.collected_value,
        state.loot.total_value,
        searching
    );

    ExitCode::SUCCESS
}

/// Head for the closest loot, work it, then make for the exit
fn script(state: &HeistState, input: &mut TickInput) {
    let pos = state.player.pos();
    let reach = state.tuning.heist.steal_reach;

    if state.stealing.is_some() {
        input.move_dir = Vec2::ZERO;
        input.steal = true;
        return;
    }

    let target = if state.loot.collected_value == 0 {
        state
            .loot
            .items
            .iter()
            .map(|item| item.pos)
            .min_by(|a, b| {
                a.distance_squared(pos)
                    .partial_cmp(&b.distance_squared(pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or_else(|| state.extraction_point())
    } else {
        state.extraction_point()
    };

    let to_target = target - pos;
    input.steal = state.loot.collected_value == 0 && to_target.length() <= reach * 0.5;
    input.move_dir = if input.steal {
        Vec2::ZERO
    } else {
        to_target.normalize_or_zero()
    };
}
