//! Data-driven game balance
//!
//! Every table carries `#[serde(default)]`, so a tuning file only needs the
//! values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to read or parse a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid tuning file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Guard movement, timing and perception
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardTuning {
    /// Patrol/investigate speed (pixels per second)
    pub walk_speed: f32,
    /// Chase speed (pixels per second)
    pub run_speed: f32,
    /// Pause at each waypoint (seconds)
    pub patrol_wait: f32,
    /// Distance at which a waypoint counts as reached
    pub waypoint_radius: f32,
    /// Distance at which an investigation point counts as reached
    pub investigate_radius: f32,
    /// Time spent looking around before resuming patrol (seconds)
    pub suspicious_duration: f32,
    /// Time spent wandering after losing the player (seconds)
    pub search_duration: f32,
    /// Per-tick chance of picking a new heading while searching
    pub search_turn_chance: f32,
    /// Look-around sweep amplitude while suspicious (degrees)
    pub look_amplitude: f32,
    /// Look-around sweep rate (radians of sine phase per second)
    pub look_rate: f32,
    pub view_distance: f32,
    /// Full cone width (degrees)
    pub view_angle: f32,
    /// Fraction of view distance a guard hears even a faint noise at
    pub hearing_factor: f32,
    /// Suspicion lost per second while patrolling
    pub suspicion_decay: f32,
    /// Suspicion floor after hearing a noise
    pub heard_suspicion: f32,
    /// Collision footprint edge length
    pub size: f32,
}

impl Default for GuardTuning {
    fn default() -> Self {
        Self {
            walk_speed: 90.0,
            run_speed: 180.0,
            patrol_wait: 2.0,
            waypoint_radius: 2.0,
            investigate_radius: 5.0,
            suspicious_duration: 3.0,
            search_duration: 10.0,
            search_turn_chance: 0.02,
            look_amplitude: 45.0,
            look_rate: 2.0,
            view_distance: 150.0,
            view_angle: 90.0,
            hearing_factor: 0.3,
            suspicion_decay: 5.0,
            heard_suspicion: 50.0,
            size: 32.0,
        }
    }
}

/// Player movement and noise
///
/// Speeds are per-tick deltas: the player integrates `pos += vel` once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub walk_speed: f32,
    pub run_speed: f32,
    pub crouch_speed: f32,
    /// Velocity multiplier applied every tick, in (0, 1)
    pub friction: f32,
    /// Acceleration per tick as a fraction of the current speed cap
    pub acceleration: f32,
    pub size: f32,
    pub crouch_noise: f32,
    pub walk_noise: f32,
    pub run_noise: f32,
    /// Flat noise while working on a loot item
    pub looting_noise: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            walk_speed: 2.0,
            run_speed: 4.0,
            crouch_speed: 1.0,
            friction: 0.85,
            acceleration: 0.1,
            size: 24.0,
            crouch_noise: 5.0,
            walk_noise: 10.0,
            run_noise: 20.0,
            looting_noise: 10.0,
        }
    }
}

/// Orchestration-level distances
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeistTuning {
    /// How close the player must be to a loot item to work on it
    pub steal_reach: f32,
    /// How close to the extraction point counts as escaping
    pub extraction_radius: f32,
    /// Line-of-sight sampling step
    pub los_step: f32,
}

impl Default for HeistTuning {
    fn default() -> Self {
        Self {
            steal_reach: 32.0,
            extraction_radius: 24.0,
            los_step: crate::consts::LOS_STEP,
        }
    }
}

/// All balance tables
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub guard: GuardTuning,
    pub player: PlayerTuning,
    pub heist: HeistTuning,
}

impl Tuning {
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Load a tuning file, falling back to defaults when it is missing or invalid
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Using default tuning ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }
}
