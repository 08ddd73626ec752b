//! Pixel Heist - top-down stealth heist simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (guards, kinematics, loot, orchestration)
//! - `level`: Tile-grid level import
//! - `tuning`: Data-driven game balance

pub mod level;
pub mod sim;
pub mod tuning;

pub use level::{Level, LevelError, Obstacle, TileKind};
pub use tuning::{GuardTuning, HeistTuning, PlayerTuning, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matches the per-tick player speeds)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default tile edge length in pixels
    pub const TILE_SIZE: u32 = 16;

    /// Line-of-sight sampling step (arc length between probes)
    pub const LOS_STEP: f32 = 5.0;
    /// Edge length of the square probe used at each line-of-sight sample
    pub const LOS_PROBE_SIZE: f32 = 4.0;

    /// Loot item footprint
    pub const LOOT_SIZE: f32 = 16.0;

    /// Number of arc segments in a rendered vision cone
    pub const VISION_CONE_SEGMENTS: usize = 20;
}

/// Normalize an angle in degrees to [-180, 180)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 180.0 { wrapped - 360.0 } else { wrapped }
}

/// Absolute angular difference between two bearings, in [0, 180]
#[inline]
pub fn angle_between_degrees(a: f32, b: f32) -> f32 {
    normalize_degrees(a - b).abs()
}

/// Bearing of a vector in degrees (0 = +x, 90 = +y / screen down)
#[inline]
pub fn heading_degrees(v: Vec2) -> f32 {
    v.y.atan2(v.x).to_degrees()
}

/// Unit vector pointing along a bearing given in degrees
#[inline]
pub fn direction_from_degrees(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}
