//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod entity;
pub mod geometry;
pub mod guard;
pub mod kinematics;
pub mod loot;
pub mod player;
pub mod state;
pub mod tick;

pub use entity::Entity;
pub use geometry::{
    Bounded, Rect, circle_collisions, line_of_sight, point_in_circle, point_in_polygon,
    point_in_rect, rect_collisions,
};
pub use guard::{Guard, GuardState, Perception, detection_probability};
pub use kinematics::Body;
pub use loot::{LootItem, LootKind, LootManager};
pub use player::{Player, PlayerMode};
pub use state::{HeistPhase, HeistState};
pub use tick::{TickInput, tick};
