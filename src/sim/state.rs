//! Heist state: the live-entity collection for one level
//!
//! The level (and so every obstacle) is owned here and never mutated after
//! load. Guards and loot are owned by value; nothing is shared between
//! collections.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::geometry::{Bounded, Rect};
use super::guard::{Guard, GuardState};
use super::loot::{LootKind, LootManager};
use super::player::Player;
use crate::level::Level;
use crate::tuning::Tuning;

/// Current phase of a heist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeistPhase {
    /// Active gameplay
    Playing,
    /// An alerted guard reached the player
    Caught,
    /// Player reached the extraction point with loot
    Escaped,
}

/// Complete heist state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct HeistState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Single random source for detection draws, search wandering and loot rolls
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub level: Level,
    pub player: Player,
    /// Spawn order, which is id order
    pub guards: Vec<Guard>,
    pub loot: LootManager,
    pub phase: HeistPhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Loot item the player is currently working on
    pub stealing: Option<u32>,
    pub score: u64,
    next_guard_id: u32,
}

impl HeistState {
    /// Populate a level: player at its spawn, a guard per guard spawn and an
    /// item of rolled loot on every loot tile
    pub fn new(level: Level, tuning: Tuning, seed: u64) -> Self {
        let half_tile = Vec2::splat(level.tile_size as f32 / 2.0);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            player: Player::new(level.player_spawn + half_tile, tuning.player),
            guards: Vec::new(),
            loot: LootManager::new(),
            phase: HeistPhase::Playing,
            time_ticks: 0,
            stealing: None,
            score: 0,
            next_guard_id: 1,
            level,
        };

        let spawns = state.level.guard_spawns.clone();
        for spawn in spawns {
            state.spawn_guard(spawn.pos + half_tile, spawn.route);
        }

        let loot_spots: Vec<(Vec2, Option<LootKind>)> = state
            .level
            .loot_tiles
            .iter()
            .map(|t| {
                let kind = t
                    .properties
                    .get("kind")
                    .and_then(|v| v.as_str())
                    .and_then(LootKind::from_str);
                (t.rect.center(), kind)
            })
            .collect();
        for (pos, kind) in loot_spots {
            state.loot.generate(pos, kind, None, &mut state.rng);
        }

        log::info!(
            "Heist ready: {} guards, {} loot items worth {}",
            state.guards.len(),
            state.loot.items.len(),
            state.loot.total_value
        );
        state
    }

    pub fn spawn_guard(&mut self, pos: Vec2, route: Vec<Vec2>) -> u32 {
        let id = self.next_guard_id;
        self.next_guard_id += 1;
        self.guards.push(Guard::new(id, pos, route, self.tuning.guard));
        id
    }

    /// Center of the extraction tile
    pub fn extraction_point(&self) -> Vec2 {
        self.level.extraction + Vec2::splat(self.level.tile_size as f32 / 2.0)
    }

    /// Guards get no player while they stand inside a vent
    pub fn player_hidden(&self) -> bool {
        self.level.in_vent(self.player.pos())
    }

    pub fn any_alerted(&self) -> bool {
        self.guards.iter().any(|g| g.state == GuardState::Alerted)
    }

    /// Every entity in draw order: obstacles, loot, guards, player
    pub fn entities(&self) -> Vec<Entity<'_>> {
        let mut out = Vec::with_capacity(
            self.level.obstacles.len() + self.loot.items.len() + self.guards.len() + 1,
        );
        out.extend(self.level.obstacles.iter().map(Entity::Obstacle));
        out.extend(self.loot.items.iter().map(Entity::Loot));
        out.extend(self.guards.iter().map(Entity::Guard));
        out.push(Entity::Player(&self.player));
        out
    }

    /// Entities whose bounds overlap `rect`
    pub fn entities_in(&self, rect: &Rect) -> Vec<Entity<'_>> {
        self.entities()
            .into_iter()
            .filter(|e| e.bounds().intersects(rect))
            .collect()
    }

    /// Whether the player currently overlaps `other`
    pub fn touches_player<T: Bounded>(&self, other: &T) -> bool {
        self.player.bounds().intersects(&other.bounds())
    }
}
