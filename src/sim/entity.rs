//! Closed set of entity kinds living in a heist

use super::geometry::{Bounded, Rect};
use super::guard::Guard;
use super::loot::LootItem;
use super::player::Player;
use crate::level::Obstacle;

/// Borrowed view of any entity in the world
#[derive(Debug, Clone, Copy)]
pub enum Entity<'a> {
    Player(&'a Player),
    Guard(&'a Guard),
    Loot(&'a LootItem),
    Obstacle(&'a Obstacle),
}

impl Entity<'_> {
    pub fn bounds(&self) -> Rect {
        match self {
            Entity::Player(p) => p.bounds(),
            Entity::Guard(g) => g.bounds(),
            Entity::Loot(l) => l.bounds(),
            Entity::Obstacle(o) => o.bounds(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Entity::Player(_) => "player",
            Entity::Guard(_) => "guard",
            Entity::Loot(_) => "loot",
            Entity::Obstacle(_) => "obstacle",
        }
    }

    /// Whether other bodies are stopped by this entity
    pub fn is_solid(&self) -> bool {
        matches!(self, Entity::Obstacle(_))
    }
}

impl Bounded for Entity<'_> {
    fn bounds(&self) -> Rect {
        Entity::bounds(self)
    }
}
