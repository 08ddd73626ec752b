//! Loot items, stealing progress and the loot collection
//!
//! An item never removes itself: `update` reports completion and the owner
//! transfers the value and drops the item afterwards.

use glam::Vec2;
use rand::Rng;
use rand::distr::{Distribution, weighted::WeightedIndex};
use serde::{Deserialize, Serialize};

use super::geometry::{Bounded, Rect};
use crate::consts::LOOT_SIZE;

/// Loot types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LootKind {
    Cash,
    Jewels,
    Artwork,
    Artifact,
    Document,
}

impl LootKind {
    pub const ALL: [LootKind; 5] = [
        LootKind::Cash,
        LootKind::Jewels,
        LootKind::Artwork,
        LootKind::Artifact,
        LootKind::Document,
    ];

    /// Seconds to steal an item of this kind before value scaling
    pub fn base_steal_time(&self) -> f32 {
        match self {
            LootKind::Cash => 1.0,
            LootKind::Jewels => 2.0,
            LootKind::Artwork => 3.0,
            LootKind::Artifact => 4.0,
            LootKind::Document => 1.5,
        }
    }

    /// Relative weight when generating random loot
    pub fn spawn_weight(&self) -> u32 {
        match self {
            LootKind::Cash => 40,
            LootKind::Jewels => 30,
            LootKind::Artwork => 15,
            LootKind::Artifact => 10,
            LootKind::Document => 5,
        }
    }

    /// Inclusive value range for generated items
    pub fn value_range(&self) -> (u32, u32) {
        match self {
            LootKind::Cash => (100, 500),
            LootKind::Jewels => (300, 800),
            LootKind::Artwork => (500, 1500),
            LootKind::Artifact => (1000, 2000),
            LootKind::Document => (2000, 5000),
        }
    }

    /// Steal duration: base time scaled by `1 + value / 1000`
    pub fn steal_time(&self, value: u32) -> f32 {
        self.base_steal_time() * (1.0 + value as f32 / 1000.0)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LootKind::Cash => "cash",
            LootKind::Jewels => "jewels",
            LootKind::Artwork => "artwork",
            LootKind::Artifact => "artifact",
            LootKind::Document => "document",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cash" => Some(LootKind::Cash),
            "jewels" | "jewel" => Some(LootKind::Jewels),
            "artwork" | "art" => Some(LootKind::Artwork),
            "artifact" => Some(LootKind::Artifact),
            "document" | "documents" => Some(LootKind::Document),
            _ => None,
        }
    }
}

/// A stealable item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LootItem {
    pub id: u32,
    pub kind: LootKind,
    pub value: u32,
    pub pos: Vec2,
    /// Seconds of uninterrupted work to take the item
    pub steal_time: f32,
    pub being_stolen: bool,
    /// 0-100
    pub progress: f32,
}

impl LootItem {
    pub fn new(id: u32, kind: LootKind, value: u32, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            value,
            pos,
            steal_time: kind.steal_time(value),
            being_stolen: false,
            progress: 0.0,
        }
    }

    /// Begin stealing. Returns false if a steal is already in progress.
    pub fn start_stealing(&mut self) -> bool {
        if self.being_stolen {
            return false;
        }
        self.being_stolen = true;
        self.progress = 0.0;
        true
    }

    /// Abandon the steal; progress is lost. Returns false if nothing was in progress.
    pub fn stop_stealing(&mut self) -> bool {
        if !self.being_stolen {
            return false;
        }
        self.being_stolen = false;
        self.progress = 0.0;
        true
    }

    /// Advance stealing by `dt` seconds. Returns true once the item is fully taken.
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.being_stolen {
            return false;
        }
        if self.steal_time <= 0.0 {
            self.progress = 100.0;
            return true;
        }
        self.progress = (self.progress + 100.0 / self.steal_time * dt).min(100.0);
        self.progress >= 100.0
    }
}

impl Bounded for LootItem {
    fn bounds(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(LOOT_SIZE))
    }
}

/// Live loot and value bookkeeping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LootManager {
    /// Sorted by id
    pub items: Vec<LootItem>,
    pub total_value: u64,
    pub collected_value: u64,
    next_id: u32,
}

impl LootManager {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            total_value: 0,
            collected_value: 0,
            next_id: 1,
        }
    }

    /// Place a specific item
    pub fn add(&mut self, kind: LootKind, value: u32, pos: Vec2) -> u32 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.items.push(LootItem::new(id, kind, value, pos));
        self.total_value += u64::from(value);
        id
    }

    /// Place an item, rolling whatever was not specified
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        pos: Vec2,
        kind: Option<LootKind>,
        value: Option<u32>,
        rng: &mut R,
    ) -> u32 {
        let kind = kind.unwrap_or_else(|| random_kind(rng));
        let value = value.unwrap_or_else(|| {
            let (lo, hi) = kind.value_range();
            rng.random_range(lo..=hi)
        });
        self.add(kind, value, pos)
    }

    pub fn get(&self, id: u32) -> Option<&LootItem> {
        self.items.iter().find(|l| l.id == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut LootItem> {
        self.items.iter_mut().find(|l| l.id == id)
    }

    /// Advance every active steal; returns the ids that finished this tick
    pub fn update(&mut self, dt: f32) -> Vec<u32> {
        self.items
            .iter_mut()
            .filter_map(|item| item.update(dt).then_some(item.id))
            .collect()
    }

    /// Remove an item and bank its value. Returns 0 for unknown ids.
    pub fn collect(&mut self, id: u32) -> u32 {
        let Some(index) = self.items.iter().position(|l| l.id == id) else {
            return 0;
        };
        let item = self.items.remove(index);
        self.collected_value += u64::from(item.value);
        log::info!("Stole {} worth {}", item.kind.as_str(), item.value);
        item.value
    }

    /// Collected share of all value ever placed, in percent
    pub fn collection_progress(&self) -> f32 {
        if self.total_value == 0 {
            return 0.0;
        }
        self.collected_value as f32 / self.total_value as f32 * 100.0
    }

    /// Items whose center is within `radius` of `pos` (inclusive)
    pub fn nearby(&self, pos: Vec2, radius: f32) -> Vec<&LootItem> {
        self.items
            .iter()
            .filter(|l| l.pos.distance(pos) <= radius)
            .collect()
    }

    /// Closest item within `radius`
    pub fn nearest(&self, pos: Vec2, radius: f32) -> Option<&LootItem> {
        self.nearby(pos, radius).into_iter().min_by(|a, b| {
            a.pos
                .distance_squared(pos)
                .partial_cmp(&b.pos.distance_squared(pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}

fn random_kind<R: Rng + ?Sized>(rng: &mut R) -> LootKind {
    let weights = LootKind::ALL.map(|k| k.spawn_weight());
    match WeightedIndex::new(weights) {
        Ok(dist) => LootKind::ALL[dist.sample(rng)],
        Err(_) => LootKind::Cash,
    }
}
