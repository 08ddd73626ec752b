//! Guard AI: patrol routes, the alert state machine and player detection
//!
//! Detection is a per-tick random draw. A player inside the vision cone with a
//! clear line of sight is spotted with probability
//! `(1 - distance / view_distance) * (1 + noise / 100)`, halved when crouching.
//! Nothing accumulates between ticks: each tick is an independent draw.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::{Bounded, Rect, line_of_sight};
use super::kinematics::Body;
use super::player::Player;
use crate::consts::VISION_CONE_SEGMENTS;
use crate::tuning::GuardTuning;
use crate::{angle_between_degrees, direction_from_degrees, heading_degrees};

/// Guard behavior states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GuardState {
    /// Walking the patrol route
    #[default]
    Patrolling,
    /// Standing still, sweeping the view back and forth
    Suspicious,
    /// Walking to the last-known player position
    Investigating,
    /// Chasing the live player
    Alerted,
    /// Wandering after losing track of the player
    Searching,
}

/// What a single perception pass concluded
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Perception {
    Nothing,
    /// Inside the cone and visible, but the draw failed
    Glimpsed { probability: f32 },
    Spotted { probability: f32 },
    Heard,
}

/// Probability of spotting a player at `distance` in one tick
///
/// Not clamped: a loud player close by can exceed 1.0, which simply always wins
/// the draw.
pub fn detection_probability(distance: f32, view_distance: f32, noise: f32, crouching: bool) -> f32 {
    if view_distance <= 0.0 {
        return 0.0;
    }
    let mut chance = 1.0 - distance / view_distance;
    chance *= 1.0 + noise / 100.0;
    if crouching {
        chance *= 0.5;
    }
    chance.max(0.0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guard {
    pub id: u32,
    pub body: Body,
    pub state: GuardState,
    /// Seconds spent in the current state
    pub state_timer: f32,
    /// Cyclic route, never empty
    pub route: Vec<Vec2>,
    pub waypoint: usize,
    /// Seconds left to wait at the current waypoint
    pub wait_timer: f32,
    /// 0-100
    pub suspicion: f32,
    pub last_known: Option<Vec2>,
    /// Current movement speed (pixels per second)
    pub speed: f32,
    pub view_distance: f32,
    /// Full cone width in degrees
    pub view_angle: f32,
    /// Facing in degrees (0 = +x)
    pub view_direction: f32,
    /// Facing when the look-around sweep started
    look_origin: f32,
    tuning: GuardTuning,
}

impl Guard {
    /// Create a guard at `pos`. An empty route becomes a one-point route at the spawn.
    pub fn new(id: u32, pos: Vec2, route: Vec<Vec2>, tuning: GuardTuning) -> Self {
        let route = if route.is_empty() { vec![pos] } else { route };
        Self {
            id,
            body: Body::new(pos, tuning.size),
            state: GuardState::Patrolling,
            state_timer: 0.0,
            route,
            waypoint: 0,
            wait_timer: 0.0,
            suspicion: 0.0,
            last_known: None,
            speed: tuning.walk_speed,
            view_distance: tuning.view_distance,
            view_angle: tuning.view_angle,
            view_direction: 0.0,
            look_origin: 0.0,
            tuning,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    /// Advance one tick
    ///
    /// `player` is `None` when the orchestration has no live player to offer;
    /// an alerted guard then falls back to searching.
    pub fn update<T: Bounded, R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        player: Option<&Player>,
        obstacles: &[T],
        los_step: f32,
        rng: &mut R,
    ) -> Perception {
        self.state_timer += dt;

        match self.state {
            GuardState::Patrolling => self.patrol(dt),
            GuardState::Suspicious => self.look_around(),
            GuardState::Investigating => self.investigate(),
            GuardState::Alerted => self.chase(player),
            GuardState::Searching => self.search(rng),
        }

        let delta = self.body.vel * self.speed * dt;
        self.body.try_move(delta, obstacles);

        match player {
            Some(player) => self.perceive(player, obstacles, los_step, rng),
            None => Perception::Nothing,
        }
    }

    fn enter(&mut self, state: GuardState) {
        if self.state != state {
            log::debug!("guard {}: {:?} -> {:?}", self.id, self.state, state);
        }
        self.state = state;
        self.state_timer = 0.0;
    }

    fn face(&mut self, dir: Vec2) {
        if dir != Vec2::ZERO {
            self.view_direction = heading_degrees(dir);
        }
    }

    fn patrol(&mut self, dt: f32) {
        self.suspicion = (self.suspicion - self.tuning.suspicion_decay * dt).max(0.0);

        if self.wait_timer > 0.0 {
            self.wait_timer -= dt;
            self.body.vel = Vec2::ZERO;
            return;
        }

        let Some(&target) = self.route.get(self.waypoint % self.route.len().max(1)) else {
            self.body.vel = Vec2::ZERO;
            return;
        };
        let to_target = target - self.pos();
        let distance = to_target.length();

        if distance < self.tuning.waypoint_radius {
            self.wait_timer = self.tuning.patrol_wait;
            self.waypoint = (self.waypoint + 1) % self.route.len().max(1);
            self.body.vel = Vec2::ZERO;
        } else {
            let dir = to_target / distance;
            // Shorten the last step so the guard never overshoots the waypoint
            let reach = self.speed * dt;
            let scale = if reach > distance { distance / reach } else { 1.0 };
            self.body.vel = dir * scale;
            self.face(dir);
        }
    }

    fn look_around(&mut self) {
        if self.state_timer > self.tuning.suspicious_duration {
            self.enter(GuardState::Patrolling);
            return;
        }
        self.body.vel = Vec2::ZERO;
        self.view_direction = self.look_origin
            + (self.state_timer * self.tuning.look_rate).sin() * self.tuning.look_amplitude;
    }

    fn investigate(&mut self) {
        let Some(target) = self.last_known else {
            self.enter(GuardState::Patrolling);
            return;
        };

        let to_target = target - self.pos();
        if to_target.length() < self.tuning.investigate_radius {
            self.last_known = None;
            self.look_origin = self.view_direction;
            self.body.vel = Vec2::ZERO;
            self.enter(GuardState::Suspicious);
        } else {
            let dir = to_target.normalize_or_zero();
            self.body.vel = dir;
            self.face(dir);
        }
    }

    fn chase(&mut self, player: Option<&Player>) {
        let Some(player) = player else {
            self.enter(GuardState::Searching);
            return;
        };
        let dir = (player.pos() - self.pos()).normalize_or_zero();
        self.body.vel = dir;
        self.face(dir);
        self.speed = self.tuning.run_speed;
    }

    fn search<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.state_timer > self.tuning.search_duration {
            self.enter(GuardState::Patrolling);
            self.speed = self.tuning.walk_speed;
            return;
        }
        if rng.random::<f32>() < self.tuning.search_turn_chance {
            let heading = rng.random_range(0.0..360.0);
            self.body.vel = direction_from_degrees(heading);
            self.view_direction = heading;
        }
    }

    /// Distance to `point` if it lies inside the vision cone (ignoring walls)
    pub fn cone_distance(&self, point: Vec2) -> Option<f32> {
        let to_point = point - self.pos();
        let distance = to_point.length();
        if distance > self.view_distance {
            return None;
        }
        let bearing = heading_degrees(to_point);
        if angle_between_degrees(bearing, self.view_direction) > self.view_angle / 2.0 {
            return None;
        }
        Some(distance)
    }

    /// Vision/hearing pass against the live player
    pub fn perceive<T: Bounded, R: Rng + ?Sized>(
        &mut self,
        player: &Player,
        obstacles: &[T],
        los_step: f32,
        rng: &mut R,
    ) -> Perception {
        let seen = self
            .cone_distance(player.pos())
            .filter(|_| line_of_sight(self.pos(), player.pos(), obstacles, los_step));

        if let Some(distance) = seen {
            let probability =
                detection_probability(distance, self.view_distance, player.noise, player.crouching);
            if rng.random::<f32>() < probability {
                self.alert(player.pos());
                return Perception::Spotted { probability };
            }
            return Perception::Glimpsed { probability };
        }

        if self.hears(player) {
            self.hear(player.pos());
            return Perception::Heard;
        }

        Perception::Nothing
    }

    fn hears(&self, player: &Player) -> bool {
        if player.noise <= 0.0 || self.state == GuardState::Alerted {
            return false;
        }
        let radius = player.noise + self.view_distance * self.tuning.hearing_factor;
        self.pos().distance(player.pos()) <= radius
    }

    /// Go and check out a sound at `position`
    pub fn hear(&mut self, position: Vec2) {
        self.last_known = Some(position);
        self.suspicion = self.suspicion.max(self.tuning.heard_suspicion);
        if self.state != GuardState::Investigating {
            self.speed = self.tuning.walk_speed;
            self.wait_timer = 0.0;
            self.enter(GuardState::Investigating);
        }
    }

    /// Lock on to the player
    pub fn alert(&mut self, position: Vec2) {
        if self.state != GuardState::Alerted {
            log::info!("guard {} spotted the player at {:?}", self.id, position);
        }
        self.last_known = Some(position);
        self.enter(GuardState::Alerted);
        self.speed = self.tuning.run_speed;
        self.suspicion = 100.0;
    }

    /// Fan polygon (apex + arc) covering the vision cone, for rendering and overlap tests
    pub fn vision_cone(&self, segments: usize) -> Vec<Vec2> {
        let segments = segments.max(1);
        let half = self.view_angle / 2.0;
        let origin = self.pos();
        let mut points = Vec::with_capacity(segments + 2);
        points.push(origin);
        for i in 0..=segments {
            let angle = self.view_direction - half + self.view_angle * i as f32 / segments as f32;
            points.push(origin + direction_from_degrees(angle) * self.view_distance);
        }
        points
    }

    /// Vision cone at the default render resolution
    pub fn default_vision_cone(&self) -> Vec<Vec2> {
        self.vision_cone(VISION_CONE_SEGMENTS)
    }
}

impl Bounded for Guard {
    fn bounds(&self) -> Rect {
        self.body.rect()
    }
}
