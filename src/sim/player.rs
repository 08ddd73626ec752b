//! The thief: movement intent, movement modes and noise
//!
//! Guards only ever read a `Player`; all mutation happens in the player's own
//! update at the start of each tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Bounded, Rect};
use super::kinematics::Body;
use crate::tuning::PlayerTuning;

/// Movement mode (also drives the noise model)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerMode {
    #[default]
    Idle,
    Walking,
    Running,
    Crouching,
    Looting,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub mode: PlayerMode,
    pub crouching: bool,
    pub running: bool,
    pub looting: bool,
    /// 0-100, higher is easier to hear and spot
    pub noise: f32,
    /// Acceleration requested for the next update
    accel: Vec2,
    tuning: PlayerTuning,
}

impl Player {
    pub fn new(pos: Vec2, tuning: PlayerTuning) -> Self {
        Self {
            body: Body::new(pos, tuning.size),
            mode: PlayerMode::Idle,
            crouching: false,
            running: false,
            looting: false,
            noise: 0.0,
            accel: Vec2::ZERO,
            tuning,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    /// Speed cap for the current movement toggles
    pub fn speed_limit(&self) -> f32 {
        if self.crouching {
            self.tuning.crouch_speed
        } else if self.running {
            self.tuning.run_speed
        } else {
            self.tuning.walk_speed
        }
    }

    /// Request movement along `dir` (each axis in [-1, 1]) for the next update
    pub fn steer(&mut self, dir: Vec2) {
        let speed = self.speed_limit();
        self.accel = dir * speed * self.tuning.acceleration;
        if self.looting {
            return;
        }
        self.mode = if dir == Vec2::ZERO {
            PlayerMode::Idle
        } else if self.crouching {
            PlayerMode::Crouching
        } else if self.running {
            PlayerMode::Running
        } else {
            PlayerMode::Walking
        };
    }

    pub fn toggle_crouch(&mut self) {
        self.crouching = !self.crouching;
        if self.crouching {
            self.running = false;
        }
    }

    pub fn toggle_run(&mut self) {
        self.running = !self.running;
        if self.running {
            self.crouching = false;
        }
    }

    /// Looting pins the player in place
    pub fn start_looting(&mut self) {
        self.looting = true;
        self.mode = PlayerMode::Looting;
        self.body.vel = Vec2::ZERO;
    }

    pub fn stop_looting(&mut self) {
        if self.looting {
            self.looting = false;
            self.mode = PlayerMode::Idle;
        }
    }

    /// Advance one tick: integrate the per-tick velocity, resolve walls, refresh noise
    pub fn update<T: Bounded>(&mut self, obstacles: &[T]) {
        if self.looting {
            self.body.vel = Vec2::ZERO;
        } else {
            self.body
                .accelerate(self.accel, self.tuning.friction, self.speed_limit());
            let delta = self.body.vel;
            self.body.try_move(delta, obstacles);
        }
        self.accel = Vec2::ZERO;
        self.update_noise();
    }

    fn update_noise(&mut self) {
        let speed = self.body.vel.length();
        let noise = if self.looting {
            self.tuning.looting_noise
        } else if self.crouching {
            speed * self.tuning.crouch_noise
        } else if self.running {
            speed * self.tuning.run_noise
        } else {
            speed * self.tuning.walk_noise
        };
        self.noise = noise.clamp(0.0, 100.0);
    }
}

impl Bounded for Player {
    fn bounds(&self) -> Rect {
        self.body.rect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(Vec2::new(100.0, 100.0), PlayerTuning::default())
    }

    #[test]
    fn test_walking_speed_is_capped() {
        let mut p = player();
        let walls: [Rect; 0] = [];
        for _ in 0..200 {
            p.steer(Vec2::X);
            p.update(&walls);
        }
        assert!(p.body.vel.length() <= p.tuning.walk_speed + 1e-5);
        assert!(p.pos().x > 100.0);
        assert_eq!(p.mode, PlayerMode::Walking);
    }

    #[test]
    fn test_friction_stops_player() {
        let mut p = player();
        let walls: [Rect; 0] = [];
        for _ in 0..30 {
            p.steer(Vec2::X);
            p.update(&walls);
        }
        for _ in 0..200 {
            p.steer(Vec2::ZERO);
            p.update(&walls);
        }
        assert!(p.body.vel.length() < 1e-3);
        assert!(p.noise < 0.01);
        assert_eq!(p.mode, PlayerMode::Idle);
    }

    #[test]
    fn test_crouch_and_run_are_exclusive() {
        let mut p = player();
        p.toggle_run();
        assert!(p.running);
        p.toggle_crouch();
        assert!(p.crouching && !p.running);
        p.toggle_run();
        assert!(p.running && !p.crouching);
    }

    #[test]
    fn test_noise_by_mode() {
        let walls: [Rect; 0] = [];
        let mut walker = player();
        let mut runner = player();
        runner.toggle_run();
        let mut sneaker = player();
        sneaker.toggle_crouch();
        for _ in 0..60 {
            for p in [&mut walker, &mut runner, &mut sneaker] {
                p.steer(Vec2::X);
                p.update(&walls);
            }
        }
        assert!(runner.noise > walker.noise);
        assert!(walker.noise > sneaker.noise);
        assert!(runner.noise <= 100.0);
    }

    #[test]
    fn test_looting_is_stationary_and_audible() {
        let mut p = player();
        let walls: [Rect; 0] = [];
        p.start_looting();
        let start = p.pos();
        for _ in 0..10 {
            p.steer(Vec2::X);
            p.update(&walls);
        }
        assert_eq!(p.pos(), start);
        assert_eq!(p.noise, p.tuning.looting_noise);
        p.stop_looting();
        assert_eq!(p.mode, PlayerMode::Idle);
    }

    #[test]
    fn test_wall_blocks_player() {
        let walls = [Rect::new(120.0, 0.0, 16.0, 200.0)];
        let mut p = player();
        for _ in 0..120 {
            p.steer(Vec2::X);
            p.update(&walls);
        }
        assert!(p.bounds().right() <= 120.0);
        assert!(!p.bounds().intersects(&walls[0]));
    }
}
