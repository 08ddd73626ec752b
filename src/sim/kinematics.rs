//! Entity kinematics with all-or-nothing collision response
//!
//! A step that would leave the body overlapping any obstacle is discarded as
//! a whole: the body stays where it was and its velocity is zeroed. There is
//! no sliding along walls.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::geometry::{Bounded, Rect};

/// Position, velocity and footprint of a moving entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Center of the footprint, sub-pixel precision
    pub pos: Vec2,
    pub vel: Vec2,
    /// Width/height of the collision footprint
    pub size: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size: Vec2::splat(size),
        }
    }

    /// Collision footprint, always centered on `pos`
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }

    /// Integer pixel center for rendering (truncated, physics keeps the fraction)
    pub fn pixel_center(&self) -> IVec2 {
        IVec2::new(self.pos.x as i32, self.pos.y as i32)
    }

    /// Move by `delta` unless the destination overlaps an obstacle
    ///
    /// Returns false (and zeroes velocity) when the step was rolled back.
    pub fn try_move<T: Bounded>(&mut self, delta: Vec2, obstacles: &[T]) -> bool {
        if delta == Vec2::ZERO {
            return true;
        }
        let previous = self.pos;
        self.pos += delta;
        let rect = self.rect();
        if obstacles.iter().any(|o| rect.intersects(&o.bounds())) {
            self.pos = previous;
            self.vel = Vec2::ZERO;
            return false;
        }
        true
    }

    /// Accelerate, apply drag and clamp speed (per-tick velocity model)
    pub fn accelerate(&mut self, accel: Vec2, friction: f32, max_speed: f32) {
        self.vel += accel;
        self.vel *= friction;
        self.vel = clamp_speed(self.vel, max_speed);
    }
}

impl Bounded for Body {
    fn bounds(&self) -> Rect {
        self.rect()
    }
}

/// Scale `vel` down to `max_speed` if it is faster
#[inline]
pub fn clamp_speed(vel: Vec2, max_speed: f32) -> Vec2 {
    let speed = vel.length();
    if speed > max_speed && speed > 0.0 {
        vel * (max_speed / speed)
    } else {
        vel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_tracks_position() {
        let mut body = Body::new(Vec2::new(10.25, 20.75), 8.0);
        assert_eq!(body.rect().center(), body.pos);
        let walls: [Rect; 0] = [];
        assert!(body.try_move(Vec2::new(0.3, -0.4), &walls));
        assert!((body.rect().center() - Vec2::new(10.55, 20.35)).length() < 1e-5);
        assert_eq!(body.pixel_center(), IVec2::new(10, 20));
    }

    #[test]
    fn test_sub_pixel_motion_accumulates() {
        let mut body = Body::new(Vec2::ZERO, 4.0);
        let walls: [Rect; 0] = [];
        for _ in 0..10 {
            body.try_move(Vec2::new(0.25, 0.0), &walls);
        }
        assert!((body.pos.x - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_collision_rolls_back_whole_step() {
        let walls = [Rect::new(20.0, -50.0, 10.0, 100.0)];
        let mut body = Body::new(Vec2::ZERO, 10.0);
        let step = Vec2::new(3.0, 0.0);

        let mut blocked_at = None;
        for _ in 0..20 {
            let before = body.pos;
            body.vel = step;
            if !body.try_move(step, &walls) {
                assert_eq!(body.pos, before, "blocked step must restore the pre-tick position");
                assert_eq!(body.vel, Vec2::ZERO);
                blocked_at.get_or_insert(before);
            }
            assert!(!body.rect().intersects(&walls[0]));
        }
        // x=15 puts the right edge exactly on the wall (touching is not overlap); x=18 would enter
        let stop = blocked_at.expect("body should reach the wall");
        assert_eq!(stop.x, 15.0);
        assert_eq!(body.pos, stop);
    }

    #[test]
    fn test_accelerate_with_friction_and_clamp() {
        let mut body = Body::new(Vec2::ZERO, 4.0);
        body.accelerate(Vec2::new(1.0, 0.0), 0.5, 10.0);
        assert!((body.vel.x - 0.5).abs() < 1e-6);
        body.accelerate(Vec2::new(100.0, 0.0), 1.0, 2.0);
        assert!((body.vel.length() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_clamp_speed_keeps_direction() {
        let v = clamp_speed(Vec2::new(3.0, 4.0), 1.0);
        assert!((v - Vec2::new(0.6, 0.8)).length() < 1e-6);
        assert_eq!(clamp_speed(Vec2::new(0.1, 0.0), 1.0), Vec2::new(0.1, 0.0));
    }
}
