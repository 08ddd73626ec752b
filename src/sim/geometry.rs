//! Collision and visibility queries over axis-aligned rectangles
//!
//! Everything here is pure: functions only read their inputs, so any number of
//! entities can query the same obstacle set within a tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::LOS_PROBE_SIZE;

/// Axis-aligned rectangle (min corner + size), in world pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of the given size centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            x: center.x - size.x / 2.0,
            y: center.y - size.y / 2.0,
            w: size.x,
            h: size.y,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Overlap test. Rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Half-open containment: left/top edges are inside, right/bottom are not
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    /// Closest point of the rectangle to `p` (p itself when inside)
    ///
    /// Never panics: a rectangle with a negative size collapses onto its far edge.
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.max(self.left()).min(self.right()),
            p.y.max(self.top()).min(self.bottom()),
        )
    }
}

/// Anything with an axis-aligned footprint that can take part in collision queries
pub trait Bounded {
    fn bounds(&self) -> Rect;
}

impl Bounded for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

/// Ray-marched line-of-sight test
///
/// Walks from `start` toward `end` in increments of `step`, probing a small
/// square at every sample. Returns false at the first probe that overlaps an
/// obstacle. This is a sampling approximation: an obstacle thinner than `step`
/// sitting between two samples can be missed, so callers choose `step` against
/// the thinnest wall they care about.
pub fn line_of_sight<T: Bounded>(start: Vec2, end: Vec2, obstacles: &[T], step: f32) -> bool {
    let delta = end - start;
    let distance = delta.length();
    if distance == 0.0 {
        return true;
    }
    // A non-positive step would never advance
    let step = if step > 0.0 { step } else { crate::consts::LOS_STEP };
    let dir = delta / distance;
    let probe_size = Vec2::splat(LOS_PROBE_SIZE);

    let mut travelled = 0.0;
    while travelled < distance {
        let probe = Rect::from_center(start + dir * travelled, probe_size);
        if obstacles.iter().any(|o| probe.intersects(&o.bounds())) {
            return false;
        }
        travelled += step;
    }

    true
}

/// All candidates whose bounds overlap `rect`
pub fn rect_collisions<'a, T: Bounded>(rect: &Rect, candidates: &'a [T]) -> Vec<&'a T> {
    candidates
        .iter()
        .filter(|c| rect.intersects(&c.bounds()))
        .collect()
}

/// All candidates whose bounds come strictly closer than `radius` to `center`
///
/// Uses the clamp-to-rectangle closest point, which is exact for axis-aligned
/// rectangles only.
pub fn circle_collisions<'a, T: Bounded>(center: Vec2, radius: f32, candidates: &'a [T]) -> Vec<&'a T> {
    candidates
        .iter()
        .filter(|c| {
            let closest = c.bounds().closest_point(center);
            closest.distance(center) < radius
        })
        .collect()
}

#[inline]
pub fn point_in_rect(point: Vec2, rect: &Rect) -> bool {
    rect.contains_point(point)
}

/// Strict containment: a point exactly on the circle is outside
#[inline]
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance(center) < radius
}

/// Even-odd ray casting test
///
/// Points lying exactly on an edge may land on either side.
pub fn point_in_polygon(point: Vec2, vertices: &[Vec2]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[j];
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }

    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::LOS_STEP;
    use proptest::prelude::*;

    fn wall(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(x, y, w, h)
    }

    #[test]
    fn test_rect_edges_touching_do_not_intersect() {
        let a = wall(0.0, 0.0, 10.0, 10.0);
        let b = wall(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        let c = wall(9.5, 9.5, 10.0, 10.0);
        assert!(a.intersects(&c));
    }

    #[test]
    fn test_line_of_sight_degenerate_segment() {
        let walls = [wall(0.0, 0.0, 100.0, 100.0)];
        // Even inside a wall, a zero-length ray sees its own endpoint
        assert!(line_of_sight(Vec2::new(50.0, 50.0), Vec2::new(50.0, 50.0), &walls, LOS_STEP));
    }

    #[test]
    fn test_line_of_sight_blocked_by_wall() {
        let walls = [wall(50.0, -20.0, 16.0, 40.0)];
        assert!(!line_of_sight(Vec2::ZERO, Vec2::new(100.0, 0.0), &walls, LOS_STEP));
        // Passing above the wall is clear
        assert!(line_of_sight(
            Vec2::new(0.0, -40.0),
            Vec2::new(100.0, -40.0),
            &walls,
            LOS_STEP
        ));
    }

    #[test]
    fn test_line_of_sight_can_miss_thin_wall() {
        // A 0.5px sliver between probes at x=20 and x=25 slips through a coarse step
        let walls = [wall(22.25, -20.0, 0.5, 40.0)];
        assert!(line_of_sight(Vec2::ZERO, Vec2::new(40.0, 0.0), &walls, LOS_STEP));
        // A finer step catches it
        assert!(!line_of_sight(Vec2::ZERO, Vec2::new(40.0, 0.0), &walls, 1.0));
    }

    #[test]
    fn test_rect_collisions() {
        let walls = [
            wall(0.0, 0.0, 10.0, 10.0),
            wall(20.0, 0.0, 10.0, 10.0),
            wall(5.0, 5.0, 10.0, 10.0),
        ];
        let hits = rect_collisions(&wall(8.0, 8.0, 4.0, 4.0), &walls);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|r| r.x != 20.0));
    }

    #[test]
    fn test_circle_collisions_closest_point() {
        let walls = [wall(10.0, 0.0, 10.0, 10.0)];
        // Closest point is (10, 5), distance 5
        assert_eq!(circle_collisions(Vec2::new(5.0, 5.0), 6.0, &walls).len(), 1);
        assert!(circle_collisions(Vec2::new(5.0, 5.0), 5.0, &walls).is_empty());
        // Near a corner the diagonal distance matters
        assert!(circle_collisions(Vec2::new(7.0, -3.0), 4.0, &walls).is_empty());
        assert_eq!(circle_collisions(Vec2::new(7.0, -3.0), 4.5, &walls).len(), 1);
    }

    #[test]
    fn test_circle_collisions_negative_size_does_not_panic() {
        // A body built from a negative size tuning value
        let bodies = [Rect::from_center(Vec2::ZERO, Vec2::splat(-24.0))];
        let closest = bodies[0].closest_point(Vec2::new(100.0, 100.0));
        assert!(closest.is_finite());
        assert!(circle_collisions(Vec2::new(100.0, 100.0), 5.0, &bodies).is_empty());
        assert_eq!(circle_collisions(Vec2::new(1.0, 0.0), 20.0, &bodies).len(), 1);
    }

    #[test]
    fn test_point_in_rect_half_open() {
        let r = wall(0.0, 0.0, 10.0, 10.0);
        assert!(point_in_rect(Vec2::new(0.0, 0.0), &r));
        assert!(point_in_rect(Vec2::new(9.9, 9.9), &r));
        assert!(!point_in_rect(Vec2::new(10.0, 5.0), &r));
    }

    #[test]
    fn test_point_in_circle_boundary_is_outside() {
        let center = Vec2::new(1.0, 1.0);
        assert!(!point_in_circle(Vec2::new(4.0, 1.0), center, 3.0));
        assert!(!point_in_circle(Vec2::new(4.0, 5.0), center, 5.0));
        assert!(point_in_circle(Vec2::new(3.9, 1.0), center, 3.0));
    }

    #[test]
    fn test_point_in_polygon_concave() {
        // U shape opening upward
        let poly = [
            Vec2::new(0.0, 0.0),
            Vec2::new(30.0, 0.0),
            Vec2::new(30.0, 30.0),
            Vec2::new(20.0, 30.0),
            Vec2::new(20.0, 10.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0, 30.0),
            Vec2::new(0.0, 30.0),
        ];
        assert!(point_in_polygon(Vec2::new(5.0, 20.0), &poly));
        assert!(point_in_polygon(Vec2::new(15.0, 5.0), &poly));
        assert!(!point_in_polygon(Vec2::new(15.0, 20.0), &poly));
        assert!(!point_in_polygon(Vec2::new(-5.0, 5.0), &poly));
    }

    #[test]
    fn test_point_in_polygon_degenerate() {
        assert!(!point_in_polygon(Vec2::ZERO, &[]));
        assert!(!point_in_polygon(Vec2::ZERO, &[Vec2::ONE, Vec2::NEG_ONE]));
    }

    proptest! {
        #[test]
        fn proptest_los_clear_without_obstacles(
            sx in -500.0f32..500.0, sy in -500.0f32..500.0,
            ex in -500.0f32..500.0, ey in -500.0f32..500.0,
        ) {
            let none: [Rect; 0] = [];
            prop_assert!(line_of_sight(Vec2::new(sx, sy), Vec2::new(ex, ey), &none, LOS_STEP));
        }

        #[test]
        fn proptest_los_blocked_by_wall_wider_than_step(
            wall_x in -200.0f32..200.0,
            wall_w in 6.0f32..60.0,
            lead in 20.0f32..100.0,
            tail in 20.0f32..100.0,
            y in -40.0f32..40.0,
        ) {
            let walls = [wall(wall_x, -50.0, wall_w, 100.0)];
            let start = Vec2::new(wall_x - lead, y);
            let end = Vec2::new(wall_x + wall_w + tail, y);
            prop_assert!(!line_of_sight(start, end, &walls, LOS_STEP));
            prop_assert!(!line_of_sight(end, start, &walls, LOS_STEP));
        }
    }
}
