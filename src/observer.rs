use std::f32::consts::FRAC_PI_2;
use std::fmt;

use glam::vec2;

use crate::geometry::{Point2, normalize_angle, rotate};
use crate::input::Controls;

/// Distance from the observer to its heading point, in world units.
pub const HEADING_LENGTH: f32 = 8.0;

/// Quarter turn that maps the facing direction onto +depth.
const FORWARD_CORRECTION: f32 = FRAC_PI_2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observer {
    pub pos: Point2, // world space
    rotation: f32,   // radians in [0, 2π), 0 = +X, counter-clockwise
}

impl Observer {
    pub fn new(pos: Point2, rotation: f32) -> Self {
        Self {
            pos,
            rotation: normalize_angle(rotation),
        }
    }

    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Unit vector the observer faces in world space.
    #[inline]
    pub fn forward(&self) -> Point2 {
        let (s, c) = self.rotation.sin_cos();
        vec2(c, s)
    }

    /// World point into observer space: `.x` = lateral offset (+ right), `.y` = depth.
    #[inline]
    pub fn to_observer_space(&self, p: Point2) -> Point2 {
        rotate(p - self.pos, FORWARD_CORRECTION - self.rotation)
    }

    #[inline]
    pub fn from_observer_space(&self, p: Point2) -> Point2 {
        rotate(p, self.rotation - FORWARD_CORRECTION) + self.pos
    }

    /// Move along the facing direction; negative distances step backwards.
    pub fn advance(&mut self, distance: f32) {
        self.pos += self.forward() * distance;
    }

    /// Rotate (positive = turn left), keeping the stored angle in `[0, 2π)`.
    pub fn turn(&mut self, delta: f32) {
        self.rotation = normalize_angle(self.rotation + delta);
    }

    /// One frame of input. Movement uses the heading from before this frame's turn.
    pub fn apply(&mut self, controls: &Controls, speed: f32, turn_step: f32) {
        if controls.forward {
            self.advance(speed);
        }
        if controls.backward {
            self.advance(-speed);
        }

        let mut delta = 0.0;
        if controls.turn_left {
            delta += turn_step;
        }
        if controls.turn_right {
            delta -= turn_step;
        }
        self.turn(delta);
    }

    pub fn heading_point(&self) -> Point2 {
        self.pos + self.forward() * HEADING_LENGTH
    }

    pub fn debug_report(&self) -> DebugReport {
        let heading = self.heading_point();
        DebugReport {
            rotation: self.rotation,
            position: self.pos,
            heading,
            distance: self.pos.distance(heading),
        }
    }
}

impl Default for Observer {
    fn default() -> Self {
        Self::new(Point2::ZERO, 0.0)
    }
}

/// Snapshot printed on the debug trigger. `distance` should always equal
/// [`HEADING_LENGTH`].
#[derive(Clone, Copy, Debug)]
pub struct DebugReport {
    pub rotation: f32,
    pub position: Point2,
    pub heading: Point2,
    pub distance: f32,
}

impl fmt::Display for DebugReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rot: {:.4} rad, pos: ({:.2}, {:.2}), dir: ({:.2}, {:.2}), diff: {:.4}",
            self.rotation,
            self.position.x,
            self.position.y,
            self.heading.x,
            self.heading.y,
            self.distance
        )
    }
}
