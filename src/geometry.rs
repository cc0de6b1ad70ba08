use std::f32::consts::TAU;

use glam::{Vec2, vec2};

/// A point or vector in either world space or observer space.
pub type Point2 = Vec2;

/// Rotate `p` about the origin by `angle` radians (counter-clockwise in a y-up frame).
#[inline]
pub fn rotate(p: Point2, angle: f32) -> Point2 {
    let (s, c) = angle.sin_cos();
    vec2(p.x * c - p.y * s, p.x * s + p.y * c)
}

/// Wrap an angle into `[0, 2π)`.
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negatives up to exactly TAU
    if a >= TAU { 0.0 } else { a }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Pack as 0RGB, the layout softbuffer presents.
    #[inline]
    pub fn to_pixel(self) -> u32 {
        (self.b as u32) | ((self.g as u32) << 8) | ((self.r as u32) << 16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn rotate_quarter_turn() {
        let r = rotate(vec2(1.0, 0.0), FRAC_PI_2);
        assert!((r - vec2(0.0, 1.0)).length() < 1e-6);
        let r = rotate(vec2(0.0, 1.0), FRAC_PI_2);
        assert!((r - vec2(-1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn rotate_preserves_length() {
        for i in 0..32 {
            let a = i as f32 * 0.37 - 5.0;
            let p = vec2(3.0, -4.0);
            assert!((rotate(p, a).length() - 5.0).abs() < 1e-4);
        }
    }

    #[test]
    fn normalize_wraps_into_range() {
        for a in [-7.0 * PI, -TAU, -1e-9, 0.0, PI, TAU, TAU + 0.5, 100.0] {
            let n = normalize_angle(a);
            assert!((0.0..TAU).contains(&n), "{a} -> {n}");
        }
        assert!((normalize_angle(-FRAC_PI_2) - 3.0 * FRAC_PI_2).abs() < 1e-5);
        assert_eq!(normalize_angle(TAU), 0.0);
    }

    #[test]
    fn pixel_packing() {
        assert_eq!(Color::rgb(0x12, 0x34, 0x56).to_pixel(), 0x0012_3456);
        assert_eq!(Color::rgba(0, 0, 200, 0).to_pixel(), 200);
    }
}
